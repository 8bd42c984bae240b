use std::path::PathBuf;

use tracing::info;

pub const DEFAULT_DATA_FOLDER: &str = "HabitTracker";
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub data_folder: PathBuf,
    pub session_file: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
            session_file: None,
        }
    }
}

impl TrackerConfig {
    /// Reads `HABIT_TRACKER_DIR` and `HABIT_TRACKER_SESSION`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("HABIT_TRACKER_DIR") {
            config.set_data_folder(&dir);
        }
        if let Ok(session) = std::env::var("HABIT_TRACKER_SESSION") {
            if !session.trim().is_empty() {
                config.session_file = Some(PathBuf::from(session.trim()));
            }
        }
        config
    }

    pub fn with_data_folder(mut self, folder: &str) -> Self {
        self.set_data_folder(folder);
        self
    }

    pub fn set_data_folder(&mut self, folder: &str) {
        self.data_folder = normalize_data_folder(folder);
        info!(path = %self.data_folder.display(), "using tracker data folder");
    }

    /// Session file location; defaults to `session.json` in the data folder.
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| self.data_folder.join(SESSION_FILE_NAME))
    }
}

/// Trims the folder, converts `\` to `/`, collapses repeated and trailing
/// separators and falls back to the default when nothing is left.
pub fn normalize_data_folder(folder: &str) -> PathBuf {
    let unified = folder.trim().replace('\\', "/");
    let absolute = unified.starts_with('/');
    let joined = unified
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    match (joined.is_empty(), absolute) {
        (true, true) => PathBuf::from("/"),
        (true, false) => PathBuf::from(DEFAULT_DATA_FOLDER),
        (false, true) => PathBuf::from(format!("/{joined}")),
        (false, false) => PathBuf::from(joined),
    }
}
