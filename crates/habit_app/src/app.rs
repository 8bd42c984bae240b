use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use habit_core::config::TrackerConfig;
use habit_core::notifications::MemoryNotifier;
use habit_core::view::Presenter;
use habit_core::{HabitTracker, PeriodId, PeriodMode};
use tracing::{debug, info, warn};

use crate::terminal::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(name = "habit_tracker", version, about = "Monthly and weekly habit tracker")]
pub struct Cli {
    /// Folder holding the `months/` and `weeks/` data directories.
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Session file remembering the current period and mode.
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Date used as today, as YYYY-MM-DD.
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current period.
    Show,
    /// Add a habit to the current period.
    Add { name: String },
    Rename { old: String, new: String },
    Delete { name: String },
    /// Advance a day's mark: empty, done, skipped, empty.
    Toggle { habit: String, day: u32 },
    /// Move a habit to the position of another.
    Move { dragged: String, target: String },
    /// Copy a habit, without its marks, into a neighbouring period.
    Copy {
        habit: String,
        #[arg(value_enum, default_value_t = Direction::Next)]
        to: Direction,
    },
    Next,
    Prev,
    Today,
    /// Switch between month and week view.
    Mode { mode: PeriodMode },
    /// Jump to a period id such as 2024-03 or 2024-03-W2.
    Goto { id: PeriodId },
    /// Set the habit column width for the current mode.
    Width { columns: u32 },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn step(self) -> i32 {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

/// Drives a [`HabitTracker`] from one parsed command.
pub struct TrackerController {
    tracker: HabitTracker,
    notifier: Arc<MemoryNotifier>,
    today: NaiveDate,
}

impl TrackerController {
    pub fn new(config: TrackerConfig, today: NaiveDate) -> Self {
        let notifier = Arc::new(MemoryNotifier::new());
        let tracker = HabitTracker::builder()
            .with_config(config)
            .with_notifier(notifier.clone())
            .today(today)
            .build();
        Self {
            tracker,
            notifier,
            today,
        }
    }

    pub fn tracker(&self) -> &HabitTracker {
        &self.tracker
    }

    /// Applies `command`. Rejected edits surface as notices, not errors.
    pub fn apply(&self, command: Command) {
        debug!(?command, "applying command");
        let tracker = &self.tracker;
        match command {
            Command::Show => {}
            Command::Add { name } => {
                let _ = tracker.add_habit(&name);
            }
            Command::Rename { old, new } => {
                let _ = tracker.rename_habit(&old, &new);
            }
            Command::Delete { name } => {
                tracker.delete_habit(&name);
            }
            Command::Toggle { habit, day } => {
                let _ = tracker.toggle_day(&habit, day);
            }
            Command::Move { dragged, target } => {
                tracker.reorder(&dragged, &target);
            }
            Command::Copy { habit, to } => {
                let _ = tracker.copy_habit(&habit, to.step());
            }
            Command::Next => {
                tracker.navigate(1);
            }
            Command::Prev => {
                tracker.navigate(-1);
            }
            Command::Today => {
                tracker.go_to_today(self.today);
            }
            Command::Mode { mode } => {
                tracker.switch_mode(mode, self.today);
            }
            Command::Goto { id } => tracker.go_to(id),
            Command::Width { columns } => tracker.set_column_width(columns),
        }
    }

    /// Applies `command`, prints pending notices and the resulting period,
    /// then saves the session.
    pub fn handle<W: Write>(
        &self,
        command: Command,
        presenter: &mut TerminalPresenter<W>,
    ) -> Result<()> {
        let start = Instant::now();
        self.apply(command);
        for notice in self.notifier.drain() {
            presenter.notice(&notice)?;
        }
        presenter.present(&self.tracker.view())?;
        if let Err(err) = self.tracker.save_session() {
            warn!(error = %format!("{err:#}"), "unable to save session");
        }
        info!(elapsed_ms = %start.elapsed().as_millis(), "command handled");
        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = TrackerConfig::from_env();
    if let Some(dir) = &cli.data_dir {
        config.set_data_folder(dir);
    }
    if let Some(session) = cli.session {
        config.session_file = Some(session);
    }
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let controller = TrackerController::new(config, today);
    let stdout = std::io::stdout();
    let mut presenter = TerminalPresenter::new(stdout.lock());
    controller.handle(cli.command.unwrap_or(Command::Show), &mut presenter)
}
