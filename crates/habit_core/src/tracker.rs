use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::cache::PeriodCache;
use crate::config::TrackerConfig;
use crate::document::PeriodDocument;
use crate::error::HabitError;
use crate::habits;
use crate::notifications::{Notice, Notifier, TracingNotifier};
use crate::period::{PeriodId, PeriodMode};
use crate::session::SessionState;
use crate::status::DayStatus;
use crate::storage::{FsAdapter, StorageAdapter};
use crate::store::PeriodStore;
use crate::view::PeriodView;

/// Result of copying a habit into a neighbouring period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(PeriodId),
    AlreadyExists(PeriodId),
}

/// Entry point for every navigation and edit.
///
/// All document access goes through the session cache; the store is only
/// reached on a cache miss or as the write-through sink of an edit.
pub struct HabitTracker {
    config: TrackerConfig,
    adapter: Arc<dyn StorageAdapter>,
    cache: PeriodCache,
    session: RwLock<SessionState>,
    notifier: Arc<dyn Notifier>,
}

pub struct HabitTrackerBuilder {
    config: TrackerConfig,
    adapter: Option<Arc<dyn StorageAdapter>>,
    notifier: Option<Arc<dyn Notifier>>,
    session: Option<SessionState>,
    today: Option<NaiveDate>,
}

impl HabitTrackerBuilder {
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            adapter: None,
            notifier: None,
            session: None,
            today: None,
        }
    }

    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_data_folder(mut self, folder: &str) -> Self {
        self.config.set_data_folder(folder);
        self
    }

    pub fn with_storage(mut self, adapter: Arc<dyn StorageAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Starts from `session` instead of loading the session file.
    pub fn with_session(mut self, session: SessionState) -> Self {
        self.session = Some(session);
        self
    }

    /// Date used for a fresh session. Defaults to the local date.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn build(self) -> HabitTracker {
        let adapter = self
            .adapter
            .unwrap_or_else(|| Arc::new(FsAdapter) as Arc<dyn StorageAdapter>);
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier) as Arc<dyn Notifier>);
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let session = self.session.unwrap_or_else(|| {
            let path = self.config.session_path();
            SessionState::load(adapter.as_ref(), &path, today).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %format!("{err:#}"), "ignoring unreadable session");
                SessionState::starting_at(today)
            })
        });
        let store = PeriodStore::new(
            self.config.data_folder.clone(),
            Arc::clone(&adapter),
            Arc::clone(&notifier),
        );
        info!(
            root = %self.config.data_folder.display(),
            period = %session.current_id(),
            "habit tracker ready"
        );
        HabitTracker {
            config: self.config,
            adapter,
            cache: PeriodCache::new(store),
            session: RwLock::new(session),
            notifier,
        }
    }
}

impl Default for HabitTrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitTracker {
    pub fn builder() -> HabitTrackerBuilder {
        HabitTrackerBuilder::new()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn mode(&self) -> PeriodMode {
        self.session.read().mode
    }

    pub fn current_id(&self) -> PeriodId {
        self.session.read().current_id()
    }

    pub fn session(&self) -> SessionState {
        self.session.read().clone()
    }

    /// The current period's document.
    pub fn document(&self) -> PeriodDocument {
        self.cache.get(&self.current_id())
    }

    pub fn document_for(&self, id: &PeriodId) -> PeriodDocument {
        self.cache.get(id)
    }

    pub fn view(&self) -> PeriodView {
        let (id, width) = {
            let session = self.session.read();
            (session.current_id(), session.column_width())
        };
        PeriodView::build(id, &self.cache.get(&id), width)
    }

    pub fn switch_mode(&self, mode: PeriodMode, today: NaiveDate) -> PeriodId {
        let mut session = self.session.write();
        if session.mode != mode {
            let next = session.current_id().with_mode(mode, today);
            session.set_current(next);
            info!(%mode, period = %next, "switched period mode");
        }
        session.current_id()
    }

    pub fn navigate(&self, direction: i32) -> PeriodId {
        let mut session = self.session.write();
        let next = session.current_id().adjacent(direction);
        session.set_current(next);
        debug!(period = %next, cached = self.cache.len(), "navigated");
        next
    }

    pub fn go_to_today(&self, today: NaiveDate) -> PeriodId {
        let mut session = self.session.write();
        let next = PeriodId::current(session.mode, today);
        session.set_current(next);
        next
    }

    pub fn go_to(&self, id: PeriodId) {
        self.session.write().set_current(id);
    }

    pub fn set_column_width(&self, width: u32) {
        self.session.write().set_column_width(width);
    }

    pub fn save_session(&self) -> Result<()> {
        let path = self.config.session_path();
        self.session.read().save(self.adapter.as_ref(), &path)
    }

    #[instrument(skip(self))]
    pub fn add_habit(&self, name: &str) -> Result<(), HabitError> {
        let id = self.current_id();
        let outcome = self.cache.modify(&id, |doc| habits::add_habit(doc, name));
        self.report(outcome)
    }

    #[instrument(skip(self))]
    pub fn rename_habit(&self, old: &str, new: &str) -> Result<(), HabitError> {
        let id = self.current_id();
        let outcome = self
            .cache
            .modify(&id, |doc| habits::rename_habit(doc, old, new));
        self.report(outcome)
    }

    #[instrument(skip(self))]
    pub fn delete_habit(&self, name: &str) -> bool {
        let id = self.current_id();
        self.cache
            .modify(&id, |doc| Ok::<_, Infallible>(habits::delete_habit(doc, name)))
            .unwrap_or_else(|never| match never {})
    }

    pub fn reorder(&self, dragged: &str, target: &str) -> bool {
        let id = self.current_id();
        self.cache
            .modify(&id, |doc| {
                Ok::<_, Infallible>(habits::reorder(doc, dragged, target))
            })
            .unwrap_or_else(|never| match never {})
    }

    /// Cycles the mark of `habit` on `day`, which must be one of the days
    /// the current period shows.
    pub fn toggle_day(&self, habit: &str, day: u32) -> Result<DayStatus, HabitError> {
        let id = self.current_id();
        if !id.days().contains(&day) {
            return self.report(Err(HabitError::DayOutOfRange(day)));
        }
        let outcome = self
            .cache
            .modify(&id, |doc| habits::toggle_day(doc, habit, day));
        self.report(outcome)
    }

    /// Copies `habit` from the current period into the one `direction`
    /// steps away, without its marks.
    #[instrument(skip(self))]
    pub fn copy_habit(&self, habit: &str, direction: i32) -> Result<CopyOutcome, HabitError> {
        let source = self.current_id();
        let habit = habit.trim();
        let checked = if habit.is_empty() {
            Err(HabitError::EmptyName)
        } else if !self.cache.get(&source).contains(habit) {
            Err(HabitError::NotFound(habit.to_string()))
        } else {
            Ok(())
        };
        self.report(checked)?;

        let target = source.adjacent(direction);
        let inserted = self
            .cache
            .modify(&target, |doc| {
                Ok::<_, Infallible>(habits::insert_copied_habit(doc, habit))
            })
            .unwrap_or_else(|never| match never {});
        if inserted {
            info!(%source, %target, habit, "copied habit");
            self.notifier
                .notify(Notice::info(format!("copied to {target}")));
            Ok(CopyOutcome::Copied(target))
        } else {
            self.notifier
                .notify(Notice::info(format!("already exists in {target}")));
            Ok(CopyOutcome::AlreadyExists(target))
        }
    }

    fn report<T>(&self, outcome: Result<T, HabitError>) -> Result<T, HabitError> {
        if let Err(err) = &outcome {
            self.notifier.notify(Notice::info(err.to_string()));
        }
        outcome
    }
}
