pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod habits;
pub mod notifications;
pub mod period;
pub mod session;
pub mod status;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod view;

pub use crate::document::PeriodDocument;
pub use crate::period::{PeriodId, PeriodMode};
pub use crate::status::DayStatus;
pub use crate::tracker::{CopyOutcome, HabitTracker, HabitTrackerBuilder};
