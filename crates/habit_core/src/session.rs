use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::period::{month_id, week_id, PeriodId, PeriodMode};
use crate::storage::StorageAdapter;

/// Navigation and layout state that survives between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub mode: PeriodMode,
    pub current_month: PeriodId,
    pub current_week: PeriodId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habit_width_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habit_width_week: Option<u32>,
}

impl SessionState {
    pub fn starting_at(today: NaiveDate) -> Self {
        Self {
            mode: PeriodMode::Month,
            current_month: month_id(today),
            current_week: week_id(today),
            habit_width_month: None,
            habit_width_week: None,
        }
    }

    pub fn current_id(&self) -> PeriodId {
        match self.mode {
            PeriodMode::Month => self.current_month,
            PeriodMode::Week => self.current_week,
        }
    }

    /// Makes `id` current and switches to its mode.
    pub fn set_current(&mut self, id: PeriodId) {
        self.mode = id.mode();
        match self.mode {
            PeriodMode::Month => self.current_month = id,
            PeriodMode::Week => self.current_week = id,
        }
    }

    pub fn column_width(&self) -> Option<u32> {
        match self.mode {
            PeriodMode::Month => self.habit_width_month,
            PeriodMode::Week => self.habit_width_week,
        }
    }

    pub fn set_column_width(&mut self, width: u32) {
        match self.mode {
            PeriodMode::Month => self.habit_width_month = Some(width),
            PeriodMode::Week => self.habit_width_week = Some(width),
        }
    }

    /// Replaces ids stored under the wrong mode with today's.
    fn sanitize(mut self, today: NaiveDate) -> Self {
        if self.current_month.mode() != PeriodMode::Month {
            warn!(id = %self.current_month, "discarding non-month current_month");
            self.current_month = month_id(today);
        }
        if self.current_week.mode() != PeriodMode::Week {
            warn!(id = %self.current_week, "discarding non-week current_week");
            self.current_week = week_id(today);
        }
        self
    }

    /// Loads the session file, or a fresh session when there is none.
    pub fn load(adapter: &dyn StorageAdapter, path: &Path, today: NaiveDate) -> Result<Self> {
        let exists = adapter
            .exists(path)
            .with_context(|| format!("failed to probe {}", path.display()))?;
        if !exists {
            debug!(path = %path.display(), "no session file; starting fresh");
            return Ok(Self::starting_at(today));
        }
        let raw = adapter
            .read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let state: SessionState = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(state.sanitize(today))
    }

    pub fn save(&self, adapter: &dyn StorageAdapter, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let exists = adapter
                .exists(parent)
                .with_context(|| format!("failed to probe {}", parent.display()))?;
            if !exists {
                adapter
                    .mkdir(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let text = serde_json::to_string_pretty(self)?;
        adapter
            .write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}
