use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::status::DayStatus;

pub const DOCUMENT_VERSION: u32 = 1;

/// Day-of-month to completion mark for a single habit.
pub type DayStates = BTreeMap<u32, DayStatus>;

/// Persisted state of one period: the habits, their display order and the
/// per-day marks.
///
/// Deserialization goes through [`RawPeriodDocument`] so every document
/// read from storage is already normalized: `habits` is duplicate-free and
/// `order` holds exactly the names in `habits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPeriodDocument")]
pub struct PeriodDocument {
    pub habits: Vec<String>,
    pub states: BTreeMap<String, DayStates>,
    pub order: Vec<String>,
    pub version: u32,
}

impl Default for PeriodDocument {
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            states: BTreeMap::new(),
            order: Vec::new(),
            version: DOCUMENT_VERSION,
        }
    }
}

/// On-disk shape with every field optional, as older files may lack any
/// of them.
#[derive(Debug, Default, Deserialize)]
struct RawPeriodDocument {
    habits: Option<Vec<String>>,
    states: Option<BTreeMap<String, DayStates>>,
    order: Option<Vec<String>>,
    version: Option<u32>,
}

impl From<RawPeriodDocument> for PeriodDocument {
    fn from(raw: RawPeriodDocument) -> Self {
        let mut seen = HashSet::new();
        let habits: Vec<String> = raw
            .habits
            .unwrap_or_default()
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();
        let order = raw.order.unwrap_or_else(|| habits.clone());
        let mut doc = PeriodDocument {
            habits,
            states: raw.states.unwrap_or_default(),
            order,
            version: raw.version.unwrap_or(DOCUMENT_VERSION),
        };
        doc.reconcile_order();
        doc
    }
}

impl PeriodDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a stored document. Blank input is read as `{}`.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        if text.trim().is_empty() {
            return Ok(RawPeriodDocument::default().into());
        }
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn contains(&self, habit: &str) -> bool {
        self.habits.iter().any(|name| name == habit)
    }

    pub fn status(&self, habit: &str, day: u32) -> DayStatus {
        self.states
            .get(habit)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or_default()
    }

    /// Drops names from `order` that are not habits (keeping the first
    /// occurrence of each survivor) and appends habits missing from it.
    fn reconcile_order(&mut self) {
        let habits: HashSet<&str> = self.habits.iter().map(String::as_str).collect();
        let mut placed = HashSet::new();
        let mut order: Vec<String> = self
            .order
            .iter()
            .filter(|name| habits.contains(name.as_str()) && placed.insert(name.as_str()))
            .cloned()
            .collect();
        order.extend(
            self.habits
                .iter()
                .filter(|name| !placed.contains(name.as_str()))
                .cloned(),
        );
        self.order = order;
    }
}
