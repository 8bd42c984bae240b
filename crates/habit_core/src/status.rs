use std::fmt;

use serde::{Deserialize, Serialize};

/// Completion mark for one habit on one day.
///
/// Stored as the integer code `0`, `1` or `2`. The only transition is
/// [`DayStatus::next`], which cycles empty -> done -> skipped -> empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayStatus {
    #[default]
    Empty,
    Done,
    Skipped,
}

impl DayStatus {
    pub fn next(self) -> Self {
        match self {
            DayStatus::Empty => DayStatus::Done,
            DayStatus::Done => DayStatus::Skipped,
            DayStatus::Skipped => DayStatus::Empty,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            DayStatus::Empty => 0,
            DayStatus::Done => 1,
            DayStatus::Skipped => 2,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            DayStatus::Empty => '○',
            DayStatus::Done => '●',
            DayStatus::Skipped => '×',
        }
    }
}

impl TryFrom<u8> for DayStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DayStatus::Empty),
            1 => Ok(DayStatus::Done),
            2 => Ok(DayStatus::Skipped),
            other => Err(format!("unknown status code {other}")),
        }
    }
}

impl From<DayStatus> for u8 {
    fn from(status: DayStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
