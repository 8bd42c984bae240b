use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PeriodError;

/// Years accepted when parsing an id. Keeps every parsed id well inside
/// the range chrono can represent.
const YEARS: RangeInclusive<i32> = 1..=9999;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Granularity of a tracked period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    #[default]
    Month,
    Week,
}

impl PeriodMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodMode::Month => "month",
            PeriodMode::Week => "week",
        }
    }

    /// Storage subdirectory holding documents of this mode.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PeriodMode::Month => "months",
            PeriodMode::Week => "weeks",
        }
    }
}

impl fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodMode {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "months" => Ok(PeriodMode::Month),
            "week" | "weeks" => Ok(PeriodMode::Week),
            other => Err(PeriodError::UnknownMode(other.to_string())),
        }
    }
}

/// Canonical identifier of one tracked period: `YYYY-MM` or `YYYY-MM-W{n}`.
///
/// Week numbers are relative to the calendar month and restart at 1 every
/// month, so the week spanning a month boundary is split into two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodId {
    Month { year: i32, month: u32 },
    Week { year: i32, month: u32, week: u32 },
}

/// Inclusive date span covered by a month-relative week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

pub fn month_id(date: NaiveDate) -> PeriodId {
    PeriodId::Month {
        year: date.year(),
        month: date.month(),
    }
}

pub fn week_id(date: NaiveDate) -> PeriodId {
    let offset = first_weekday(date.year(), date.month()) - 1;
    PeriodId::Week {
        year: date.year(),
        month: date.month(),
        week: (date.day() + offset).div_ceil(7),
    }
}

/// ISO weekday (1 = Monday .. 7 = Sunday) of the first day of the month.
///
/// # Panics
/// When `month` is not in `1..=12`.
pub fn first_weekday(year: i32, month: u32) -> u32 {
    first_of_month(year, month).weekday().number_from_monday()
}

/// # Panics
/// When `month` is not in `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = first_of_month(next_year, next_month) - Duration::days(1);
    last.day()
}

/// # Panics
/// When `month` is not in `1..=12`.
pub fn weeks_in_month(year: i32, month: u32) -> u32 {
    (days_in_month(year, month) + first_weekday(year, month) - 1).div_ceil(7)
}

/// Reconstructs the dates of a month-relative week.
///
/// Weeks touching a month edge are clamped to the month and so may be
/// shorter than seven days.
///
/// # Panics
/// When `month` is not in `1..=12`.
pub fn week_date_range(year: i32, month: u32, week: u32) -> WeekRange {
    let last_day = i64::from(days_in_month(year, month));
    let offset = i64::from(first_weekday(year, month)) - 1;
    let mut start_day = 1 + (i64::from(week) - 1) * 7 - offset;
    if start_day < 1 || start_day > last_day {
        start_day = 1;
    }
    let end_day = (start_day + 6).min(last_day);
    let first = first_of_month(year, month);
    WeekRange {
        start: first + Duration::days(start_day - 1),
        end: first + Duration::days(end_day - 1),
    }
}

// Parsed ids are limited to `YEARS`, so only a hand-built id can miss.
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month must be within 1..=12")
}

impl PeriodId {
    pub fn current(mode: PeriodMode, today: NaiveDate) -> Self {
        match mode {
            PeriodMode::Month => month_id(today),
            PeriodMode::Week => week_id(today),
        }
    }

    pub fn mode(&self) -> PeriodMode {
        match self {
            PeriodId::Month { .. } => PeriodMode::Month,
            PeriodId::Week { .. } => PeriodMode::Week,
        }
    }

    pub fn year(&self) -> i32 {
        match *self {
            PeriodId::Month { year, .. } | PeriodId::Week { year, .. } => year,
        }
    }

    pub fn month(&self) -> u32 {
        match *self {
            PeriodId::Month { month, .. } | PeriodId::Week { month, .. } => month,
        }
    }

    /// Identifier `direction` periods away from this one.
    ///
    /// Weeks roll into the neighbouring month: stepping back from week 1
    /// lands on the previous month's last week, stepping past the last
    /// week lands on week 1 of the next month.
    pub fn adjacent(&self, direction: i32) -> Self {
        match *self {
            PeriodId::Month { year, month } => {
                let total = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(direction);
                PeriodId::Month {
                    year: total.div_euclid(12) as i32,
                    month: total.rem_euclid(12) as u32 + 1,
                }
            }
            PeriodId::Week { .. } => {
                let step = direction.signum();
                let mut id = *self;
                for _ in 0..direction.unsigned_abs() {
                    id = id.step_week(step);
                }
                id
            }
        }
    }

    fn step_week(self, step: i32) -> Self {
        let PeriodId::Week {
            mut year,
            mut month,
            week,
        } = self
        else {
            return self;
        };
        let mut week = week as i32 + step;
        if week < 1 {
            if month == 1 {
                month = 12;
                year -= 1;
            } else {
                month -= 1;
            }
            week = weeks_in_month(year, month) as i32;
        } else if week > weeks_in_month(year, month) as i32 {
            if month == 12 {
                month = 1;
                year += 1;
            } else {
                month += 1;
            }
            week = 1;
        }
        PeriodId::Week {
            year,
            month,
            week: week as u32,
        }
    }

    /// Identifier to show after switching the view to `mode`.
    ///
    /// A week collapses into its month; a month expands to the week that
    /// contains `today`.
    pub fn with_mode(&self, mode: PeriodMode, today: NaiveDate) -> Self {
        match (self, mode) {
            (PeriodId::Week { year, month, .. }, PeriodMode::Month) => PeriodId::Month {
                year: *year,
                month: *month,
            },
            (PeriodId::Month { .. }, PeriodMode::Week) => week_id(today),
            _ => *self,
        }
    }

    /// Days of the month covered by this period, in display order.
    pub fn days(&self) -> Vec<u32> {
        match *self {
            PeriodId::Month { year, month } => (1..=days_in_month(year, month)).collect(),
            PeriodId::Week { year, month, week } => week_date_range(year, month, week)
                .days()
                .map(|date| date.day())
                .collect(),
        }
    }

    pub fn title(&self) -> String {
        match *self {
            PeriodId::Month { year, month } => format!("{} {}", month_name(month), year),
            PeriodId::Week { year, month, week } => {
                let range = week_date_range(year, month, week);
                format!(
                    "Week {} ({}-{} {})",
                    week,
                    range.start.day(),
                    range.end.day(),
                    month_name(month)
                )
            }
        }
    }
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodId::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            PeriodId::Week { year, month, week } => write!(f, "{year:04}-{month:02}-W{week}"),
        }
    }
}

impl FromStr for PeriodId {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidId(s.to_string());
        let mut parts = s.trim().split('-');
        let year: i32 = parts
            .next()
            .filter(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
            .and_then(|part| part.parse().ok())
            .filter(|year| YEARS.contains(year))
            .ok_or_else(invalid)?;
        let month: u32 = parts
            .next()
            .filter(|part| part.len() == 2)
            .and_then(|part| part.parse().ok())
            .filter(|month| (1..=12).contains(month))
            .ok_or_else(invalid)?;
        let id = match parts.next() {
            None => PeriodId::Month { year, month },
            Some(week_part) => {
                let week: u32 = week_part
                    .strip_prefix('W')
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(invalid)?;
                if week == 0 || week > weeks_in_month(year, month) {
                    return Err(PeriodError::WeekOutOfRange {
                        id: s.to_string(),
                        weeks: weeks_in_month(year, month),
                    });
                }
                PeriodId::Week { year, month, week }
            }
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl TryFrom<String> for PeriodId {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodId> for String {
    fn from(id: PeriodId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_month_and_week_ids() {
        assert_eq!(month_id(date(2024, 3, 15)).to_string(), "2024-03");
        // 2024-03-01 is a Friday, so the first week has three days.
        assert_eq!(week_id(date(2024, 3, 1)).to_string(), "2024-03-W1");
        assert_eq!(week_id(date(2024, 3, 3)).to_string(), "2024-03-W1");
        assert_eq!(week_id(date(2024, 3, 4)).to_string(), "2024-03-W2");
        assert_eq!(week_id(date(2024, 3, 31)).to_string(), "2024-03-W5");
    }

    #[test]
    fn weeks_in_month_matches_distinct_week_ids() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                let ids: BTreeSet<String> = (1..=days_in_month(year, month))
                    .map(|day| week_id(date(year, month, day)).to_string())
                    .collect();
                assert_eq!(
                    ids.len() as u32,
                    weeks_in_month(year, month),
                    "{year}-{month:02}"
                );
            }
        }
    }

    #[test]
    fn week_range_is_clamped_to_month() {
        let first = week_date_range(2024, 3, 1);
        assert_eq!(first.start, date(2024, 3, 1));
        assert_eq!(first.end, date(2024, 3, 7));

        let second = week_date_range(2024, 3, 2);
        assert_eq!(second.start, date(2024, 3, 4));
        assert_eq!(second.end, date(2024, 3, 10));

        let last = week_date_range(2024, 3, 5);
        assert_eq!(last.start, date(2024, 3, 25));
        assert_eq!(last.end, date(2024, 3, 31));

        // 2024-02-26 is the start of W5; the range stops at the leap day.
        let feb = week_date_range(2024, 2, 5);
        assert_eq!(feb.start, date(2024, 2, 26));
        assert_eq!(feb.end, date(2024, 2, 29));
    }

    #[test]
    fn adjacent_months_roll_over_years() {
        let dec: PeriodId = "2023-12".parse().unwrap();
        assert_eq!(dec.adjacent(1).to_string(), "2024-01");
        assert_eq!(dec.adjacent(1).adjacent(-1), dec);
        let jan: PeriodId = "2024-01".parse().unwrap();
        assert_eq!(jan.adjacent(-1).to_string(), "2023-12");
        assert_eq!(jan.adjacent(-13).to_string(), "2022-12");
    }

    #[test]
    fn adjacent_weeks_cross_month_boundaries() {
        let first: PeriodId = "2024-03-W1".parse().unwrap();
        assert_eq!(first.adjacent(-1).to_string(), "2024-02-W5");
        let last: PeriodId = "2024-12-W6".parse().unwrap();
        assert_eq!(last.adjacent(1).to_string(), "2025-01-W1");
        assert_eq!(last.adjacent(1).adjacent(-1), last);
        let jan: PeriodId = "2025-01-W1".parse().unwrap();
        assert_eq!(jan.adjacent(-1).to_string(), "2024-12-W6");
    }

    #[test]
    fn adjacent_round_trips_over_a_year_of_weeks() {
        let mut id = week_id(date(2023, 11, 1));
        for _ in 0..80 {
            let next = id.adjacent(1);
            assert_eq!(next.adjacent(-1), id, "{id} -> {next}");
            id = next;
        }
    }

    #[test]
    fn parses_and_rejects_ids() {
        assert_eq!(
            "2024-03-W2".parse::<PeriodId>().unwrap(),
            PeriodId::Week {
                year: 2024,
                month: 3,
                week: 2
            }
        );
        assert!("2024-13".parse::<PeriodId>().is_err());
        assert!("2024-3".parse::<PeriodId>().is_err());
        assert!("2024-03-W0".parse::<PeriodId>().is_err());
        assert!("2024-03-W6".parse::<PeriodId>().is_err());
        assert!("2024-03-X1".parse::<PeriodId>().is_err());
        assert!("2024-03-W1-1".parse::<PeriodId>().is_err());
        assert!("".parse::<PeriodId>().is_err());
        assert!(matches!(
            "300000-01-W1".parse::<PeriodId>(),
            Err(PeriodError::InvalidId(_))
        ));
        assert!("300000-01".parse::<PeriodId>().is_err());
        assert!("0000-01".parse::<PeriodId>().is_err());
        assert!("9999-12".parse::<PeriodId>().is_ok());
    }

    #[test]
    fn mode_switch_follows_today() {
        let today = date(2024, 3, 12);
        let week: PeriodId = "2024-05-W3".parse().unwrap();
        assert_eq!(week.with_mode(PeriodMode::Month, today).to_string(), "2024-05");
        let month: PeriodId = "2024-05".parse().unwrap();
        assert_eq!(month.with_mode(PeriodMode::Week, today).to_string(), "2024-03-W3");
    }

    #[test]
    fn titles_and_days() {
        let month: PeriodId = "2024-02".parse().unwrap();
        assert_eq!(month.title(), "February 2024");
        assert_eq!(month.days().len(), 29);
        let week: PeriodId = "2024-03-W1".parse().unwrap();
        // The first week starts mid-week and keeps its seven-day span.
        assert_eq!(week.title(), "Week 1 (1-7 March)");
        assert_eq!(week.days(), (1..=7).collect::<Vec<_>>());
        let tail: PeriodId = "2024-02-W5".parse().unwrap();
        assert_eq!(tail.days(), vec![26, 27, 28, 29]);
    }
}
