use serde::Serialize;

use crate::document::PeriodDocument;
use crate::habits;
use crate::period::PeriodId;
use crate::status::DayStatus;

/// Everything a front-end needs to draw one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodView {
    pub id: PeriodId,
    pub title: String,
    pub days: Vec<u32>,
    pub rows: Vec<HabitRow>,
    /// Percentage of habits done on each entry of `days`.
    pub completion_by_day: Vec<f64>,
    pub completion: f64,
    pub column_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitRow {
    pub name: String,
    pub marks: Vec<DayStatus>,
}

impl PeriodView {
    pub fn build(id: PeriodId, doc: &PeriodDocument, column_width: Option<u32>) -> Self {
        let days = id.days();
        let rows = habits::ordered_habits(doc)
            .into_iter()
            .map(|name| HabitRow {
                name: name.to_string(),
                marks: days.iter().map(|&day| doc.status(name, day)).collect(),
            })
            .collect();
        Self {
            id,
            title: id.title(),
            completion_by_day: habits::completion_by_day(doc, &days),
            completion: habits::completion_percentage(doc, &days),
            days,
            rows,
            column_width,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Front-ends that draw a [`PeriodView`] implement this trait.
pub trait Presenter {
    fn present(&mut self, view: &PeriodView) -> anyhow::Result<()>;
}
