//! In-place edits of a [`PeriodDocument`]'s habit list.
//!
//! Every function validates before it mutates, so an `Err` always leaves
//! the document untouched. `habits`, `order` and `states` stay consistent:
//! a habit is added to or removed from all three together.

use crate::document::PeriodDocument;
use crate::error::HabitError;
use crate::status::DayStatus;

pub const MAX_DAY: u32 = 31;

fn validated_name(name: &str) -> Result<&str, HabitError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HabitError::EmptyName);
    }
    Ok(name)
}

pub fn add_habit(doc: &mut PeriodDocument, name: &str) -> Result<(), HabitError> {
    let name = validated_name(name)?;
    if doc.contains(name) {
        return Err(HabitError::Duplicate(name.to_string()));
    }
    doc.habits.push(name.to_string());
    doc.order.push(name.to_string());
    doc.states.insert(name.to_string(), Default::default());
    Ok(())
}

/// Renames a habit in place, keeping its position and its marks.
pub fn rename_habit(doc: &mut PeriodDocument, old: &str, new: &str) -> Result<(), HabitError> {
    let new = validated_name(new)?;
    if new == old {
        return Ok(());
    }
    if doc.contains(new) {
        return Err(HabitError::Duplicate(new.to_string()));
    }
    if !doc.contains(old) {
        return Err(HabitError::NotFound(old.to_string()));
    }
    for slot in doc.habits.iter_mut().chain(doc.order.iter_mut()) {
        if *slot == old {
            *slot = new.to_string();
        }
    }
    let marks = doc.states.remove(old).unwrap_or_default();
    doc.states.insert(new.to_string(), marks);
    Ok(())
}

/// Removes a habit and its marks. Returns whether anything was removed.
pub fn delete_habit(doc: &mut PeriodDocument, name: &str) -> bool {
    let before = doc.habits.len() + doc.order.len();
    doc.habits.retain(|habit| habit != name);
    doc.order.retain(|habit| habit != name);
    let had_states = doc.states.remove(name).is_some();
    had_states || before != doc.habits.len() + doc.order.len()
}

/// Moves `dragged` to the slot currently held by `target`.
pub fn reorder(doc: &mut PeriodDocument, dragged: &str, target: &str) -> bool {
    let from = doc.order.iter().position(|name| name == dragged);
    let to = doc.order.iter().position(|name| name == target);
    let (Some(from), Some(to)) = (from, to) else {
        return false;
    };
    if from == to {
        return false;
    }
    let moved = doc.order.remove(from);
    doc.order.insert(to, moved);
    true
}

/// Advances the mark of `habit` on `day` one step through the cycle and
/// returns the new mark.
pub fn toggle_day(doc: &mut PeriodDocument, habit: &str, day: u32) -> Result<DayStatus, HabitError> {
    if !(1..=MAX_DAY).contains(&day) {
        return Err(HabitError::DayOutOfRange(day));
    }
    if !doc.contains(habit) {
        return Err(HabitError::NotFound(habit.to_string()));
    }
    let next = doc.status(habit, day).next();
    doc.states
        .entry(habit.to_string())
        .or_default()
        .insert(day, next);
    Ok(next)
}

/// Adds a habit copied from another period. Marks never travel with it.
/// Returns `false` when the habit is already present.
pub fn insert_copied_habit(doc: &mut PeriodDocument, name: &str) -> bool {
    if doc.contains(name) {
        return false;
    }
    doc.habits.push(name.to_string());
    doc.order.push(name.to_string());
    doc.states.insert(name.to_string(), Default::default());
    true
}

/// Habits in display order.
pub fn ordered_habits(doc: &PeriodDocument) -> Vec<&str> {
    doc.order
        .iter()
        .filter(|name| doc.contains(name))
        .map(String::as_str)
        .collect()
}

/// Share of habits marked done on each of `days`, in percent.
pub fn completion_by_day(doc: &PeriodDocument, days: &[u32]) -> Vec<f64> {
    let total = doc.habits.len();
    days.iter()
        .map(|&day| {
            if total == 0 {
                return 0.0;
            }
            let done = doc
                .habits
                .iter()
                .filter(|habit| doc.status(habit, day) == DayStatus::Done)
                .count();
            done as f64 / total as f64 * 100.0
        })
        .collect()
}

/// Average of [`completion_by_day`] over the period.
pub fn completion_percentage(doc: &PeriodDocument, days: &[u32]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    completion_by_day(doc, days).iter().sum::<f64>() / days.len() as f64
}
