use std::io::Write;

use anyhow::Result;
use habit_core::notifications::{Notice, NoticeLevel};
use habit_core::view::{PeriodView, Presenter};

const MIN_NAME_WIDTH: usize = 8;
const DAY_WIDTH: usize = 3;

/// Plain-text table renderer for a period.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn notice(&mut self, notice: &Notice) -> Result<()> {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        };
        writeln!(self.out, "[{tag}] {}", notice.message)?;
        Ok(())
    }

    fn name_width(view: &PeriodView) -> usize {
        if let Some(width) = view.column_width {
            return (width as usize).max(1);
        }
        view.rows
            .iter()
            .map(|row| row.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH)
    }
}

fn fit(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return format!("{name:<width$}");
    }
    let mut clipped: String = name.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, view: &PeriodView) -> Result<()> {
        writeln!(
            self.out,
            "{} [{}] {:.0}% done",
            view.title, view.id, view.completion
        )?;
        let width = Self::name_width(view);
        write!(self.out, "{}", fit("Habits", width))?;
        for day in &view.days {
            write!(self.out, "{day:>DAY_WIDTH$}")?;
        }
        writeln!(self.out)?;

        if view.is_empty() {
            writeln!(self.out, "Add your first habit.")?;
            return Ok(());
        }
        for row in &view.rows {
            write!(self.out, "{}", fit(&row.name, width))?;
            for mark in &row.marks {
                write!(self.out, "{:>DAY_WIDTH$}", mark.glyph())?;
            }
            writeln!(self.out)?;
        }
        write!(self.out, "{}", fit("Done %", width))?;
        for percent in &view.completion_by_day {
            write!(self.out, "{:>DAY_WIDTH$.0}", percent)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}
