//! Calendar domain logic: building the month grid shown on the calendar tab.
//!
//! The grid is a Sunday-first, seven-column run of dates. Days of the
//! neighbouring months fill the first and last rows, and the row count
//! varies with the month (a 28-day February starting on Sunday needs only
//! four rows), so callers must not assume 42 cells.

use crate::config::CalendarConfig;
use chrono::{Datelike, Duration, NaiveDate};
use mnu_shared::{CalendarDay, YearMonth};
use std::fmt::Write;
use tracing::debug;

pub const DAYS_PER_WEEK: usize = 7;

/// Build the grid for `target`.
///
/// The result is strictly chronological, never empty, and its length is a
/// multiple of seven. Exactly the target month's days have
/// `in_target_month == true`.
pub fn build_month_grid(target: YearMonth) -> Vec<CalendarDay> {
    let start_of_month = target.first_day();
    let end_of_month = target.end_exclusive();
    let leading = first_weekday_offset(start_of_month);

    let mut days = Vec::with_capacity(6 * DAYS_PER_WEEK);

    for offset in (1..=leading).rev() {
        days.push(CalendarDay {
            date: start_of_month - Duration::days(offset),
            in_target_month: false,
        });
    }

    let mut current = start_of_month;
    while current < end_of_month {
        days.push(CalendarDay {
            date: current,
            in_target_month: true,
        });
        current += Duration::days(1);
    }

    let remainder = DAYS_PER_WEEK - days.len() % DAYS_PER_WEEK;
    if remainder < DAYS_PER_WEEK {
        for offset in 0..remainder {
            days.push(CalendarDay {
                date: end_of_month + Duration::days(offset as i64),
                in_target_month: false,
            });
        }
    }

    debug!(
        "Built grid for {}: {} leading, {} total cells",
        target,
        leading,
        days.len()
    );
    days
}

/// Weekday index of `date` with Sunday = 0 .. Saturday = 6
pub fn first_weekday_offset(date: NaiveDate) -> i64 {
    i64::from(date.weekday().num_days_from_sunday())
}

/// Format a date with a chrono pattern, `None` if the pattern is malformed
pub fn format_date(date: NaiveDate, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

/// Calendar service carrying the configured labels
#[derive(Debug, Clone)]
pub struct CalendarService {
    weekday_labels: Vec<String>,
    title_format: String,
}

impl CalendarService {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            weekday_labels: config.weekday_labels.clone(),
            title_format: config.title_format.clone(),
        }
    }

    /// Column headers, Sunday first
    pub fn weekday_labels(&self) -> &[String] {
        &self.weekday_labels
    }

    pub fn month_grid(&self, target: YearMonth) -> Vec<CalendarDay> {
        build_month_grid(target)
    }

    /// Header text for the displayed month, e.g. `June 2025`.
    /// Falls back to `YYYY-MM` if the configured format is malformed.
    pub fn month_title(&self, target: YearMonth) -> String {
        format_date(target.first_day(), &self.title_format).unwrap_or_else(|| target.to_string())
    }

    /// Split a grid into rows of seven
    pub fn weeks<'a>(&self, grid: &'a [CalendarDay]) -> Vec<&'a [CalendarDay]> {
        grid.chunks(DAYS_PER_WEEK).collect()
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new(&CalendarConfig::default())
    }
}
