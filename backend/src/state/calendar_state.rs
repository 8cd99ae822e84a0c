//! # Calendar State Module
//!
//! State of the calendar tab: which month is displayed, which day is
//! selected, and what "today" is. The selected day survives month
//! navigation; it is only highlighted while its month is on screen.

use crate::domain::calendar::CalendarService;
use chrono::{Local, NaiveDate};
use mnu_shared::{CalendarDay, YearMonth, YearMonthError};
use tracing::info;

/// One cell as the calendar tab renders it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: CalendarDay,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarAction {
    PreviousMonth,
    NextMonth,
    /// Tap on a day; ignored for days outside the displayed month
    Select(NaiveDate),
}

#[derive(Debug, Clone)]
pub struct CalendarState {
    displayed: YearMonth,
    selected: NaiveDate,
    today: NaiveDate,
    service: CalendarService,
}

impl CalendarState {
    /// Start on the month containing `today`, with `today` selected
    pub fn new(today: NaiveDate, service: CalendarService) -> Result<Self, YearMonthError> {
        Ok(Self {
            displayed: YearMonth::containing(today)?,
            selected: today,
            today,
            service,
        })
    }

    pub fn for_local_today(service: CalendarService) -> Result<Self, YearMonthError> {
        Self::new(Local::now().date_naive(), service)
    }

    pub fn displayed(&self) -> YearMonth {
        self.displayed
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Apply an action; returns whether anything changed
    pub fn dispatch(&mut self, action: CalendarAction) -> bool {
        match action {
            CalendarAction::PreviousMonth => self.previous_month(),
            CalendarAction::NextMonth => self.next_month(),
            CalendarAction::Select(day) => self.select(day),
        }
    }

    /// `false` at the first supported month
    pub fn previous_month(&mut self) -> bool {
        match self.displayed.previous() {
            Some(month) => {
                self.displayed = month;
                info!("📅 Navigated to previous month: {}", month);
                true
            }
            None => false,
        }
    }

    /// `false` at the last supported month
    pub fn next_month(&mut self) -> bool {
        match self.displayed.next() {
            Some(month) => {
                self.displayed = month;
                info!("📅 Navigated to next month: {}", month);
                true
            }
            None => false,
        }
    }

    pub fn select(&mut self, day: NaiveDate) -> bool {
        if !self.displayed.contains(day) {
            return false;
        }
        self.selected = day;
        true
    }

    pub fn grid(&self) -> Vec<CalendarDay> {
        self.service.month_grid(self.displayed)
    }

    pub fn title(&self) -> String {
        self.service.month_title(self.displayed)
    }

    pub fn weekday_labels(&self) -> &[String] {
        self.service.weekday_labels()
    }

    pub fn cells(&self) -> Vec<CalendarCell> {
        self.grid()
            .into_iter()
            .map(|day| CalendarCell {
                is_today: day.date == self.today,
                is_selected: day.in_target_month && day.date == self.selected,
                day,
            })
            .collect()
    }
}
