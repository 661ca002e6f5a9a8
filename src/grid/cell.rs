use chrono::{Datelike, NaiveDate, Weekday};

use crate::roster::Period;

/// One cell of a request grid. Cells without a date are padding inserted so
/// the first real day lands under its Monday-first column; padding never
/// carries a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell {
    pub date: Option<NaiveDate>,
    pub period: Option<Period>,
}

impl DayCell {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            period: None,
        }
    }

    pub fn padding() -> Self {
        Self {
            date: None,
            period: None,
        }
    }

    pub fn with_period(mut self, period: Option<Period>) -> Self {
        if self.date.is_some() {
            self.period = period;
        }
        self
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }

    pub fn is_selected(&self) -> bool {
        self.period.is_some()
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.date.map(|d| d.weekday())
    }

    pub fn select(&mut self, period: Period) {
        if self.date.is_some() {
            self.period = Some(period);
        }
    }

    pub fn clear(&mut self) {
        self.period = None;
    }
}
