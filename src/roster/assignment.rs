use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::roster::Period;

/// A work slot that already exists on the backend for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub employee_id: String,
    pub date: NaiveDate,
    pub period: Period,
    pub room: Option<String>,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Confirmed,
    Pending,
    Declined,
}

impl Assignment {
    pub fn is_confirmed(&self) -> bool {
        self.status == AssignmentStatus::Confirmed
    }

    pub fn conflicts_with(&self, date: NaiveDate, period: Period) -> bool {
        self.date == date && self.period.overlaps(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(date: NaiveDate, period: Period, status: AssignmentStatus) -> Assignment {
        Assignment {
            id: "a1".to_string(),
            employee_id: "emp-7".to_string(),
            date,
            period,
            room: None,
            status,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn confirmed_assignment_is_confirmed() {
        let a = assignment(date(2025, 3, 10), Period::Morning, AssignmentStatus::Confirmed);
        assert!(a.is_confirmed());
    }

    #[test]
    fn pending_assignment_is_not_confirmed() {
        let a = assignment(date(2025, 3, 10), Period::Morning, AssignmentStatus::Pending);
        assert!(!a.is_confirmed());
    }

    #[test]
    fn full_day_conflicts_with_either_half() {
        let a = assignment(date(2025, 3, 10), Period::FullDay, AssignmentStatus::Confirmed);

        assert!(a.conflicts_with(date(2025, 3, 10), Period::Morning));
        assert!(a.conflicts_with(date(2025, 3, 10), Period::Afternoon));
    }

    #[test]
    fn no_conflict_on_a_different_date() {
        let a = assignment(date(2025, 3, 10), Period::FullDay, AssignmentStatus::Confirmed);

        assert!(!a.conflicts_with(date(2025, 3, 11), Period::Morning));
    }

    #[test]
    fn opposite_half_days_do_not_conflict() {
        let a = assignment(date(2025, 3, 10), Period::Morning, AssignmentStatus::Confirmed);

        assert!(!a.conflicts_with(date(2025, 3, 10), Period::Afternoon));
    }
}
