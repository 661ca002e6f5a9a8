use std::collections::HashMap;

use chrono::NaiveDate;

use crate::roster::{Period, PeriodSet};
use crate::sync::practice_api::{DateRange, SchedulingApi};

/// Read-only snapshot of the half-days already confirmed for one employee
/// over one date range. Rebuilt whenever the employee or range changes,
/// never mutated by the planner itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentIndex {
    employee_id: String,
    taken: HashMap<NaiveDate, PeriodSet>,
}

impl AssignmentIndex {
    pub fn empty(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            taken: HashMap::new(),
        }
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn insert(&mut self, date: NaiveDate, period: Period) {
        self.taken.entry(date).or_default().insert(period);
    }

    pub fn taken_on(&self, date: NaiveDate) -> PeriodSet {
        self.taken.get(&date).copied().unwrap_or_default()
    }

    pub fn is_fully_booked(&self, date: NaiveDate) -> bool {
        self.taken_on(date).is_full()
    }

    pub fn is_taken(&self, date: NaiveDate, period: Period) -> bool {
        !self.taken_on(date).admits(period)
    }

    pub fn booked_day_count(&self) -> usize {
        self.taken.len()
    }

    pub fn annotation(&self, date: NaiveDate) -> Option<&'static str> {
        let taken = self.taken_on(date);
        if taken.is_full() {
            Some("✓ already confirmed")
        } else if taken.has_morning() {
            Some("morning already confirmed")
        } else if taken.has_afternoon() {
            Some("afternoon already confirmed")
        } else {
            None
        }
    }
}

/// Queries the backend for every day in `range` and folds the confirmed
/// assignments into an index. The consumed API only offers per-day lookups,
/// so the range is walked one request at a time.
///
/// A day whose fetch fails is treated as free: the request may later be
/// rejected as a duplicate, and the backend stays authoritative.
pub async fn reconcile(
    api: &dyn SchedulingApi,
    employee_id: &str,
    range: &DateRange,
) -> AssignmentIndex {
    let mut index = AssignmentIndex::empty(employee_id);

    for date in range.iter() {
        match api.fetch_assignments(employee_id, date).await {
            Ok(assignments) => {
                for assignment in assignments.iter().filter(|a| a.is_confirmed()) {
                    index.insert(assignment.date, assignment.period);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch assignments for {}, treating the day as free: {}",
                    date,
                    e
                );
            }
        }
    }

    tracing::debug!(
        "Reconciled {} days with existing assignments for {}",
        index.booked_day_count(),
        employee_id
    );

    index
}
