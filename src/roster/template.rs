use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::roster::Period;

/// A reusable weekly pattern: one optional period per weekday, `None`
/// meaning a rest day. Owned by the employee who created it; edits on the
/// backend never rewrite requests that were already generated from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTemplate {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    /// Monday-first, one slot per weekday.
    pub days: [Option<Period>; 7],
}

impl WeeklyTemplate {
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            owner_id: owner_id.into(),
            days: [None; 7],
        }
    }

    pub fn with_day(mut self, weekday: Weekday, period: Period) -> Self {
        self.days[weekday.num_days_from_monday() as usize] = Some(period);
        self
    }

    pub fn period_for(&self, weekday: Weekday) -> Option<Period> {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn is_rest_week(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_template_is_all_rest_days() {
        let template = WeeklyTemplate::new("standard", "emp-7");

        assert!(template.is_rest_week());
        assert_eq!(template.period_for(Weekday::Mon), None);
    }

    #[test]
    fn with_day_sets_only_that_weekday() {
        let template = WeeklyTemplate::new("standard", "emp-7")
            .with_day(Weekday::Mon, Period::FullDay)
            .with_day(Weekday::Wed, Period::Morning);

        assert_eq!(template.period_for(Weekday::Mon), Some(Period::FullDay));
        assert_eq!(template.period_for(Weekday::Tue), None);
        assert_eq!(template.period_for(Weekday::Wed), Some(Period::Morning));
        assert!(!template.is_rest_week());
    }

    #[test]
    fn sunday_maps_to_the_last_slot() {
        let template = WeeklyTemplate::new("weekend", "emp-7")
            .with_day(Weekday::Sun, Period::Afternoon);

        assert_eq!(template.days[6], Some(Period::Afternoon));
        assert_eq!(template.period_for(Weekday::Sun), Some(Period::Afternoon));
    }

    #[test]
    fn templates_get_distinct_ids() {
        let a = WeeklyTemplate::new("a", "emp-7");
        let b = WeeklyTemplate::new("b", "emp-7");

        assert_ne!(a.id, b.id);
    }
}
