use serde::{Deserialize, Serialize};

/// Half-day granularity used by the practice scheduling API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Morning,
    Afternoon,
    FullDay,
}

impl Period {
    pub fn wire_code(&self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::FullDay => "full_day",
        }
    }

    pub fn from_wire_code(code: &str) -> Option<Self> {
        match code {
            "morning" => Some(Period::Morning),
            "afternoon" => Some(Period::Afternoon),
            "full_day" => Some(Period::FullDay),
            _ => None,
        }
    }

    pub fn covers_morning(&self) -> bool {
        matches!(self, Period::Morning | Period::FullDay)
    }

    pub fn covers_afternoon(&self) -> bool {
        matches!(self, Period::Afternoon | Period::FullDay)
    }

    pub fn overlaps(&self, other: Period) -> bool {
        (self.covers_morning() && other.covers_morning())
            || (self.covers_afternoon() && other.covers_afternoon())
    }
}

/// Which halves of a day are already occupied by confirmed assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodSet {
    morning: bool,
    afternoon: bool,
}

impl PeriodSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, period: Period) {
        if period.covers_morning() {
            self.morning = true;
        }
        if period.covers_afternoon() {
            self.afternoon = true;
        }
    }

    pub fn has_morning(&self) -> bool {
        self.morning
    }

    pub fn has_afternoon(&self) -> bool {
        self.afternoon
    }

    pub fn contains(&self, period: Period) -> bool {
        match period {
            Period::Morning => self.morning,
            Period::Afternoon => self.afternoon,
            Period::FullDay => self.morning && self.afternoon,
        }
    }

    /// A day is exhausted once both halves are taken, whether by a full-day
    /// assignment or by two separate half-day ones.
    pub fn is_full(&self) -> bool {
        self.morning && self.afternoon
    }

    pub fn is_empty(&self) -> bool {
        !self.morning && !self.afternoon
    }

    /// True when `period` could still be requested on this day.
    pub fn admits(&self, period: Period) -> bool {
        match period {
            Period::Morning => !self.morning,
            Period::Afternoon => !self.afternoon,
            Period::FullDay => self.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_round_trip() {
        for period in [Period::Morning, Period::Afternoon, Period::FullDay] {
            assert_eq!(Period::from_wire_code(period.wire_code()), Some(period));
        }
    }

    #[test]
    fn unknown_wire_code_is_rejected() {
        assert_eq!(Period::from_wire_code("evening"), None);
    }

    #[test]
    fn full_day_covers_both_halves() {
        assert!(Period::FullDay.covers_morning());
        assert!(Period::FullDay.covers_afternoon());
        assert!(!Period::Morning.covers_afternoon());
        assert!(!Period::Afternoon.covers_morning());
    }

    #[test]
    fn half_days_do_not_overlap_each_other() {
        assert!(!Period::Morning.overlaps(Period::Afternoon));
        assert!(Period::Morning.overlaps(Period::FullDay));
        assert!(Period::FullDay.overlaps(Period::Afternoon));
    }

    #[test]
    fn inserting_full_day_fills_the_set() {
        let mut set = PeriodSet::empty();
        set.insert(Period::FullDay);

        assert!(set.is_full());
        assert!(set.contains(Period::Morning));
        assert!(set.contains(Period::Afternoon));
    }

    #[test]
    fn two_half_days_also_fill_the_set() {
        let mut set = PeriodSet::empty();
        set.insert(Period::Morning);
        assert!(!set.is_full());

        set.insert(Period::Afternoon);
        assert!(set.is_full());
        assert!(set.contains(Period::FullDay));
    }

    #[test]
    fn empty_set_admits_everything() {
        let set = PeriodSet::empty();

        assert!(set.admits(Period::Morning));
        assert!(set.admits(Period::Afternoon));
        assert!(set.admits(Period::FullDay));
    }

    #[test]
    fn taken_morning_blocks_morning_and_full_day() {
        let mut set = PeriodSet::empty();
        set.insert(Period::Morning);

        assert!(!set.admits(Period::Morning));
        assert!(!set.admits(Period::FullDay));
        assert!(set.admits(Period::Afternoon));
    }
}
