use chrono::{Datelike, Days, NaiveDate};

use crate::grid::cell::DayCell;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn label(&self) -> &'static str {
        month_name(self.month)
    }

    pub fn day_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_padding()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearGrid {
    pub year: i32,
    pub months: Vec<MonthGrid>,
}

/// Builds the grid for the month containing `anchor`: leading padding so the
/// first day sits under its Monday-first column, one cell per calendar day,
/// trailing padding up to a whole number of weeks.
pub fn month_grid(anchor: NaiveDate) -> MonthGrid {
    let year = anchor.year();
    let month = anchor.month();

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthGrid { year, month, cells: Vec::new() };
    };

    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let Some(next_first) = next_month_first else {
        return MonthGrid { year, month, cells: Vec::new() };
    };

    let leading = first_day.weekday().num_days_from_monday() as usize;
    let mut cells = Vec::with_capacity(42);
    for _ in 0..leading {
        cells.push(DayCell::padding());
    }

    let mut current = first_day;
    while current < next_first {
        cells.push(DayCell::day(current));
        let Some(next) = current.succ_opt() else { break };
        current = next;
    }

    while cells.len() % 7 != 0 {
        cells.push(DayCell::padding());
    }

    MonthGrid { year, month, cells }
}

/// Builds the Monday-through-Sunday week containing `anchor`. No padding.
pub fn week_grid(anchor: NaiveDate) -> Vec<DayCell> {
    let monday = anchor
        .checked_sub_days(Days::new(anchor.weekday().num_days_from_monday() as u64))
        .unwrap_or(anchor);

    let mut cells = Vec::with_capacity(7);
    let mut current = monday;
    for _ in 0..7 {
        cells.push(DayCell::day(current));
        let Some(next) = current.succ_opt() else { break };
        current = next;
    }
    cells
}

/// Twelve independent month grids; the caller picks which one is active.
pub fn year_grid(year: i32) -> YearGrid {
    let mut months = Vec::with_capacity(12);
    for month in 1..=12 {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };
        months.push(month_grid(first));
    }
    YearGrid { year, months }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn march_2025_has_five_leading_padding_cells() {
        let grid = month_grid(date(2025, 3, 1));

        let leading = grid.cells.iter().take_while(|c| c.is_padding()).count();
        assert_eq!(leading, 5);
        assert_eq!(grid.day_count(), 31);
    }

    #[test]
    fn first_real_cell_matches_the_months_first_weekday() {
        let grid = month_grid(date(2025, 3, 15));

        let first = grid.cells.iter().find(|c| !c.is_padding()).unwrap();
        assert_eq!(first.date, Some(date(2025, 3, 1)));
        assert_eq!(first.weekday(), Some(Weekday::Sat));
    }

    #[test]
    fn month_grid_is_padded_to_whole_weeks() {
        let grid = month_grid(date(2025, 3, 1));

        assert_eq!(grid.cells.len() % 7, 0);
        assert_eq!(grid.cells.len(), 42);
    }

    #[test]
    fn february_2024_is_a_leap_month() {
        let grid = month_grid(date(2024, 2, 10));

        assert_eq!(grid.day_count(), 29);
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let grid = month_grid(date(2025, 12, 31));

        assert_eq!(grid.day_count(), 31);
        assert_eq!(grid.label(), "December");
    }

    #[test]
    fn week_grid_runs_monday_through_sunday() {
        // 2025-03-01 is a Saturday.
        let cells = week_grid(date(2025, 3, 1));

        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0].date, Some(date(2025, 2, 24)));
        assert_eq!(cells[0].weekday(), Some(Weekday::Mon));
        assert_eq!(cells[6].date, Some(date(2025, 3, 2)));
        assert!(cells.iter().any(|c| c.date == Some(date(2025, 3, 1))));
    }

    #[test]
    fn week_grid_of_a_monday_starts_on_that_monday() {
        let cells = week_grid(date(2025, 3, 10));

        assert_eq!(cells[0].date, Some(date(2025, 3, 10)));
    }

    #[test]
    fn year_grid_has_twelve_months() {
        let grid = year_grid(2025);

        assert_eq!(grid.months.len(), 12);
        assert_eq!(grid.months[0].month, 1);
        assert_eq!(grid.months[11].label(), "December");
    }

    proptest! {
        #[test]
        fn month_grid_shape_holds_for_any_date(
            year in 1970i32..2200,
            month in 1u32..13,
            day in 1u32..29,
        ) {
            let anchor = date(year, month, day);
            let grid = month_grid(anchor);

            // Whole weeks, Monday-first.
            prop_assert_eq!(grid.cells.len() % 7, 0);

            // Leading padding equals the first day's offset from Monday.
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let leading = grid.cells.iter().take_while(|c| c.is_padding()).count();
            prop_assert_eq!(leading, first.weekday().num_days_from_monday() as usize);

            // One cell per calendar day of the month.
            let next_first = if month == 12 {
                date(year + 1, 1, 1)
            } else {
                date(year, month + 1, 1)
            };
            let days_in_month = (next_first - first).num_days() as usize;
            prop_assert_eq!(grid.day_count(), days_in_month);

            // Non-padding cells are consecutive dates of that month.
            let dates: Vec<NaiveDate> = grid.cells.iter().filter_map(|c| c.date).collect();
            prop_assert_eq!(dates.first().copied(), Some(first));
            for pair in dates.windows(2) {
                prop_assert_eq!(pair[0].succ_opt(), Some(pair[1]));
            }
        }

        #[test]
        fn week_grid_always_starts_monday(
            year in 1970i32..2200,
            month in 1u32..13,
            day in 1u32..29,
        ) {
            let cells = week_grid(date(year, month, day));

            prop_assert_eq!(cells.len(), 7);
            prop_assert_eq!(cells[0].weekday(), Some(Weekday::Mon));
            prop_assert!(cells.iter().any(|c| c.date == Some(date(year, month, day))));
        }
    }
}
