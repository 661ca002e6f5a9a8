use chrono::NaiveDate;

use crate::grid::cell::DayCell;
use crate::roster::{Period, PeriodSet, WeeklyTemplate};

/// Advances a cell's selection one step through the request cycle
/// None -> Morning -> Afternoon -> FullDay -> None, skipping any state whose
/// half-day is already taken by a confirmed assignment. With both halves
/// taken the cell is pinned at None.
pub fn next_period(current: Option<Period>, taken: PeriodSet) -> Option<Period> {
    let morning_free = !taken.has_morning();
    let afternoon_free = !taken.has_afternoon();

    match current {
        None => {
            if morning_free {
                Some(Period::Morning)
            } else if afternoon_free {
                Some(Period::Afternoon)
            } else {
                None
            }
        }
        Some(Period::Morning) => {
            if afternoon_free {
                Some(Period::Afternoon)
            } else {
                None
            }
        }
        Some(Period::Afternoon) => {
            if morning_free && afternoon_free {
                Some(Period::FullDay)
            } else {
                None
            }
        }
        Some(Period::FullDay) => None,
    }
}

/// The annual-view sub-gesture: rotate the period of an already-selected
/// cell without dropping the selection.
pub fn rotate_period(current: Period) -> Period {
    match current {
        Period::FullDay => Period::Morning,
        Period::Morning => Period::Afternoon,
        Period::Afternoon => Period::FullDay,
    }
}

/// No-op unless the cell is selected; the sub-cycle never passes through None.
pub fn rotate_cell(cell: &mut DayCell) {
    if let Some(current) = cell.period {
        cell.period = Some(rotate_period(current));
    }
}

/// Stamps every non-padding cell with the template period for its weekday.
/// Any previous selection state is discarded first, so re-applying a
/// different template never accumulates. `None` means pure manual mode.
pub fn apply_template(cells: &mut [DayCell], template: Option<&WeeklyTemplate>) {
    clear_selection(cells);

    let Some(template) = template else { return };

    for cell in cells.iter_mut() {
        if let Some(weekday) = cell.weekday()
            && let Some(period) = template.period_for(weekday)
        {
            cell.select(period);
        }
    }
}

/// Bulk selection: stamps `period` on every day that can still take it,
/// skipping padding, fully booked days, and days where the requested half is
/// already confirmed.
pub fn select_all<F>(cells: &mut [DayCell], period: Period, taken: F)
where
    F: Fn(NaiveDate) -> PeriodSet,
{
    for cell in cells.iter_mut() {
        let Some(date) = cell.date else { continue };
        if taken(date).admits(period) {
            cell.select(period);
        }
    }
}

pub fn clear_selection(cells: &mut [DayCell]) {
    for cell in cells.iter_mut() {
        cell.clear();
    }
}
