use chrono::{Datelike, NaiveDate};

use crate::grid::{DayCell, MonthGrid, YearGrid, month_grid, selection, week_grid, year_grid};
use crate::roster::{Period, WeeklyTemplate};
use crate::sync::practice_api::DateRange;
use crate::sync::reconcile::AssignmentIndex;
use crate::sync::submit::{SlotRequest, build_batch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "week" => Some(Granularity::Week),
            "month" => Some(Granularity::Month),
            "year" => Some(Granularity::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanGrid {
    Week(Vec<DayCell>),
    Month(MonthGrid),
    Year { grid: YearGrid, active: usize },
}

impl PlanGrid {
    pub fn active_cells(&self) -> &[DayCell] {
        match self {
            PlanGrid::Week(cells) => cells,
            PlanGrid::Month(month) => &month.cells,
            PlanGrid::Year { grid, active } => grid
                .months
                .get(*active)
                .map(|m| m.cells.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn active_cells_mut(&mut self) -> &mut [DayCell] {
        match self {
            PlanGrid::Week(cells) => cells,
            PlanGrid::Month(month) => &mut month.cells,
            PlanGrid::Year { grid, active } => grid
                .months
                .get_mut(*active)
                .map(|m| m.cells.as_mut_slice())
                .unwrap_or(&mut []),
        }
    }
}

/// Session-scoped owner of everything one planning interaction mutates: the
/// grid, the chosen template, and the snapshot of existing assignments.
/// Grids are rebuilt from scratch whenever the anchor, granularity, or
/// target employee changes; nothing survives navigation.
pub struct PlannerState {
    pub granularity: Granularity,
    pub anchor: NaiveDate,
    pub employee_id: String,
    pub template: Option<WeeklyTemplate>,
    pub grid: PlanGrid,
    pub index: AssignmentIndex,
}

impl PlannerState {
    pub fn new(
        employee_id: impl Into<String>,
        anchor: NaiveDate,
        granularity: Granularity,
    ) -> Self {
        let employee_id = employee_id.into();
        let mut state = Self {
            granularity,
            anchor,
            template: None,
            grid: PlanGrid::Week(Vec::new()),
            index: AssignmentIndex::empty(employee_id.clone()),
            employee_id,
        };
        state.rebuild();
        state
    }

    pub fn rebuild(&mut self) {
        self.grid = match self.granularity {
            Granularity::Week => PlanGrid::Week(week_grid(self.anchor)),
            Granularity::Month => PlanGrid::Month(month_grid(self.anchor)),
            Granularity::Year => PlanGrid::Year {
                grid: year_grid(self.anchor.year()),
                active: self.anchor.month() as usize - 1,
            },
        };
        selection::apply_template(self.grid.active_cells_mut(), self.template.as_ref());
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.anchor = anchor;
        self.rebuild();
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.rebuild();
    }

    /// Switching employee invalidates the assignment snapshot; the caller is
    /// expected to reconcile again before further edits.
    pub fn set_employee(&mut self, employee_id: impl Into<String>) {
        self.employee_id = employee_id.into();
        self.index = AssignmentIndex::empty(self.employee_id.clone());
        self.rebuild();
    }

    pub fn set_index(&mut self, index: AssignmentIndex) {
        self.index = index;
    }

    pub fn set_active_month(&mut self, month: u32) {
        if let PlanGrid::Year { active, .. } = &mut self.grid
            && (1..=12).contains(&month)
        {
            *active = month as usize - 1;
        }
    }

    /// The dates the active grid spans, for reconciliation.
    pub fn visible_range(&self) -> Option<DateRange> {
        let cells = self.grid.active_cells();
        let first = cells.iter().find_map(|c| c.date)?;
        let last = cells.iter().rev().find_map(|c| c.date)?;
        Some(DateRange::new(first, last))
    }

    pub fn apply_template(&mut self, template: Option<WeeklyTemplate>) {
        self.template = template;
        selection::apply_template(self.grid.active_cells_mut(), self.template.as_ref());
    }

    /// One user click on a day: advances the cell through the request cycle,
    /// skipping periods the assignment snapshot shows as taken. Returns the
    /// new period, or None when the cell is now (or stays) unselected.
    pub fn toggle_date(&mut self, date: NaiveDate) -> Option<Period> {
        let taken = self.index.taken_on(date);
        let cell = self
            .grid
            .active_cells_mut()
            .iter_mut()
            .find(|c| c.date == Some(date))?;
        cell.period = selection::next_period(cell.period, taken);
        cell.period
    }

    /// The annual-view sub-gesture: rotates the period of an already
    /// selected day without deselecting it.
    pub fn rotate_date(&mut self, date: NaiveDate) -> Option<Period> {
        let cell = self
            .grid
            .active_cells_mut()
            .iter_mut()
            .find(|c| c.date == Some(date))?;
        selection::rotate_cell(cell);
        cell.period
    }

    pub fn select_all(&mut self, period: Period) {
        let index = &self.index;
        selection::select_all(self.grid.active_cells_mut(), period, |d| index.taken_on(d));
    }

    pub fn clear_selection(&mut self) {
        selection::clear_selection(self.grid.active_cells_mut());
    }

    pub fn selected_count(&self) -> usize {
        self.grid
            .active_cells()
            .iter()
            .filter(|c| c.is_selected())
            .count()
    }

    pub fn build_batch(&self) -> Vec<SlotRequest> {
        build_batch(self.grid.active_cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn month_planner(anchor: NaiveDate) -> PlannerState {
        PlannerState::new("emp-7", anchor, Granularity::Month)
    }

    #[test]
    fn new_planner_starts_with_an_empty_selection() {
        let planner = month_planner(date(2025, 3, 1));

        assert_eq!(planner.selected_count(), 0);
        assert!(planner.template.is_none());
    }

    #[test]
    fn march_2025_month_grid_aligns_under_saturday() {
        let planner = month_planner(date(2025, 3, 1));

        let cells = planner.grid.active_cells();
        let leading = cells.iter().take_while(|c| c.is_padding()).count();

        assert_eq!(leading, 5);
        assert_eq!(cells.iter().filter(|c| !c.is_padding()).count(), 31);
    }

    #[test]
    fn three_toggles_reach_full_day_and_a_fourth_clears() {
        let mut planner = month_planner(date(2025, 3, 1));
        let day = date(2025, 3, 10);

        assert_eq!(planner.toggle_date(day), Some(Period::Morning));
        assert_eq!(planner.toggle_date(day), Some(Period::Afternoon));
        assert_eq!(planner.toggle_date(day), Some(Period::FullDay));
        assert_eq!(planner.toggle_date(day), None);
        assert_eq!(planner.selected_count(), 0);
    }

    #[test]
    fn toggling_respects_the_assignment_snapshot() {
        let mut planner = month_planner(date(2025, 3, 1));
        let day = date(2025, 3, 10);
        let mut index = AssignmentIndex::empty("emp-7");
        index.insert(day, Period::Morning);
        planner.set_index(index);

        assert_eq!(planner.toggle_date(day), Some(Period::Afternoon));
        assert_eq!(planner.toggle_date(day), None);
    }

    #[test]
    fn toggling_an_unknown_date_is_a_no_op() {
        let mut planner = month_planner(date(2025, 3, 1));

        assert_eq!(planner.toggle_date(date(2025, 4, 1)), None);
        assert_eq!(planner.selected_count(), 0);
    }

    #[test]
    fn visible_range_spans_the_whole_month() {
        let planner = month_planner(date(2025, 3, 15));

        let range = planner.visible_range().unwrap();
        assert_eq!(range.start, date(2025, 3, 1));
        assert_eq!(range.end, date(2025, 3, 31));
    }

    #[test]
    fn week_planner_spans_monday_to_sunday() {
        let planner = PlannerState::new("emp-7", date(2025, 3, 1), Granularity::Week);

        let range = planner.visible_range().unwrap();
        assert_eq!(range.start, date(2025, 2, 24));
        assert_eq!(range.end, date(2025, 3, 2));
    }

    #[test]
    fn year_planner_activates_the_anchor_month() {
        let mut planner = PlannerState::new("emp-7", date(2025, 6, 15), Granularity::Year);

        let range = planner.visible_range().unwrap();
        assert_eq!(range.start, date(2025, 6, 1));

        planner.set_active_month(2);
        let range = planner.visible_range().unwrap();
        assert_eq!(range.start, date(2025, 2, 1));
        assert_eq!(range.end, date(2025, 2, 28));
    }

    #[test]
    fn year_planner_keeps_selections_per_month() {
        let mut planner = PlannerState::new("emp-7", date(2025, 6, 15), Granularity::Year);
        planner.toggle_date(date(2025, 6, 2));

        planner.set_active_month(7);
        assert_eq!(planner.selected_count(), 0);

        planner.set_active_month(6);
        assert_eq!(planner.selected_count(), 1);
    }

    #[test]
    fn rotate_cycles_the_period_without_deselecting() {
        let mut planner = PlannerState::new("emp-7", date(2025, 6, 15), Granularity::Year);
        let day = date(2025, 6, 2);
        planner.toggle_date(day);
        planner.toggle_date(day);
        planner.toggle_date(day);

        assert_eq!(planner.rotate_date(day), Some(Period::Morning));
        assert_eq!(planner.rotate_date(day), Some(Period::Afternoon));
        assert_eq!(planner.rotate_date(day), Some(Period::FullDay));
        assert_eq!(planner.selected_count(), 1);
    }

    #[test]
    fn applying_a_template_twice_gives_the_same_selection() {
        use chrono::Weekday;

        let mut planner = month_planner(date(2025, 3, 1));
        let template = WeeklyTemplate::new("mornings", "emp-7")
            .with_day(Weekday::Mon, Period::Morning);

        planner.apply_template(Some(template.clone()));
        let first = planner.selected_count();

        planner.apply_template(Some(template));
        assert_eq!(planner.selected_count(), first);
        assert_eq!(first, 5);
    }

    #[test]
    fn select_all_skips_fully_booked_days() {
        let mut planner = month_planner(date(2025, 3, 1));
        let booked = date(2025, 3, 10);
        let mut index = AssignmentIndex::empty("emp-7");
        index.insert(booked, Period::FullDay);
        planner.set_index(index);

        planner.select_all(Period::Morning);

        assert_eq!(planner.selected_count(), 30);
        let cells = planner.grid.active_cells();
        let booked_cell = cells.iter().find(|c| c.date == Some(booked)).unwrap();
        assert!(!booked_cell.is_selected());
    }

    #[test]
    fn changing_employee_drops_the_snapshot() {
        let mut planner = month_planner(date(2025, 3, 1));
        let mut index = AssignmentIndex::empty("emp-7");
        index.insert(date(2025, 3, 10), Period::FullDay);
        planner.set_index(index);

        planner.set_employee("emp-9");

        assert_eq!(planner.index.booked_day_count(), 0);
        assert_eq!(planner.index.employee_id(), "emp-9");
    }

    #[test]
    fn batch_comes_from_the_active_grid_in_date_order() {
        let mut planner = month_planner(date(2025, 1, 1));
        planner.toggle_date(date(2025, 1, 8));
        planner.toggle_date(date(2025, 1, 6));

        let batch = planner.build_batch();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].date, date(2025, 1, 6));
        assert_eq!(batch[1].date, date(2025, 1, 8));
    }

    #[test]
    fn granularity_names_parse_case_insensitively() {
        assert_eq!(Granularity::from_name("Month"), Some(Granularity::Month));
        assert_eq!(Granularity::from_name("YEAR"), Some(Granularity::Year));
        assert_eq!(Granularity::from_name("fortnight"), None);
    }
}
