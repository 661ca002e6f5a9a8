pub mod builder;
pub mod cell;
pub mod selection;

pub use builder::{MonthGrid, YearGrid, month_grid, month_name, week_grid, year_grid};
pub use cell::DayCell;
