pub mod app;
pub mod grid;
pub mod roster;
pub mod storage;
pub mod sync;

pub use app::{Granularity, PlanGrid, PlannerState};
pub use roster::{Assignment, Period, PeriodSet, WeeklyTemplate};
pub use sync::{AssignmentIndex, SubmissionEngine, SubmissionReport};
