pub mod practice_api;
pub mod reconcile;
pub mod submit;

pub use practice_api::{ApiError, DateRange, PracticeApiClient, SchedulingApi};
pub use reconcile::{AssignmentIndex, reconcile};
pub use submit::{SlotRequest, SubmissionEngine, SubmissionReport, SubmitError, build_batch};
