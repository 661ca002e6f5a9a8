use chrono::NaiveDate;
use thiserror::Error;

use crate::grid::DayCell;
use crate::roster::Period;
use crate::sync::practice_api::{ApiError, NewRequest, SchedulingApi};
use crate::sync::reconcile::AssignmentIndex;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("nothing is selected")]
    NothingSelected,
}

/// One (date, period) pair extracted from a selected cell. Lives only for
/// the duration of a single submit action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRequest {
    pub date: NaiveDate,
    pub period: Period,
}

/// Flattens a grid into its selected requests, in ascending date order.
pub fn build_batch(cells: &[DayCell]) -> Vec<SlotRequest> {
    let mut batch: Vec<SlotRequest> = cells
        .iter()
        .filter_map(|cell| match (cell.date, cell.period) {
            (Some(date), Some(period)) => Some(SlotRequest { date, period }),
            _ => None,
        })
        .collect();
    batch.sort_by_key(|r| r.date);
    batch
}

/// The backend models half-days as separate entities, so a full-day
/// selection becomes two independent half-day requests.
pub fn expand_full_days(batch: Vec<SlotRequest>) -> Vec<SlotRequest> {
    let mut expanded = Vec::with_capacity(batch.len());
    for request in batch {
        match request.period {
            Period::FullDay => {
                expanded.push(SlotRequest {
                    date: request.date,
                    period: Period::Morning,
                });
                expanded.push(SlotRequest {
                    date: request.date,
                    period: Period::Afternoon,
                });
            }
            _ => expanded.push(request),
        }
    }
    expanded
}

/// Per-item outcome of one submit action. Accepted items stay created even
/// when later items fail; nothing is retried or rolled back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionReport {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub conflicting_dates: Vec<NaiveDate>,
}

impl SubmissionReport {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.failed == 0
    }
}

pub struct SubmissionEngine<A> {
    api: A,
    split_full_days: bool,
}

impl<A: SchedulingApi> SubmissionEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            split_full_days: true,
        }
    }

    pub fn with_split_full_days(mut self, split: bool) -> Self {
        self.split_full_days = split;
        self
    }

    /// Submits the batch one request at a time. Items whose period the index
    /// already shows as confirmed are skipped without a network call; a 409
    /// from the backend counts the item as failed and records the date.
    /// Once iteration begins it runs to completion.
    pub async fn submit(
        &self,
        employee_id: &str,
        batch: Vec<SlotRequest>,
        index: &AssignmentIndex,
        template_id: Option<&str>,
        reason: Option<&str>,
    ) -> Result<SubmissionReport, SubmitError> {
        if batch.is_empty() {
            return Err(SubmitError::NothingSelected);
        }

        let items = if self.split_full_days {
            expand_full_days(batch)
        } else {
            batch
        };

        tracing::info!("Submitting {} slot requests for {}", items.len(), employee_id);

        let mut report = SubmissionReport::default();

        for item in items {
            if index.is_taken(item.date, item.period) {
                tracing::info!(
                    "Skipping {} {}: already confirmed",
                    item.date,
                    item.period.wire_code()
                );
                report.skipped += 1;
                record_conflict(&mut report, item.date);
                continue;
            }

            let request = NewRequest {
                employee_id: employee_id.to_string(),
                date: item.date,
                period: item.period,
                template_id: template_id.map(str::to_string),
                reason: reason.map(str::to_string),
            };

            match self.api.create_request(&request).await {
                Ok(created) => {
                    tracing::debug!("Created request {} for {}", created.id, item.date);
                    report.succeeded += 1;
                }
                Err(ApiError::Conflict(msg)) => {
                    tracing::warn!("Request for {} rejected as conflicting: {}", item.date, msg);
                    report.failed += 1;
                    record_conflict(&mut report, item.date);
                }
                Err(e) => {
                    tracing::error!("Request for {} failed: {}", item.date, e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Submission finished: {} succeeded, {} skipped, {} failed",
            report.succeeded,
            report.skipped,
            report.failed
        );

        Ok(report)
    }
}

fn record_conflict(report: &mut SubmissionReport, date: NaiveDate) {
    if !report.conflicting_dates.contains(&date) {
        report.conflicting_dates.push(date);
    }
}
