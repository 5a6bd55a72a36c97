// src/services/entry_form.rs

//! Workload entry form.
//!
//! Holds the editable draft of one workload record and submits it as a
//! single create request. After a successful submit only the activity and
//! hours are cleared, so several activities can be entered for the same
//! assignment and groups in a row.

use validator::{Validate, ValidationErrors};

use crate::api::WorkloadApi;
use crate::error::{AppError, Result};
use crate::models::{ActivityId, WorkloadSubmission};

/// Draft fields and the names reported when they are missing.
const REQUIRED_FIELDS: [(&str, &str); 5] = [
    ("reference_number", "reference number"),
    ("group_names", "number of groups"),
    ("activity_id", "activity"),
    ("activity_number", "activity number"),
    ("hours", "hours"),
];

/// Editable workload draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct WorkloadDraft {
    #[validate(length(min = 1))]
    reference_number: String,

    /// One name per group; its length is the group count
    #[validate(length(min = 1))]
    group_names: Vec<String>,

    #[validate(required)]
    activity_id: Option<ActivityId>,

    #[validate(required, range(min = 1))]
    activity_number: Option<u32>,

    #[validate(required, range(min = 1))]
    hours: Option<u32>,
}

impl WorkloadDraft {
    pub fn reference_number(&self) -> &str {
        &self.reference_number
    }

    pub fn group_count(&self) -> usize {
        self.group_names.len()
    }

    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    pub fn activity_id(&self) -> Option<&ActivityId> {
        self.activity_id.as_ref()
    }

    pub fn activity_number(&self) -> Option<u32> {
        self.activity_number
    }

    pub fn hours(&self) -> Option<u32> {
        self.hours
    }

    /// Validate and build the request body.
    pub fn to_submission(&self) -> Result<WorkloadSubmission> {
        self.validate().map_err(missing_fields)?;

        match (&self.activity_id, self.activity_number, self.hours) {
            (Some(activity_id), Some(activity_number), Some(workload_hours)) => {
                Ok(WorkloadSubmission {
                    reference_number: self.reference_number.clone(),
                    number_of_groups: self.group_names.len(),
                    group_numbers: self
                        .group_names
                        .iter()
                        .map(|name| name.trim().to_string())
                        .collect(),
                    activity_id: activity_id.clone(),
                    activity_number,
                    workload_hours,
                })
            }
            _ => Err(AppError::missing(["activity"])),
        }
    }
}

/// Name every failed field, in form order.
fn missing_fields(errors: ValidationErrors) -> AppError {
    let failed = errors.errors();
    AppError::missing(
        REQUIRED_FIELDS
            .iter()
            .filter(|(field, _)| failed.contains_key(*field))
            .map(|(_, label)| *label),
    )
}

/// Form state around the draft.
#[derive(Debug, Default)]
pub struct WorkloadEntryForm {
    draft: WorkloadDraft,
    submitting: bool,
    error: Option<String>,
}

impl WorkloadEntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &WorkloadDraft {
        &self.draft
    }

    pub fn set_reference_number(&mut self, reference_number: impl Into<String>) {
        self.draft.reference_number = reference_number.into();
    }

    /// Resize the group-name list to `count`.
    ///
    /// Names at indices below both the old and new length are kept; new
    /// slots start empty.
    pub fn set_group_count(&mut self, count: usize) {
        self.draft.group_names.resize(count, String::new());
    }

    /// Replace the name in slot `index` only.
    pub fn set_group_name(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let count = self.draft.group_names.len();
        let slot = self.draft.group_names.get_mut(index).ok_or_else(|| {
            AppError::lookup(format!("Group {} does not exist ({} group(s))", index + 1, count))
        })?;
        *slot = value.into();
        Ok(())
    }

    pub fn set_activity(&mut self, activity_id: Option<ActivityId>) {
        self.draft.activity_id = activity_id;
    }

    pub fn set_activity_number(&mut self, activity_number: Option<u32>) {
        self.draft.activity_number = activity_number;
    }

    pub fn set_hours(&mut self, hours: Option<u32>) {
        self.draft.hours = hours;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate the draft and mark the form as submitting.
    ///
    /// Nothing is sent when this fails. While a submission is in flight a
    /// second one is refused, so every successful call must be followed by
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<WorkloadSubmission> {
        if self.submitting {
            return Err(AppError::busy(format!(
                "workload submission for {}",
                self.draft.reference_number
            )));
        }

        match self.draft.to_submission() {
            Ok(submission) => {
                self.error = None;
                self.submitting = true;
                Ok(submission)
            }
            Err(err) => {
                self.error = Some("Please fill in all fields before adding workload.".to_string());
                Err(err)
            }
        }
    }

    /// Apply the backend outcome of a submission.
    ///
    /// Success clears activity and hours. Failure keeps the draft as it was.
    pub fn finish_submit(&mut self, outcome: Result<String>) -> Result<String> {
        self.submitting = false;
        match outcome {
            Ok(ack) => {
                log::info!(
                    "Workload entered for {} ({} group(s))",
                    self.draft.reference_number,
                    self.draft.group_names.len()
                );
                self.draft.activity_id = None;
                self.draft.hours = None;
                self.error = None;
                Ok(ack)
            }
            Err(err) => {
                log::warn!("Failed to submit workload: {}", err);
                self.error = Some(format!("Failed to submit workload: {}", err.detail()));
                Err(err)
            }
        }
    }

    /// Validate, send, and apply the outcome.
    ///
    /// Dropping the returned future mid-request leaves the draft untouched
    /// and the form ready for another submit.
    pub async fn submit(&mut self, api: &dyn WorkloadApi) -> Result<String> {
        let submission = self.begin_submit()?;
        let mut in_flight = InFlight(self);
        let outcome = api.submit_workload(&submission).await;
        in_flight.0.finish_submit(outcome)
    }
}

/// Clears the submitting flag if a submission is abandoned.
struct InFlight<'a>(&'a mut WorkloadEntryForm);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.0.submitting {
            log::debug!(
                "Workload submission for {} abandoned",
                self.0.draft.reference_number
            );
            self.0.submitting = false;
        }
    }
}
