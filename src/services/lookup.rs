// src/services/lookup.rs

//! Lecturer lookup by NIC.
//!
//! A lookup is split into [`LecturerLookup::begin`] and
//! [`LecturerLookup::complete`] so an event loop can issue a new search while
//! an older one is still in flight; the older response is dropped when it
//! lands. [`LecturerLookup::search`] runs both halves back to back.

use crate::api::WorkloadApi;
use crate::error::{AppError, Result};
use crate::models::{CourseAssignment, Lecturer};
use crate::services::guard::{LatestOnly, RequestTag};

const NOT_FOUND: &str = "Lecturer not found.";

/// Displayed lecturer plus the state of the latest search.
#[derive(Debug, Default)]
pub struct LecturerLookup {
    guard: LatestOnly<String>,
    lecturer: Option<Lecturer>,
    error: Option<String>,
}

impl LecturerLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search. Blank input is rejected without a request.
    pub fn begin(&mut self, nic: &str) -> Result<RequestTag<String>> {
        let nic = nic.trim();
        if nic.is_empty() {
            self.error = Some("Please enter a NIC number.".to_string());
            return Err(AppError::missing(["NIC"]));
        }
        self.error = None;
        Ok(self.guard.issue(nic.to_string()))
    }

    /// Apply the response for `tag`.
    ///
    /// Returns `Ok(false)` when the response belongs to a superseded search
    /// and was discarded. A failed lookup clears the displayed lecturer.
    pub fn complete(&mut self, tag: RequestTag<String>, outcome: Result<Lecturer>) -> Result<bool> {
        if !self.guard.settle(&tag) {
            log::debug!("Discarding stale lookup response for {}", tag.key());
            return Ok(false);
        }

        match outcome {
            Ok(lecturer) => {
                log::debug!(
                    "Found lecturer {} with {} course(s)",
                    lecturer.nic,
                    lecturer.courses.len()
                );
                self.lecturer = Some(lecturer);
                Ok(true)
            }
            Err(err) => {
                log::warn!("Lecturer lookup for {} failed: {}", tag.key(), err);
                self.lecturer = None;
                self.error = Some(not_found_message(&err));
                Err(err)
            }
        }
    }

    /// Look up `nic` and display the result.
    pub async fn search(&mut self, api: &dyn WorkloadApi, nic: &str) -> Result<&Lecturer> {
        let tag = self.begin(nic)?;
        let outcome = api.lookup_lecturer(tag.key()).await;
        self.complete(tag, outcome)?;
        self.lecturer
            .as_ref()
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub fn lecturer(&self) -> Option<&Lecturer> {
        self.lecturer.as_ref()
    }

    /// Assignments offered to the reference-number selectors.
    pub fn assignments(&self) -> Vec<&CourseAssignment> {
        self.lecturer
            .as_ref()
            .map(|l| l.online_tutor_courses().collect())
            .unwrap_or_default()
    }

    pub fn reference_numbers(&self) -> Vec<&str> {
        self.lecturer
            .as_ref()
            .map(Lecturer::reference_numbers)
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.guard.in_flight().is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Backend detail when there is one, otherwise the stock message.
fn not_found_message(err: &AppError) -> String {
    match err {
        AppError::NotFound(message) | AppError::Network { message, .. } if !message.is_empty() => {
            message.clone()
        }
        _ => NOT_FOUND.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};
    use crate::models::EXTERNAL_ONLINE_TUTOR;

    fn lecturer(nic: &str, name: &str) -> Lecturer {
        Lecturer {
            nic: nic.to_string(),
            full_name: name.to_string(),
            courses: vec![
                CourseAssignment {
                    reference_number: format!("{nic}-REF"),
                    course_code: "EEX3467".to_string(),
                    service_type: EXTERNAL_ONLINE_TUTOR.to_string(),
                },
                CourseAssignment {
                    reference_number: format!("{nic}-DAY"),
                    course_code: "EEX4435".to_string(),
                    service_type: "Day School Lecturer".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_search_populates_lecturer_and_tutor_references() {
        let api = FakeApi::new().with_lecturer(lecturer("X", "Nimal"));
        let mut lookup = LecturerLookup::new();

        let found = lookup.search(&api, " X ").await.unwrap();
        assert_eq!(found.full_name, "Nimal");
        assert_eq!(lookup.reference_numbers(), vec!["X-REF"]);
        assert_eq!(lookup.assignments().len(), 1);
        assert!(!lookup.is_loading());
        assert_eq!(api.calls(), vec![Call::Lookup("X".to_string())]);
    }

    #[tokio::test]
    async fn test_blank_nic_is_rejected_without_request() {
        let api = FakeApi::new();
        let mut lookup = LecturerLookup::new();

        let err = lookup.search(&api, "   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(lookup.error_message(), Some("Please enter a NIC number."));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_clears_previous_lecturer() {
        let api = FakeApi::new().with_lecturer(lecturer("X", "Nimal"));
        let mut lookup = LecturerLookup::new();
        lookup.search(&api, "X").await.unwrap();

        let err = lookup.search(&api, "Z").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(lookup.lecturer().is_none());
        assert_eq!(lookup.error_message(), Some("Lecturer not found."));
    }

    #[tokio::test]
    async fn test_backend_detail_is_surfaced() {
        let api = FakeApi::new();
        api.fail_next(500, "Database unavailable");
        let mut lookup = LecturerLookup::new();

        assert!(lookup.search(&api, "X").await.unwrap_err().is_network());
        assert_eq!(lookup.error_message(), Some("Database unavailable"));
    }

    #[test]
    fn test_superseded_lookup_never_overwrites_newer_result() {
        // Y resolves first, then the stale X response arrives.
        let mut lookup = LecturerLookup::new();
        let x = lookup.begin("X").unwrap();
        let y = lookup.begin("Y").unwrap();

        assert!(lookup.complete(y, Ok(lecturer("Y", "Kamala"))).unwrap());
        assert!(!lookup.complete(x, Ok(lecturer("X", "Nimal"))).unwrap());
        assert_eq!(lookup.lecturer().unwrap().nic, "Y");
    }

    #[test]
    fn test_superseded_lookup_is_dropped_when_it_arrives_first() {
        let mut lookup = LecturerLookup::new();
        let x = lookup.begin("X").unwrap();
        let y = lookup.begin("Y").unwrap();

        assert!(!lookup.complete(x, Ok(lecturer("X", "Nimal"))).unwrap());
        assert!(lookup.lecturer().is_none());
        assert!(lookup.is_loading());

        assert!(lookup.complete(y, Ok(lecturer("Y", "Kamala"))).unwrap());
        assert_eq!(lookup.lecturer().unwrap().nic, "Y");
    }

    #[test]
    fn test_stale_failure_does_not_clear_newer_lecturer() {
        let mut lookup = LecturerLookup::new();
        let x = lookup.begin("X").unwrap();
        let y = lookup.begin("Y").unwrap();

        lookup.complete(y, Ok(lecturer("Y", "Kamala"))).unwrap();
        let stale = lookup.complete(x, Err(AppError::not_found("Lecturer not found.")));
        assert!(matches!(stale, Ok(false)));
        assert_eq!(lookup.lecturer().unwrap().nic, "Y");
        assert!(lookup.error_message().is_none());
    }
}
