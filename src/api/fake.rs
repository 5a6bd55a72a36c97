//! In-memory backend used by the view-model tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::WorkloadApi;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ChecklistGroup, Lecturer, VerificationStatus, WorkloadId, WorkloadSubmission,
};

/// A request the fake received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Lookup(String),
    Activities,
    Submit(WorkloadSubmission),
    Checklist(String),
    Verify(WorkloadId, VerificationStatus),
    Delete(WorkloadId),
}

/// Scripted backend that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub lecturers: Mutex<HashMap<String, Lecturer>>,
    pub activities: Mutex<Vec<Activity>>,
    pub checklists: Mutex<HashMap<String, Vec<ChecklistGroup>>>,
    /// Status and detail the next call fails with, consumed once
    pub fail_next: Mutex<Option<(u16, String)>>,
    /// Submissions are recorded and then never answered
    pub stall_submissions: Mutex<bool>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lecturer(self, lecturer: Lecturer) -> Self {
        self.lecturers
            .lock()
            .unwrap()
            .insert(lecturer.nic.clone(), lecturer);
        self
    }

    pub fn with_activities(self, activities: Vec<Activity>) -> Self {
        *self.activities.lock().unwrap() = activities;
        self
    }

    pub fn with_checklist(self, reference: &str, groups: Vec<ChecklistGroup>) -> Self {
        self.checklists
            .lock()
            .unwrap()
            .insert(reference.to_string(), groups);
        self
    }

    pub fn fail_next(&self, status: u16, detail: &str) {
        *self.fail_next.lock().unwrap() = Some((status, detail.to_string()));
    }

    pub fn stall_submissions(&self, stall: bool) {
        *self.stall_submissions.lock().unwrap() = stall;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some((status, detail)) => Err(AppError::network(Some(status), detail)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WorkloadApi for FakeApi {
    async fn lookup_lecturer(&self, nic: &str) -> Result<Lecturer> {
        self.record(Call::Lookup(nic.to_string()))?;
        self.lecturers
            .lock()
            .unwrap()
            .get(nic)
            .cloned()
            .ok_or_else(|| AppError::not_found("Lecturer not found."))
    }

    async fn list_activities(&self) -> Result<Vec<Activity>> {
        self.record(Call::Activities)?;
        Ok(self.activities.lock().unwrap().clone())
    }

    async fn submit_workload(&self, submission: &WorkloadSubmission) -> Result<String> {
        self.record(Call::Submit(submission.clone()))?;
        let stalled = *self.stall_submissions.lock().unwrap();
        if stalled {
            std::future::pending::<()>().await;
        }
        Ok("Workload entered".to_string())
    }

    async fn fetch_checklist(&self, reference_number: &str) -> Result<Vec<ChecklistGroup>> {
        self.record(Call::Checklist(reference_number.to_string()))?;
        Ok(self
            .checklists
            .lock()
            .unwrap()
            .get(reference_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_verification(&self, id: &WorkloadId, status: VerificationStatus) -> Result<()> {
        self.record(Call::Verify(id.clone(), status))
    }

    async fn delete_workload(&self, id: &WorkloadId) -> Result<()> {
        self.record(Call::Delete(id.clone()))
    }
}
