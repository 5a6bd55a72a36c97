//! Backend API abstraction.
//!
//! Every view model talks to the backend through [`WorkloadApi`], so the
//! same state machines run against the HTTP client or an in-memory fake.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /visiting-lecturers/{nic}
//! GET    /workloads/activities
//! POST   /workloads/enter
//! GET    /workloads/checklist?referenceNumber={ref}
//! POST   /workloads/verify/{workloadId}?status={status}
//! DELETE /workloads/delete/{workloadId}
//! ```

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Activity, ChecklistGroup, Lecturer, VerificationStatus, WorkloadId, WorkloadSubmission,
};

// Re-export for convenience
pub use http::HttpApi;

/// Operations the workload screens need from the backend.
#[async_trait]
pub trait WorkloadApi: Send + Sync {
    /// Resolve a NIC to a lecturer and their course assignments.
    async fn lookup_lecturer(&self, nic: &str) -> Result<Lecturer>;

    /// List the selectable activity types.
    async fn list_activities(&self) -> Result<Vec<Activity>>;

    /// Create a workload record. Returns the backend acknowledgment text.
    async fn submit_workload(&self, submission: &WorkloadSubmission) -> Result<String>;

    /// Fetch every group and workload entry recorded for a reference number.
    async fn fetch_checklist(&self, reference_number: &str) -> Result<Vec<ChecklistGroup>>;

    /// Move a workload entry to `status`.
    async fn set_verification(&self, id: &WorkloadId, status: VerificationStatus) -> Result<()>;

    /// Delete a workload entry.
    async fn delete_workload(&self, id: &WorkloadId) -> Result<()>;
}
