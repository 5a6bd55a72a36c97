// src/models/mod.rs

//! Domain models for the workload client.
//!
//! This module contains all data structures exchanged with the backend,
//! organized by the entity they describe.

mod activity;
mod config;
mod lecturer;
mod session;
mod workload;

// Re-export all public types
pub use activity::{Activity, ActivityId};
pub use config::{ApiConfig, Config, LoggingConfig, SessionConfig};
pub use lecturer::{CourseAssignment, EXTERNAL_ONLINE_TUTOR, Lecturer};
pub use session::{Credentials, LoginResponse, LoginUser, Role, RoleName, Session, UserProfile};
pub use workload::{
    ChecklistGroup, VerificationStatus, WorkloadEntry, WorkloadId, WorkloadSubmission,
};
