//! Lecturer and course assignment data structures.

use serde::{Deserialize, Serialize};

/// Service type whose assignments carry workload reference numbers.
pub const EXTERNAL_ONLINE_TUTOR: &str = "External Online Tutor";

/// A visiting lecturer as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    /// National identity card number
    #[serde(rename = "nicNumber")]
    pub nic: String,

    /// Display name
    #[serde(default)]
    pub full_name: String,

    /// Course assignments in backend order
    #[serde(default)]
    pub courses: Vec<CourseAssignment>,
}

impl Lecturer {
    /// Assignments eligible for workload entry, in backend order.
    pub fn online_tutor_courses(&self) -> impl Iterator<Item = &CourseAssignment> {
        self.courses.iter().filter(|c| c.is_online_tutor())
    }

    /// Reference numbers offered by every reference-number selector.
    pub fn reference_numbers(&self) -> Vec<&str> {
        self.online_tutor_courses()
            .map(|c| c.reference_number.as_str())
            .collect()
    }
}

/// One course assignment of a lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignment {
    /// Join key to workload records
    #[serde(default)]
    pub reference_number: String,

    #[serde(default)]
    pub course_code: String,

    /// Service type label (e.g., "External Online Tutor")
    #[serde(default)]
    pub service_type: String,
}

impl CourseAssignment {
    pub fn is_online_tutor(&self) -> bool {
        self.service_type == EXTERNAL_ONLINE_TUTOR
    }
}
