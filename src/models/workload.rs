//! Workload submission and checklist data structures.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::ActivityId;
use crate::utils::pad_activity_number;

/// Server-assigned workload identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkloadId(pub String);

impl fmt::Display for WorkloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkloadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Verification state of a workload entry.
///
/// Anything other than `VERIFIED` on the wire (including null) is treated as
/// not verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum VerificationStatus {
    Verified,
    #[default]
    NotVerified,
}

impl VerificationStatus {
    /// Wire representation used in the `status` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::NotVerified => "NOT_VERIFIED",
        }
    }

    /// The status a toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Verified => Self::NotVerified,
            Self::NotVerified => Self::Verified,
        }
    }

    /// Status cell text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Verified => "✅ Verified",
            Self::NotVerified => "❌ Not Verified",
        }
    }

    /// Text of the button that toggles away from this status.
    pub fn action_label(self) -> &'static str {
        match self {
            Self::Verified => "🔄 Unverify",
            Self::NotVerified => "✅ Verify",
        }
    }
}

impl From<Option<String>> for VerificationStatus {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("VERIFIED") => Self::Verified,
            _ => Self::NotVerified,
        }
    }
}

impl From<VerificationStatus> for &'static str {
    fn from(status: VerificationStatus) -> Self {
        status.as_str()
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create request for one workload record, fanned out over its groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSubmission {
    pub reference_number: String,
    pub number_of_groups: usize,
    pub group_numbers: Vec<String>,
    pub activity_id: ActivityId,
    pub activity_number: u32,
    pub workload_hours: u32,
}

/// One workload entry inside a checklist group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntry {
    /// Missing or empty identifiers decode as `None`
    #[serde(default, deserialize_with = "lenient::workload_id")]
    pub workload_id: Option<WorkloadId>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub activity_name: String,

    /// Kept as text; the backend sends either "01" or 1
    #[serde(default, deserialize_with = "lenient::text")]
    pub activity_number: String,

    /// Null or blank decodes as zero
    #[serde(default, deserialize_with = "lenient::hours")]
    pub hours: u32,

    #[serde(default)]
    pub status: VerificationStatus,

    #[serde(default)]
    pub verified_by: Option<String>,
}

impl WorkloadEntry {
    /// Activity cell text, e.g. "Marking 01".
    pub fn activity_label(&self) -> String {
        if self.activity_number.is_empty() {
            self.activity_name.clone()
        } else {
            format!(
                "{} {}",
                self.activity_name,
                pad_activity_number(&self.activity_number)
            )
        }
    }

    /// Verifier cell text; an em-dash when nobody has verified the entry.
    pub fn verifier_label(&self) -> &str {
        match self.verified_by.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "—",
        }
    }

    /// Copy of this entry moved to `status`, with the verifier cleared.
    pub fn with_status(&self, status: VerificationStatus) -> Self {
        Self {
            status,
            verified_by: None,
            ..self.clone()
        }
    }
}

/// Workload entries recorded under one group name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistGroup {
    #[serde(default)]
    pub group_name: String,

    #[serde(rename = "workloadEntries", default)]
    pub entries: Vec<Arc<WorkloadEntry>>,
}

mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    use super::WorkloadId;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<Scalar>::deserialize(deserializer)? {
            Some(Scalar::Text(s)) => s,
            Some(Scalar::Int(n)) => n.to_string(),
            Some(Scalar::Float(f)) => f.to_string(),
            None => String::new(),
        })
    }

    pub fn hours<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Scalar::Int(n)) => u32::try_from(n)
                .map_err(|_| D::Error::custom(format!("hours out of range: {n}"))),
            Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(0),
            Some(Scalar::Text(s)) => s.trim().parse().map_err(D::Error::custom),
            Some(Scalar::Float(f)) => Err(D::Error::custom(format!(
                "hours must be a whole number, got {f}"
            ))),
        }
    }

    pub fn workload_id<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<WorkloadId>, D::Error> {
        let raw = text(deserializer)?;
        let trimmed = raw.trim();
        Ok((!trimmed.is_empty()).then(|| WorkloadId(trimmed.to_string())))
    }
}
