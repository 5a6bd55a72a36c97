//! Workload activity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend identifier of an activity type.
///
/// The backend may send either a number or a string; the value is echoed
/// back in the form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityId {
    Number(i64),
    Text(String),
}

impl ActivityId {
    /// Whether `key` names this identifier, ignoring surrounding whitespace.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        match self {
            Self::Number(n) => key.parse::<i64>() == Ok(*n),
            Self::Text(s) => s.trim() == key,
        }
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ActivityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ActivityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A selectable workload activity (e.g., "Assignment Marking").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,

    #[serde(rename = "activityName", default)]
    pub name: String,
}
