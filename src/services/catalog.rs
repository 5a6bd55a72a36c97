//! Activity catalog, fetched once per view.

use crate::api::WorkloadApi;
use crate::error::Result;
use crate::models::{Activity, ActivityId};

/// Read-only list of activity types for the selection controls.
#[derive(Debug, Default)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
    loaded: bool,
    error: Option<String>,
}

impl ActivityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the list unless it was already loaded.
    ///
    /// On failure the list stays empty and the call may be repeated.
    pub async fn load(&mut self, api: &dyn WorkloadApi) -> Result<&[Activity]> {
        if self.loaded {
            return Ok(&self.activities);
        }

        match api.list_activities().await {
            Ok(activities) => {
                log::debug!("Loaded {} activities", activities.len());
                self.activities = activities;
                self.loaded = true;
                self.error = None;
                Ok(&self.activities)
            }
            Err(err) => {
                log::warn!("Activity fetch error: {}", err);
                self.activities.clear();
                self.error = Some("Failed to fetch activities.".to_string());
                Err(err)
            }
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: &ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| &a.id == id)
    }

    /// Match a typed-in identifier against either ID form.
    pub fn find_by_key(&self, key: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id.matches(key))
    }

    /// Case-insensitive match on the display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Activity> {
        let name = name.trim();
        self.activities
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
