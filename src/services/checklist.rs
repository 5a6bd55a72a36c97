// src/services/checklist.rs

//! Workload checklist for one reference number.
//!
//! The loaded checklist is an immutable snapshot of `Arc`-shared groups and
//! entries. In-flight actions are kept as pending markers keyed by workload
//! ID, never written into the snapshot. A confirmed action replaces the
//! snapshot with a copy in which only the affected group is rebuilt, so all
//! other groups keep their identity.
//!
//! ## States
//!
//! ```text
//! Idle ──select──▶ Loading ──ok──▶ Loaded
//!                     │  ▲            │
//!                     │  └──select────┘
//!                     └──err──▶ Error ──select──▶ Loading
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::WorkloadApi;
use crate::error::{AppError, Result};
use crate::models::{ChecklistGroup, VerificationStatus, WorkloadEntry, WorkloadId};
use crate::services::guard::{LatestOnly, RequestTag};

/// Where the checklist is in its load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// An action awaiting the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Toggle { target: VerificationStatus },
    Delete,
}

/// Handle for an issued entry action, passed back with its outcome.
#[derive(Debug, Clone)]
pub struct EntryAction {
    epoch: u64,
    group_index: usize,
    workload_id: WorkloadId,
    op: PendingOp,
}

impl EntryAction {
    pub fn workload_id(&self) -> &WorkloadId {
        &self.workload_id
    }

    pub fn op(&self) -> PendingOp {
        self.op
    }

    /// Target status of a toggle.
    pub fn target(&self) -> Option<VerificationStatus> {
        match self.op {
            PendingOp::Toggle { target } => Some(target),
            PendingOp::Delete => None,
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRow {
    pub group_index: usize,
    pub entry_index: usize,
    pub activity: String,
    pub hours: u32,
    pub status: VerificationStatus,
    pub status_label: &'static str,
    pub verifier: String,
    pub action_label: &'static str,
    pub pending: bool,
}

/// One rendered group with its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub name: String,
    pub rows: Vec<ChecklistRow>,
}

/// Checklist view model.
#[derive(Debug)]
pub struct ChecklistView {
    guard: LatestOnly<String>,
    selected: Option<String>,
    /// Bumped on every selection; actions from older epochs are ignored
    epoch: u64,
    state: ChecklistState,
    snapshot: Arc<[Arc<ChecklistGroup>]>,
    pending: HashMap<WorkloadId, PendingOp>,
    notice: Option<String>,
}

impl Default for ChecklistView {
    fn default() -> Self {
        Self {
            guard: LatestOnly::default(),
            selected: None,
            epoch: 0,
            state: ChecklistState::Idle,
            snapshot: Arc::from(Vec::new()),
            pending: HashMap::new(),
            notice: None,
        }
    }
}

impl ChecklistView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ChecklistState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The last confirmed checklist.
    pub fn snapshot(&self) -> Arc<[Arc<ChecklistGroup>]> {
        Arc::clone(&self.snapshot)
    }

    pub fn pending(&self, id: &WorkloadId) -> Option<PendingOp> {
        self.pending.get(id).copied()
    }

    /// Last warning or confirmation for the operator.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Select a reference number and start loading it.
    ///
    /// Any pending edits of the previous selection are dropped. A blank
    /// reference returns the view to `Idle` and issues nothing.
    pub fn select(&mut self, reference_number: &str) -> Option<RequestTag<String>> {
        self.epoch += 1;
        self.pending.clear();
        self.snapshot = Arc::from(Vec::new());
        self.notice = None;

        let reference_number = reference_number.trim();
        if reference_number.is_empty() {
            self.guard.cancel();
            self.selected = None;
            self.state = ChecklistState::Idle;
            return None;
        }

        self.selected = Some(reference_number.to_string());
        self.state = ChecklistState::Loading;
        Some(self.guard.issue(reference_number.to_string()))
    }

    /// Apply a checklist response. Returns `false` if it was stale.
    pub fn apply(
        &mut self,
        tag: RequestTag<String>,
        outcome: Result<Vec<ChecklistGroup>>,
    ) -> Result<bool> {
        if !self.guard.settle(&tag) {
            log::debug!("Discarding stale checklist for {}", tag.key());
            return Ok(false);
        }

        match outcome {
            Ok(groups) => {
                log::debug!("Loaded {} group(s) for {}", groups.len(), tag.key());
                self.snapshot = groups.into_iter().map(Arc::new).collect();
                self.state = ChecklistState::Loaded;
                Ok(true)
            }
            Err(err) => {
                log::warn!("Error fetching checklist for {}: {}", tag.key(), err);
                self.state = ChecklistState::Error("Failed to load workload checklist.".to_string());
                Err(err)
            }
        }
    }

    /// Select `reference_number` and load it.
    pub async fn load(&mut self, api: &dyn WorkloadApi, reference_number: &str) -> Result<()> {
        let Some(tag) = self.select(reference_number) else {
            return Ok(());
        };
        let outcome = api.fetch_checklist(tag.key()).await;
        self.apply(tag, outcome).map(|_| ())
    }

    /// Start a verification toggle.
    ///
    /// The entry shows the opposite status with no verifier until the
    /// outcome arrives.
    pub fn begin_toggle(&mut self, group_index: usize, entry_index: usize) -> Result<EntryAction> {
        let entry = self.entry(group_index, entry_index)?;
        let target = entry.status.toggled();
        self.begin(group_index, entry, PendingOp::Toggle { target }, "verify")
    }

    /// Apply the outcome of a toggle.
    ///
    /// Success moves the entry to the target status with no verifier.
    /// Failure drops the pending marker, which reverts the entry to the last
    /// confirmed state.
    pub fn finish_toggle(&mut self, action: EntryAction, outcome: Result<()>) -> Result<()> {
        if !self.settle(&action) {
            return outcome;
        }
        let PendingOp::Toggle { target } = action.op else {
            return Err(AppError::lookup("Action is not a verification toggle"));
        };

        match outcome {
            Ok(()) => {
                log::info!("Workload {} marked {}", action.workload_id, target);
                self.replace_entries(&action.workload_id, |entry| entry.with_status(target));
                self.notice = Some("Workload verification successful!".to_string());
                Ok(())
            }
            Err(err) => {
                log::warn!("Verification error for {}: {}", action.workload_id, err);
                self.notice = Some(format!("Failed to verify workload: {}", err.detail()));
                Err(err)
            }
        }
    }

    /// Toggle the entry at `(group_index, entry_index)`.
    pub async fn toggle_verification(
        &mut self,
        api: &dyn WorkloadApi,
        group_index: usize,
        entry_index: usize,
    ) -> Result<VerificationStatus> {
        let action = self.begin_toggle(group_index, entry_index)?;
        let target = action.target().unwrap_or_default();
        let outcome = api.set_verification(action.workload_id(), target).await;
        self.finish_toggle(action, outcome)?;
        Ok(target)
    }

    /// Start deleting an entry. Nothing is removed until confirmed.
    pub fn begin_delete(&mut self, group_index: usize, entry_index: usize) -> Result<EntryAction> {
        let entry = self.entry(group_index, entry_index)?;
        self.begin(group_index, entry, PendingOp::Delete, "delete")
    }

    /// Apply the outcome of a delete.
    pub fn finish_delete(&mut self, action: EntryAction, outcome: Result<()>) -> Result<()> {
        if !self.settle(&action) {
            return outcome;
        }

        match outcome {
            Ok(()) => {
                log::info!("Workload {} deleted", action.workload_id);
                self.remove_entry(action.group_index, &action.workload_id);
                self.notice = Some("Workload deleted and verification updated successfully.".to_string());
                Ok(())
            }
            Err(err) => {
                log::warn!("Delete error for {}: {}", action.workload_id, err);
                self.notice = Some(format!("Failed to delete workload: {}", err.detail()));
                Err(err)
            }
        }
    }

    /// Delete the entry at `(group_index, entry_index)`.
    pub async fn delete_entry(
        &mut self,
        api: &dyn WorkloadApi,
        group_index: usize,
        entry_index: usize,
    ) -> Result<()> {
        let action = self.begin_delete(group_index, entry_index)?;
        let outcome = api.delete_workload(action.workload_id()).await;
        self.finish_delete(action, outcome)
    }

    /// Groups and rows as they should be displayed, pending toggles included.
    pub fn groups(&self) -> Vec<GroupView> {
        self.snapshot
            .iter()
            .enumerate()
            .map(|(group_index, group)| GroupView {
                name: group.group_name.clone(),
                rows: group
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(entry_index, entry)| self.row(group_index, entry_index, entry))
                    .collect(),
            })
            .collect()
    }

    fn row(&self, group_index: usize, entry_index: usize, entry: &WorkloadEntry) -> ChecklistRow {
        let op = entry
            .workload_id
            .as_ref()
            .and_then(|id| self.pending.get(id).copied());
        let (status, verifier) = match op {
            Some(PendingOp::Toggle { target }) => (target, "—".to_string()),
            _ => (entry.status, entry.verifier_label().to_string()),
        };

        ChecklistRow {
            group_index,
            entry_index,
            activity: entry.activity_label(),
            hours: entry.hours,
            status,
            status_label: status.label(),
            verifier,
            action_label: status.action_label(),
            pending: op.is_some(),
        }
    }

    fn entry(&self, group_index: usize, entry_index: usize) -> Result<Arc<WorkloadEntry>> {
        self.snapshot
            .get(group_index)
            .and_then(|group| group.entries.get(entry_index))
            .cloned()
            .ok_or_else(|| {
                AppError::lookup(format!(
                    "No workload entry at group {group_index}, entry {entry_index}"
                ))
            })
    }

    fn begin(
        &mut self,
        group_index: usize,
        entry: Arc<WorkloadEntry>,
        op: PendingOp,
        verb: &str,
    ) -> Result<EntryAction> {
        let Some(workload_id) = entry.workload_id.clone() else {
            log::warn!("Workload ID is missing for {}", entry.activity_label());
            let message = format!("Workload ID is missing. Cannot {verb} this entry.");
            self.notice = Some(message.clone());
            return Err(AppError::lookup(message));
        };
        if self.pending.contains_key(&workload_id) {
            return Err(AppError::busy(format!("workload {workload_id}")));
        }

        self.pending.insert(workload_id.clone(), op);
        Ok(EntryAction {
            epoch: self.epoch,
            group_index,
            workload_id,
            op,
        })
    }

    /// Clear the pending marker. `false` if the action predates the current
    /// selection and must not touch this snapshot.
    fn settle(&mut self, action: &EntryAction) -> bool {
        if action.epoch != self.epoch {
            log::debug!(
                "Ignoring outcome for {} from an earlier selection",
                action.workload_id
            );
            return false;
        }
        self.pending.remove(&action.workload_id);
        true
    }

    fn replace_entries<F>(&mut self, id: &WorkloadId, update: F)
    where
        F: Fn(&WorkloadEntry) -> WorkloadEntry,
    {
        let matches = |entry: &Arc<WorkloadEntry>| entry.workload_id.as_ref() == Some(id);

        self.snapshot = self
            .snapshot
            .iter()
            .map(|group| {
                if !group.entries.iter().any(matches) {
                    return Arc::clone(group);
                }
                Arc::new(ChecklistGroup {
                    group_name: group.group_name.clone(),
                    entries: group
                        .entries
                        .iter()
                        .map(|entry| {
                            if matches(entry) {
                                Arc::new(update(entry))
                            } else {
                                Arc::clone(entry)
                            }
                        })
                        .collect(),
                })
            })
            .collect();
    }

    fn remove_entry(&mut self, group_index: usize, id: &WorkloadId) {
        let Some(group) = self.snapshot.get(group_index) else {
            log::warn!("Group {} vanished before delete of {} settled", group_index, id);
            return;
        };
        let Some(position) = group
            .entries
            .iter()
            .position(|entry| entry.workload_id.as_ref() == Some(id))
        else {
            log::warn!("Workload {} no longer in group {}", id, group_index);
            return;
        };

        let mut entries = group.entries.clone();
        entries.remove(position);
        let rebuilt = Arc::new(ChecklistGroup {
            group_name: group.group_name.clone(),
            entries,
        });

        self.snapshot = self
            .snapshot
            .iter()
            .enumerate()
            .map(|(i, g)| {
                if i == group_index {
                    Arc::clone(&rebuilt)
                } else {
                    Arc::clone(g)
                }
            })
            .collect();
    }
}
