//! Service layer for the workload client.
//!
//! This module contains the view models behind the workload screen:
//! - Lecturer lookup by NIC (`LecturerLookup`)
//! - Activity type catalog (`ActivityCatalog`)
//! - Workload entry form (`WorkloadEntryForm`)
//! - Verification checklist (`ChecklistView`)
//! - Role-gated navigation (`Navigator`)

mod catalog;
mod checklist;
mod entry_form;
pub mod guard;
mod lookup;
mod navigation;

pub use catalog::ActivityCatalog;
pub use checklist::{ChecklistRow, ChecklistState, ChecklistView, EntryAction, GroupView, PendingOp};
pub use entry_form::{WorkloadDraft, WorkloadEntryForm};
pub use lookup::LecturerLookup;
pub use navigation::{Navigator, Route, View};
