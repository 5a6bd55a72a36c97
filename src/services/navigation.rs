//! Role-gated navigation.
//!
//! Which views a role may open is decided here, once, from a capability
//! table keyed by [`Role`]. Views themselves never compare role strings.

use crate::models::{Role, Session};

/// Screens of the management client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    AddUser,
    RecommendationForm,
    MarkingRates,
    WorkloadVerification,
    UploadDocument,
    LecturerInfo,
    PayeeForm,
    PaymentDetail,
}

impl View {
    pub const ALL: [View; 9] = [
        View::Dashboard,
        View::AddUser,
        View::RecommendationForm,
        View::MarkingRates,
        View::WorkloadVerification,
        View::UploadDocument,
        View::LecturerInfo,
        View::PayeeForm,
        View::PaymentDetail,
    ];

    pub fn path(self) -> &'static str {
        match self {
            View::Dashboard => "/dashboard",
            View::AddUser => "/add-user",
            View::RecommendationForm => "/recommendation-form",
            View::MarkingRates => "/marking-rates",
            View::WorkloadVerification => "/workload-verification",
            View::UploadDocument => "/upload-document",
            View::LecturerInfo => "/lecturer-info",
            View::PayeeForm => "/payee-form",
            View::PaymentDetail => "/payment-detail",
        }
    }

    /// Navigation link text.
    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::AddUser => "Add User",
            View::RecommendationForm => "Recommendation Form",
            View::MarkingRates => "Managing Marking Rates",
            View::WorkloadVerification => "Workload Verification",
            View::UploadDocument => "Upload Document",
            View::LecturerInfo => "View Lecturer Info",
            View::PayeeForm => "Payee Form",
            View::PaymentDetail => "Payment Details",
        }
    }

    pub fn from_path(path: &str) -> Option<View> {
        let path = path.trim_end_matches('/');
        View::ALL.into_iter().find(|v| v.path() == path)
    }
}

const ADMIN_VIEWS: &[View] = &[
    View::Dashboard,
    View::AddUser,
    View::RecommendationForm,
    View::MarkingRates,
    View::WorkloadVerification,
    View::UploadDocument,
    View::LecturerInfo,
];

const LECTURER_VIEWS: &[View] = &[
    View::Dashboard,
    View::UploadDocument,
    View::PayeeForm,
    View::PaymentDetail,
];

impl Role {
    /// Views this role may open, in navigation order.
    pub fn views(self) -> &'static [View] {
        match self {
            Role::Admin => ADMIN_VIEWS,
            Role::VisitingLecturer => LECTURER_VIEWS,
        }
    }

    pub fn can_access(self, view: View) -> bool {
        self.views().contains(&view)
    }
}

/// Where a path leads for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    View(View),
}

/// Resolves paths against the session's role.
#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator {
    role: Option<Role>,
}

impl Navigator {
    pub fn for_session(session: Option<&Session>) -> Self {
        Self {
            role: session.map(|s| s.role),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Links to show, empty when logged out.
    pub fn menu(&self) -> &'static [View] {
        self.role.map(Role::views).unwrap_or(&[])
    }

    pub fn permits(&self, view: View) -> bool {
        self.role.is_some_and(|r| r.can_access(view))
    }

    /// Logged-out users always land on login; unknown or forbidden paths
    /// fall back to the dashboard.
    pub fn resolve(&self, path: &str) -> Route {
        if self.role.is_none() {
            return Route::Login;
        }
        match View::from_path(path) {
            Some(view) if self.permits(view) => Route::View(view),
            _ => Route::View(View::Dashboard),
        }
    }
}
