//! Login session, role, and user profile structures.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Username/password pair posted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reject blank fields before any request is made.
    pub fn check(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::missing(missing))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Closed set of roles the backend assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    VisitingLecturer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::VisitingLecturer => "ROLE_VISITING_LECTURER",
        }
    }

    /// Greeting label shown in the header.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::VisitingLecturer => "Visiting Lecturer",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ROLE_ADMIN" => Ok(Self::Admin),
            "ROLE_VISITING_LECTURER" => Ok(Self::VisitingLecturer),
            other => Err(AppError::validation(format!("Unknown role '{other}'"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated session held by the API client.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from the login response, taking the first role.
    pub fn from_login(response: LoginResponse) -> Result<Self> {
        let role = response
            .user
            .roles
            .first()
            .ok_or_else(|| AppError::validation("Login response carries no role"))?
            .name
            .parse()?;

        Ok(Self {
            token: response.token,
            username: response.user.username,
            role,
            started_at: Utc::now(),
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

/// Body of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<RoleName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleName {
    pub name: String,
}

/// Profile details of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nic_number: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl UserProfile {
    /// Label/value rows for display; phone numbers only for lecturers.
    pub fn rows(&self, role: Role) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Name", self.full_name.clone()),
            ("Gender", self.gender.clone()),
            ("Email", self.email.clone()),
            ("NIC", self.nic_number.clone()),
        ];
        if role == Role::VisitingLecturer {
            rows.push((
                "Phone Number",
                self.phone_number.clone().unwrap_or_default(),
            ));
        }
        rows
    }
}
