//! User model and related types.
//!
//! Employees and administrators share one record. Employees carry a short
//! numeric access code used at the terminal; administrators usually do not.

use serde::{Deserialize, Serialize};

/// The role a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages terminals, accounts and reports.
    Admin,
    /// Clocks in and out at a terminal.
    Employee,
}

/// A person known to the time clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: String,
    /// Contact email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Short numeric code entered at the terminal.
    #[serde(default)]
    pub access_code: Option<String>,
    /// The role of the user.
    pub role: Role,
    /// Inactive users cannot identify at a terminal or grant authorization.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Returns the name shown on reports and at the terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use timeclock::models::{Role, User};
    ///
    /// let user = User {
    ///     id: "emp_001".to_string(),
    ///     email: "anna@example.com".to_string(),
    ///     first_name: "Anna".to_string(),
    ///     last_name: "Jensen".to_string(),
    ///     access_code: Some("1234".to_string()),
    ///     role: Role::Employee,
    ///     active: true,
    /// };
    /// assert_eq!(user.display_name(), "Anna Jensen");
    /// ```
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if this user may identify at a terminal with `code`.
    ///
    /// Only active employees match; administrators and inactive employees
    /// never do, even when their stored code is identical.
    pub fn matches_code(&self, code: &str) -> bool {
        self.active && self.role == Role::Employee && self.access_code.as_deref() == Some(code)
    }
}
