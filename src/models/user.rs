// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::ValidateEmail;

// ============================================================================
// Database Models
// ============================================================================

/// User record from the database.
///
/// Users are identified by email; there is no username.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// Optional attributes passed to the user manager alongside email, password
/// and date of birth.
///
/// `None` means "not provided", which lets superuser creation tell an absent
/// flag apart from an explicit `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UserFields {
    pub fn named(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            ..Self::default()
        }
    }
}

/// A fully prepared user row: email normalized, password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
}

/// Partial update of a user row. Values are stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = date_of_birth;
        }
        if let Some(is_staff) = self.is_staff {
            user.is_staff = is_staff;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

// ============================================================================
// Admin Listing
// ============================================================================

/// Filters and search for the admin user list. All filters are exact
/// matches; `q` searches email case-insensitively.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Case-insensitive substring of the email
    pub q: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            if !user.email.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }

        self.email.as_ref().is_none_or(|v| *v == user.email)
            && self
                .first_name
                .as_ref()
                .is_none_or(|v| *v == user.first_name)
            && self.last_name.as_ref().is_none_or(|v| *v == user.last_name)
            && self
                .date_of_birth
                .is_none_or(|v| Some(v) == user.date_of_birth)
            && self.is_staff.is_none_or(|v| v == user.is_staff)
            && self.is_active.is_none_or(|v| v == user.is_active)
            && self.is_superuser.is_none_or(|v| v == user.is_superuser)
    }
}

// ============================================================================
// API Request Types
// ============================================================================

/// Admin "add user" form.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password1: String,
    /// Must repeat `password1`
    pub password2: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Rejects anything that is not a well-formed email address.
pub fn validate_email(email: &str) -> Result<(), String> {
    if !email.trim().validate_email() {
        return Err("Enter a valid email address".to_string());
    }
    Ok(())
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("first_name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            return Err("last_name is required".to_string());
        }
        validate_email(&self.email)?;
        if self.password1.is_empty() {
            return Err("password is required".to_string());
        }
        if self.password1 != self.password2 {
            return Err("The two password fields didn't match".to_string());
        }
        Ok(())
    }
}

/// Admin "change user" form. Absent fields are left untouched; an explicit
/// `null` date of birth clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("password", &self.password),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{} cannot be empty", field));
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

// Distinguishes a present `null` from a missing key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ============================================================================
// API Response Types
// ============================================================================

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            date_of_birth: user.date_of_birth,
            is_staff: user.is_staff,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            date_joined: user.date_joined,
        }
    }
}

/// Response for the admin user list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserInfo>,
    pub count: usize,
}

/// Identity and credential fields of the admin edit view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IdentityFieldset {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Hash summary, never the hash itself
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// Permission fields of the admin edit view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PermissionsFieldset {
    pub is_staff: bool,
    pub is_active: bool,
}

/// Admin edit view of a single user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDetailResponse {
    pub id: i64,
    pub identity: IdentityFieldset,
    pub permissions: PermissionsFieldset,
}

/// Dashboard summary for the authenticated user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub email: String,
    pub is_staff: bool,
    pub project_count: usize,
}

/// Generic message response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Tests
// ============================================================================
