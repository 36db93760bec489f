// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! User manager: account creation, changes and credential checks.

use crate::models::user::{NewUser, User, UserChanges, UserFields};
use crate::services::logging::anonymize_email;
use crate::services::password::{self, PasswordHasher};
use crate::services::store::{Store, StoreError};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// Errors raised while creating or changing users.
#[derive(Debug)]
pub enum UserError {
    EmptyEmail,
    SuperuserRequiresStaff,
    SuperuserRequiresSuperuser,
    DuplicateEmail(String),
    Hash(String),
    Store(StoreError),
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserError::EmptyEmail => write!(f, "The Email must be set"),
            UserError::SuperuserRequiresStaff => write!(f, "Superuser must have is_staff=True."),
            UserError::SuperuserRequiresSuperuser => {
                write!(f, "Superuser must have is_superuser=True.")
            }
            UserError::DuplicateEmail(email) => {
                write!(f, "User with email {} already exists", email)
            }
            UserError::Hash(msg) => write!(f, "Password hashing failed: {}", msg),
            UserError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UserError {}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        UserError::Store(e)
    }
}

/// Lowercase the domain part of an email address.
///
/// Surrounding whitespace is stripped when the address contains an `@`;
/// anything without one is returned unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Creates and updates user records against a [`Store`].
pub struct UserManager {
    store: Arc<dyn Store>,
    hasher: PasswordHasher,
}

impl UserManager {
    pub fn new(store: Arc<dyn Store>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Create and save a user with the given email, password and date of birth.
    ///
    /// `password: None` stores an unusable password.
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        date_of_birth: Option<NaiveDate>,
        fields: UserFields,
    ) -> Result<User, UserError> {
        if email.trim().is_empty() {
            return Err(UserError::EmptyEmail);
        }
        let email = normalize_email(email);

        let password_hash = match password {
            Some(raw) => self.hash_password(raw)?,
            None => password::unusable_password(),
        };

        let new_user = NewUser {
            email,
            password_hash,
            first_name: fields.first_name.unwrap_or_default(),
            last_name: fields.last_name.unwrap_or_default(),
            date_of_birth,
            is_staff: fields.is_staff.unwrap_or(false),
            is_active: fields.is_active.unwrap_or(true),
            is_superuser: fields.is_superuser.unwrap_or(false),
        };

        let user = self
            .store
            .insert_user(&new_user)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => UserError::DuplicateEmail(new_user.email.clone()),
                other => UserError::Store(other),
            })?;

        tracing::info!(
            "[USERS] Created user: id={}, email={}, staff={}, superuser={}",
            user.id,
            anonymize_email(&user.email),
            user.is_staff,
            user.is_superuser
        );

        Ok(user)
    }

    /// Create and save a superuser. Staff, superuser and active flags default
    /// to true; explicitly disabling staff or superuser is rejected.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        date_of_birth: Option<NaiveDate>,
        mut fields: UserFields,
    ) -> Result<User, UserError> {
        let is_staff = *fields.is_staff.get_or_insert(true);
        let is_superuser = *fields.is_superuser.get_or_insert(true);
        fields.is_active.get_or_insert(true);

        if !is_staff {
            return Err(UserError::SuperuserRequiresStaff);
        }
        if !is_superuser {
            return Err(UserError::SuperuserRequiresSuperuser);
        }

        self.create_user(email, password, date_of_birth, fields)
            .await
    }

    /// Apply admin changes to a user. A changed email is normalized and a
    /// changed password is hashed before storage.
    pub async fn update_user(
        &self,
        id: i64,
        email: Option<&str>,
        password: Option<&str>,
        mut changes: UserChanges,
    ) -> Result<User, UserError> {
        if let Some(email) = email {
            if email.trim().is_empty() {
                return Err(UserError::EmptyEmail);
            }
            changes.email = Some(normalize_email(email));
        }
        if let Some(raw) = password {
            changes.password_hash = Some(self.hash_password(raw)?);
        }

        let user = self
            .store
            .update_user(id, &changes)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    UserError::DuplicateEmail(changes.email.clone().unwrap_or_default())
                }
                other => UserError::Store(other),
            })?;

        tracing::info!(
            "[USERS] Updated user: id={}, email={}",
            user.id,
            anonymize_email(&user.email)
        );

        Ok(user)
    }

    /// Look up an active user by email and check the password.
    ///
    /// Returns `Ok(None)` for unknown emails, inactive users and wrong
    /// passwords alike.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            return Ok(None);
        };

        if !user.is_active || !self.hasher.verify(password, &user.password_hash) {
            tracing::warn!(
                "[USERS] Authentication failed for {}",
                anonymize_email(&email)
            );
            return Ok(None);
        }

        Ok(Some(user))
    }

    fn hash_password(&self, raw: &str) -> Result<String, UserError> {
        self.hasher
            .hash(raw)
            .map_err(|e| UserError::Hash(e.to_string()))
    }
}
