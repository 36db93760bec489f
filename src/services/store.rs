// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Record store abstraction shared by the HTTP handlers and the user manager.
//!
//! Two backends implement [`Store`]:
//! - [`crate::services::db::PostgresStore`] for deployments with `DATABASE_URL`
//! - [`MemoryStore`] for local development and tests

use crate::models::project::{Project, ProjectForm};
use crate::models::user::{NewUser, User, UserChanges, UserQuery};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::RwLock;

/// Errors returned by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record matches the lookup
    NotFound,
    /// A uniqueness constraint would be violated
    Conflict(String),
    /// The backend failed
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "Record not found"),
            StoreError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            StoreError::Backend(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for projects and users.
///
/// Single-record lookups fail with [`StoreError::NotFound`] instead of
/// returning `None`, except `find_user_by_email` which is used for
/// authentication where absence is an expected outcome.
#[async_trait]
pub trait Store: Send + Sync {
    // ========== Project Operations ==========

    /// All projects, ascending by id.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;
    async fn get_project(&self, id: i64) -> StoreResult<Project>;
    async fn insert_project(&self, form: &ProjectForm) -> StoreResult<Project>;
    async fn update_project(&self, id: i64, form: &ProjectForm) -> StoreResult<Project>;
    async fn delete_project(&self, id: i64) -> StoreResult<()>;

    // ========== User Operations ==========

    /// Insert a user. Fails with `Conflict` if the email is taken.
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User>;
    async fn get_user(&self, id: i64) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Users matching the query, ordered by email.
    async fn list_users(&self, query: &UserQuery) -> StoreResult<Vec<User>>;
    /// Apply changes to a user. Fails with `Conflict` if a changed email is taken.
    async fn update_user(&self, id: i64, changes: &UserChanges) -> StoreResult<User>;
}

#[derive(Default)]
struct Tables {
    projects: BTreeMap<i64, Project>,
    users: BTreeMap<i64, User>,
    next_project_id: i64,
    next_user_id: i64,
}

/// In-process store backed by ordered maps.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.values().cloned().collect())
    }

    async fn get_project(&self, id: i64) -> StoreResult<Project> {
        let tables = self.tables.read().await;
        tables.projects.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn insert_project(&self, form: &ProjectForm) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        tables.next_project_id += 1;
        let project = Project {
            id: tables.next_project_id,
            title: form.title.clone(),
            description: form.description.clone(),
            category: form.category.clone(),
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: i64, form: &ProjectForm) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        let project = tables.projects.get_mut(&id).ok_or(StoreError::NotFound)?;
        project.title = form.title.clone();
        project.description = form.description.clone();
        project.category = form.category.clone();
        Ok(project.clone())
    }

    async fn delete_project(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .projects
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already exists",
                user.email
            )));
        }

        tables.next_user_id += 1;
        let record = User {
            id: tables.next_user_id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            date_of_birth: user.date_of_birth,
            is_staff: user.is_staff,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            date_joined: Utc::now(),
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let tables = self.tables.read().await;
        tables.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, query: &UserQuery) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| query.matches(u))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(email) = &changes.email {
            if tables
                .users
                .values()
                .any(|u| u.id != id && u.email == *email)
            {
                return Err(StoreError::Conflict(format!(
                    "email {} already exists",
                    email
                )));
            }
        }

        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        changes.apply(user);
        Ok(user.clone())
    }
}
