// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! PostgreSQL record store.

use crate::models::project::{Project, ProjectForm};
use crate::models::user::{NewUser, User, UserChanges, UserQuery};
use crate::services::store::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::QueryBuilder;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, date_of_birth, \
                            is_staff, is_active, is_superuser, date_joined";

const SELECT_PROJECTS: &str = "SELECT id, title, description, category FROM projects ORDER BY id";
const SELECT_PROJECT: &str = "SELECT id, title, description, category FROM projects WHERE id = $1";
const INSERT_PROJECT: &str = "INSERT INTO projects (title, description, category) VALUES ($1, $2, $3) \
                              RETURNING id, title, description, category";
const UPDATE_PROJECT: &str = "UPDATE projects SET title = $1, description = $2, category = $3 \
                              WHERE id = $4 RETURNING id, title, description, category";
const DELETE_PROJECT: &str = "DELETE FROM projects WHERE id = $1";

const INSERT_USER: &str = "INSERT INTO users (email, password_hash, first_name, last_name, \
                           date_of_birth, is_staff, is_active, is_superuser) \
                           VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                           RETURNING id, email, password_hash, first_name, last_name, \
                           date_of_birth, is_staff, is_active, is_superuser, date_joined";
const SELECT_USER: &str = "SELECT id, email, password_hash, first_name, last_name, date_of_birth, \
                           is_staff, is_active, is_superuser, date_joined FROM users WHERE id = $1";
const SELECT_USER_BY_EMAIL: &str = "SELECT id, email, password_hash, first_name, last_name, \
                                    date_of_birth, is_staff, is_active, is_superuser, date_joined \
                                    FROM users WHERE email = $1";

/// Record store backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn map_err(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

/// Append the `WHERE` clause for an admin user query.
fn push_user_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &UserQuery) {
    builder.push(" WHERE TRUE");

    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        builder
            .push(" AND strpos(lower(email), lower(")
            .push_bind(q.to_string())
            .push(")) > 0");
    }
    if let Some(email) = &query.email {
        builder.push(" AND email = ").push_bind(email.clone());
    }
    if let Some(first_name) = &query.first_name {
        builder.push(" AND first_name = ").push_bind(first_name.clone());
    }
    if let Some(last_name) = &query.last_name {
        builder.push(" AND last_name = ").push_bind(last_name.clone());
    }
    if let Some(date_of_birth) = query.date_of_birth {
        builder.push(" AND date_of_birth = ").push_bind(date_of_birth);
    }
    if let Some(is_staff) = query.is_staff {
        builder.push(" AND is_staff = ").push_bind(is_staff);
    }
    if let Some(is_active) = query.is_active {
        builder.push(" AND is_active = ").push_bind(is_active);
    }
    if let Some(is_superuser) = query.is_superuser {
        builder.push(" AND is_superuser = ").push_bind(is_superuser);
    }
}

/// Append the `SET` assignments for the changed user columns.
fn push_user_changes(builder: &mut QueryBuilder<'_, Postgres>, changes: &UserChanges) {
    let mut set = builder.separated(", ");
    if let Some(email) = &changes.email {
        set.push("email = ").push_bind_unseparated(email.clone());
    }
    if let Some(hash) = &changes.password_hash {
        set.push("password_hash = ")
            .push_bind_unseparated(hash.clone());
    }
    if let Some(first_name) = &changes.first_name {
        set.push("first_name = ")
            .push_bind_unseparated(first_name.clone());
    }
    if let Some(last_name) = &changes.last_name {
        set.push("last_name = ")
            .push_bind_unseparated(last_name.clone());
    }
    if let Some(date_of_birth) = changes.date_of_birth {
        set.push("date_of_birth = ")
            .push_bind_unseparated(date_of_birth);
    }
    if let Some(is_staff) = changes.is_staff {
        set.push("is_staff = ").push_bind_unseparated(is_staff);
    }
    if let Some(is_active) = changes.is_active {
        set.push("is_active = ").push_bind_unseparated(is_active);
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        sqlx::query_as(SELECT_PROJECTS)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn get_project(&self, id: i64) -> StoreResult<Project> {
        sqlx::query_as(SELECT_PROJECT)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn insert_project(&self, form: &ProjectForm) -> StoreResult<Project> {
        sqlx::query_as(INSERT_PROJECT)
            .bind(&form.title)
            .bind(&form.description)
            .bind(&form.category)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn update_project(&self, id: i64, form: &ProjectForm) -> StoreResult<Project> {
        sqlx::query_as(UPDATE_PROJECT)
            .bind(&form.title)
            .bind(&form.description)
            .bind(&form.category)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn delete_project(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query(DELETE_PROJECT)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        sqlx::query_as(INSERT_USER)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(user.is_staff)
            .bind(user.is_active)
            .bind(user.is_superuser)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        sqlx::query_as(SELECT_USER)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as(SELECT_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn list_users(&self, query: &UserQuery) -> StoreResult<Vec<User>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
        push_user_filters(&mut builder, query);
        builder.push(" ORDER BY email");

        builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> StoreResult<User> {
        if changes.is_empty() {
            return self.get_user(id).await;
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE users SET ");
        push_user_changes(&mut builder, changes);
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(format!(" RETURNING {}", USER_COLUMNS));

        builder
            .build_query_as::<User>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }
}
