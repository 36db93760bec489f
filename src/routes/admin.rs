// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Administrative API for staff users.
//!
//! Users are listed by email with exact-match filters on every list column
//! and a case-insensitive email search. The edit view groups fields into
//! identity/credentials and permissions. Adding or changing users takes a
//! superuser; projects and read-only views are open to all staff.

use crate::app::{ApiError, AppState, StaffUser, SuperUser};
use crate::models::project::{Project, ProjectDetailResponse, ProjectForm, ProjectListResponse};
use crate::models::user::{
    CreateUserRequest, IdentityFieldset, MessageResponse, PermissionsFieldset, UpdateUserRequest,
    User, UserChanges, UserDetailResponse, UserFields, UserInfo, UserListResponse, UserQuery,
};
use crate::services::logging::anonymize_email;
use crate::services::password;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler).patch(update_user_handler),
        )
        .route(
            "/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/projects/{id}",
            get(get_project_handler)
                .put(update_project_handler)
                .delete(delete_project_handler),
        )
}

fn user_detail(user: &User) -> UserDetailResponse {
    UserDetailResponse {
        id: user.id,
        identity: IdentityFieldset {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: password::summarize(&user.password_hash),
            date_of_birth: user.date_of_birth,
        },
        permissions: PermissionsFieldset {
            is_staff: user.is_staff,
            is_active: user.is_active,
        },
    }
}

// ============================================================================
// Users
// ============================================================================

/// GET /admin/users - List users, filtered and searched, ordered by email.
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(UserQuery),
    responses(
        (status = 200, body = UserListResponse),
        (status = 401, body = MessageResponse),
        (status = 403, body = MessageResponse)
    )
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users: Vec<UserInfo> = state
        .store
        .list_users(&query)
        .await?
        .iter()
        .map(UserInfo::from)
        .collect();

    let count = users.len();
    Ok(Json(UserListResponse { users, count }))
}

/// POST /admin/users - Add a user.
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "admin",
    request_body = CreateUserRequest,
    responses(
        (status = 201, body = UserDetailResponse),
        (status = 400, body = MessageResponse),
        (status = 403, body = MessageResponse),
        (status = 409, body = MessageResponse)
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    SuperUser(admin): SuperUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDetailResponse>), ApiError> {
    payload.validate().map_err(ApiError::BadRequest)?;

    let fields = UserFields {
        first_name: Some(payload.first_name.trim().to_string()),
        last_name: Some(payload.last_name.trim().to_string()),
        is_staff: Some(payload.is_staff),
        is_active: Some(payload.is_active),
        is_superuser: None,
    };

    let user = state
        .users
        .create_user(
            &payload.email,
            Some(&payload.password1),
            payload.date_of_birth,
            fields,
        )
        .await?;

    tracing::info!(
        "[ADMIN] User {} added by superuser {}",
        anonymize_email(&user.email),
        admin.id
    );

    Ok((StatusCode::CREATED, Json(user_detail(&user))))
}

/// GET /admin/users/{id} - Edit view of a user.
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, body = UserDetailResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    let user = state.store.get_user(id).await?;
    Ok(Json(user_detail(&user)))
}

/// PATCH /admin/users/{id} - Change a user.
#[utoipa::path(
    patch,
    path = "/admin/users/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, body = UserDetailResponse),
        (status = 400, body = MessageResponse),
        (status = 403, body = MessageResponse),
        (status = 404, body = MessageResponse),
        (status = 409, body = MessageResponse)
    )
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    SuperUser(admin): SuperUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    payload.validate().map_err(ApiError::BadRequest)?;

    let changes = UserChanges {
        first_name: payload.first_name.map(|v| v.trim().to_string()),
        last_name: payload.last_name.map(|v| v.trim().to_string()),
        date_of_birth: payload.date_of_birth,
        is_staff: payload.is_staff,
        is_active: payload.is_active,
        ..UserChanges::default()
    };

    let user = state
        .users
        .update_user(
            id,
            payload.email.as_deref(),
            payload.password.as_deref(),
            changes,
        )
        .await?;

    tracing::info!("[ADMIN] User {} changed by superuser {}", user.id, admin.id);

    Ok(Json(user_detail(&user)))
}

// ============================================================================
// Projects
// ============================================================================

/// GET /admin/projects - List projects.
#[utoipa::path(
    get,
    path = "/admin/projects",
    tag = "admin",
    responses((status = 200, body = ProjectListResponse))
)]
pub async fn list_projects_handler(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let projects = state.store.list_projects().await?;
    let count = projects.len();
    Ok(Json(ProjectListResponse { projects, count }))
}

/// POST /admin/projects - Add a project.
#[utoipa::path(
    post,
    path = "/admin/projects",
    tag = "admin",
    request_body = ProjectForm,
    responses(
        (status = 201, body = Project),
        (status = 400, body = MessageResponse)
    )
)]
pub async fn create_project_handler(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(form): Json<ProjectForm>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    form.validate().map_err(ApiError::BadRequest)?;

    let project = state.store.insert_project(&form).await?;
    tracing::info!(
        "[ADMIN] Project {} added by staff user {}",
        project.id,
        staff.id
    );

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /admin/projects/{id} - Edit view of a project.
#[utoipa::path(
    get,
    path = "/admin/projects/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, body = ProjectDetailResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn get_project_handler(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<i64>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let project = state.store.get_project(id).await?;
    Ok(Json(ProjectDetailResponse { project }))
}

/// PUT /admin/projects/{id} - Replace a project's fields.
#[utoipa::path(
    put,
    path = "/admin/projects/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Project id")),
    request_body = ProjectForm,
    responses(
        (status = 200, body = Project),
        (status = 400, body = MessageResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn update_project_handler(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i64>,
    Json(form): Json<ProjectForm>,
) -> Result<Json<Project>, ApiError> {
    form.validate().map_err(ApiError::BadRequest)?;

    let project = state.store.update_project(id, &form).await?;
    tracing::info!("[ADMIN] Project {} changed by staff user {}", id, staff.id);

    Ok(Json(project))
}

/// DELETE /admin/projects/{id} - Delete a project.
#[utoipa::path(
    delete,
    path = "/admin/projects/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn delete_project_handler(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_project(id).await?;
    tracing::info!("[ADMIN] Project {} deleted by staff user {}", id, staff.id);

    Ok(Json(MessageResponse {
        success: true,
        message: "Project deleted successfully".to_string(),
    }))
}
