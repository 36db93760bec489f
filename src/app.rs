// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, request authentication, error mapping, and router
//! construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::user::{MessageResponse, User};
use crate::models::version::VersionResponse;
use crate::routes::{account, admin, projects, ApiDoc};
use crate::services::auth_middleware::{parse_basic_credentials, AuthError};
use crate::services::store::{Store, StoreError};
use crate::services::users::{UserError, UserManager};
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `PROJECT_EM_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("PROJECT_EM_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub users: Arc<UserManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, users: UserManager) -> Self {
        Self {
            store,
            users: Arc::new(users),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                tracing::error!("[HTTP] Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (
            status,
            Json(MessageResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound(e.to_string()),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::EmptyEmail
            | UserError::SuperuserRequiresStaff
            | UserError::SuperuserRequiresSuperuser => ApiError::BadRequest(e.to_string()),
            UserError::DuplicateEmail(_) => ApiError::Conflict(e.to_string()),
            UserError::Hash(msg) => ApiError::Internal(msg),
            UserError::Store(store_error) => store_error.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Authentication extractors
// ---------------------------------------------------------------------------

/// Axum extractor for the user identified by HTTP Basic credentials.
///
/// Rejects with 401 when credentials are missing, wrong, or belong to an
/// inactive account.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (email, password) =
            parse_basic_credentials(&parts.headers).ok_or(AuthError::MissingCredentials)?;

        state
            .users
            .authenticate(&email, &password)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .map(CurrentUser)
            .ok_or(AuthError::InvalidCredentials)
    }
}

/// Axum extractor for an authenticated staff user. Non-staff users get 403.
pub struct StaffUser(pub User);

impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            tracing::warn!("[ADMIN] Non-staff user {} denied", user.id);
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(StaffUser(user))
    }
}

/// Axum extractor for an active staff user who is also a superuser.
///
/// Guards changes to user accounts; plain staff get 403.
pub struct SuperUser(pub User);

impl FromRequestParts<AppState> for SuperUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let StaffUser(user) = StaffUser::from_request_parts(parts, state).await?;
        if !user.is_superuser {
            tracing::warn!("[ADMIN] Staff user {} denied user management", user.id);
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(SuperUser(user))
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /version - Application name and version.
#[utoipa::path(
    get,
    path = "/version",
    tag = "meta",
    responses((status = 200, body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        app: "project-em".to_string(),
        version: VERSION.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .merge(projects::router())
        .merge(account::router())
        .nest("/admin", admin::router())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
