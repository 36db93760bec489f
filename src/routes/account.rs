// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Pages for the signed-in user.

use crate::app::{ApiError, AppState, CurrentUser};
use crate::models::user::{DashboardResponse, MessageResponse, UserInfo};
use axum::{extract::State, routing::get, Json, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/", get(dashboard))
        .route("/profile/", get(profile))
}

/// GET /dashboard/ - Summary for the authenticated user.
#[utoipa::path(
    get,
    path = "/dashboard/",
    tag = "account",
    responses(
        (status = 200, body = DashboardResponse),
        (status = 401, body = MessageResponse)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let project_count = state.store.list_projects().await?.len();

    Ok(Json(DashboardResponse {
        email: user.email,
        is_staff: user.is_staff,
        project_count,
    }))
}

/// GET /profile/ - The authenticated user's own record.
#[utoipa::path(
    get,
    path = "/profile/",
    tag = "account",
    responses(
        (status = 200, body = UserInfo),
        (status = 401, body = MessageResponse)
    )
)]
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(UserInfo::from(&user))
}
