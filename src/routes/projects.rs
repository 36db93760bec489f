// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Public project catalog pages.

use crate::app::{ApiError, AppState};
use crate::models::project::{ProjectDetailResponse, ProjectListResponse};
use crate::models::user::MessageResponse;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/", get(project_index))
        .route("/projects/{id}", get(project_detail))
}

/// GET /projects/ - List every registered project.
#[utoipa::path(
    get,
    path = "/projects/",
    tag = "projects",
    responses(
        (status = 200, body = ProjectListResponse),
        (status = 500, body = MessageResponse)
    )
)]
pub async fn project_index(
    State(state): State<AppState>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let projects = state.store.list_projects().await?;
    let count = projects.len();
    Ok(Json(ProjectListResponse { projects, count }))
}

/// GET /projects/{id} - Show a single project.
#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, body = ProjectDetailResponse),
        (status = 404, body = MessageResponse)
    )
)]
pub async fn project_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let project = state.store.get_project(id).await?;
    Ok(Json(ProjectDetailResponse { project }))
}
