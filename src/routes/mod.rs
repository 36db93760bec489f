// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Route handlers for the HTTP API.

pub mod account;
pub mod admin;
pub mod projects;

use crate::models::project::{Project, ProjectDetailResponse, ProjectForm, ProjectListResponse};
use crate::models::user::{
    CreateUserRequest, DashboardResponse, IdentityFieldset, MessageResponse, PermissionsFieldset,
    UpdateUserRequest, UserDetailResponse, UserInfo, UserListResponse,
};
use crate::models::version::VersionResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::app::version_handler,
        projects::project_index,
        projects::project_detail,
        account::dashboard,
        account::profile,
        admin::list_users_handler,
        admin::create_user_handler,
        admin::get_user_handler,
        admin::update_user_handler,
        admin::list_projects_handler,
        admin::create_project_handler,
        admin::get_project_handler,
        admin::update_project_handler,
        admin::delete_project_handler,
    ),
    components(schemas(
        VersionResponse,
        Project,
        ProjectForm,
        ProjectListResponse,
        ProjectDetailResponse,
        UserInfo,
        UserListResponse,
        UserDetailResponse,
        IdentityFieldset,
        PermissionsFieldset,
        CreateUserRequest,
        UpdateUserRequest,
        DashboardResponse,
        MessageResponse,
    )),
    tags(
        (name = "projects", description = "Public project catalog"),
        (name = "account", description = "Signed-in user pages"),
        (name = "admin", description = "Staff administration"),
        (name = "meta", description = "Service information")
    )
)]
pub struct ApiDoc;
