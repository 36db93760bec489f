// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TITLE_MAX_LEN: usize = 200;
pub const CATEGORY_MAX_LEN: usize = 64;

/// Project catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
}

/// Fields of a project as submitted through the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl ProjectForm {
    /// Check field presence and lengths.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(format!(
                "title must be at most {} characters",
                TITLE_MAX_LEN
            ));
        }
        if self.description.trim().is_empty() {
            return Err("description is required".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("category is required".to_string());
        }
        if self.category.chars().count() > CATEGORY_MAX_LEN {
            return Err(format!(
                "category must be at most {} characters",
                CATEGORY_MAX_LEN
            ));
        }
        Ok(())
    }
}

/// Response for the project listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub count: usize,
}

/// Response for a single project.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectDetailResponse {
    pub project: Project,
}
