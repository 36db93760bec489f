// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use project_em::app::{create_router, AppState};
use project_em::models::project::{Project, ProjectForm};
use project_em::models::user::{User, UserFields};
use project_em::services::auth_middleware::basic_authorization;
use project_em::services::password::{HashConfig, PasswordHasher};
use project_em::services::store::{MemoryStore, Store};
use project_em::services::users::UserManager;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

pub const STAFF_EMAIL: &str = "staff@example.com";
pub const HELPER_EMAIL: &str = "helper@example.com";
pub const MEMBER_EMAIL: &str = "member@example.com";
pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
    pub users: Arc<UserManager>,
}

impl TestApp {
    /// Router over an empty in-memory store.
    pub fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let hasher = PasswordHasher::new(&HashConfig::default()).expect("default hash config");
        let state = AppState::new(store.clone(), UserManager::new(store.clone(), hasher));
        let users = state.users.clone();
        Self {
            router: create_router(state),
            store,
            users,
        }
    }

    pub async fn add_project(&self, title: &str, category: &str) -> Project {
        self.store
            .insert_project(&ProjectForm {
                title: title.to_string(),
                description: format!("About {}", title),
                category: category.to_string(),
            })
            .await
            .expect("insert project")
    }

    pub async fn add_staff(&self) -> User {
        self.users
            .create_superuser(
                STAFF_EMAIL,
                Some(PASSWORD),
                None,
                UserFields::named("Staff", "User"),
            )
            .await
            .expect("create staff")
    }

    /// Staff account without superuser rights.
    pub async fn add_helper(&self) -> User {
        self.users
            .create_user(
                HELPER_EMAIL,
                Some(PASSWORD),
                None,
                UserFields {
                    is_staff: Some(true),
                    ..UserFields::named("Helper", "User")
                },
            )
            .await
            .expect("create helper")
    }

    pub async fn add_member(&self) -> User {
        self.users
            .create_user(
                MEMBER_EMAIL,
                Some(PASSWORD),
                None,
                UserFields::named("Member", "User"),
            )
            .await
            .expect("create member")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn authed(method: &str, uri: &str, email: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", basic_authorization(email, PASSWORD));

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
