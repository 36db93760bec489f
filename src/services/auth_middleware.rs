// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication helpers for Axum.
//!
//! Provides helper functions and types for authentication:
//! - `parse_basic_credentials`: Decode an HTTP Basic `Authorization` header
//! - `AuthError`: Error type for auth failures

use axum::http::{
    header::{AUTHORIZATION, WWW_AUTHENTICATE},
    HeaderMap, HeaderValue, StatusCode,
};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::models::user::MessageResponse;

/// Realm advertised in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = "project-em";

/// Auth error responses.
#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials,
    InsufficientPermissions,
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::InsufficientPermissions => {
                (StatusCode::FORBIDDEN, "Insufficient permissions")
            }
            AuthError::InternalError(msg) => {
                tracing::error!("[AUTH] Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(MessageResponse {
            success: false,
            message: message.to_string(),
        });

        if status == StatusCode::UNAUTHORIZED {
            let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", AUTH_REALM))
                .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
            (status, [(WWW_AUTHENTICATE, challenge)], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// Extract `(email, password)` from a Basic `Authorization` header.
///
/// Returns `None` when the header is absent, uses another scheme, or is not
/// valid base64/UTF-8 with a `:` separator.
pub fn parse_basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

/// Build a Basic `Authorization` header value.
pub fn basic_authorization(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}
