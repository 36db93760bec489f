// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::password::HashConfig;
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Process configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub hash: HashConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            // Bind to 0.0.0.0 to accept connections from any network interface (required for Docker)
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
                .parse()
                .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            hash: HashConfig::from_env(),
        })
    }
}
