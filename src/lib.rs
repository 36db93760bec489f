// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Project catalog and email-identified user accounts behind an HTTP API.

pub mod app;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
