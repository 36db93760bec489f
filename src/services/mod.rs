// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod auth_middleware;
pub mod db;
pub mod logging;
pub mod password;
pub mod store;
pub mod users;
