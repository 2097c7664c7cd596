// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Forge project hosting server.
//!
//! This crate wires the domain services from `forge-server-projects` into an
//! axum router. It owns exactly three HTTP concerns: resolving the acting
//! user from a credential, mapping typed domain errors to status codes, and
//! serializing wire types from `forge-server-api`.

pub mod api;
pub mod auth_middleware;
pub mod config;
pub mod error;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use auth_middleware::{generate_token, hash_token, CurrentUser, RequireAuth};
pub use config::{load_config, ConfigError, ServerConfig};
pub use error::ServerError;
