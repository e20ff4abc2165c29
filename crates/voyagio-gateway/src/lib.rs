// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway exposing the Voyagio trip workflow as a REST API.
//!
//! `GET /health` is public; everything under `/v1` requires the
//! configured bearer token (fail-closed when none is set). Handlers are
//! thin: deserialize, call the one workflow operation the route maps
//! to, serialize, with a single error-to-status mapping in [`error`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, start_server, GatewayState, ServerConfig};
