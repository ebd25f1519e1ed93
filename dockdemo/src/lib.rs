//! Demo HTTP service: hello world, health probes and an in-memory user list.
//!
//! The binary in `main.rs` only parses flags, loads configuration and
//! calls [`app`]; tests build the same router through [`app`] and drive it
//! in-process.

pub mod config;
pub mod controllers;
pub mod health;
pub mod models;
pub mod state;
pub mod store;

use dockdemo_core::plugins::{Cors, ErrorHandling, Health, NormalizePath, RequestTimeout, Tracing};
use dockdemo_core::{AppBuilder, RequestIdPlugin, SecureHeaders};

use crate::health::StoreHealth;
use crate::state::AppState;

/// Assemble the application with every route and cross-cutting layer.
///
/// Layers wrap in registration order, so panics are caught outermost and
/// every response, including timeouts, carries a request id.
pub fn app(state: AppState) -> AppBuilder<AppState> {
    let timeout = state.config.request_timeout;
    let store_health = StoreHealth::new(state.users.clone());

    AppBuilder::new()
        .with_state(state)
        .register_routes(controllers::routes())
        .with(Health::builder().check(store_health).build())
        .with(NormalizePath)
        .with(RequestTimeout(timeout))
        .with(SecureHeaders::default())
        .with(Cors::permissive())
        .with(Tracing)
        .with(RequestIdPlugin)
        .with(ErrorHandling)
}
