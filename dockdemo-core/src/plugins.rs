//! Built-in plugins for common cross-cutting concerns.
//!
//! Each plugin implements [`Plugin`](crate::plugin::Plugin) and is
//! installed via [`AppBuilder::with()`](crate::builder::AppBuilder::with).

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::builder::AppBuilder;
use crate::health::{self, HealthState};
use crate::plugin::Plugin;

/// CORS plugin.
pub struct Cors {
    layer: CorsLayer,
}

impl Cors {
    /// Allow any origin, method, and header.
    pub fn permissive() -> Self {
        Self {
            layer: crate::layers::default_cors(),
        }
    }
}

impl Plugin for Cors {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.with_layer(self.layer)
    }
}

/// Request/response tracing via `tower_http::trace::TraceLayer`.
///
/// The global subscriber is installed separately with
/// [`init_tracing`](crate::layers::init_tracing), once, at the start of `main`.
pub struct Tracing;

impl Plugin for Tracing {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.with_layer(crate::layers::default_trace())
    }
}

/// Health-check endpoint plugin.
///
/// ```ignore
/// .with(Health)  // GET /health -> {"status":"healthy"}
///
/// .with(Health::builder()
///     .check(StoreHealth::new(store.clone()))
///     .build())
/// ```
///
/// The builder form adds `GET /health/live` and `GET /health/ready` and
/// reports each check in the `/health` body.
pub struct Health;

impl Health {
    pub fn builder() -> health::HealthBuilder {
        health::HealthBuilder::new()
    }
}

impl Plugin for Health {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.register_routes(Router::new().route("/health", get(|| async { health::healthy_body() })))
    }
}

/// Health plugin with named checks and liveness/readiness probes.
///
/// Created via [`Health::builder()`].
pub struct AdvancedHealth {
    state: HealthState,
}

impl AdvancedHealth {
    pub(crate) fn new(state: HealthState) -> Self {
        Self { state }
    }
}

impl Plugin for AdvancedHealth {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        let state = Arc::new(self.state);
        app.register_routes(
            Router::new()
                .route(
                    "/health",
                    get(health::health_handler).with_state(state.clone()),
                )
                .route("/health/live", get(health::liveness_handler))
                .route(
                    "/health/ready",
                    get(health::readiness_handler).with_state(state),
                ),
        )
    }
}

/// Converts handler panics into JSON 500 responses.
///
/// Install it last so it wraps every other layer.
pub struct ErrorHandling;

impl Plugin for ErrorHandling {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.with_layer(crate::layers::catch_panic_layer())
    }

    fn should_be_last() -> bool {
        true
    }
}

/// Fails requests that take longer than the given duration with `408 Request Timeout`.
pub struct RequestTimeout(pub Duration);

impl Plugin for RequestTimeout {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.with_layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, self.0))
    }
}

/// Trailing-slash normalization: `/users/` is served by the `/users` route.
///
/// Implemented as a router fallback, so it only kicks in when no route
/// matched the original path.
pub struct NormalizePath;

impl Plugin for NormalizePath {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.enable_normalize_path()
    }
}
