//! Health checks with liveness/readiness probes.
//!
//! | Path                | Description                                       |
//! |---------------------|---------------------------------------------------|
//! | `GET /health`       | Aggregated status, 200 if healthy, 503 otherwise  |
//! | `GET /health/live`  | Liveness probe, always 200                        |
//! | `GET /health/ready` | Readiness probe, 200 if readiness checks pass     |
//!
//! ```ignore
//! struct StoreHealth { store: UserStore }
//!
//! impl HealthIndicator for StoreHealth {
//!     fn name(&self) -> &str { "user-store" }
//!     async fn check(&self) -> HealthStatus {
//!         HealthStatus::Up
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub enum HealthStatus {
    Up,
    Down(String),
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }
}

/// A named health indicator registered through [`HealthBuilder::check`].
pub trait HealthIndicator: Send + Sync + 'static {
    /// The name of this health check (e.g. `"user-store"`).
    fn name(&self) -> &str;

    fn check(&self) -> impl Future<Output = HealthStatus> + Send;

    /// Whether this check affects the readiness probe (default: `true`).
    fn affects_readiness(&self) -> bool {
        true
    }
}

#[doc(hidden)]
pub trait HealthIndicatorErased: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn check(&self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + '_>>;
    fn affects_readiness(&self) -> bool;
}

impl<T: HealthIndicator> HealthIndicatorErased for T {
    fn name(&self) -> &str {
        HealthIndicator::name(self)
    }

    fn check(&self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + '_>> {
        Box::pin(HealthIndicator::check(self))
    }

    fn affects_readiness(&self) -> bool {
        HealthIndicator::affects_readiness(self)
    }
}

/// Overall service state, rendered as `"healthy"` / `"unhealthy"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Up,
    Down,
}

/// A single check result in the health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub duration_ms: u64,
    #[serde(skip)]
    pub affects_readiness: bool,
}

/// Aggregated health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: OverallStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheck>,
    pub uptime_seconds: u64,
}

impl HealthResponse {
    fn from_checks(checks: Vec<HealthCheck>, started: Instant) -> Self {
        let status = if checks.iter().all(|c| c.status == CheckStatus::Up) {
            OverallStatus::Healthy
        } else {
            OverallStatus::Unhealthy
        };
        Self {
            status,
            checks,
            uptime_seconds: started.elapsed().as_secs(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.status {
            OverallStatus::Healthy => StatusCode::OK,
            OverallStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Builder for assembling health checks.
#[derive(Default)]
pub struct HealthBuilder {
    checks: Vec<Box<dyn HealthIndicatorErased>>,
    cache_ttl: Option<Duration>,
}

impl HealthBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a health check.
    pub fn check<H: HealthIndicator>(mut self, indicator: H) -> Self {
        self.checks.push(Box::new(indicator));
        self
    }

    /// Reuse check results for `ttl` before running the checks again.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn build(self) -> crate::plugins::AdvancedHealth {
        crate::plugins::AdvancedHealth::new(HealthState::new(self.checks, self.cache_ttl))
    }
}

/// Shared state for the health handlers.
pub struct HealthState {
    checks: Vec<Box<dyn HealthIndicatorErased>>,
    started: Instant,
    cache_ttl: Option<Duration>,
    cache: tokio::sync::RwLock<Option<(Vec<HealthCheck>, Instant)>>,
}

impl HealthState {
    pub fn new(checks: Vec<Box<dyn HealthIndicatorErased>>, cache_ttl: Option<Duration>) -> Self {
        Self {
            checks,
            started: Instant::now(),
            cache_ttl,
            cache: tokio::sync::RwLock::new(None),
        }
    }

    /// Pretend the service started `ago` earlier.
    pub fn started_ago(mut self, ago: Duration) -> Self {
        self.started = Instant::now().checked_sub(ago).unwrap_or(self.started);
        self
    }

    /// Run every check (or serve a cached result) and aggregate.
    pub async fn aggregate(&self) -> HealthResponse {
        HealthResponse::from_checks(self.results().await, self.started)
    }

    /// Aggregate only checks that affect readiness.
    pub async fn aggregate_readiness(&self) -> HealthResponse {
        let checks = self
            .results()
            .await
            .into_iter()
            .filter(|c| c.affects_readiness)
            .collect();
        HealthResponse::from_checks(checks, self.started)
    }

    async fn results(&self) -> Vec<HealthCheck> {
        if let Some(ttl) = self.cache_ttl {
            if let Some((checks, at)) = self.cache.read().await.as_ref() {
                if at.elapsed() < ttl {
                    return checks.clone();
                }
            }
        }

        let mut results = Vec::with_capacity(self.checks.len());
        for indicator in &self.checks {
            let start = Instant::now();
            let status = indicator.check().await;
            let (status, reason) = match status {
                HealthStatus::Up => (CheckStatus::Up, None),
                HealthStatus::Down(reason) => {
                    tracing::warn!(check = indicator.name(), %reason, "health check down");
                    (CheckStatus::Down, Some(reason))
                }
            };
            results.push(HealthCheck {
                name: indicator.name().to_string(),
                status,
                reason,
                duration_ms: start.elapsed().as_millis() as u64,
                affects_readiness: indicator.affects_readiness(),
            });
        }

        if self.cache_ttl.is_some() {
            *self.cache.write().await = Some((results.clone(), Instant::now()));
        }
        results
    }
}

/// Body shared by the always-healthy endpoints.
pub fn healthy_body() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Handler: GET /health
pub(crate) async fn health_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let response = state.aggregate().await;
    (response.status_code(), Json(response))
}

/// Handler: GET /health/live
pub(crate) async fn liveness_handler() -> impl IntoResponse {
    healthy_body()
}

/// Handler: GET /health/ready
pub(crate) async fn readiness_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let response = state.aggregate_readiness().await;
    (response.status_code(), Json(response))
}
