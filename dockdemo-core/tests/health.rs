use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dockdemo_core::health::{
    CheckStatus, HealthIndicator, HealthIndicatorErased, HealthState, HealthStatus, OverallStatus,
};

#[test]
fn status_is_up() {
    assert!(HealthStatus::Up.is_up());
    assert!(!HealthStatus::Down("store locked".into()).is_up());
}

struct AlwaysUp;
impl HealthIndicator for AlwaysUp {
    fn name(&self) -> &str {
        "up-check"
    }
    async fn check(&self) -> HealthStatus {
        HealthStatus::Up
    }
}

struct AlwaysDown;
impl HealthIndicator for AlwaysDown {
    fn name(&self) -> &str {
        "down-check"
    }
    async fn check(&self) -> HealthStatus {
        HealthStatus::Down("broken".into())
    }
}

struct LivenessOnlyDown;
impl HealthIndicator for LivenessOnlyDown {
    fn name(&self) -> &str {
        "disk"
    }
    async fn check(&self) -> HealthStatus {
        HealthStatus::Down("disk nearly full".into())
    }
    fn affects_readiness(&self) -> bool {
        false
    }
}

struct Counting(Arc<AtomicUsize>);
impl HealthIndicator for Counting {
    fn name(&self) -> &str {
        "counting"
    }
    async fn check(&self) -> HealthStatus {
        self.0.fetch_add(1, Ordering::SeqCst);
        HealthStatus::Up
    }
}

fn boxed<H: HealthIndicator>(h: H) -> Box<dyn HealthIndicatorErased> {
    Box::new(h)
}

#[tokio::test]
async fn no_checks_is_healthy() {
    let state = HealthState::new(vec![], None);
    let response = state.aggregate().await;
    assert_eq!(response.status, OverallStatus::Healthy);
    assert!(response.checks.is_empty());

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json.get("checks").is_none());
}

#[tokio::test]
async fn one_down_check_makes_service_unhealthy() {
    let state = HealthState::new(vec![boxed(AlwaysUp), boxed(AlwaysDown)], None);
    let response = state.aggregate().await;
    assert_eq!(response.status, OverallStatus::Unhealthy);
    assert_eq!(response.checks.len(), 2);
    assert_eq!(response.checks[0].status, CheckStatus::Up);
    assert_eq!(response.checks[1].status, CheckStatus::Down);
    assert_eq!(response.checks[1].reason.as_deref(), Some("broken"));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"][1]["status"], "DOWN");
}

#[tokio::test]
async fn readiness_ignores_liveness_only_checks() {
    let state = HealthState::new(vec![boxed(AlwaysUp), boxed(LivenessOnlyDown)], None);
    assert_eq!(state.aggregate().await.status, OverallStatus::Unhealthy);

    let ready = state.aggregate_readiness().await;
    assert_eq!(ready.status, OverallStatus::Healthy);
    assert_eq!(ready.checks.len(), 1);
    assert_eq!(ready.checks[0].name, "up-check");
}

#[tokio::test]
async fn cached_results_are_reused_within_ttl() {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = HealthState::new(
        vec![boxed(Counting(calls.clone()))],
        Some(Duration::from_secs(60)),
    );
    state.aggregate().await;
    state.aggregate().await;
    state.aggregate_readiness().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn without_cache_every_call_runs_checks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = HealthState::new(vec![boxed(Counting(calls.clone()))], None);
    state.aggregate().await;
    state.aggregate().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn uptime_reflects_start_time() {
    let state = HealthState::new(vec![], None).started_ago(Duration::from_secs(5));
    assert!(state.aggregate().await.uptime_seconds >= 5);
}
