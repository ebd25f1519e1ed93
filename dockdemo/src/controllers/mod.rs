pub mod root_controller;
pub mod user_controller;

use axum::Router;

use crate::state::AppState;

/// Every application route except the `/health` probes, which the health
/// plugin registers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(root_controller::routes())
        .merge(user_controller::routes())
}
