use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(users: UserStore, config: AppConfig) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }

    /// Seed the store according to `users.seed`.
    pub fn from_config(config: AppConfig) -> Self {
        let users = if config.seed_users {
            UserStore::seeded()
        } else {
            UserStore::empty()
        };
        Self::new(users, config)
    }
}

impl FromRef<AppState> for UserStore {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
