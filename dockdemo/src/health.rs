use std::time::Duration;

use dockdemo_core::{HealthIndicator, HealthStatus};

use crate::store::UserStore;

/// Reports the user store as down when its lock cannot be read in time.
pub struct StoreHealth {
    store: UserStore,
    timeout: Duration,
}

impl StoreHealth {
    pub fn new(store: UserStore) -> Self {
        Self {
            store,
            timeout: Duration::from_secs(1),
        }
    }
}

impl HealthIndicator for StoreHealth {
    fn name(&self) -> &str {
        "user-store"
    }

    async fn check(&self) -> HealthStatus {
        match tokio::time::timeout(self.timeout, self.store.count()).await {
            Ok(_) => HealthStatus::Up,
            Err(_) => HealthStatus::Down("user store lock unavailable".into()),
        }
    }
}
