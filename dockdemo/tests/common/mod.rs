#![allow(dead_code)]

use dockdemo::config::{self, AppConfig, Overrides};
use dockdemo::state::AppState;
use dockdemo::store::UserStore;
use dockdemo_core::DemoConfig;
use dockdemo_test::TestApp;

pub fn test_config() -> AppConfig {
    config::resolve(DemoConfig::empty(), &Overrides::default()).expect("default settings are valid")
}

/// App over the seeded store (Alice = 1, Bob = 2).
pub fn seeded_app() -> TestApp {
    TestApp::from_builder(dockdemo::app(AppState::new(UserStore::seeded(), test_config())))
}

/// App over `store`, so a test can inspect it after the requests.
pub fn app_with(store: UserStore) -> TestApp {
    TestApp::from_builder(dockdemo::app(AppState::new(store, test_config())))
}
