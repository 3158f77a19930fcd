#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod cache;
pub mod config;
pub mod db;
pub mod drift;
pub mod error;
pub mod health;
pub mod infra;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod test_support;

#[cfg(test)]
pub mod test_bootstrap;

/// Value of the `Server` response header on every endpoint.
pub const SERVER_NAME: &str = "driftbench";

// Re-exports for public API
pub use cache::store::CacheStore;
pub use cache::world as world_cache;
pub use db::executor::{DbHandle, Param, Row, Value};
pub use drift::{drift, Dispatched};
pub use error::AppError;
pub use infra::state::build_state;
pub use middleware::server_header::ServerHeader;
pub use models::{random_id, Fortune, World};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
