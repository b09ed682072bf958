pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wires the SQLite-backed repository and service onto `pool`.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        let user_repository = Arc::new(repositories::SqliteUserRepository::new(pool.clone()));
        let user_service = Arc::new(services::user_service::UserService::new(user_repository));
        Self { user_service, pool }
    }
}
