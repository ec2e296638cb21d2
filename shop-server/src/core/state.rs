//! Server State
//!
//! Shared application state handed to every handler.

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;

/// 服务器共享状态
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
}

impl ServerState {
    /// Initialize state from config: open the database and run migrations.
    ///
    /// Panics if the database cannot be opened — the server is useless
    /// without it and starting anyway would only defer the failure.
    pub async fn initialize(config: &Config) -> Self {
        let db = DbService::new(&config.database_path)
            .await
            .unwrap_or_else(|e| panic!("Failed to initialize database: {e}"));
        Self {
            config: config.clone(),
            db,
        }
    }

    /// State over an in-memory database (tests)
    pub async fn for_tests() -> Self {
        let db = DbService::new_in_memory()
            .await
            .unwrap_or_else(|e| panic!("Failed to initialize in-memory database: {e}"));
        Self {
            config: Config::with_overrides("/tmp/shop-test", 0),
            db,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
