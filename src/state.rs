use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::graphql::{build_schema, FeedSchema};
use crate::revalidate::{DynRevalidate, RevalidationBus};
use crate::threads::{DynThreadRepository, SqliteThreadRepository};
use crate::users::{DynUserRepository, SqliteUserRepository};

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: DynUserRepository,
    pub threads: DynThreadRepository,
    pub revalidator: DynRevalidate,
    pub bus: RevalidationBus,
    pub graphql_schema: FeedSchema,
}

impl AppState {
    /// Wire the SQLite repositories over `db` and a fresh revalidation bus.
    pub fn new(db: DbPool, config: Config) -> Self {
        let bus = RevalidationBus::default();
        Self {
            users: Arc::new(SqliteUserRepository::new(db.clone())),
            threads: Arc::new(SqliteThreadRepository::new(db)),
            revalidator: Arc::new(bus.clone()),
            bus,
            graphql_schema: build_schema(),
            config,
        }
    }
}
