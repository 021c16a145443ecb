//! # pairank-storage
//!
//! SQLite persistence layer for the pairank engine: connection management,
//! pragmas, migrations, per-table queries, and the poll-scoped store that
//! implements the engine's storage ports.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
pub use store::{SqliteScoreStore, SqliteStoreFactory};
