//! Queries for the entities table.

use pairank_core::errors::StorageError;
use pairank_core::types::EntityId;
use rusqlite::{params, Connection, OptionalExtension};

/// Insert an entity if its uid is new. Returns the entity's id either way.
pub fn insert_entity(conn: &Connection, uid: &str) -> Result<EntityId, StorageError> {
    conn.execute(
        "INSERT INTO entities (uid) VALUES (?1) ON CONFLICT(uid) DO NOTHING",
        params![uid],
    )
    .map_err(|e| StorageError::sqlite(e.to_string()))?;

    entity_id_by_uid(conn, uid)?.ok_or_else(|| StorageError::NotFound {
        what: format!("entity {uid}"),
    })
}

/// Look up an entity id by uid.
pub fn entity_id_by_uid(conn: &Connection, uid: &str) -> Result<Option<EntityId>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT id FROM entities WHERE uid = ?1")
        .map_err(|e| StorageError::sqlite(e.to_string()))?;

    stmt.query_row(params![uid], |row| row.get::<_, i64>(0))
        .optional()
        .map(|id| id.map(EntityId))
        .map_err(|e| StorageError::sqlite(e.to_string()))
}
