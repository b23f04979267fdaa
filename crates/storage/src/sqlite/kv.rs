use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn connection<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(super) struct Entry {
    pub(super) value: String,
    pub(super) updated_at: DateTime<Utc>,
}

fn map_entry(row: &SqliteRow) -> Result<Entry, StorageError> {
    Ok(Entry {
        value: row.try_get("value").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(super) async fn get(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<Entry>, StorageError> {
    let row = sqlx::query("SELECT value, updated_at FROM local_storage WHERE key = ?1")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(connection)?;
    row.as_ref().map(map_entry).transpose()
}

pub(super) async fn put(
    conn: &mut SqliteConnection,
    key: &str,
    value: &str,
    at: DateTime<Utc>,
) -> Result<(), StorageError> {
    sqlx::query(
        r"
        INSERT INTO local_storage (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        ",
    )
    .bind(key)
    .bind(value)
    .bind(at)
    .execute(&mut *conn)
    .await
    .map_err(connection)?;
    Ok(())
}

pub(super) async fn delete(conn: &mut SqliteConnection, key: &str) -> Result<(), StorageError> {
    sqlx::query("DELETE FROM local_storage WHERE key = ?1")
        .bind(key)
        .execute(&mut *conn)
        .await
        .map_err(connection)?;
    Ok(())
}
