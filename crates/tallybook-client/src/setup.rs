use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::migrations::run_pending;
use crate::state::{
    ensure_store_directory, map_sqlite_error, open_connection, resolve_store_home, store_db_path,
};
use crate::{ClientError, ClientResult};

const KV_TABLE: &str = "kv_entries";
const KV_COLUMNS: [&str; 2] = ["key", "value"];
const EXPECTED_USER_VERSION: i64 = 1;

pub const SCHEMA_VERSION_KEY: &str = "schema_version";
pub const SCHEMA_VERSION_VALUE: &str = "v1";

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub db_path: String,
    pub schema_version: String,
}

pub fn ensure_initialized() -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(None)
}

pub fn ensure_initialized_at(home_override: &Path) -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(Some(home_override))
}

fn ensure_initialized_with_home_override(
    home_override: Option<&Path>,
) -> ClientResult<SetupContext> {
    let store_home = resolve_store_home(home_override)?;
    ensure_store_directory(&store_home)?;

    let db_path = store_db_path(&store_home);
    let mut connection = open_connection(&db_path)?;

    run_pending(&mut connection).map_err(|error| map_migration_error(&db_path, &error))?;

    verify_kv_table(&connection, &db_path)?;
    restore_schema_version_entry(&connection, &db_path)?;
    let schema_version = verify_schema_version(&connection, &db_path)?;

    Ok(SetupContext {
        db_path: db_path.display().to_string(),
        schema_version,
    })
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    match error {
        rusqlite_migration::Error::RusqliteError { query: _, err } => {
            let mapped = map_sqlite_error(db_path, err);
            if mapped.code == "store_locked"
                || mapped.code == "store_corrupt"
                || mapped.code == "store_init_permission_denied"
            {
                mapped
            } else {
                ClientError::migration_failed(db_path, &error.to_string())
            }
        }
        _ => ClientError::migration_failed(db_path, &error.to_string()),
    }
}

fn verify_kv_table(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    let table_exists = connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
            [KV_TABLE],
            |_row| Ok(true),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?
        .unwrap_or(false);
    if !table_exists {
        return Err(ClientError::store_corrupt(db_path));
    }

    let mut statement = connection
        .prepare("PRAGMA table_info(kv_entries)")
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let column_iter = statement
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut columns: Vec<String> = Vec::new();
    for row in column_iter {
        columns.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }
    for required_column in KV_COLUMNS {
        if !columns.iter().any(|column| column == required_column) {
            return Err(ClientError::store_corrupt(db_path));
        }
    }

    let user_version = connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    if user_version != EXPECTED_USER_VERSION {
        return Err(ClientError::store_corrupt(db_path));
    }

    Ok(())
}

// Insert-only repair: a missing version entry is restored, a drifted value is
// rejected in verification.
fn restore_schema_version_entry(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    connection
        .execute(
            "INSERT OR IGNORE INTO kv_entries (key, value) VALUES (?1, ?2)",
            params![SCHEMA_VERSION_KEY, schema_version_entry()],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(())
}

fn verify_schema_version(connection: &Connection, db_path: &Path) -> ClientResult<String> {
    let value = connection
        .query_row(
            "SELECT value FROM kv_entries WHERE key = ?1 LIMIT 1",
            [SCHEMA_VERSION_KEY],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    match value {
        Some(stored) if stored == schema_version_entry() => Ok(SCHEMA_VERSION_VALUE.to_string()),
        _ => Err(ClientError::store_corrupt(db_path)),
    }
}

fn schema_version_entry() -> String {
    format!("\"{SCHEMA_VERSION_VALUE}\"")
}
