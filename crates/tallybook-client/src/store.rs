use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const SAVINGS_GOAL_KEY: &str = "savings_goal";
pub const SAVINGS_EVENTS_KEY: &str = "savings_events";
pub const MONTHLY_SUMMARIES_KEY: &str = "monthly_summaries";

/// Key-value persistence over the tracker store. Values are JSON strings,
/// one fixed key per record collection.
pub struct Store {
    connection: Connection,
    db_path: PathBuf,
}

impl Store {
    pub fn open(db_path: &Path) -> ClientResult<Self> {
        let connection = open_connection(db_path)?;
        Ok(Self {
            connection,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn get(&self, key: &str) -> ClientResult<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1 LIMIT 1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(&self.db_path, &error))
    }

    pub fn set(&mut self, key: &str, value: &str) -> ClientResult<()> {
        self.connection
            .execute(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> ClientResult<()> {
        self.connection
            .execute("DELETE FROM kv_entries WHERE key = ?1", [key])
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        Ok(())
    }

    /// Writes every entry of one mutation in a single immediate transaction,
    /// so the ledger and its derived aggregates never diverge on disk.
    pub fn write_batch(&mut self, entries: &[(&str, String)]) -> ClientResult<()> {
        let transaction = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        for (key, value) in entries {
            transaction
                .execute(
                    "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                )
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        }

        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&self.db_path, &error))
    }

    /// Reads and decodes one stored collection. A missing key is `None`;
    /// a value that no longer parses marks the store corrupt.
    pub fn get_json<T>(&self, key: &str) -> ClientResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|_| ClientError::store_corrupt(&self.db_path))
    }
}

pub fn encode_json<T>(value: &T) -> ClientResult<String>
where
    T: Serialize,
{
    serde_json::to_string(value).map_err(|err| ClientError::internal_serialization(&err.to_string()))
}
