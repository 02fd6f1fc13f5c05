use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `tallybook {cmd} --help` for usage."),
            None => "Run `tallybook --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn transaction_not_found(txn_id: &str) -> Self {
        Self::new(
            "transaction_not_found",
            &format!("Transaction id `{txn_id}` was not found."),
            vec![
                "Run `tallybook tx list` to find a valid transaction id.".to_string(),
                "Retry with `tallybook tx delete <txn-id>`.".to_string(),
            ],
        )
        .with_data(json!({
            "txn_id": txn_id,
        }))
    }

    pub fn goal_not_set() -> Self {
        Self::new(
            "goal_not_set",
            "No savings goal has been set yet.",
            vec![
                "Run `tallybook goal set <amount>` to set a monthly target.".to_string(),
                "Then rerun `tallybook goal progress`.".to_string(),
            ],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize the tracker store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `TALLYBOOK_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Tracker store is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Tracker store appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid tracker store file or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        Self::new(
            "migration_failed",
            &format!(
                "Tracker store migration failed at `{}`: {detail}",
                path.display()
            ),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        Self::new(
            "store_init_failed",
            &format!(
                "Tracker store initialization failed at `{}`: {detail}",
                path.display()
            ),
            Vec::new(),
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
