use std::io;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tallybook_client::{ClientError, SuccessEnvelope};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        // Mutations answer with the structured envelope; reads answer with
        // the bare data object.
        "tx add" | "tx delete" | "goal set" => json!({
            "ok": true,
            "version": JSON_VERSION,
            "data": success.data.clone()
        }),
        "tx list" | "summary" | "breakdown" | "history" | "goal progress" => success.data.clone(),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let mut body = Map::new();
    body.insert("code".to_string(), Value::String(error.code.clone()));
    body.insert("message".to_string(), Value::String(error.message.clone()));
    body.insert(
        "recovery_steps".to_string(),
        Value::Array(
            error
                .recovery_steps
                .iter()
                .map(|step| Value::String(step.clone()))
                .collect(),
        ),
    );
    if let Some(data) = &error.data {
        body.insert("data".to_string(), data.clone());
    }

    serialize_json_pretty(&json!({ "error": Value::Object(body) }))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
