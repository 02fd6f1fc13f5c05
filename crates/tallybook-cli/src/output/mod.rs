mod error_text;
mod format;
mod goal_text;
mod json;
mod mode;
mod summary_text;
mod tx_text;

use std::io;

use tallybook_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_text;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_text(&format!("{body}\n"))
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_text(&format!("{body}\n"))
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "tx add" => tx_text::render_tx_add(&success.data),
        "tx list" => tx_text::render_tx_list(&success.data),
        "tx delete" => tx_text::render_tx_delete(&success.data),
        "summary" => summary_text::render_summary(&success.data),
        "breakdown" => summary_text::render_breakdown(&success.data),
        "history" => summary_text::render_history(&success.data),
        "goal set" => goal_text::render_goal_set(&success.data),
        "goal progress" => goal_text::render_goal_progress(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
