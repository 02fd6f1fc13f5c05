use std::io;

use serde_json::Value;

use super::format::{format_amount, key_value_rows};

pub fn render_goal_set(data: &Value) -> io::Result<String> {
    let amount = data
        .get("amount")
        .and_then(Value::as_f64)
        .ok_or_else(|| io::Error::other("goal set output requires an amount"))?;

    Ok([
        "Savings goal updated.".to_string(),
        String::new(),
        format!("  Monthly target:  {}", format_amount(amount)),
        String::new(),
        "Track it with `tallybook goal progress`.".to_string(),
    ]
    .join("\n"))
}

pub fn render_goal_progress(data: &Value) -> io::Result<String> {
    let month = data
        .get("month")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("goal progress output requires a month"))?;
    let goal = number(data, "goal");
    let saved = number(data, "saved");
    let remaining = number(data, "remaining");
    let percent = number(data, "percent");
    let achieved = data
        .get("achieved")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = vec![format!("Savings progress for {month}:"), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Goal:", format_amount(goal)),
            ("Saved:", format_amount(saved)),
            ("Remaining:", format_amount(remaining)),
            ("Progress:", format!("{percent:.1}%")),
        ],
        2,
    ));
    lines.push(String::new());
    if achieved {
        lines.push("Goal achieved for this month.".to_string());
    } else {
        lines.push(format!(
            "Save {} more to reach this month's goal.",
            format_amount(remaining)
        ));
    }

    Ok(lines.join("\n"))
}

fn number(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
