use std::io;

use serde_json::Value;

use super::format::{Align, Column, format_amount, key_value_rows, render_table};

pub fn render_summary(data: &Value) -> io::Result<String> {
    let income = number(data, "income");
    let expenses = number(data, "expenses");
    let balance = number(data, "balance");
    let count = data
        .get("transaction_count")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let mut lines = vec!["Ledger summary:".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Income:", format_amount(income)),
            ("Expenses:", format_amount(expenses)),
            ("Balance:", format_amount(balance)),
            ("Transactions:", count.to_string()),
        ],
        2,
    ));

    if count == 0 {
        lines.push(String::new());
        lines.push("Record your first transaction:".to_string());
        lines.push("  tallybook tx add income 2500 Salary".to_string());
        lines.push("  tallybook tx add expense 42.15 Groceries".to_string());
    }

    Ok(lines.join("\n"))
}

pub fn render_breakdown(data: &Value) -> io::Result<String> {
    let categories = data
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("breakdown output requires categories"))?;

    if categories.is_empty() {
        return Ok([
            "No expenses recorded yet.".to_string(),
            String::new(),
            "Record one first:".to_string(),
            "  tallybook tx add expense 42.15 Groceries".to_string(),
        ]
        .join("\n"));
    }

    let columns = [
        Column {
            name: "Category",
            align: Align::Left,
        },
        Column {
            name: "Total",
            align: Align::Right,
        },
        Column {
            name: "Share",
            align: Align::Right,
        },
    ];
    let rows = categories
        .iter()
        .map(|slice| {
            vec![
                slice
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                format_amount(number(slice, "total")),
                format!("{:.1}%", number(slice, "percent")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Expenses by category:".to_string(), String::new()];
    lines.extend(render_table(&columns, &rows));
    lines.push(String::new());
    lines.push(format!(
        "Total expenses: {}",
        format_amount(number(data, "total_expenses"))
    ));

    Ok(lines.join("\n"))
}

pub fn render_history(data: &Value) -> io::Result<String> {
    let months = data
        .get("months")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("history output requires months"))?;

    if months.is_empty() {
        return Ok([
            "No monthly history yet.".to_string(),
            String::new(),
            "Record a transaction first:".to_string(),
            "  tallybook tx add income 2500 Salary".to_string(),
        ]
        .join("\n"));
    }

    let columns = [
        Column {
            name: "Month",
            align: Align::Left,
        },
        Column {
            name: "Income",
            align: Align::Right,
        },
        Column {
            name: "Expenses",
            align: Align::Right,
        },
        Column {
            name: "Balance",
            align: Align::Right,
        },
        Column {
            name: "Savings",
            align: Align::Right,
        },
    ];
    let rows = months
        .iter()
        .map(|row| {
            vec![
                row.get("month")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                format_amount(number(row, "income")),
                format_amount(number(row, "expenses")),
                format_amount(number(row, "balance")),
                format_amount(number(row, "savings")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Monthly history:".to_string(), String::new()];
    lines.extend(render_table(&columns, &rows));

    Ok(lines.join("\n"))
}

fn number(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
