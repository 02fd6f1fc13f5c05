use std::io;

use serde_json::Value;

use super::format::{Align, Column, format_amount, key_value_rows, render_table};

pub fn render_tx_add(data: &Value) -> io::Result<String> {
    let transaction = data
        .get("transaction")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("tx add output requires a transaction"))?;

    let mut entries = vec![
        ("Id:", field_str(transaction, "txn_id")),
        ("Kind:", field_str(transaction, "kind")),
        ("Amount:", format_amount(field_f64(transaction, "amount"))),
        ("Category:", field_str(transaction, "category")),
        ("Date:", field_str(transaction, "date")),
    ];
    if let Some(notes) = transaction.get("notes").and_then(Value::as_str) {
        entries.push(("Notes:", notes.to_string()));
    }
    if transaction
        .get("savings")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        entries.push(("Savings:", "counts toward the monthly goal".to_string()));
    }

    let mut lines = vec!["Transaction recorded.".to_string(), String::new()];
    lines.extend(key_value_rows(&entries, 2));
    lines.push(String::new());
    lines.push("Your ledger now:".to_string());
    lines.extend(totals_rows(data)?);

    Ok(lines.join("\n"))
}

pub fn render_tx_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("tx list output requires rows"))?;
    let month = data.get("month").and_then(Value::as_str);

    if rows.is_empty() {
        let mut lines = match month {
            Some(value) => vec![format!("No transactions recorded for {value}.")],
            None => vec!["No transactions recorded yet.".to_string()],
        };
        lines.push(String::new());
        lines.push("Record your first transaction:".to_string());
        lines.push("  tallybook tx add income 2500 Salary".to_string());
        lines.push("  tallybook tx add expense 42.15 Groceries".to_string());
        return Ok(lines.join("\n"));
    }

    let heading = match month {
        Some(value) => format!("Transactions for {value}:"),
        None => "Transactions:".to_string(),
    };

    let columns = [
        Column {
            name: "Kind",
            align: Align::Left,
        },
        Column {
            name: "Amount",
            align: Align::Right,
        },
        Column {
            name: "Category",
            align: Align::Left,
        },
        Column {
            name: "Date",
            align: Align::Left,
        },
        Column {
            name: "Notes",
            align: Align::Left,
        },
        Column {
            name: "Savings",
            align: Align::Left,
        },
        Column {
            name: "Id",
            align: Align::Left,
        },
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            let record = row.as_object();
            vec![
                record.map(|r| field_str(r, "kind")).unwrap_or_default(),
                record
                    .map(|r| format_amount(field_f64(r, "amount")))
                    .unwrap_or_default(),
                record.map(|r| field_str(r, "category")).unwrap_or_default(),
                record.map(|r| field_str(r, "date")).unwrap_or_default(),
                row.get("notes")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                if row.get("savings").and_then(Value::as_bool).unwrap_or(false) {
                    "yes".to_string()
                } else {
                    String::new()
                },
                record.map(|r| field_str(r, "txn_id")).unwrap_or_default(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let count = data.get("count").and_then(Value::as_i64).unwrap_or(0);

    let mut lines = vec![heading, String::new()];
    lines.extend(render_table(&columns, &table_rows));
    lines.push(String::new());
    lines.push(format!("{count} transaction(s)."));
    lines.extend(totals_rows(data)?);

    Ok(lines.join("\n"))
}

pub fn render_tx_delete(data: &Value) -> io::Result<String> {
    let removed = data
        .get("removed")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("tx delete output requires the removed transaction"))?;

    let entries = vec![
        ("Id:", field_str(removed, "txn_id")),
        ("Kind:", field_str(removed, "kind")),
        ("Amount:", format_amount(field_f64(removed, "amount"))),
        ("Category:", field_str(removed, "category")),
        ("Date:", field_str(removed, "date")),
    ];

    let mut lines = vec!["Transaction deleted.".to_string(), String::new()];
    lines.extend(key_value_rows(&entries, 2));
    lines.push(String::new());
    lines.push("Your ledger now:".to_string());
    lines.extend(totals_rows(data)?);

    Ok(lines.join("\n"))
}

fn totals_rows(data: &Value) -> io::Result<Vec<String>> {
    let totals = data
        .get("totals")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("transaction output requires totals"))?;

    Ok(key_value_rows(
        &[
            ("Income:", format_amount(field_f64(totals, "income"))),
            ("Expenses:", format_amount(field_f64(totals, "expenses"))),
            ("Balance:", format_amount(field_f64(totals, "balance"))),
        ],
        2,
    ))
}

fn field_str(record: &serde_json::Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn field_f64(record: &serde_json::Map<String, Value>, key: &str) -> f64 {
    record.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
