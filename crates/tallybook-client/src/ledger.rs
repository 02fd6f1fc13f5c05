use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::store::{Store, TRANSACTIONS_KEY};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub txn_id: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub savings: bool,
}

/// Input for `tx add`, before an id has been assigned.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub notes: Option<String>,
    pub savings: bool,
}

pub fn validate_new_transaction(input: &NewTransaction) -> ClientResult<()> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(ClientError::invalid_argument_for_command(
            "Amount must be a number greater than zero.",
            Some("tx add"),
        ));
    }

    if input.category.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Category must not be empty.",
            Some("tx add"),
        ));
    }

    if !is_calendar_date(&input.date) {
        return Err(ClientError::invalid_argument_for_command(
            "Date must be a valid calendar date in YYYY-MM-DD format.",
            Some("tx add"),
        ));
    }

    if input.savings && input.kind != TransactionKind::Expense {
        return Err(ClientError::invalid_argument_for_command(
            "Only expense transactions can count toward the savings goal.",
            Some("tx add"),
        ));
    }

    Ok(())
}

pub fn build_transaction(input: NewTransaction) -> Transaction {
    Transaction {
        txn_id: format!("txn_{}", Ulid::new()),
        kind: input.kind,
        amount: round_to_cents(input.amount),
        category: input.category.trim().to_string(),
        date: input.date,
        notes: input
            .notes
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
        savings: input.savings,
    }
}

pub fn load_transactions(store: &Store) -> ClientResult<Vec<Transaction>> {
    Ok(store
        .get_json::<Vec<Transaction>>(TRANSACTIONS_KEY)?
        .unwrap_or_default())
}

pub fn is_calendar_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn is_month_key(value: &str) -> bool {
    if value.len() != 7 {
        return false;
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' {
        return false;
    }
    for index in [0usize, 1, 2, 3, 5, 6] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }

    let month = &value[5..7];
    ("01"..="12").contains(&month)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
