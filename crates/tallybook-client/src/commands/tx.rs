use std::path::Path;

use crate::aggregate::{month_of, monthly_summaries, totals};
use crate::commands::open_store;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{TxAddData, TxDeleteData, TxListData};
use crate::ledger::{
    NewTransaction, build_transaction, is_month_key, load_transactions, validate_new_transaction,
};
use crate::savings::{event_for, load_events};
use crate::store::{MONTHLY_SUMMARIES_KEY, SAVINGS_EVENTS_KEY, TRANSACTIONS_KEY, encode_json};
use crate::{ClientError, ClientResult};

pub fn add(input: NewTransaction) -> ClientResult<SuccessEnvelope> {
    add_with_home_override(input, None)
}

#[doc(hidden)]
pub fn add_with_home_override(
    input: NewTransaction,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    validate_new_transaction(&input)?;

    let mut store = open_store(home_override)?;
    let mut transactions = load_transactions(&store)?;
    let transaction = build_transaction(input);
    transactions.push(transaction.clone());

    let mut entries = vec![
        (TRANSACTIONS_KEY, encode_json(&transactions)?),
        (
            MONTHLY_SUMMARIES_KEY,
            encode_json(&monthly_summaries(&transactions))?,
        ),
    ];

    let mut savings_event = None;
    if transaction.savings {
        let mut events = load_events(&store)?;
        let event = event_for(&transaction);
        events.push(event.clone());
        entries.push((SAVINGS_EVENTS_KEY, encode_json(&events)?));
        savings_event = Some(event);
    }

    store.write_batch(&entries)?;

    success(
        "tx add",
        TxAddData {
            totals: totals(&transactions),
            transaction,
            savings_event,
        },
    )
}

pub fn list(month: Option<&str>) -> ClientResult<SuccessEnvelope> {
    list_with_home_override(month, None)
}

#[doc(hidden)]
pub fn list_with_home_override(
    month: Option<&str>,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    if let Some(value) = month
        && !is_month_key(value)
    {
        return Err(ClientError::invalid_argument_for_command(
            "Month filter must use YYYY-MM format.",
            Some("tx list"),
        ));
    }

    let store = open_store(home_override)?;
    let mut rows = load_transactions(&store)?;
    if let Some(value) = month {
        rows.retain(|transaction| month_of(&transaction.date) == value);
    }
    rows.sort_by(|left, right| {
        left.date
            .cmp(&right.date)
            .then_with(|| left.txn_id.cmp(&right.txn_id))
    });

    success(
        "tx list",
        TxListData {
            month: month.map(str::to_string),
            count: rows.len() as i64,
            totals: totals(&rows),
            rows,
        },
    )
}

pub fn remove(txn_id: &str) -> ClientResult<SuccessEnvelope> {
    remove_with_home_override(txn_id, None)
}

#[doc(hidden)]
pub fn remove_with_home_override(
    txn_id: &str,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let mut store = open_store(home_override)?;
    let mut transactions = load_transactions(&store)?;

    let Some(position) = transactions
        .iter()
        .position(|transaction| transaction.txn_id == txn_id)
    else {
        return Err(ClientError::transaction_not_found(txn_id));
    };
    let removed = transactions.remove(position);

    let mut entries = vec![
        (TRANSACTIONS_KEY, encode_json(&transactions)?),
        (
            MONTHLY_SUMMARIES_KEY,
            encode_json(&monthly_summaries(&transactions))?,
        ),
    ];

    if removed.savings {
        let mut events = load_events(&store)?;
        events.retain(|event| event.txn_id != removed.txn_id);
        entries.push((SAVINGS_EVENTS_KEY, encode_json(&events)?));
    }

    store.write_batch(&entries)?;

    success(
        "tx delete",
        TxDeleteData {
            removed,
            totals: totals(&transactions),
        },
    )
}
