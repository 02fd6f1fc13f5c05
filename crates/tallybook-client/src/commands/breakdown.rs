use std::path::Path;

use crate::aggregate::{expense_breakdown, totals};
use crate::commands::open_store;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::BreakdownData;
use crate::ledger::load_transactions;
use crate::ClientResult;

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_home_override(None)
}

#[doc(hidden)]
pub fn run_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let store = open_store(home_override)?;
    let transactions = load_transactions(&store)?;

    success(
        "breakdown",
        BreakdownData {
            total_expenses: totals(&transactions).expenses,
            categories: expense_breakdown(&transactions),
        },
    )
}
