use std::path::Path;

use crate::aggregate::totals;
use crate::commands::open_store;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SummaryData;
use crate::ledger::load_transactions;
use crate::ClientResult;

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_home_override(None)
}

#[doc(hidden)]
pub fn run_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let store = open_store(home_override)?;
    let transactions = load_transactions(&store)?;
    let computed = totals(&transactions);

    success(
        "summary",
        SummaryData {
            income: computed.income,
            expenses: computed.expenses,
            balance: computed.balance,
            transaction_count: transactions.len() as i64,
        },
    )
}
