use std::collections::BTreeMap;
use std::path::Path;

use crate::aggregate::{MonthlySummary, monthly_summaries};
use crate::commands::open_store;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{HistoryData, MonthRow};
use crate::ledger::load_transactions;
use crate::store::MONTHLY_SUMMARIES_KEY;
use crate::ClientResult;

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_home_override(None)
}

#[doc(hidden)]
pub fn run_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let store = open_store(home_override)?;

    // Mutations keep this key in sync with the ledger; it is only absent in a
    // store that has never seen a transaction write.
    let summaries = match store.get_json::<BTreeMap<String, MonthlySummary>>(MONTHLY_SUMMARIES_KEY)?
    {
        Some(stored) => stored,
        None => monthly_summaries(&load_transactions(&store)?),
    };

    let months = summaries
        .into_iter()
        .map(|(month, summary)| MonthRow {
            month,
            income: summary.income,
            expenses: summary.expenses,
            balance: summary.balance,
            savings: summary.savings,
        })
        .collect();

    success("history", HistoryData { months })
}
