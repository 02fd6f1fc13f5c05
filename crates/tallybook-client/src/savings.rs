use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::aggregate::month_of;
use crate::ledger::Transaction;
use crate::store::{SAVINGS_EVENTS_KEY, SAVINGS_GOAL_KEY, Store};
use crate::ClientResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub amount: f64,
}

/// One persisted contribution record per savings-flagged transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEvent {
    pub event_id: String,
    pub txn_id: String,
    pub month: String,
    pub amount: f64,
}

pub fn event_for(transaction: &Transaction) -> SavingsEvent {
    SavingsEvent {
        event_id: format!("sav_{}", Ulid::new()),
        txn_id: transaction.txn_id.clone(),
        month: month_of(&transaction.date).to_string(),
        amount: transaction.amount,
    }
}

pub fn load_goal(store: &Store) -> ClientResult<Option<SavingsGoal>> {
    store.get_json::<SavingsGoal>(SAVINGS_GOAL_KEY)
}

pub fn load_events(store: &Store) -> ClientResult<Vec<SavingsEvent>> {
    Ok(store
        .get_json::<Vec<SavingsEvent>>(SAVINGS_EVENTS_KEY)?
        .unwrap_or_default())
}
