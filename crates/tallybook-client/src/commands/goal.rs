use std::path::Path;

use crate::aggregate::{round_cents, savings_progress};
use crate::commands::open_store;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::GoalData;
use crate::ledger::is_month_key;
use crate::savings::{SavingsGoal, load_events, load_goal};
use crate::store::{SAVINGS_GOAL_KEY, encode_json};
use crate::{ClientError, ClientResult};

pub fn set(amount: f64) -> ClientResult<SuccessEnvelope> {
    set_with_home_override(amount, None)
}

#[doc(hidden)]
pub fn set_with_home_override(
    amount: f64,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ClientError::invalid_argument_for_command(
            "Goal amount must be a number greater than zero.",
            Some("goal set"),
        ));
    }

    let mut store = open_store(home_override)?;
    let goal = SavingsGoal {
        amount: round_cents(amount),
    };
    store.set(SAVINGS_GOAL_KEY, &encode_json(&goal)?)?;

    success(
        "goal set",
        GoalData {
            amount: goal.amount,
        },
    )
}

pub fn progress(month: &str) -> ClientResult<SuccessEnvelope> {
    progress_with_home_override(month, None)
}

#[doc(hidden)]
pub fn progress_with_home_override(
    month: &str,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    if !is_month_key(month) {
        return Err(ClientError::invalid_argument_for_command(
            "Month must use YYYY-MM format.",
            Some("goal progress"),
        ));
    }

    let store = open_store(home_override)?;
    let goal = load_goal(&store)?.ok_or_else(ClientError::goal_not_set)?;
    let events = load_events(&store)?;

    success("goal progress", savings_progress(goal.amount, &events, month))
}
