use serde::Serialize;

use crate::aggregate::{CategorySlice, Totals};
use crate::ledger::Transaction;
use crate::savings::SavingsEvent;

#[derive(Debug, Clone, Serialize)]
pub struct TxAddData {
    pub transaction: Transaction,
    pub totals: Totals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_event: Option<SavingsEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TxListData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub count: i64,
    pub totals: Totals,
    pub rows: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TxDeleteData {
    pub removed: Transaction,
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownData {
    pub total_expenses: f64,
    pub categories: Vec<CategorySlice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthRow {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryData {
    pub months: Vec<MonthRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalData {
    pub amount: f64,
}
