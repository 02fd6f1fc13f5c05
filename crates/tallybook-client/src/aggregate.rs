use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{Transaction, TransactionKind};
use crate::savings::SavingsEvent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub total: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProgress {
    pub month: String,
    pub goal: f64,
    pub saved: f64,
    pub remaining: f64,
    pub percent: f64,
    pub achieved: bool,
}

/// The "YYYY-MM" prefix of a "YYYY-MM-DD" date.
pub fn month_of(date: &str) -> &str {
    date.get(..7).unwrap_or(date)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut income = 0.0;
    let mut expenses = 0.0;
    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => income += transaction.amount,
            TransactionKind::Expense => expenses += transaction.amount,
        }
    }

    Totals {
        income: round_cents(income),
        expenses: round_cents(expenses),
        balance: round_cents(income - expenses),
    }
}

/// Expense totals grouped by category, largest share first. Income rows do
/// not participate.
pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategorySlice> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for transaction in transactions {
        if transaction.kind == TransactionKind::Expense {
            *by_category.entry(transaction.category.as_str()).or_insert(0.0) +=
                transaction.amount;
        }
    }

    let total_expenses: f64 = by_category.values().sum();
    if total_expenses <= 0.0 {
        return Vec::new();
    }

    let mut slices: Vec<CategorySlice> = by_category
        .into_iter()
        .map(|(category, total)| CategorySlice {
            category: category.to_string(),
            total: round_cents(total),
            percent: round_cents(total / total_expenses * 100.0),
        })
        .collect();

    slices.sort_by(|left, right| {
        right
            .total
            .total_cmp(&left.total)
            .then_with(|| left.category.cmp(&right.category))
    });
    slices
}

pub fn monthly_summaries(transactions: &[Transaction]) -> BTreeMap<String, MonthlySummary> {
    let mut raw: BTreeMap<String, (f64, f64, f64)> = BTreeMap::new();
    for transaction in transactions {
        let entry = raw
            .entry(month_of(&transaction.date).to_string())
            .or_insert((0.0, 0.0, 0.0));
        match transaction.kind {
            TransactionKind::Income => entry.0 += transaction.amount,
            TransactionKind::Expense => entry.1 += transaction.amount,
        }
        if transaction.savings {
            entry.2 += transaction.amount;
        }
    }

    raw.into_iter()
        .map(|(month, (income, expenses, savings))| {
            (
                month,
                MonthlySummary {
                    income: round_cents(income),
                    expenses: round_cents(expenses),
                    balance: round_cents(income - expenses),
                    savings: round_cents(savings),
                },
            )
        })
        .collect()
}

pub fn savings_progress(goal: f64, events: &[SavingsEvent], month: &str) -> SavingsProgress {
    let saved = round_cents(
        events
            .iter()
            .filter(|event| event.month == month)
            .map(|event| event.amount)
            .sum(),
    );
    let goal = round_cents(goal);

    SavingsProgress {
        month: month.to_string(),
        goal,
        saved,
        remaining: round_cents((goal - saved).max(0.0)),
        percent: if goal > 0.0 {
            round_cents(saved / goal * 100.0)
        } else {
            0.0
        },
        achieved: saved >= goal,
    }
}
