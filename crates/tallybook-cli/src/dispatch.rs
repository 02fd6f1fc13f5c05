use tallybook_client::commands;
use tallybook_client::ledger::{NewTransaction, TransactionKind};
use tallybook_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, GoalCommand, KindArg, TxCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Tx { command } => match command {
            TxCommand::Add {
                kind,
                amount,
                category,
                date,
                notes,
                savings,
                json: _,
            } => {
                let input = NewTransaction {
                    kind: kind_to_client(*kind),
                    amount: *amount,
                    category: category.clone(),
                    date: date
                        .as_ref()
                        .map(|value| value.as_str().to_string())
                        .unwrap_or_else(today_iso),
                    notes: notes.clone(),
                    savings: *savings,
                };
                commands::tx::add(input)
            }
            TxCommand::List { month, .. } => {
                commands::tx::list(month.as_ref().map(|value| value.as_str()))
            }
            TxCommand::Delete { txn_id, .. } => commands::tx::remove(txn_id),
        },
        Commands::Summary { .. } => commands::summary::run(),
        Commands::Breakdown { .. } => commands::breakdown::run(),
        Commands::History { .. } => commands::history::run(),
        Commands::Goal { command } => match command {
            GoalCommand::Set { amount, .. } => commands::goal::set(*amount),
            GoalCommand::Progress { month, .. } => {
                let month_value = month
                    .as_ref()
                    .map(|value| value.as_str().to_string())
                    .unwrap_or_else(current_month);
                commands::goal::progress(&month_value)
            }
        },
    }
}

fn kind_to_client(kind: KindArg) -> TransactionKind {
    match kind {
        KindArg::Income => TransactionKind::Income,
        KindArg::Expense => TransactionKind::Expense,
    }
}

fn today_iso() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn current_month() -> String {
    chrono::Local::now().date_naive().format("%Y-%m").to_string()
}
