use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthKey(pub String);

impl MonthKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_month(value: &str) -> Result<MonthKey, String> {
    if value.len() != 7 {
        return Err("month must use YYYY-MM format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' {
        return Err("month must use YYYY-MM format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6] {
        if !bytes[index].is_ascii_digit() {
            return Err("month must use YYYY-MM format".to_string());
        }
    }

    let month = &value[5..7];
    if !("01"..="12").contains(&month) {
        return Err("month must be between 01 and 12".to_string());
    }

    Ok(MonthKey(value.to_string()))
}

pub fn parse_amount(value: &str) -> Result<f64, String> {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };

    if whole.is_empty() || !whole.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err("amount must be a plain decimal number (e.g. 42.15)".to_string());
    }

    if let Some(fraction) = fraction
        && (fraction.is_empty()
            || fraction.len() > 2
            || !fraction.bytes().all(|byte| byte.is_ascii_digit()))
    {
        return Err("amount must use at most 2 decimal places".to_string());
    }

    let parsed = value
        .parse::<f64>()
        .map_err(|_| "amount must be a number".to_string())?;
    if parsed <= 0.0 {
        return Err("amount must be greater than zero".to_string());
    }

    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

#[derive(Debug, Parser)]
#[command(
    name = "tallybook",
    version,
    about = "local personal finance tracker",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record and manage ledger transactions
    #[command(arg_required_else_help = true)]
    Tx {
        #[command(subcommand)]
        command: TxCommand,
    },
    /// Show total income, expenses, and balance
    Summary {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show expense totals grouped by category
    Breakdown {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show income, expenses, balance, and savings for every recorded month
    History {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Manage the monthly savings goal
    #[command(arg_required_else_help = true)]
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TxCommand {
    /// Record a new income or expense transaction
    Add {
        /// Transaction kind
        #[arg(value_enum)]
        kind: KindArg,
        /// Amount in whole currency units (e.g. 42.15)
        #[arg(value_parser = parse_amount)]
        amount: f64,
        /// Category label (e.g. Groceries)
        category: String,
        /// Transaction date (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<IsoDate>,
        /// Optional free-form note
        #[arg(long)]
        notes: Option<String>,
        /// Count this expense toward the monthly savings goal
        #[arg(long)]
        savings: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List recorded transactions
    List {
        /// Only show transactions from one month (YYYY-MM)
        #[arg(long, value_parser = parse_month)]
        month: Option<MonthKey>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Delete a transaction by id
    Delete {
        /// The transaction id to delete (e.g. txn_abc123)
        txn_id: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GoalCommand {
    /// Set the monthly savings goal amount
    Set {
        /// Target amount for voluntary monthly savings contributions
        #[arg(value_parser = parse_amount)]
        amount: f64,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show progress toward the goal for one month
    Progress {
        /// Month to report on (YYYY-MM); defaults to the current month
        #[arg(long, value_parser = parse_month)]
        month: Option<MonthKey>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
