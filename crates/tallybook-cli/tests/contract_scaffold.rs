use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const EXPECTED_TOP_LEVEL_HELP: &str = "Tallybook — local personal finance tracker

USAGE: tallybook <command>

Record transactions:
  tallybook tx add income 2500 Salary                 Record money in
  tallybook tx add expense 42.15 Groceries            Record money out
  tallybook tx add expense 150 Savings --savings      Count an expense toward the savings goal
  tallybook tx list                                   List recorded transactions
  tallybook tx delete <txn-id>                        Delete a transaction

See where the money goes:
  tallybook summary                                   Total income, expenses, and balance
  tallybook breakdown                                 Expense totals by category
  tallybook history                                   Month-by-month income, expenses, and savings

Track a monthly savings goal:
  tallybook goal set 500                              Set the monthly target
  tallybook goal progress                             Progress for the current month

All data stays on this machine (default: ~/.tallybook).
Add --json to any data command for machine-readable output,
or run `tallybook <command> --help` for command usage.
";

const EXPECTED_ROOT_HELP: &str = "Tallybook - local personal finance tracker

Usage:
  tallybook <command>

Start here:
  tallybook tx add expense 42.15 Groceries
  tallybook summary
  tallybook history
";

static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

fn unique_test_home() -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(value) => value.as_nanos(),
        Err(_) => 0,
    };
    let sequence = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "tallybook-cli-test-{}-{stamp}-{sequence}",
        std::process::id()
    ));
    path
}

fn run_cli_in_home(home: &std::path::Path, args: &[&str]) -> (bool, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tallybook"));
    for arg in args {
        command.arg(arg);
    }
    command.env("TALLYBOOK_HOME", home);
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let output = command.output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        let stdout = String::from_utf8(result.stdout);
        assert!(stdout.is_ok());
        if let Ok(stdout_text) = stdout {
            return (result.status.success(), stdout_text);
        }
    }

    (false, String::new())
}

fn run_cli(args: &[&str]) -> (bool, String, std::path::PathBuf) {
    let home = unique_test_home();
    let (ok, body) = run_cli_in_home(&home, args);
    (ok, body, home)
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok());
    if let Ok(value) = parsed {
        return value;
    }
    Value::Null
}

fn added_txn_id(home: &std::path::Path, args: &[&str]) -> String {
    let mut full_args = vec!["tx", "add"];
    full_args.extend_from_slice(args);
    full_args.push("--json");

    let (ok, body) = run_cli_in_home(home, &full_args);
    assert!(ok);
    let payload = parse_json(&body);
    payload["data"]["transaction"]["txn_id"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

fn assert_pipe_close_does_not_panic(args: &[&str], expect_success: bool) {
    let home = unique_test_home();
    let mut producer = Command::new(env!("CARGO_BIN_EXE_tallybook"));
    producer.args(args);
    producer.env("TALLYBOOK_HOME", &home);
    producer.stdout(Stdio::piped());
    producer.stderr(Stdio::piped());

    let producer_spawn = producer.spawn();
    assert!(producer_spawn.is_ok());
    if let Ok(mut producer_child) = producer_spawn {
        let producer_stdout = producer_child.stdout.take();
        let producer_stderr = producer_child.stderr.take();
        assert!(producer_stdout.is_some());
        assert!(producer_stderr.is_some());

        if let Some(stdout_pipe) = producer_stdout {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            let read_result = reader.read_line(&mut first_line);
            assert!(read_result.is_ok());
            assert!(!first_line.is_empty());
            drop(reader);
        }

        let status = producer_child.wait();
        assert!(status.is_ok());
        if let Ok(exit_status) = status {
            assert_eq!(exit_status.success(), expect_success);
        }

        if let Some(mut stderr_pipe) = producer_stderr {
            let mut stderr_bytes = Vec::new();
            let stderr_read = stderr_pipe.read_to_end(&mut stderr_bytes);
            assert!(stderr_read.is_ok());
            let stderr = String::from_utf8(stderr_bytes);
            assert!(stderr.is_ok());
            if let Ok(stderr_text) = stderr {
                assert!(!stderr_text.contains("Broken pipe"));
                assert!(!stderr_text.contains("failed printing to stdout"));
            }
        }
    }
}

fn assert_text_error_contract(body: &str, code: &str) {
    assert!(body.contains("Something went wrong, but it's easy to fix."));
    assert!(body.contains(&format!("  Error:    {code}")));
    assert!(body.contains("  Details:"));
    assert!(body.contains("What to do next:"));
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

#[test]
fn root_command_uses_short_plaintext_help() {
    let (ok, body, _) = run_cli(&[]);
    assert!(ok);
    assert_eq!(body, EXPECTED_ROOT_HELP);
}

#[test]
fn help_and_version_return_success_output() {
    let (help_ok, help_body, _) = run_cli(&["--help"]);
    assert!(help_ok);
    assert_eq!(help_body, EXPECTED_TOP_LEVEL_HELP);

    let (version_ok, version_body, _) = run_cli(&["--version"]);
    assert!(version_ok);
    assert_eq!(version_body.trim(), "tallybook 0.1.0");
}

#[test]
fn help_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["--help"], true);
}

#[test]
fn success_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["summary"], true);
}

#[test]
fn error_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["tx", "add", "--nope"], false);
}

#[test]
fn tx_help_shows_subcommand_descriptions() {
    let (ok, body, _) = run_cli(&["tx", "--help"]);
    assert!(ok);
    assert!(body.contains("add"));
    assert!(body.contains("list"));
    assert!(body.contains("delete"));
    assert!(body.contains("Record a new income or expense transaction"));
    assert!(body.contains("List recorded transactions"));
    assert!(body.contains("Delete a transaction by id"));
}

#[test]
fn bare_tx_and_goal_show_help_with_subcommands() {
    let (tx_ok, tx_body, _) = run_cli(&["tx"]);
    assert!(tx_ok);
    assert!(tx_body.contains("add"));
    assert!(tx_body.contains("list"));
    assert!(tx_body.contains("delete"));

    let (goal_ok, goal_body, _) = run_cli(&["goal"]);
    assert!(goal_ok);
    assert!(goal_body.contains("set"));
    assert!(goal_body.contains("progress"));
}

#[test]
fn tx_add_plaintext_shows_record_and_running_totals() {
    let home = unique_test_home();
    let (ok, body) = run_cli_in_home(
        &home,
        &[
            "tx",
            "add",
            "expense",
            "42.15",
            "Groceries",
            "--date",
            "2026-01-15",
        ],
    );
    assert!(ok);
    assert!(body.starts_with("Transaction recorded."));
    assert!(body.contains("Id:"));
    assert!(body.contains("txn_"));
    assert!(body.contains("Kind:"));
    assert!(body.contains("expense"));
    assert!(body.contains("Amount:"));
    assert!(body.contains("42.15"));
    assert!(body.contains("Your ledger now:"));
    assert!(body.contains("Balance:"));
    assert!(body.contains("-42.15"));
}

#[test]
fn tx_add_json_uses_structured_envelope() {
    let home = unique_test_home();
    let (ok, body) = run_cli_in_home(
        &home,
        &[
            "tx",
            "add",
            "income",
            "2500",
            "Salary",
            "--date",
            "2026-01-01",
            "--json",
        ],
    );
    assert!(ok);
    let payload = parse_json(&body);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["version"], Value::String("v1".to_string()));
    assert!(payload["data"]["transaction"]["txn_id"].is_string());
    assert_eq!(
        payload["data"]["transaction"]["kind"],
        Value::String("income".to_string())
    );
    assert_eq!(payload["data"]["totals"]["income"], Value::from(2500.0));
    assert!(payload["data"].get("savings_event").is_none());
    assert!(payload.get("command").is_none());
}

#[test]
fn tx_add_with_savings_flag_records_a_savings_event() {
    let home = unique_test_home();
    let (ok, body) = run_cli_in_home(
        &home,
        &[
            "tx",
            "add",
            "expense",
            "150",
            "Savings",
            "--savings",
            "--date",
            "2026-01-20",
            "--json",
        ],
    );
    assert!(ok);
    let payload = parse_json(&body);
    assert!(payload["data"]["savings_event"]["event_id"].is_string());
    assert_eq!(
        payload["data"]["savings_event"]["month"],
        Value::String("2026-01".to_string())
    );
    assert_eq!(
        payload["data"]["savings_event"]["amount"],
        Value::from(150.0)
    );
}

#[test]
fn empty_tx_list_suggests_first_transaction() {
    let (ok, body, _) = run_cli(&["tx", "list"]);
    assert!(ok);
    assert!(body.starts_with("No transactions recorded yet."));
    assert!(body.contains("tallybook tx add"));
}

#[test]
fn tx_list_plaintext_and_json_contracts_are_supported() {
    let home = unique_test_home();
    added_txn_id(&home, &["income", "2500", "Salary", "--date", "2026-01-01"]);
    added_txn_id(
        &home,
        &["expense", "42.15", "Groceries", "--date", "2026-01-03"],
    );

    let (text_ok, text_body) = run_cli_in_home(&home, &["tx", "list"]);
    assert!(text_ok);
    assert!(text_body.starts_with("Transactions:"));
    assert!(text_body.contains("Kind"));
    assert!(text_body.contains("Groceries"));
    assert!(text_body.contains("2 transaction(s)."));

    let (json_ok, json_body) = run_cli_in_home(&home, &["tx", "list", "--json"]);
    assert!(json_ok);
    let payload = parse_json(&json_body);
    assert_eq!(payload["count"], Value::from(2));
    assert!(payload["rows"].is_array());
    assert!(payload["totals"].is_object());
    assert!(payload.get("ok").is_none());
    assert!(payload.get("version").is_none());
}

#[test]
fn tx_list_month_filter_limits_rows() {
    let home = unique_test_home();
    added_txn_id(&home, &["income", "2500", "Salary", "--date", "2026-01-01"]);
    added_txn_id(
        &home,
        &["expense", "20", "Transport", "--date", "2026-02-10"],
    );

    let (ok, body) = run_cli_in_home(&home, &["tx", "list", "--month", "2026-01", "--json"]);
    assert!(ok);
    let payload = parse_json(&body);
    assert_eq!(payload["month"], Value::String("2026-01".to_string()));
    assert_eq!(payload["count"], Value::from(1));
    assert_eq!(payload["totals"]["income"], Value::from(2500.0));
}

#[test]
fn tx_delete_plaintext_and_json_contracts_are_supported() {
    let home = unique_test_home();
    let first = added_txn_id(
        &home,
        &["expense", "42.15", "Groceries", "--date", "2026-01-03"],
    );
    let second = added_txn_id(&home, &["expense", "7.85", "Coffee", "--date", "2026-01-04"]);
    assert!(first.starts_with("txn_"));
    assert!(second.starts_with("txn_"));

    let (text_ok, text_body) = run_cli_in_home(&home, &["tx", "delete", &first]);
    assert!(text_ok);
    assert!(text_body.starts_with("Transaction deleted."));
    assert!(text_body.contains(&first));
    assert!(text_body.contains("Your ledger now:"));

    let (json_ok, json_body) = run_cli_in_home(&home, &["tx", "delete", &second, "--json"]);
    assert!(json_ok);
    let payload = parse_json(&json_body);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["version"], Value::String("v1".to_string()));
    assert_eq!(
        payload["data"]["removed"]["txn_id"],
        Value::String(second.clone())
    );
    assert_eq!(payload["data"]["totals"]["expenses"], Value::from(0.0));
}

#[test]
fn tx_delete_unknown_id_uses_error_contracts() {
    let (text_ok, text_body, _) = run_cli(&["tx", "delete", "txn_missing"]);
    assert!(!text_ok);
    assert_text_error_contract(&text_body, "transaction_not_found");
    assert!(text_body.contains("tallybook tx list"));

    let (json_ok, json_body, _) = run_cli(&["tx", "delete", "txn_missing", "--json"]);
    assert!(!json_ok);
    let payload = assert_json_error_contract(&json_body, "transaction_not_found");
    assert_eq!(
        payload["error"]["data"]["txn_id"],
        Value::String("txn_missing".to_string())
    );
    assert!(payload.get("ok").is_none());
}

#[test]
fn summary_plaintext_and_json_contracts_are_supported() {
    let home = unique_test_home();
    added_txn_id(&home, &["income", "2500", "Salary", "--date", "2026-01-01"]);
    added_txn_id(
        &home,
        &["expense", "42.15", "Groceries", "--date", "2026-01-03"],
    );
    added_txn_id(&home, &["expense", "7.85", "Coffee", "--date", "2026-01-04"]);

    let (text_ok, text_body) = run_cli_in_home(&home, &["summary"]);
    assert!(text_ok);
    assert!(text_body.starts_with("Ledger summary:"));
    assert!(text_body.contains("Income:"));
    assert!(text_body.contains("2500.00"));
    assert!(text_body.contains("Expenses:"));
    assert!(text_body.contains("50.00"));
    assert!(text_body.contains("Balance:"));
    assert!(text_body.contains("2450.00"));
    assert!(text_body.contains("Transactions:"));

    let (json_ok, json_body) = run_cli_in_home(&home, &["summary", "--json"]);
    assert!(json_ok);
    let payload = parse_json(&json_body);
    assert_eq!(payload["income"], Value::from(2500.0));
    assert_eq!(payload["expenses"], Value::from(50.0));
    assert_eq!(payload["balance"], Value::from(2450.0));
    assert_eq!(payload["transaction_count"], Value::from(3));
    assert!(payload.get("ok").is_none());
    assert!(payload.get("version").is_none());
}

#[test]
fn summary_of_empty_ledger_suggests_first_transaction() {
    let (ok, body, _) = run_cli(&["summary"]);
    assert!(ok);
    assert!(body.contains("Record your first transaction:"));
    assert!(body.contains("tallybook tx add"));
}

#[test]
fn breakdown_plaintext_and_json_contracts_are_supported() {
    let home = unique_test_home();
    added_txn_id(&home, &["income", "1000", "Salary", "--date", "2026-01-01"]);
    added_txn_id(
        &home,
        &["expense", "60", "Groceries", "--date", "2026-01-02"],
    );
    added_txn_id(
        &home,
        &["expense", "15", "Groceries", "--date", "2026-01-09"],
    );
    added_txn_id(
        &home,
        &["expense", "25", "Transport", "--date", "2026-01-10"],
    );

    let (text_ok, text_body) = run_cli_in_home(&home, &["breakdown"]);
    assert!(text_ok);
    assert!(text_body.starts_with("Expenses by category:"));
    assert!(text_body.contains("Groceries"));
    assert!(text_body.contains("75.0%"));
    assert!(text_body.contains("Total expenses: 100.00"));

    let (json_ok, json_body) = run_cli_in_home(&home, &["breakdown", "--json"]);
    assert!(json_ok);
    let payload = parse_json(&json_body);
    assert_eq!(payload["total_expenses"], Value::from(100.0));
    assert_eq!(
        payload["categories"][0]["category"],
        Value::String("Groceries".to_string())
    );
    assert_eq!(payload["categories"][0]["percent"], Value::from(75.0));
    assert!(payload.get("ok").is_none());
}

#[test]
fn history_plaintext_and_json_contracts_are_supported() {
    let home = unique_test_home();
    added_txn_id(&home, &["income", "2000", "Salary", "--date", "2026-01-01"]);
    added_txn_id(&home, &["expense", "300", "Rent", "--date", "2026-01-02"]);
    added_txn_id(
        &home,
        &["expense", "80", "Groceries", "--date", "2026-02-14"],
    );

    let (text_ok, text_body) = run_cli_in_home(&home, &["history"]);
    assert!(text_ok);
    assert!(text_body.starts_with("Monthly history:"));
    assert!(text_body.contains("2026-01"));
    assert!(text_body.contains("2026-02"));
    assert!(text_body.contains("1700.00"));

    let (json_ok, json_body) = run_cli_in_home(&home, &["history", "--json"]);
    assert!(json_ok);
    let payload = parse_json(&json_body);
    let months = payload["months"].as_array().cloned().unwrap_or_default();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["month"], Value::String("2026-01".to_string()));
    assert_eq!(months[0]["balance"], Value::from(1700.0));
    assert_eq!(months[1]["expenses"], Value::from(80.0));
}

#[test]
fn goal_set_and_progress_contracts_are_supported() {
    let home = unique_test_home();
    added_txn_id(
        &home,
        &[
            "expense",
            "150",
            "Savings",
            "--savings",
            "--date",
            "2026-01-20",
        ],
    );

    let (set_ok, set_body) = run_cli_in_home(&home, &["goal", "set", "500"]);
    assert!(set_ok);
    assert!(set_body.starts_with("Savings goal updated."));
    assert!(set_body.contains("Monthly target:  500.00"));
    assert!(set_body.contains("tallybook goal progress"));

    let (text_ok, text_body) =
        run_cli_in_home(&home, &["goal", "progress", "--month", "2026-01"]);
    assert!(text_ok);
    assert!(text_body.starts_with("Savings progress for 2026-01:"));
    assert!(text_body.contains("Goal:"));
    assert!(text_body.contains("500.00"));
    assert!(text_body.contains("Saved:"));
    assert!(text_body.contains("150.00"));
    assert!(text_body.contains("Save 350.00 more"));

    let (json_ok, json_body) =
        run_cli_in_home(&home, &["goal", "progress", "--month", "2026-01", "--json"]);
    assert!(json_ok);
    let payload = parse_json(&json_body);
    assert_eq!(payload["month"], Value::String("2026-01".to_string()));
    assert_eq!(payload["goal"], Value::from(500.0));
    assert_eq!(payload["saved"], Value::from(150.0));
    assert_eq!(payload["remaining"], Value::from(350.0));
    assert_eq!(payload["percent"], Value::from(30.0));
    assert_eq!(payload["achieved"], Value::Bool(false));
    assert!(payload.get("ok").is_none());
}

#[test]
fn goal_progress_without_goal_uses_error_contracts() {
    let (text_ok, text_body, _) = run_cli(&["goal", "progress", "--month", "2026-01"]);
    assert!(!text_ok);
    assert_text_error_contract(&text_body, "goal_not_set");
    assert!(text_body.contains("tallybook goal set"));

    let (json_ok, json_body, _) = run_cli(&["goal", "progress", "--month", "2026-01", "--json"]);
    assert!(!json_ok);
    assert_json_error_contract(&json_body, "goal_not_set");
}

#[test]
fn goal_set_json_uses_structured_envelope() {
    let (ok, body, _) = run_cli(&["goal", "set", "500", "--json"]);
    assert!(ok);
    let payload = parse_json(&body);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["version"], Value::String("v1".to_string()));
    assert_eq!(payload["data"]["amount"], Value::from(500.0));
}

#[test]
fn deleting_a_savings_transaction_removes_its_contribution() {
    let home = unique_test_home();
    let txn_id = added_txn_id(
        &home,
        &[
            "expense",
            "150",
            "Savings",
            "--savings",
            "--date",
            "2026-01-20",
        ],
    );
    let (set_ok, _set_body) = run_cli_in_home(&home, &["goal", "set", "500"]);
    assert!(set_ok);

    let (delete_ok, _delete_body) = run_cli_in_home(&home, &["tx", "delete", &txn_id]);
    assert!(delete_ok);

    let (progress_ok, progress_body) =
        run_cli_in_home(&home, &["goal", "progress", "--month", "2026-01", "--json"]);
    assert!(progress_ok);
    let payload = parse_json(&progress_body);
    assert_eq!(payload["saved"], Value::from(0.0));
    assert_eq!(payload["remaining"], Value::from(500.0));
}

#[test]
fn parse_errors_are_json_when_json_flag_is_present() {
    let (date_ok, date_body, _) = run_cli(&[
        "tx",
        "add",
        "expense",
        "10",
        "Misc",
        "--date",
        "2026-02-30",
        "--json",
    ]);
    assert!(!date_ok);
    let date_payload = assert_json_error_contract(&date_body, "invalid_argument");
    assert_eq!(
        date_payload["error"]["data"]["command_hint"],
        Value::String("tx add".to_string())
    );

    let (amount_ok, amount_body, _) =
        run_cli(&["goal", "set", "-50", "--json"]);
    assert!(!amount_ok);
    assert_json_error_contract(&amount_body, "invalid_argument");

    let (month_ok, month_body, _) = run_cli(&["tx", "list", "--month", "2026-13", "--json"]);
    assert!(!month_ok);
    let month_payload = assert_json_error_contract(&month_body, "invalid_argument");
    assert_eq!(
        month_payload["error"]["data"]["command_hint"],
        Value::String("tx list".to_string())
    );
}

#[test]
fn parse_errors_default_to_plaintext_contract() {
    let (ok, body, _) = run_cli(&["tx", "add", "transfer", "10", "Misc"]);
    assert!(!ok);
    assert_text_error_contract(&body, "invalid_argument");
    assert!(body.contains("tallybook tx add --help"));
}

#[test]
fn unknown_command_is_rejected_with_plaintext_invalid_argument() {
    let (report_ok, report_body, _) = run_cli(&["report"]);
    assert!(!report_ok);
    assert_text_error_contract(&report_body, "invalid_argument");

    let (help_ok, help_body, _) = run_cli(&["help"]);
    assert!(!help_ok);
    assert_text_error_contract(&help_body, "invalid_argument");
}

#[test]
fn corrupt_store_surfaces_store_corrupt_error() {
    let home = unique_test_home();
    let create_home = fs::create_dir_all(&home);
    assert!(create_home.is_ok());
    let write_file = fs::write(home.join("tracker.db"), "not-a-sqlite-database");
    assert!(write_file.is_ok());

    let (ok, body) = run_cli_in_home(&home, &["summary"]);
    assert!(!ok);
    assert_text_error_contract(&body, "store_corrupt");
}
