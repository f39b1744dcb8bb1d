//! CLI tests for route commands.
//!
//! Spawns the kingroad binary against a temporary data directory and verifies
//! that state carries across invocations and exit codes match expectations.

use std::path::Path;
use std::process::{Command, Output};

use kingroad::core::types::RouteStatus;
use kingroad::exit_codes;
use kingroad::io::history_store::{DEFAULT_HISTORY_KEY, load_history};
use kingroad::io::storage::FileStore;

fn kingroad(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kingroad"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("run kingroad")
}

#[test]
fn cancel_in_a_later_invocation_cancels_the_started_route() {
    let temp = tempfile::tempdir().expect("tempdir");
    let data_dir = temp.path().join("data");

    let start = kingroad(&data_dir, &["start", "Salvador"]);
    assert_eq!(start.status.code(), Some(exit_codes::OK));
    let id: u64 = String::from_utf8_lossy(&start.stdout)
        .trim()
        .parse()
        .expect("route id on stdout");

    let cancel = kingroad(&data_dir, &["cancel"]);
    assert_eq!(cancel.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&cancel.stderr).contains("[SUCCESS]"));

    let history = load_history(&FileStore::new(&data_dir), DEFAULT_HISTORY_KEY).expect("load");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id.0, id);
    assert_eq!(history[0].status, RouteStatus::Canceled);
}

#[test]
fn cancel_without_route_exits_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = kingroad(temp.path(), &["cancel"]);
    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[WARNING]"));
}

#[test]
fn blank_destination_exits_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = kingroad(temp.path(), &["start", "   "]);
    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
}

#[test]
fn invalid_config_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::write(temp.path().join("config.toml"), "history_limit = 0\n").expect("write");
    let output = kingroad(temp.path(), &["status"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn render_navigation_reflects_active_route() {
    let temp = tempfile::tempdir().expect("tempdir");
    let start = kingroad(temp.path(), &["quick", "hospital"]);
    assert_eq!(start.status.code(), Some(exit_codes::OK));

    let render = kingroad(temp.path(), &["render", "navigation"]);
    assert_eq!(render.status.code(), Some(exit_codes::OK));
    let html = String::from_utf8_lossy(&render.stdout);
    assert!(html.contains("🏥 Hospital"));
    assert!(html.contains("cancel-route"));
}
