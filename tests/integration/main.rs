//! Integration tests for the bountyledger CLI
//!
//! Each test gets its own home directory (via `BOUNTYLEDGER_HOME`) so the
//! config and file ledger never leak between tests.

// Include lifecycle tests from the same directory
mod lifecycle_test;

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a bountyledger command rooted at `home`
fn bountyledger(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("bountyledger"));
    cmd.env("BOUNTYLEDGER_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Run a command with `--json` and parse its stdout
fn json(home: &Path, args: &[&str]) -> serde_json::Value {
    let output = bountyledger(home).args(args).arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Create a wallet and return its address (it also becomes the default)
fn create_wallet(home: &Path) -> String {
    let value = json(home, &["wallet", "create"]);
    value["address"].as_str().unwrap().to_string()
}

// =============================================================================
// BASIC COMMANDS
// =============================================================================

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    bountyledger(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bountyledger v"));
}

#[test]
fn test_no_command_prints_hint() {
    let temp = TempDir::new().unwrap();
    bountyledger(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("wallet create"));
}

#[test]
fn test_status_without_wallet_fails() {
    let temp = TempDir::new().unwrap();
    bountyledger(temp.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No wallet configured"));
}

#[test]
fn test_wallet_create_saves_config_and_ledger() {
    let temp = TempDir::new().unwrap();
    let value = json(temp.path(), &["wallet", "create"]);

    assert_eq!(value["balance"], "100");
    assert_eq!(value["created"], true);
    let address = value["address"].as_str().unwrap();

    let config = fs::read_to_string(temp.path().join("config.toml")).unwrap();
    assert!(config.contains(address));
    assert!(temp.path().join("ledger.json").exists());
}

#[test]
fn test_wallet_create_keeps_malformed_config() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    let original = "[ledger]\nbackend = \"file\"\nlatency_ms = \"fast\"\n";
    fs::write(&config, original).unwrap();

    bountyledger(temp.path())
        .args(["wallet", "create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));

    assert_eq!(fs::read_to_string(&config).unwrap(), original);
    assert!(!temp.path().join("ledger.json").exists());
}

#[test]
fn test_status_shows_connected_wallet() {
    let temp = TempDir::new().unwrap();
    let address = create_wallet(temp.path());

    let value = json(temp.path(), &["status"]);
    assert_eq!(value["connection"]["is_connected"], true);
    assert_eq!(value["connection"]["wallet_address"], address.as_str());
    assert_eq!(value["connection"]["balance"], "100");

    bountyledger(temp.path())
        .args(["wallet", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected"))
        .stdout(predicate::str::contains(address));
}

#[test]
fn test_unknown_wallet_flag_fails() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path());

    bountyledger(temp.path())
        .args(["status", "--wallet", "0x00000000000000000000000000000000000000aa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wallet not found"));
}

#[test]
fn test_malformed_wallet_flag_is_rejected() {
    let temp = TempDir::new().unwrap();
    bountyledger(temp.path())
        .args(["status", "--wallet", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid address"));
}

// =============================================================================
// BOUNTY COMMANDS
// =============================================================================

#[test]
fn test_create_and_list_bounty() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path());

    let value = json(
        temp.path(),
        &[
            "bounty",
            "create",
            "--amount",
            "2.5",
            "--repo",
            "https://github.com/acme/widgets",
            "--issue",
            "https://github.com/acme/widgets/issues/9",
        ],
    );
    assert_eq!(value["bounty"]["id"], 1);
    assert_eq!(value["bounty"]["status"], "open");
    assert_eq!(value["bounty"]["repository"], "acme/widgets");
    assert_eq!(value["bounty"]["amount"], "2.5");

    let list = json(temp.path(), &["bounty", "list"]);
    assert_eq!(list["bounties"].as_array().unwrap().len(), 1);

    let status = json(temp.path(), &["status"]);
    assert_eq!(status["connection"]["balance"], "97.5");
}

#[test]
fn test_create_bounty_rejects_past_deadline() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path());

    bountyledger(temp.path())
        .args([
            "bounty",
            "create",
            "--amount",
            "1",
            "--repo",
            "acme/widgets",
            "--issue",
            "acme/widgets#1",
            "--deadline",
            "2001-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid deadline"));
}

#[test]
fn test_create_bounty_insufficient_funds() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path());

    bountyledger(temp.path())
        .args(["bounty", "create", "--amount", "1000", "--repo", "acme/widgets", "--issue", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient funds"));

    let list = json(temp.path(), &["bounty", "list"]);
    assert!(list["bounties"].as_array().unwrap().is_empty());
}

#[test]
fn test_issuer_cannot_claim_own_bounty() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path());
    json(
        temp.path(),
        &["bounty", "create", "--amount", "1", "--repo", "acme/widgets", "--issue", "x"],
    );

    bountyledger(temp.path())
        .args(["bounty", "claim", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("issuer cannot be assigned"));
}

#[test]
fn test_show_missing_bounty() {
    let temp = TempDir::new().unwrap();
    bountyledger(temp.path())
        .args(["bounty", "show", "#7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bounty not found: #7"));
}

// =============================================================================
// DEVELOPER COMMANDS
// =============================================================================

#[test]
fn test_register_and_show_developer() {
    let temp = TempDir::new().unwrap();
    let address = create_wallet(temp.path());

    bountyledger(temp.path())
        .args(["dev", "register", "--skills", "Rust,tokio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered as a developer"));

    let value = json(temp.path(), &["dev", "show"]);
    assert_eq!(value["address"], address.as_str());
    assert_eq!(value["profile"]["skills"], serde_json::json!(["rust", "tokio"]));
}

#[test]
fn test_show_unregistered_developer() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path());

    bountyledger(temp.path())
        .args(["dev", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not a registered developer"));
}

#[test]
fn test_endorse_twice() {
    let temp = TempDir::new().unwrap();
    let developer = create_wallet(temp.path());
    bountyledger(temp.path()).args(["dev", "register"]).assert().success();
    create_wallet(temp.path());

    bountyledger(temp.path())
        .args(["dev", "endorse", &developer, "Solidity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Endorsed"));
    bountyledger(temp.path())
        .args(["dev", "endorse", &developer, "solidity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already lists"));

    let value = json(temp.path(), &["dev", "show", &developer]);
    assert_eq!(value["profile"]["skills"], serde_json::json!(["solidity"]));
    assert_eq!(value["profile"]["endorsements"], 1);
}
