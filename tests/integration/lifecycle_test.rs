//! Integration tests for the full bounty lifecycle
//!
//! Tests the complete flow across two wallets:
//! 1. Issuer opens a bounty that requires approval
//! 2. Developer registers and claims it
//! 3. Developer submits a pull request, issuer approves
//! 4. Issuer rates the developer; reputation reflects both

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn bountyledger(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("bountyledger"));
    cmd.env("BOUNTYLEDGER_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn run_json(home: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = bountyledger(home).args(args).arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_bounty_lifecycle_with_approval_and_rating() {
    let home = TempDir::new().unwrap();

    let issuer = run_json(&home, &["wallet", "create"])["address"].as_str().unwrap().to_string();
    let developer =
        run_json(&home, &["wallet", "create"])["address"].as_str().unwrap().to_string();

    // The developer is now the default wallet
    bountyledger(&home)
        .args(["dev", "register", "--skills", "rust"])
        .assert()
        .success();

    let created = run_json(
        &home,
        &[
            "bounty",
            "create",
            "--wallet",
            &issuer,
            "--amount",
            "10",
            "--repo",
            "acme/widgets",
            "--issue",
            "https://github.com/acme/widgets/issues/42",
            "--deadline-days",
            "3",
            "--requires-approval",
        ],
    );
    assert_eq!(created["bounty"]["requires_approval"], true);

    let claimed = run_json(&home, &["bounty", "claim", "1"]);
    assert_eq!(claimed["bounty"]["status"], "assigned");
    assert_eq!(claimed["bounty"]["assignee"], developer.as_str());

    // Only the issuer may approve, and only once it is in review
    bountyledger(&home)
        .args(["bounty", "approve", "1", "--wallet", &issuer])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot approve"));

    let submitted = run_json(&home, &["bounty", "submit", "1", "--pr", "77"]);
    assert_eq!(submitted["bounty"]["status"], "in_review");
    assert_eq!(submitted["bounty"]["pr_number"], 77);

    bountyledger(&home)
        .args(["bounty", "approve", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only the issuer"));

    let approved = run_json(&home, &["bounty", "approve", "1", "--wallet", &issuer]);
    assert_eq!(approved["bounty"]["status"], "completed");

    let rated = run_json(
        &home,
        &[
            "dev",
            "rate",
            &developer,
            "1",
            "--wallet",
            &issuer,
            "--code-quality",
            "5",
            "--communication",
            "4",
            "--timeliness",
            "5",
            "--reliability",
            "4",
            "--feedback",
            "Clean patch",
        ],
    );
    assert_eq!(rated["success"], true);

    // 10 for the completion + round(4.5 * 1 * 2)
    let status = run_json(&home, &["status"]);
    assert_eq!(status["connection"]["balance"], "110");
    assert_eq!(status["reputation_score"], 19);
    assert_eq!(status["developer_profile"]["completed_bounties"], 1);
    assert_eq!(status["assigned_bounties"][0]["status"], "completed");

    let issuer_status = run_json(&home, &["status", "--wallet", &issuer]);
    assert_eq!(issuer_status["connection"]["balance"], "90");
    assert_eq!(issuer_status["issued_bounties"].as_array().unwrap().len(), 1);

    // One rating per bounty
    bountyledger(&home)
        .args([
            "dev",
            "rate",
            &developer,
            "1",
            "--wallet",
            &issuer,
            "--code-quality",
            "1",
            "--communication",
            "1",
            "--timeliness",
            "1",
            "--reliability",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already been rated"));
}

#[test]
fn test_assign_to_developer_and_list_assigned() {
    let home = TempDir::new().unwrap();
    let developer =
        run_json(&home, &["wallet", "create"])["address"].as_str().unwrap().to_string();
    let issuer = run_json(&home, &["wallet", "create"])["address"].as_str().unwrap().to_string();

    run_json(
        &home,
        &["bounty", "create", "--amount", "4", "--repo", "acme/widgets", "--issue", "x"],
    );
    let assigned = run_json(&home, &["bounty", "assign", "1", &developer]);
    assert_eq!(assigned["bounty"]["assignee"], developer.as_str());

    let list = run_json(&home, &["bounty", "list", "--assigned", "--wallet", &developer]);
    assert_eq!(list["bounties"][0]["id"], 1);

    let shown = run_json(&home, &["bounty", "show", "1"]);
    assert_eq!(shown["bounty"]["issuer"], issuer.as_str());
}
