//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::core::models::{Address, BountyRecord, BountyStatus, DeveloperProfile, SessionState};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn status_label(status: BountyStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        BountyStatus::Open => label.green(),
        BountyStatus::Assigned => label.yellow(),
        BountyStatus::InReview => label.cyan(),
        BountyStatus::Completed => label.dimmed(),
    }
}

/// One-line summary of a bounty
#[must_use]
pub fn bounty_line(bounty: &BountyRecord) -> String {
    let assignee = bounty
        .assignee
        .as_ref()
        .map_or_else(|| "unassigned".to_string(), Address::short);
    format!(
        "#{:<4} {:<10} {} {:<5} {}  {}  ({assignee}, due {})",
        bounty.id.0,
        status_label(bounty.status),
        bounty.amount,
        bounty.token,
        bounty.repository,
        bounty.issue_url,
        bounty.deadline.format("%Y-%m-%d"),
    )
}

/// Result of creating or connecting a wallet
#[derive(Debug, Serialize)]
pub struct WalletResult {
    /// Wallet address
    pub address: String,
    /// Balance as a decimal token amount
    pub balance: String,
    /// Whether the wallet was just created
    pub created: bool,
}

impl WalletResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                if self.created {
                    println!("Created wallet {}", self.address.bold());
                    println!("Saved as default wallet.");
                } else {
                    println!("Wallet {}", self.address.bold());
                }
                println!("Balance: {}", self.balance);
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Snapshot of a connected session
#[derive(Debug, Serialize)]
pub struct StatusResult {
    /// The session state after refresh
    #[serde(flatten)]
    pub state: SessionState,
}

impl StatusResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        let conn = &self.state.connection;
        let Some(address) = conn.wallet_address.as_ref().filter(|_| conn.is_connected) else {
            println!("{}", "Not connected".red());
            return;
        };

        println!("{} {}", "Connected".green().bold(), address);
        println!("Balance:    {}", conn.balance);
        println!("Reputation: {}", self.state.reputation_score);

        match &self.state.developer_profile {
            Some(profile) => println!(
                "Developer:  {} completed, {:.2} avg over {} rating(s){}",
                profile.completed_bounties,
                profile.average_rating,
                profile.total_ratings,
                if profile.is_verified { ", verified" } else { "" }
            ),
            None => println!("Developer:  not registered"),
        }

        print_bounty_section("Issued bounties", &self.state.issued_bounties);
        print_bounty_section("Assigned bounties", &self.state.assigned_bounties);
    }
}

fn print_bounty_section(title: &str, bounties: &[BountyRecord]) {
    println!("\n{title} ({}):", bounties.len());
    if bounties.is_empty() {
        println!("  (none)");
    }
    for bounty in bounties {
        println!("  {}", bounty_line(bounty));
    }
}

/// Result of a single-bounty operation
#[derive(Debug, Serialize)]
pub struct BountyResult {
    /// What happened
    pub message: String,
    /// The bounty after the operation
    pub bounty: BountyRecord,
}

impl BountyResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!("{}", self.message);
                println!("  {}", bounty_line(&self.bounty));
                if let Some(pr) = self.bounty.pr_number {
                    println!("  PR #{pr}");
                }
                if self.bounty.requires_approval {
                    println!("  Requires issuer approval");
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Result of listing bounties
#[derive(Debug, Serialize)]
pub struct BountyListResult {
    /// Which list this is
    pub title: String,
    /// Matching bounties, in id order
    pub bounties: Vec<BountyRecord>,
}

impl BountyListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print_bounty_section(&self.title, &self.bounties),
            OutputMode::Json => print_json(self),
        }
    }
}

/// A developer's profile and reputation
#[derive(Debug, Serialize)]
pub struct ProfileResult {
    /// Developer address
    pub address: String,
    /// Aggregate reputation score
    pub reputation: u64,
    /// Profile, if registered
    pub profile: Option<DeveloperProfile>,
}

impl ProfileResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        let Some(profile) = &self.profile else {
            println!("{} is not a registered developer.", self.address);
            return;
        };

        let badge = if profile.is_verified {
            " [verified]".green().to_string()
        } else {
            String::new()
        };
        println!("Developer {}{badge}", self.address.bold());
        println!("  Score:       {}", self.reputation);
        println!("  Completed:   {}", profile.completed_bounties);
        println!("  Earnings:    {}", profile.total_earnings);
        println!(
            "  Rating:      {:.2} ({} rating(s))",
            profile.average_rating, profile.total_ratings
        );
        println!("  Endorsements: {}", profile.endorsements);
        let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
        println!(
            "  Skills:      {}",
            if skills.is_empty() { "(none)".to_string() } else { skills.join(", ") }
        );
        println!("  Joined:      {}", profile.joined_at.format("%Y-%m-%d"));
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}
