//! CLI definitions and entry point

use clap::{Parser, Subcommand};

use super::commands::{self, Context};
use bountyledger::core::models::{Address, BountyId};
use bountyledger::output::OutputMode;

/// bountyledger - bounties and developer reputation on a local ledger
#[derive(Parser, Debug)]
#[command(
    name = "bountyledger",
    version,
    about = "Bounties and developer reputation on a local ledger",
    long_about = "Escrow rewards against source-code issues and build developer reputation.\n\n\
                  Issuers open bounties, developers claim and complete them, and\n\
                  completed work is rated and endorsed."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Wallet to act as (defaults to the configured wallet)
    #[arg(long, global = true)]
    pub wallet: Option<Address>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or inspect the wallet
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Connect and show balance, bounties and reputation
    Status,

    /// Open, assign and complete bounties
    Bounty {
        #[command(subcommand)]
        action: BountyAction,
    },

    /// Developer profiles, ratings and endorsements
    Dev {
        #[command(subcommand)]
        action: DevAction,
    },

    /// Show version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum WalletAction {
    /// Create a wallet and make it the default
    Create,

    /// Connect and show the wallet's session state
    Show,
}

#[derive(Subcommand, Debug)]
pub enum BountyAction {
    /// Open a bounty, escrowing the amount from your wallet
    Create {
        /// Reward in tokens (e.g. 1.5)
        #[arg(short, long)]
        amount: String,

        /// Repository as owner/name or GitHub URL
        #[arg(short, long)]
        repo: String,

        /// Issue URL or reference
        #[arg(short, long)]
        issue: String,

        /// Days until the deadline (default 14)
        #[arg(long, conflicts_with = "deadline")]
        deadline_days: Option<u32>,

        /// Deadline as RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Hold payout until you approve the pull request
        #[arg(long)]
        requires_approval: bool,
    },

    /// Assign one of your bounties to a developer
    Assign {
        /// Bounty id
        id: BountyId,

        /// Developer address
        assignee: Address,
    },

    /// Assign a bounty to yourself
    Claim {
        /// Bounty id
        id: BountyId,
    },

    /// Submit the pull request for a bounty assigned to you
    Submit {
        /// Bounty id
        id: BountyId,

        /// Pull request number
        #[arg(long)]
        pr: u64,
    },

    /// Approve a bounty in review and pay the developer
    Approve {
        /// Bounty id
        id: BountyId,
    },

    /// Show one bounty
    Show {
        /// Bounty id
        id: BountyId,
    },

    /// List your bounties
    List {
        /// List bounties assigned to you instead of those you issued
        #[arg(long)]
        assigned: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum DevAction {
    /// Register your wallet as a developer
    Register {
        /// Comma-separated skills
        #[arg(short, long, value_delimiter = ',')]
        skills: Vec<String>,
    },

    /// Show a developer profile (defaults to your own)
    Show {
        /// Developer address
        address: Option<Address>,
    },

    /// Rate the developer who completed one of your bounties
    Rate {
        /// Developer address
        developer: Address,

        /// Bounty id
        bounty: BountyId,

        /// Code quality, 0-5
        #[arg(long)]
        code_quality: u8,

        /// Communication, 0-5
        #[arg(long)]
        communication: u8,

        /// Timeliness, 0-5
        #[arg(long)]
        timeliness: u8,

        /// Reliability, 0-5
        #[arg(long)]
        reliability: u8,

        /// Free-text feedback
        #[arg(short, long, default_value = "")]
        feedback: String,
    },

    /// Endorse a skill on another developer's profile
    Endorse {
        /// Developer address
        developer: Address,

        /// Skill to endorse
        skill: String,
    },
}

/// Run the CLI
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Version) => {
            print_version(output_mode);
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": bountyledger::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("bountyledger v{}", bountyledger::VERSION);
                println!("\nRun 'bountyledger --help' for usage");
                println!("Run 'bountyledger wallet create' to get started");
            }
            Ok(())
        },
        Some(command) => {
            let ctx = Context::load(cli.wallet, output_mode)?;
            match command {
                Command::Wallet { action } => commands::wallet(action, &ctx).await,
                Command::Status => commands::status(&ctx).await,
                Command::Bounty { action } => commands::bounty(action, &ctx).await,
                Command::Dev { action } => commands::dev(action, &ctx).await,
                Command::Version => {
                    print_version(output_mode);
                    Ok(())
                },
            }
        },
    }
}

fn print_version(mode: OutputMode) {
    if mode == OutputMode::Json {
        println!("{}", serde_json::json!({ "version": bountyledger::VERSION }));
    } else {
        println!("bountyledger v{}", bountyledger::VERSION);
    }
}
