//! Developer command - profiles, ratings and endorsements

use bountyledger::core::models::RatingScores;
use bountyledger::output::{OperationResult, OutputMode, ProfileResult};

use super::Context;
use crate::cli::app::DevAction;

/// Handle developer subcommands
pub async fn dev(action: DevAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        DevAction::Register { skills } => {
            let mut session = ctx.connect().await?;
            let profile = session.register_developer(&skills).await?;
            let address = profile.address.to_string();
            if ctx.mode == OutputMode::Human {
                println!("Registered as a developer.");
            }
            ProfileResult {
                address,
                reputation: session.state().reputation_score,
                profile: Some(profile),
            }
            .render(ctx.mode);
        },
        DevAction::Show { address } => {
            let Some(address) = address.or_else(|| ctx.wallet.clone()) else {
                anyhow::bail!("No address given and no wallet configured");
            };
            let (profile, reputation) = ctx.session()?.developer(&address).await?;
            ProfileResult {
                address: address.to_string(),
                reputation,
                profile,
            }
            .render(ctx.mode);
        },
        DevAction::Rate {
            developer,
            bounty,
            code_quality,
            communication,
            timeliness,
            reliability,
            feedback,
        } => {
            let scores = RatingScores {
                code_quality,
                communication,
                timeliness,
                reliability,
                feedback,
            };
            let mut session = ctx.connect().await?;
            let profile = session.submit_rating(&developer, bounty, scores).await?;
            OperationResult {
                success: true,
                message: format!(
                    "Rated {developer} for bounty #{bounty}; average now {:.2} over {} rating(s)",
                    profile.average_rating, profile.total_ratings
                ),
            }
            .render(ctx.mode);
        },
        DevAction::Endorse { developer, skill } => {
            let mut session = ctx.connect().await?;
            let added = session.endorse_skill(&developer, &skill).await?;
            let message = if added {
                format!("Endorsed {developer} for {skill}")
            } else {
                format!("{developer} already lists {skill}")
            };
            OperationResult {
                success: true,
                message,
            }
            .render(ctx.mode);
        },
    }
    Ok(())
}
