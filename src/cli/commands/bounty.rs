//! Bounty command - open, assign, complete and inspect bounties

use chrono::{DateTime, Duration, NaiveDate, Utc};

use bountyledger::core::models::{Amount, BountyDraft};
use bountyledger::output::{BountyListResult, BountyResult};

use super::Context;
use crate::cli::app::BountyAction;

/// Days until the deadline when none is given
const DEFAULT_DEADLINE_DAYS: u32 = 14;

/// Handle bounty subcommands
pub async fn bounty(action: BountyAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        BountyAction::Create {
            amount,
            repo,
            issue,
            deadline_days,
            deadline,
            requires_approval,
        } => {
            let deadline = parse_deadline(deadline_days, deadline.as_deref(), Utc::now())?;
            let mut draft = BountyDraft::new(Amount::parse(&amount)?, repo, issue, deadline);
            if requires_approval {
                draft = draft.with_approval();
            }

            let mut session = ctx.connect().await?;
            let id = session.create_bounty_with(draft).await?;
            let bounty = session.bounty(id).await?;
            BountyResult {
                message: format!("Opened bounty #{id}"),
                bounty,
            }
            .render(ctx.mode);
        },
        BountyAction::Assign { id, assignee } => {
            let mut session = ctx.connect().await?;
            let bounty = session.assign_bounty(id, &assignee).await?;
            BountyResult {
                message: format!("Assigned bounty #{id} to {assignee}"),
                bounty,
            }
            .render(ctx.mode);
        },
        BountyAction::Claim { id } => {
            let mut session = ctx.connect().await?;
            let bounty = session.self_assign_bounty(id).await?;
            BountyResult {
                message: format!("Claimed bounty #{id}"),
                bounty,
            }
            .render(ctx.mode);
        },
        BountyAction::Submit { id, pr } => {
            let mut session = ctx.connect().await?;
            let bounty = session.submit_pull_request(id, pr).await?;
            let message = if bounty.requires_approval {
                format!("Submitted PR #{pr} for bounty #{id}; waiting for issuer approval")
            } else {
                format!("Submitted PR #{pr}; bounty #{id} paid out")
            };
            BountyResult { message, bounty }.render(ctx.mode);
        },
        BountyAction::Approve { id } => {
            let mut session = ctx.connect().await?;
            let bounty = session.approve_bounty(id).await?;
            BountyResult {
                message: format!("Approved bounty #{id}; paid out"),
                bounty,
            }
            .render(ctx.mode);
        },
        BountyAction::Show { id } => {
            let bounty = ctx.session()?.bounty(id).await?;
            BountyResult {
                message: format!("Bounty #{id}"),
                bounty,
            }
            .render(ctx.mode);
        },
        BountyAction::List { assigned } => {
            let session = ctx.connect().await?;
            let state = session.state();
            let (title, bounties) = if assigned {
                ("Assigned bounties", state.assigned_bounties)
            } else {
                ("Issued bounties", state.issued_bounties)
            };
            BountyListResult {
                title: title.to_string(),
                bounties,
            }
            .render(ctx.mode);
        },
    }
    Ok(())
}

/// Resolve `--deadline` / `--deadline-days` into a timestamp
///
/// A bare date means the end of that day (UTC).
fn parse_deadline(
    days: Option<u32>,
    at: Option<&str>,
    now: DateTime<Utc>,
) -> anyhow::Result<DateTime<Utc>> {
    if let Some(at) = at {
        if let Ok(ts) = DateTime::parse_from_rfc3339(at) {
            return Ok(ts.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(at, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid deadline: {at}. Use RFC 3339 or YYYY-MM-DD"))?;
        return date
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| anyhow::anyhow!("Invalid deadline: {at}"));
    }
    let days = days.unwrap_or(DEFAULT_DEADLINE_DAYS);
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_add_signed(span))
        .ok_or_else(|| anyhow::anyhow!("Invalid deadline: {days} days from now is out of range"))
}
