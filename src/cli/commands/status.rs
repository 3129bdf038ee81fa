//! Status command - connect and show the session state

use bountyledger::output::StatusResult;

use super::Context;

/// Connect, refresh and print balance, bounties and reputation
pub async fn status(ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.connect().await?;
    session.refresh_data().await?;

    StatusResult {
        state: session.state(),
    }
    .render(ctx.mode);
    Ok(())
}
