//! Wallet command - create a wallet or show the connected one

use bountyledger::config::Config;
use bountyledger::output::WalletResult;

use super::Context;
use crate::cli::app::WalletAction;

/// Handle wallet subcommands
pub async fn wallet(action: WalletAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        WalletAction::Create => create(ctx).await,
        WalletAction::Show => super::status(ctx).await,
    }
}

async fn create(ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.session()?;
    session.create_wallet().await?;
    let info = session.connect().await?;

    let mut config = ctx.config.clone();
    config.set_wallet(&info.address);
    config.save()?;
    log::debug!("Default wallet saved to {}", Config::config_path().display());

    WalletResult {
        address: info.address.to_string(),
        balance: info.balance.to_string(),
        created: true,
    }
    .render(ctx.mode);
    Ok(())
}
