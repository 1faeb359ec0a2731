//! Delete command - remove a wallet from the watchlist

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, require_session};
use crate::output;
use chainbook_core::WalletId;

pub async fn run(id: WalletId, force: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_session(&mut ctx, "delete").await?;

    if !force {
        let target = match ctx.wallets.get(id) {
            Some(w) => format!("'{}' ({})", w.label, w.address),
            None => format!("wallet {}", id),
        };
        println!("\n{}", format!("This will delete {}.", target).yellow());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let pb = output::spinner("Deleting wallet...");
    let result = ctx.wallets.delete(id).await;
    pb.finish_and_clear();
    result?;

    output::success(&format!("Wallet {} deleted", id));
    Ok(())
}
