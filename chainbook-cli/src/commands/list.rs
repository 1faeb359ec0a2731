//! List command - show the watchlist through the search/risk filter

use anyhow::{anyhow, Result};
use colored::Colorize;

use super::{get_context, require_session};
use crate::output;
use chainbook_core::RiskFilter;

pub async fn run(query: Option<String>, risk: &str, json: bool) -> Result<()> {
    let risk: RiskFilter = risk.parse().map_err(|e: String| anyhow!(e))?;

    let mut ctx = get_context()?;
    require_session(&mut ctx, "list").await?;

    if let Some(q) = query {
        ctx.filter.set_query(q);
    }
    ctx.filter.set_risk(risk);
    let view = ctx.filtered();

    if json {
        println!("{}", serde_json::to_string_pretty(&view.wallets)?);
        return Ok(());
    }

    if ctx.wallets.wallets().is_empty() {
        output::info("No wallets yet. Add one with `cb add`.");
        return Ok(());
    }
    if view.is_empty() {
        println!("No wallets match the current filter.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Label", "Address", "Chain", "Risk", "Notes"]);
    for wallet in view.iter() {
        table.add_row(vec![
            wallet.id.to_string(),
            wallet.label.clone(),
            wallet.address.clone(),
            wallet.chain.clone(),
            output::risk_badge(&wallet.risk_level).to_string(),
            wallet.notes.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    if !ctx.filter.criteria().is_empty() {
        println!(
            "{}",
            format!(
                "Showing {} of {} wallets",
                view.len(),
                ctx.wallets.wallets().len()
            )
            .dimmed()
        );
    }
    Ok(())
}
