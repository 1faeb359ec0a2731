//! Status command - show session state and watchlist summary

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::{get_context, log_event, resolve_session};
use crate::output;
use chainbook_core::{LogEvent, RiskLevel, Session};

#[derive(Serialize)]
struct StatusReport<'a> {
    api_url: &'a str,
    session: &'a Session,
    wallet_count: usize,
}

pub async fn run(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    log_event(&ctx, LogEvent::new("command_executed").with_command("status"));
    resolve_session(&mut ctx).await;

    if json {
        let report = StatusReport {
            api_url: &ctx.config.api_url,
            session: ctx.session.session(),
            wallet_count: ctx.wallets.wallets().len(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Chainbook Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Server", ctx.config.api_url.as_str()]);
    table.add_row(vec!["Session", &ctx.session.status().to_string()]);

    let Some(identity) = ctx.session.session().identity() else {
        println!("{}", table);
        println!();
        output::info("Run `cb login` to sign in.");
        return Ok(());
    };

    table.add_row(vec!["Email", identity.email.as_str()]);
    table.add_row(vec!["Wallets", &ctx.wallets.wallets().len().to_string()]);
    for level in RiskLevel::ALL {
        let count = ctx
            .wallets
            .wallets()
            .iter()
            .filter(|w| w.risk_level == level)
            .count();
        table.add_row(vec![format!("  {}", level), count.to_string()]);
    }
    let other = ctx
        .wallets
        .wallets()
        .iter()
        .filter(|w| matches!(w.risk_level, RiskLevel::Other(_)))
        .count();
    if other > 0 {
        table.add_row(vec!["  Other".to_string(), other.to_string()]);
    }

    println!("{}", table);
    Ok(())
}
