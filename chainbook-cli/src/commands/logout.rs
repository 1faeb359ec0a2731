//! Logout command - forget the stored token

use anyhow::Result;

use super::{get_context, log_event};
use crate::output;
use chainbook_core::LogEvent;

pub async fn run() -> Result<()> {
    let mut ctx = get_context()?;
    log_event(&ctx, LogEvent::new("command_executed").with_command("logout"));

    ctx.logout().await?;
    output::success("Logged out");
    Ok(())
}
