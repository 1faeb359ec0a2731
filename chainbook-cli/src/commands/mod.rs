//! CLI command implementations

pub mod add;
pub mod config;
pub mod delete;
pub mod list;
pub mod login;
pub mod logout;
pub mod logs;
pub mod register;
pub mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chainbook_core::config::chainbook_dir;
use chainbook_core::services::logging::record;
use chainbook_core::{ChainbookContext, EntryPoint, Guard, LogEvent};

use crate::output;

/// Get the chainbook directory from environment or default
pub fn get_chainbook_dir() -> Result<PathBuf> {
    chainbook_dir()
}

/// Get or create the chainbook context
pub fn get_context() -> Result<ChainbookContext> {
    let dir = get_chainbook_dir()?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create chainbook directory: {:?}", dir))?;

    ChainbookContext::new(&dir, EntryPoint::Cli).context("Failed to initialize chainbook context")
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(ctx: &ChainbookContext, event: LogEvent) {
    record(ctx.logger.as_deref(), event);
}

/// Resolve the session behind a spinner
///
/// Credential store failures are reported but leave the session anonymous,
/// so callers can still consult the guard afterwards.
pub async fn resolve_session(ctx: &mut ChainbookContext) {
    let pb = output::spinner("Checking session...");
    let resolved = ctx.initialize().await;
    pb.finish_and_clear();

    if let Err(e) = resolved {
        output::warning(&format!("Could not read stored session: {}", e));
    }
}

/// Resolve the session and require it to be authenticated
///
/// Used by every command that touches the watchlist.
pub async fn require_session(ctx: &mut ChainbookContext, command: &str) -> Result<()> {
    resolve_session(ctx).await;
    log_event(ctx, LogEvent::new("command_executed").with_command(command));

    match ctx.session.guard() {
        Guard::Allow(_) => Ok(()),
        Guard::Redirect(nav) => Err(anyhow!(
            "Not logged in (redirected to {}). Run `cb login` first.",
            nav.path()
        )),
        Guard::Loading => Err(anyhow!("Session could not be resolved")),
    }
}
