//! Login command - exchange email/password for a session token

use anyhow::Result;
use dialoguer::{Input, Password};

use super::{get_context, log_event};
use crate::output;
use chainbook_core::LogEvent;

pub async fn run(email: Option<String>, password: Option<String>) -> Result<()> {
    let mut ctx = get_context()?;
    log_event(&ctx, LogEvent::new("command_executed").with_command("login"));

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let pb = output::spinner("Signing in...");
    let result = ctx.sign_in(&email, &password).await;
    pb.finish_and_clear();
    result?;

    match ctx.session.session().identity() {
        Some(identity) => output::success(&format!("Logged in as {}", identity.email)),
        // The token was accepted but the identity check failed
        None => output::warning("Signed in, but the session could not be confirmed. Try again."),
    }
    Ok(())
}
