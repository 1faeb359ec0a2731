//! Register command - create an account and sign in

use anyhow::Result;
use dialoguer::{Input, Password};

use super::{get_context, log_event};
use crate::output;
use chainbook_core::LogEvent;

pub async fn run(email: Option<String>, password: Option<String>) -> Result<()> {
    let mut ctx = get_context()?;
    log_event(&ctx, LogEvent::new("command_executed").with_command("register"));

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let pb = output::spinner("Creating account...");
    let result = ctx.sign_up(&email, &password).await;
    pb.finish_and_clear();
    result?;

    output::success(&format!("Account created. Logged in as {}", email));
    Ok(())
}
