//! Add command - submit a new wallet to the watchlist

use anyhow::{anyhow, Result};
use dialoguer::{Input, Select};

use super::{get_context, require_session};
use crate::output;
use chainbook_core::domain::{DEFAULT_CHAIN, KNOWN_CHAINS};
use chainbook_core::{Draft, RiskLevel};

pub async fn run(
    label: Option<String>,
    address: Option<String>,
    chain: Option<String>,
    risk: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let risk = risk
        .map(|r| r.parse::<RiskLevel>().map_err(|e| anyhow!(e)))
        .transpose()?;

    let mut ctx = get_context()?;
    require_session(&mut ctx, "add").await?;

    // Required fields missing: fill the rest of the form interactively too
    let interactive = label.is_none() || address.is_none();

    let label = match label {
        Some(l) => l,
        None => Input::new().with_prompt("Label").interact_text()?,
    };
    let address = match address {
        Some(a) => a,
        None => Input::new().with_prompt("Address").interact_text()?,
    };

    let mut draft = Draft::new(label, address);

    match chain {
        Some(c) => draft = draft.with_chain(c),
        None if interactive => {
            let default = KNOWN_CHAINS
                .iter()
                .position(|c| *c == DEFAULT_CHAIN)
                .unwrap_or(0);
            let idx = Select::new()
                .with_prompt("Chain")
                .items(KNOWN_CHAINS)
                .default(default)
                .interact()?;
            draft = draft.with_chain(KNOWN_CHAINS[idx]);
        }
        None => {}
    }

    match risk {
        Some(r) => draft = draft.with_risk(r),
        None if interactive => {
            let idx = Select::new()
                .with_prompt("Risk level")
                .items(&RiskLevel::ALL[..])
                .default(0)
                .interact()?;
            draft = draft.with_risk(RiskLevel::ALL[idx].clone());
        }
        None => {}
    }

    let notes = match notes {
        Some(n) => Some(n),
        None if interactive => Some(
            Input::<String>::new()
                .with_prompt("Notes (optional)")
                .allow_empty(true)
                .interact_text()?,
        ),
        None => None,
    };
    if let Some(n) = notes {
        draft = draft.with_notes(n);
    }

    let pb = output::spinner("Adding wallet...");
    let result = ctx.wallets.create(&draft).await;
    pb.finish_and_clear();
    let created = result?;

    output::success(&format!(
        "Added '{}' on {} (id {})",
        created.label, created.chain, created.id
    ));
    Ok(())
}
