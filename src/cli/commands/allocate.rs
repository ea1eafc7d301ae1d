//! `costforge allocate` - one-shot allocation without any service.

use anyhow::Result;

use crate::cli::output::format_plan_table;
use crate::cli::types::AllocateArgs;
use crate::services::Allocator;

use super::{load_catalog, load_config};

/// Handle the allocate command.
pub async fn execute(args: AllocateArgs, json: bool) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let catalog = load_catalog(args.catalog.as_ref(), &config)?;

    let plan = Allocator::new().allocate(args.target, &catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.is_empty() {
        println!("Nothing to allocate: target or catalog yields no priceable lines.");
        return Ok(());
    }

    println!("{}", format_plan_table(&plan));
    Ok(())
}
