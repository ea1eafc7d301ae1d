//! `costforge catalog` - inspect the priced-line catalog.

use anyhow::Result;

use crate::cli::output::format_catalog_table;
use crate::cli::types::{CatalogArgs, CatalogCommands};

use super::{load_catalog, load_config};

/// Handle the catalog command.
pub async fn execute(args: CatalogArgs, json: bool) -> Result<()> {
    match args.command {
        CatalogCommands::Show { catalog, config } => {
            let config = load_config(config.as_deref())?;
            let catalog = load_catalog(catalog.as_ref(), &config)?;
            let lines = catalog.lines();

            if json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
                return Ok(());
            }

            if lines.is_empty() {
                println!("Catalog is empty.");
                return Ok(());
            }

            println!("{}", format_catalog_table(&lines));
            println!(
                "{} line(s), {} priceable",
                lines.len(),
                catalog.priceable_line_count()
            );
            Ok(())
        }
    }
}
