//! Command-line interface layer.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{AllocateArgs, CatalogArgs, Cli, Commands, EstimateArgs};

use console::style;

/// Print a CLI error and exit non-zero.
pub fn handle_error(err: &anyhow::Error, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("{} {err:#}", style("error:").red().bold());
    }
    std::process::exit(1);
}
