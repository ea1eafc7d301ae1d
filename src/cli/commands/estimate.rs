//! `costforge estimate` - converge an estimate session on a target amount.

use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use crate::adapters::{SimulatedEstimateService, SimulatedServiceConfig};
use crate::cli::output::{create_spinner, format_plan_table};
use crate::cli::types::EstimateArgs;
use crate::domain::models::convergence::ConvergenceSettings;
use crate::domain::ports::EstimateService;
use crate::services::ConvergenceLoop;

use super::{load_catalog, load_config};

/// Handle the estimate command.
pub async fn execute(args: EstimateArgs, json: bool) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let catalog = load_catalog(args.catalog.as_ref(), &config)?;

    let settings = ConvergenceSettings {
        tolerance: args.tolerance.unwrap_or(config.convergence.tolerance),
        max_attempts: args.max_attempts.unwrap_or(config.convergence.max_attempts),
    };

    let service = Arc::new(SimulatedEstimateService::new(
        SimulatedServiceConfig::from_config(&config.simulation),
    ));
    let session_id = service
        .create_session(&args.title)
        .await
        .context("Failed to create estimate session")?;

    let spinner = (!json).then(|| create_spinner("Converging on target..."));

    let engine = ConvergenceLoop::new(Arc::clone(&service), settings);
    let result = engine.converge(&session_id, args.target, &catalog).await;

    // Clear the spinner before any output, error path included.
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let outcome = result.context("Convergence run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.plan.is_empty() {
        println!("Nothing to allocate: target or catalog yields no priceable lines.");
        return Ok(());
    }

    println!("{}", format_plan_table(&outcome.plan));
    let deviation = (outcome.achieved_amount - args.target).abs();
    if outcome.converged {
        println!(
            "{} achieved {:.2} against target {:.2} in {} attempt(s) (deviation {:.4})",
            style("converged:").green().bold(),
            outcome.achieved_amount,
            args.target,
            outcome.attempts,
            deviation,
        );
    } else {
        println!(
            "{} achieved {:.2} against target {:.2} after {} attempt(s) (deviation {:.4})",
            style("best effort:").yellow().bold(),
            outcome.achieved_amount,
            args.target,
            outcome.attempts,
            deviation,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn rejected_lines_surface_as_an_error() {
        let mut catalog = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(catalog, "services:\n  ec2:\n    hours: 0.1").unwrap();

        let mut config = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(config, "simulation:\n  rejected_services: [ec2]").unwrap();

        let args = EstimateArgs {
            target: 100.0,
            catalog: Some(catalog.path().to_path_buf()),
            tolerance: None,
            max_attempts: None,
            title: "test".to_string(),
            config: Some(config.path().to_path_buf()),
        };
        // json = false takes the spinner path; the error must still propagate.
        let err = execute(args, false).await.unwrap_err();
        assert!(err.to_string().contains("Convergence run failed"));
    }
}
