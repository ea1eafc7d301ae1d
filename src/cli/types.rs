//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser.
#[derive(Parser)]
#[command(name = "costforge")]
#[command(about = "Costforge - drive a pricing estimate toward a target amount", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Converge an estimate session on a target amount
    Estimate(EstimateArgs),

    /// Compute a one-shot allocation without contacting any service
    Allocate(AllocateArgs),

    /// Inspect the priced-line catalog
    Catalog(CatalogArgs),
}

/// Arguments for `costforge estimate`.
#[derive(Args)]
pub struct EstimateArgs {
    /// Target monthly amount to converge on
    #[arg(short, long)]
    pub target: f64,

    /// Path to the catalog YAML file (defaults to the configured path)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Absolute tolerance on |target - achieved|
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Maximum submit/measure attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Title for the estimate session
    #[arg(long, default_value = "Costforge estimate")]
    pub title: String,

    /// Path to a config file (defaults to costforge.yaml + COSTFORGE_* env)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for `costforge allocate`.
#[derive(Args)]
pub struct AllocateArgs {
    /// Target amount to distribute across the catalog
    #[arg(short, long)]
    pub target: f64,

    /// Path to the catalog YAML file (defaults to the configured path)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Path to a config file (defaults to costforge.yaml + COSTFORGE_* env)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for `costforge catalog`.
#[derive(Args)]
pub struct CatalogArgs {
    /// Catalog subcommand.
    #[command(subcommand)]
    pub command: CatalogCommands,
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List the catalog's priced lines
    Show {
        /// Path to the catalog YAML file (defaults to the configured path)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Path to a config file (defaults to costforge.yaml + COSTFORGE_* env)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
