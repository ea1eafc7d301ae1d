//! CLI command implementations.

pub mod allocate;
pub mod catalog;
pub mod estimate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::models::catalog::Catalog;
use crate::domain::models::config::Config;
use crate::infrastructure::config::ConfigLoader;

/// Load configuration from an explicit file or the default hierarchy.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Load the catalog from a CLI override or the configured path.
pub(crate) fn load_catalog(override_path: Option<&PathBuf>, config: &Config) -> Result<Catalog> {
    match override_path {
        Some(path) => Catalog::load_from_path(path),
        None => Catalog::load_from_path(&config.catalog_path),
    }
}
