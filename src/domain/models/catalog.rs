//! Price catalog model and YAML loading.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Static price catalog: service group -> meter -> price per unit.
///
/// Entries with a non-positive price are retained as metadata but are never
/// allocated a quantity. `BTreeMap` keeps iteration order deterministic so
/// the allocator produces identical plans for identical catalogs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Catalog {
    /// Per-service meter prices.
    #[serde(default)]
    pub services: BTreeMap<String, BTreeMap<String, f64>>,
}

/// One billable usage dimension (service + metered unit) with a unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLine {
    /// The billable service this line belongs to.
    pub service_group: String,
    /// The metered unit (e.g. `storage_gb_month`).
    pub meter: String,
    /// Price per unit in the catalog currency.
    pub unit_price: f64,
}

impl CatalogLine {
    /// Whether this line can receive an allocation at all.
    pub fn is_priceable(&self) -> bool {
        self.unit_price > 0.0
    }
}

impl Catalog {
    /// Parse a catalog from YAML text.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    /// Load a catalog from a YAML file on disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))
    }

    /// Flatten the catalog into an ordered list of lines.
    pub fn lines(&self) -> Vec<CatalogLine> {
        self.services
            .iter()
            .flat_map(|(service, meters)| {
                meters.iter().map(move |(meter, price)| CatalogLine {
                    service_group: service.clone(),
                    meter: meter.clone(),
                    unit_price: *price,
                })
            })
            .collect()
    }

    /// Number of lines that can actually be allocated (positive unit price).
    pub fn priceable_line_count(&self) -> usize {
        self.services
            .values()
            .flat_map(BTreeMap::values)
            .filter(|price| **price > 0.0)
            .count()
    }

    /// Whether the catalog has no services at all.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
