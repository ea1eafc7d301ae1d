//! Adapters implementing the domain ports.

pub mod simulated;

pub use simulated::{SimulatedEstimateService, SimulatedServiceConfig};
