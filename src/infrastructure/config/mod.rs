//! Configuration loading via figment.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
