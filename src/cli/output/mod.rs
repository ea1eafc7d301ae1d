//! Terminal output helpers: tables and progress indicators.

pub mod progress;
pub mod table;

pub use progress::create_spinner;
pub use table::{format_catalog_table, format_plan_table};
