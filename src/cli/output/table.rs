//! Table output formatting for CLI commands using comfy-table.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::domain::models::catalog::CatalogLine;
use crate::domain::models::plan::AllocationPlan;

/// Create the base table shared by all formatters.
fn create_base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an allocation plan as a table of lines with quantities and costs.
pub fn format_plan_table(plan: &AllocationPlan) -> String {
    let mut table = create_base_table();
    table.set_header(vec![
        Cell::new("Service").add_attribute(Attribute::Bold),
        Cell::new("Meter").add_attribute(Attribute::Bold),
        Cell::new("Unit price").add_attribute(Attribute::Bold),
        Cell::new("Quantity").add_attribute(Attribute::Bold),
        Cell::new("Cost").add_attribute(Attribute::Bold),
    ]);

    for line in &plan.lines {
        table.add_row(vec![
            Cell::new(&line.service_group),
            Cell::new(&line.meter),
            Cell::new(format!("{:.6}", line.unit_price)),
            Cell::new(format!("{:.4}", line.quantity)),
            Cell::new(format!("{:.2}", line.cost())),
        ]);
    }

    table.add_row(vec![
        Cell::new("total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:.2}", plan.total_cost())).add_attribute(Attribute::Bold),
    ]);

    table.to_string()
}

/// Format catalog lines as a table.
pub fn format_catalog_table(lines: &[CatalogLine]) -> String {
    let mut table = create_base_table();
    table.set_header(vec![
        Cell::new("Service").add_attribute(Attribute::Bold),
        Cell::new("Meter").add_attribute(Attribute::Bold),
        Cell::new("Unit price").add_attribute(Attribute::Bold),
        Cell::new("Priceable").add_attribute(Attribute::Bold),
    ]);

    for line in lines {
        table.add_row(vec![
            Cell::new(&line.service_group),
            Cell::new(&line.meter),
            Cell::new(format!("{:.6}", line.unit_price)),
            Cell::new(if line.is_priceable() { "yes" } else { "no" }),
        ]);
    }

    table.to_string()
}
