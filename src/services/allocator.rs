//! Equal-share-per-service budget allocator.

use std::collections::BTreeMap;

use crate::domain::models::catalog::Catalog;
use crate::domain::models::plan::{AllocationPlan, PlannedLine};

/// Service for distributing a target amount across a catalog of priced lines.
///
/// The target is divided equally across service groups, then equally across
/// the lines within each group, so that every line's **cost** (not quantity)
/// is its group's share divided by the group's line count. Equal division
/// avoids biasing toward cheaper or more numerous services; this is a design
/// choice, not a cost-weighted optimization.
///
/// Allocation is pure and deterministic: identical inputs always produce an
/// identical plan. Grouping uses `BTreeMap` so iteration order never depends
/// on hash seeds.
#[derive(Debug, Clone, Default)]
pub struct Allocator;

impl Allocator {
    /// Create a new allocator.
    pub fn new() -> Self {
        Self
    }

    /// Distribute `target_amount` across the catalog's priced lines.
    ///
    /// Returns an empty plan when the target is non-positive or no line has a
    /// positive unit price; both are documented no-ops, not failures. Lines
    /// priced at or below zero are treated as non-priceable metadata and
    /// never receive a quantity.
    pub fn allocate(&self, target_amount: f64, catalog: &Catalog) -> AllocationPlan {
        let mut plan = AllocationPlan::empty(target_amount);
        if target_amount <= 0.0 {
            return plan;
        }

        // Partition priceable lines by service group.
        let mut groups: BTreeMap<&str, Vec<(&str, f64)>> = BTreeMap::new();
        for (service, meters) in &catalog.services {
            for (meter, &price) in meters {
                if price > 0.0 {
                    groups
                        .entry(service.as_str())
                        .or_default()
                        .push((meter.as_str(), price));
                }
            }
        }
        if groups.is_empty() {
            return plan;
        }

        let per_service_share = target_amount / groups.len() as f64;
        for (service, lines) in &groups {
            let per_line_share = per_service_share / lines.len() as f64;
            for (meter, price) in lines {
                let quantity = per_line_share / price;
                // Non-positive quantities can only come from non-positive
                // shares; such lines are omitted from the plan entirely.
                if quantity <= 0.0 {
                    continue;
                }
                plan.lines.push(PlannedLine {
                    line_key: format!("{service}/{meter}"),
                    service_group: (*service).to_string(),
                    meter: (*meter).to_string(),
                    unit_price: *price,
                    quantity,
                });
            }
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn catalog(entries: &[(&str, &str, f64)]) -> Catalog {
        let mut c = Catalog::default();
        for (service, meter, price) in entries {
            c.services
                .entry((*service).to_string())
                .or_default()
                .insert((*meter).to_string(), *price);
        }
        c
    }

    #[test]
    fn plan_total_matches_target() {
        let cat = catalog(&[
            ("ec2", "hours", 0.1),
            ("ec2", "ebs_gb", 0.08),
            ("s3", "storage_gb", 0.023),
            ("lambda", "gb_seconds", 0.0000167),
        ]);
        let plan = Allocator::new().allocate(1234.56, &cat);
        assert!((plan.total_cost() - 1234.56).abs() < TOLERANCE);
    }

    #[test]
    fn each_group_receives_an_equal_share() {
        let cat = catalog(&[
            ("ec2", "hours", 0.1),
            ("ec2", "ebs_gb", 0.08),
            ("s3", "storage_gb", 0.023),
        ]);
        let plan = Allocator::new().allocate(90.0, &cat);
        // 2 groups, 45 each; ec2's share split equally over its 2 lines
        assert!((plan.group_cost("ec2") - 45.0).abs() < TOLERANCE);
        assert!((plan.group_cost("s3") - 45.0).abs() < TOLERANCE);
        for line in plan.lines.iter().filter(|l| l.service_group == "ec2") {
            assert!((line.cost() - 22.5).abs() < TOLERANCE);
        }
    }

    #[test]
    fn single_service_single_line_absorbs_full_target() {
        let cat = catalog(&[("ec2", "hours", 0.5)]);
        let plan = Allocator::new().allocate(100.0, &cat);
        assert_eq!(plan.len(), 1);
        assert!((plan.lines[0].quantity - 200.0).abs() < TOLERANCE);
        assert!((plan.total_cost() - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn one_group_three_prices_split_by_cost_not_quantity() {
        // Lines priced {10, 5, 1} in one service, target 26: per-line cost is
        // 26/3, so quantities come out as {0.8667, 1.7333, 8.6667}.
        let cat = catalog(&[("svc", "a", 10.0), ("svc", "b", 5.0), ("svc", "c", 1.0)]);
        let plan = Allocator::new().allocate(26.0, &cat);
        assert_eq!(plan.len(), 3);
        for line in &plan.lines {
            assert!((line.cost() - 26.0 / 3.0).abs() < TOLERANCE);
        }
        assert!((plan.total_cost() - 26.0).abs() < TOLERANCE);
    }

    #[test]
    fn two_groups_split_before_lines() {
        // Two lines in service A (price 1 each) plus one line in service B
        // (price 1), target 6: A's lines cost 1.5 each, B's line costs 3.0.
        let cat = catalog(&[("a", "x", 1.0), ("a", "y", 1.0), ("b", "z", 1.0)]);
        let plan = Allocator::new().allocate(6.0, &cat);
        for line in plan.lines.iter().filter(|l| l.service_group == "a") {
            assert!((line.cost() - 1.5).abs() < TOLERANCE);
        }
        assert!((plan.group_cost("b") - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn zero_target_allocates_nothing() {
        let cat = catalog(&[("ec2", "hours", 0.1)]);
        assert!(Allocator::new().allocate(0.0, &cat).is_empty());
    }

    #[test]
    fn negative_target_allocates_nothing() {
        let cat = catalog(&[("ec2", "hours", 0.1)]);
        assert!(Allocator::new().allocate(-5.0, &cat).is_empty());
    }

    #[test]
    fn non_positive_prices_never_receive_quantity() {
        let cat = catalog(&[
            ("ec2", "hours", 0.1),
            ("ec2", "legacy_metadata", 0.0),
            ("s3", "deprecated", -1.0),
        ]);
        let plan = Allocator::new().allocate(50.0, &cat);
        // s3 has no priceable lines, so ec2 is the only group
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.lines[0].meter, "hours");
        assert!((plan.total_cost() - 50.0).abs() < TOLERANCE);
    }

    #[test]
    fn catalog_without_priceable_lines_yields_empty_plan() {
        let cat = catalog(&[("ec2", "legacy", 0.0)]);
        assert!(Allocator::new().allocate(100.0, &cat).is_empty());
    }

    #[test]
    fn allocation_is_deterministic() {
        let cat = catalog(&[
            ("ec2", "hours", 0.1),
            ("s3", "storage_gb", 0.023),
            ("rds", "hours", 0.068),
        ]);
        let allocator = Allocator::new();
        let first = allocator.allocate(777.0, &cat);
        let second = allocator.allocate(777.0, &cat);
        assert_eq!(first, second);
    }

    #[test]
    fn line_keys_are_unique_within_a_plan() {
        let cat = catalog(&[
            ("ec2", "hours", 0.1),
            ("ec2", "ebs_gb", 0.08),
            ("s3", "storage_gb", 0.023),
        ]);
        let plan = Allocator::new().allocate(10.0, &cat);
        let mut keys: Vec<&str> = plan.lines.iter().map(|l| l.line_key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), plan.len());
    }
}
