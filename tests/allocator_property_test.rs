//! Property tests for the equal-share allocator.

use std::collections::BTreeMap;

use proptest::prelude::*;

use costforge::{Allocator, Catalog};

/// Catalogs with 1..4 services of 1..4 meters each, all positively priced.
fn positive_catalog() -> impl Strategy<Value = Catalog> {
    prop::collection::btree_map(
        "[a-z]{3,8}",
        prop::collection::btree_map("[a-z_]{3,10}", 0.001f64..500.0, 1..4usize),
        1..4usize,
    )
    .prop_map(|services| Catalog { services })
}

/// Catalogs where meters may carry zero or negative prices.
fn mixed_catalog() -> impl Strategy<Value = Catalog> {
    prop::collection::btree_map(
        "[a-z]{3,8}",
        prop::collection::btree_map("[a-z_]{3,10}", -10.0f64..500.0, 1..4usize),
        1..4usize,
    )
    .prop_map(|services| Catalog { services })
}

fn group_costs(plan: &costforge::AllocationPlan) -> BTreeMap<String, f64> {
    let mut costs: BTreeMap<String, f64> = BTreeMap::new();
    for line in &plan.lines {
        *costs.entry(line.service_group.clone()).or_default() += line.cost();
    }
    costs
}

proptest! {
    #[test]
    fn plan_total_matches_target(catalog in positive_catalog(), target in 1.0f64..100_000.0) {
        let plan = Allocator::new().allocate(target, &catalog);
        let total = plan.total_cost();
        prop_assert!((total - target).abs() < 1e-6 * target.max(1.0));
    }

    #[test]
    fn groups_share_the_target_equally(catalog in positive_catalog(), target in 1.0f64..100_000.0) {
        let plan = Allocator::new().allocate(target, &catalog);
        let costs = group_costs(&plan);
        prop_assert_eq!(costs.len(), catalog.services.len());

        let expected = target / costs.len() as f64;
        for cost in costs.values() {
            prop_assert!((cost - expected).abs() < 1e-6 * target.max(1.0));
        }
    }

    #[test]
    fn lines_within_a_group_cost_the_same(catalog in positive_catalog(), target in 1.0f64..100_000.0) {
        let plan = Allocator::new().allocate(target, &catalog);
        for (service, meters) in &catalog.services {
            let share = target / catalog.services.len() as f64 / meters.len() as f64;
            for line in plan.lines.iter().filter(|l| &l.service_group == service) {
                prop_assert!((line.cost() - share).abs() < 1e-6 * target.max(1.0));
            }
        }
    }

    #[test]
    fn non_positive_prices_never_receive_quantity(catalog in mixed_catalog(), target in 1.0f64..100_000.0) {
        let plan = Allocator::new().allocate(target, &catalog);
        for line in &plan.lines {
            prop_assert!(line.unit_price > 0.0);
            prop_assert!(line.quantity > 0.0);
        }
        // When at least one priceable line exists, the full target is placed.
        if catalog.priceable_line_count() > 0 {
            prop_assert!((plan.total_cost() - target).abs() < 1e-6 * target.max(1.0));
        } else {
            prop_assert!(plan.is_empty());
        }
    }

    #[test]
    fn non_positive_target_yields_no_quantities(catalog in positive_catalog(), target in -1_000.0f64..=0.0) {
        let plan = Allocator::new().allocate(target, &catalog);
        prop_assert!(plan.is_empty());
    }
}
