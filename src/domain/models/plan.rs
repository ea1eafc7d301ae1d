//! Allocation plan model.

use serde::{Deserialize, Serialize};

/// A priced line with a quantity assigned by the allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedLine {
    /// Identifier assigned by the allocator, unique within one submission.
    pub line_key: String,
    /// The billable service this line belongs to.
    pub service_group: String,
    /// The metered unit being purchased.
    pub meter: String,
    /// Price per unit.
    pub unit_price: f64,
    /// Allocated quantity, always positive for submitted lines.
    pub quantity: f64,
}

impl PlannedLine {
    /// The cost contribution of this line: `quantity * unit_price`.
    pub fn cost(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// The quantities assigned to priced lines for one submission attempt.
///
/// A plan is owned by the caller of the allocator and immutable once built;
/// every convergence attempt produces a fresh plan rather than mutating the
/// previous one. Zero-quantity lines are never included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// The target amount this plan was allocated for.
    pub target_amount: f64,
    /// The allocated lines, in deterministic catalog order.
    pub lines: Vec<PlannedLine>,
}

impl AllocationPlan {
    /// Create an empty plan for a target (no allocation occurred).
    pub fn empty(target_amount: f64) -> Self {
        Self {
            target_amount,
            lines: Vec::new(),
        }
    }

    /// Naive total: the sum of `quantity * unit_price` over all lines.
    ///
    /// The estimate service's own computed total may diverge from this due to
    /// rounding, minimums or tiering, which is why the convergence loop
    /// measures rather than trusts this number.
    pub fn total_cost(&self) -> f64 {
        self.lines.iter().map(PlannedLine::cost).sum()
    }

    /// The aggregate cost allocated to one service group.
    pub fn group_cost(&self, service_group: &str) -> f64 {
        self.lines
            .iter()
            .filter(|line| line.service_group == service_group)
            .map(PlannedLine::cost)
            .sum()
    }

    /// Whether the plan contains no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines in the plan.
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
