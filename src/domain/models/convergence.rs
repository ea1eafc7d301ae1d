//! Convergence run models: settings, phases, state and outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{EstimateError, EstimateResult};
use crate::domain::models::plan::AllocationPlan;

/// Tolerance and retry budget for one convergence run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConvergenceSettings {
    /// Absolute deviation below which `|target - achieved|` counts as converged.
    pub tolerance: f64,
    /// Maximum number of submit/measure attempts before giving up.
    pub max_attempts: u32,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            max_attempts: 8,
        }
    }
}

impl ConvergenceSettings {
    /// Validate that tolerance and attempt budget are usable.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.tolerance <= 0.0 {
            return Err(EstimateError::InvalidSettings(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_attempts == 0 {
            return Err(EstimateError::InvalidSettings(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// State machine labels for a convergence run, used in structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergencePhase {
    /// Computing a plan for the current working target.
    Allocating,
    /// Retracting stale entries and creating new ones.
    Submitting,
    /// Reading back the service's own computed total.
    Measuring,
    /// Achieved total landed within tolerance.
    Converged,
    /// Deviation too large, adjusting the working target.
    Retrying,
    /// Attempt budget spent without convergence (best effort, not a failure).
    Exhausted,
    /// Service rejected lines; the run aborts.
    Failed,
}

impl fmt::Display for ConvergencePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Allocating => "allocating",
            Self::Submitting => "submitting",
            Self::Measuring => "measuring",
            Self::Converged => "converged",
            Self::Retrying => "retrying",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// Mutable state owned by one convergence run and discarded when it ends.
#[derive(Debug, Clone)]
pub struct ConvergenceState {
    /// The caller's original target, never adjusted.
    pub target_amount: f64,
    /// The working target fed to the allocator, corrected each attempt.
    pub current_target: f64,
    /// The most recently measured service total.
    pub achieved_amount: f64,
    /// 1-based attempt counter.
    pub attempt: u32,
    /// Submission ids owned by the current state. Replaced wholesale (never
    /// merged) after each successful submission so stale entries can be
    /// retracted before the next attempt.
    pub previous_submission_ids: Vec<String>,
}

impl ConvergenceState {
    /// Start a fresh run for a target amount.
    pub fn new(target_amount: f64) -> Self {
        Self {
            target_amount,
            current_target: target_amount,
            achieved_amount: 0.0,
            attempt: 0,
            previous_submission_ids: Vec::new(),
        }
    }

    /// Replace the owned submission ids with the latest attempt's ids.
    pub fn replace_submissions(&mut self, ids: Vec<String>) {
        self.previous_submission_ids = ids;
    }

    /// Deviation of the measured total from the original target.
    pub fn diff(&self) -> f64 {
        self.target_amount - self.achieved_amount
    }
}

/// Final result of a convergence run.
///
/// `converged: false` with a populated plan means the attempt budget was
/// exhausted; callers decide whether the achieved amount is acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceOutcome {
    /// The last successfully submitted plan.
    pub plan: AllocationPlan,
    /// The service's computed total for that plan.
    pub achieved_amount: f64,
    /// Number of attempts performed.
    pub attempts: u32,
    /// Whether the achieved total landed within tolerance.
    pub converged: bool,
}
