//! Ports consumed by the convergence engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::EstimateResult;
use super::models::plan::AllocationPlan;

/// A per-line failure reported by the estimate service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRejection {
    /// The service group of the rejected line.
    pub service_group: String,
    /// Machine-readable service error code.
    pub code: String,
    /// Human-readable reason from the service.
    pub message: String,
}

/// Result of a batched usage submission.
///
/// The service reports outcomes per line; the convergence loop treats any
/// rejection as failing the whole attempt, because submission ids are only
/// meaningful as a complete set when they are later retracted.
#[derive(Debug, Clone, Default)]
pub struct SubmissionReceipt {
    /// Identifiers of the created usage entries, one per accepted line.
    pub submission_ids: Vec<String>,
    /// Per-line failures, empty on full success.
    pub rejections: Vec<LineRejection>,
}

impl SubmissionReceipt {
    /// Whether every line was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// External pricing-estimate service driven by the convergence loop.
///
/// The service computes its own total for submitted usage, which may diverge
/// from the naive `quantity * unit_price` sum due to internal rounding,
/// minimums or tiering. It has no replace operation: correcting a submission
/// requires deleting the prior entries and creating new ones, or the total
/// double-counts the previous attempt.
#[async_trait]
pub trait EstimateService: Send + Sync {
    /// Create an estimate session and return its identifier.
    async fn create_session(&self, title: &str) -> EstimateResult<String>;

    /// Create usage entries for every line of the plan.
    ///
    /// Returns a receipt with one submission id per accepted line and a
    /// rejection entry (service code + message) per failed line.
    async fn submit_usage(
        &self,
        session_id: &str,
        plan: &AllocationPlan,
    ) -> EstimateResult<SubmissionReceipt>;

    /// Delete previously created usage entries.
    async fn delete_usage(&self, session_id: &str, submission_ids: &[String])
        -> EstimateResult<()>;

    /// Read back the service's own computed total for the session.
    async fn achieved_total(&self, session_id: &str) -> EstimateResult<f64>;
}
