//! Closed-loop target convergence against an estimate service.
//!
//! Each attempt allocates quantities for the current working target, retracts
//! the previous attempt's submissions, submits the new plan and measures the
//! service's own computed total. The working target is then corrected
//! additively by the measured deviation (a damped proportional-control step)
//! until the achieved total lands within tolerance or the attempt budget is
//! spent. Attempts are strictly sequential: each one depends on the prior
//! measurement, so nothing here fans out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::select;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::errors::{EstimateError, EstimateResult};
use crate::domain::models::catalog::Catalog;
use crate::domain::models::convergence::{
    ConvergenceOutcome, ConvergencePhase, ConvergenceSettings, ConvergenceState,
};
use crate::domain::models::plan::AllocationPlan;
use crate::domain::ports::EstimateService;

use super::allocator::Allocator;

/// Orchestrates repeated submit/measure/correct attempts against an
/// [`EstimateService`] until the achieved total converges on the target.
///
/// Service calls are the only suspension points; each is raced against the
/// shutdown channel so cancellation aborts promptly. On cancellation the loop
/// returns the last successfully submitted plan, never the in-progress one.
pub struct ConvergenceLoop<E: EstimateService> {
    service: Arc<E>,
    allocator: Allocator,
    settings: ConvergenceSettings,
    shutdown_tx: broadcast::Sender<()>,
    // The broadcast channel only reaches receivers that already subscribed;
    // the flag makes shutdown sticky so a pre-run request is not lost.
    shutdown_requested: AtomicBool,
}

impl<E: EstimateService> ConvergenceLoop<E> {
    /// Create a new convergence loop over an estimate service.
    pub fn new(service: Arc<E>, settings: ConvergenceSettings) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            service,
            allocator: Allocator::new(),
            settings,
            shutdown_tx,
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Trigger graceful shutdown; the loop stops before the next service call.
    ///
    /// Shutdown is sticky: a request issued before `converge` starts still
    /// cancels the run, and a shut-down loop will not start new attempts.
    pub fn shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    /// Drive the session's usage entries until the achieved total is within
    /// tolerance of `target_amount`.
    ///
    /// A non-positive target or a catalog without priceable lines is a no-op
    /// and returns an empty outcome rather than an error. Exhausting the
    /// attempt budget returns the best-effort plan with `converged: false`;
    /// the only hard failures are per-line rejections (all-or-nothing per
    /// attempt) and transport errors, both of which abort the run.
    pub async fn converge(
        &self,
        session_id: &str,
        target_amount: f64,
        catalog: &Catalog,
    ) -> EstimateResult<ConvergenceOutcome> {
        self.settings.validate()?;

        if target_amount <= 0.0 || catalog.priceable_line_count() == 0 {
            debug!(target_amount, "Nothing to allocate, returning empty plan");
            return Ok(ConvergenceOutcome {
                plan: AllocationPlan::empty(target_amount),
                achieved_amount: 0.0,
                attempts: 0,
                converged: false,
            });
        }

        let mut state = ConvergenceState::new(target_amount);
        let mut last_plan = AllocationPlan::empty(target_amount);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!(
            session_id,
            target_amount,
            tolerance = self.settings.tolerance,
            max_attempts = self.settings.max_attempts,
            "Starting convergence run"
        );

        while state.attempt < self.settings.max_attempts {
            // Cancellation is checked between attempts.
            if self.shutdown_requested.load(Ordering::SeqCst) {
                info!(
                    attempt = state.attempt,
                    "Shutdown requested, returning last submitted plan"
                );
                return Ok(ConvergenceOutcome {
                    plan: last_plan,
                    achieved_amount: state.achieved_amount,
                    attempts: state.attempt,
                    converged: false,
                });
            }
            state.attempt += 1;

            debug!(
                phase = %ConvergencePhase::Allocating,
                attempt = state.attempt,
                current_target = state.current_target,
                "Allocating plan for working target"
            );
            let plan = self.allocator.allocate(state.current_target, catalog);

            // The service has no replace operation: stale entries from the
            // prior attempt must be retracted before new ones are created or
            // the achieved total double-counts them.
            if !state.previous_submission_ids.is_empty() {
                debug!(
                    phase = %ConvergencePhase::Submitting,
                    attempt = state.attempt,
                    stale = state.previous_submission_ids.len(),
                    "Retracting previous submissions"
                );
                select! {
                    res = self
                        .service
                        .delete_usage(session_id, &state.previous_submission_ids) => res?,
                    _ = shutdown_rx.recv() => {
                        info!(attempt = state.attempt, "Shutdown during retraction");
                        return Ok(ConvergenceOutcome {
                            plan: last_plan,
                            achieved_amount: state.achieved_amount,
                            attempts: state.attempt,
                            converged: false,
                        });
                    }
                }
            }

            debug!(
                phase = %ConvergencePhase::Submitting,
                attempt = state.attempt,
                lines = plan.len(),
                "Submitting plan"
            );
            let receipt = select! {
                res = self.service.submit_usage(session_id, &plan) => res?,
                _ = shutdown_rx.recv() => {
                    info!(attempt = state.attempt, "Shutdown during submission");
                    return Ok(ConvergenceOutcome {
                        plan: last_plan,
                        achieved_amount: state.achieved_amount,
                        attempts: state.attempt,
                        converged: false,
                    });
                }
            };
            if !receipt.is_clean() {
                // All-or-nothing: a mixed accept/reject state cannot be
                // safely tracked for later retraction, so the run aborts.
                warn!(
                    phase = %ConvergencePhase::Failed,
                    attempt = state.attempt,
                    rejected = receipt.rejections.len(),
                    "Service rejected lines, aborting run"
                );
                return Err(EstimateError::LinesRejected(receipt.rejections));
            }
            state.replace_submissions(receipt.submission_ids);
            last_plan = plan;

            debug!(
                phase = %ConvergencePhase::Measuring,
                attempt = state.attempt,
                "Reading back achieved total"
            );
            state.achieved_amount = select! {
                res = self.service.achieved_total(session_id) => res?,
                _ = shutdown_rx.recv() => {
                    info!(attempt = state.attempt, "Shutdown during measurement");
                    return Ok(ConvergenceOutcome {
                        plan: last_plan,
                        achieved_amount: state.achieved_amount,
                        attempts: state.attempt,
                        converged: false,
                    });
                }
            };

            let diff = state.diff();
            if diff.abs() < self.settings.tolerance {
                info!(
                    phase = %ConvergencePhase::Converged,
                    attempts = state.attempt,
                    achieved = state.achieved_amount,
                    "Converged within tolerance"
                );
                return Ok(ConvergenceOutcome {
                    plan: last_plan,
                    achieved_amount: state.achieved_amount,
                    attempts: state.attempt,
                    converged: true,
                });
            }

            debug!(
                phase = %ConvergencePhase::Retrying,
                attempt = state.attempt,
                diff,
                achieved = state.achieved_amount,
                "Deviation above tolerance, correcting working target"
            );
            state.current_target += diff;
        }

        warn!(
            phase = %ConvergencePhase::Exhausted,
            attempts = state.attempt,
            achieved = state.achieved_amount,
            "Attempt budget spent, returning best effort"
        );
        Ok(ConvergenceOutcome {
            plan: last_plan,
            achieved_amount: state.achieved_amount,
            attempts: state.attempt,
            converged: false,
        })
    }
}
