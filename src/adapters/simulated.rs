//! In-process estimate service with opaque cost rules.
//!
//! Stands in for the real pricing-estimate backend. Its achieved total
//! intentionally diverges from the naive `quantity * unit_price` sum: line
//! costs are rounded to cents, every service group with usage is billed at
//! least a minimum fee, and totals above a tier threshold receive a discount.
//! The convergence loop exists to absorb exactly this kind of divergence.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::{EstimateError, EstimateResult};
use crate::domain::models::config::SimulationConfig;
use crate::domain::models::plan::AllocationPlan;
use crate::domain::ports::{EstimateService, LineRejection, SubmissionReceipt};

/// Cost rules applied by [`SimulatedEstimateService`].
#[derive(Debug, Clone)]
pub struct SimulatedServiceConfig {
    /// Minimum amount billed per service group that has any usage.
    pub minimum_service_fee: f64,
    /// Total above which the tier discount applies.
    pub tier_threshold: f64,
    /// Fractional discount applied above the tier threshold.
    pub tier_discount_pct: f64,
    /// Service groups the backend refuses to price.
    pub rejected_services: Vec<String>,
}

impl Default for SimulatedServiceConfig {
    fn default() -> Self {
        Self {
            minimum_service_fee: 1.0,
            tier_threshold: 10_000.0,
            tier_discount_pct: 0.05,
            rejected_services: vec![],
        }
    }
}

impl SimulatedServiceConfig {
    /// Construct from a [`SimulationConfig`] loaded from `costforge.yaml`.
    pub fn from_config(cfg: &SimulationConfig) -> Self {
        Self {
            minimum_service_fee: cfg.minimum_service_fee,
            tier_threshold: cfg.tier_threshold,
            tier_discount_pct: cfg.tier_discount_pct,
            rejected_services: cfg.rejected_services.clone(),
        }
    }
}

/// One stored usage entry.
#[derive(Debug, Clone)]
struct UsageEntry {
    service_group: String,
    quantity: f64,
    unit_price: f64,
}

/// One estimate session and its usage entries, keyed by submission id.
#[derive(Debug, Default)]
struct Session {
    entries: HashMap<String, UsageEntry>,
}

/// Simulated [`EstimateService`] holding sessions in memory.
#[derive(Debug, Default)]
pub struct SimulatedEstimateService {
    config: SimulatedServiceConfig,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SimulatedEstimateService {
    /// Create a simulated service with the given cost rules.
    pub fn new(config: SimulatedServiceConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Apply the service's own cost computation to a session's entries.
    fn compute_total(&self, entries: &HashMap<String, UsageEntry>) -> f64 {
        let mut by_service: BTreeMap<&str, f64> = BTreeMap::new();
        for entry in entries.values() {
            *by_service.entry(entry.service_group.as_str()).or_default() +=
                round_cents(entry.quantity * entry.unit_price);
        }

        let mut total: f64 = by_service
            .values()
            .map(|cost| cost.max(self.config.minimum_service_fee))
            .sum();
        if total > self.config.tier_threshold {
            total *= 1.0 - self.config.tier_discount_pct;
        }
        round_cents(total)
    }
}

/// Round a monetary amount to cents, as the backend bills.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[async_trait]
impl EstimateService for SimulatedEstimateService {
    async fn create_session(&self, title: &str) -> EstimateResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), Session::default());
        debug!(session_id = %id, title, "Created estimate session");
        Ok(id)
    }

    async fn submit_usage(
        &self,
        session_id: &str,
        plan: &AllocationPlan,
    ) -> EstimateResult<SubmissionReceipt> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| EstimateError::SessionNotFound(session_id.to_string()))?;

        let mut receipt = SubmissionReceipt::default();
        for line in &plan.lines {
            if self.config.rejected_services.contains(&line.service_group) {
                receipt.rejections.push(LineRejection {
                    service_group: line.service_group.clone(),
                    code: "UNSUPPORTED_SERVICE".to_string(),
                    message: format!("service {} cannot be estimated", line.service_group),
                });
                continue;
            }
            let id = Uuid::new_v4().to_string();
            session.entries.insert(
                id.clone(),
                UsageEntry {
                    service_group: line.service_group.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                },
            );
            receipt.submission_ids.push(id);
        }
        debug!(
            session_id,
            accepted = receipt.submission_ids.len(),
            rejected = receipt.rejections.len(),
            "Processed usage submission"
        );
        Ok(receipt)
    }

    async fn delete_usage(
        &self,
        session_id: &str,
        submission_ids: &[String],
    ) -> EstimateResult<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| EstimateError::SessionNotFound(session_id.to_string()))?;
        for id in submission_ids {
            session.entries.remove(id);
        }
        debug!(session_id, deleted = submission_ids.len(), "Deleted usage entries");
        Ok(())
    }

    async fn achieved_total(&self, session_id: &str) -> EstimateResult<f64> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .ok_or_else(|| EstimateError::SessionNotFound(session_id.to_string()))?;
        Ok(self.compute_total(&session.entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::plan::PlannedLine;

    fn plan(lines: &[(&str, &str, f64, f64)]) -> AllocationPlan {
        AllocationPlan {
            target_amount: lines.iter().map(|(_, _, p, q)| p * q).sum(),
            lines: lines
                .iter()
                .map(|(service, meter, price, quantity)| PlannedLine {
                    line_key: format!("{service}/{meter}"),
                    service_group: (*service).to_string(),
                    meter: (*meter).to_string(),
                    unit_price: *price,
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    fn service() -> SimulatedEstimateService {
        SimulatedEstimateService::new(SimulatedServiceConfig {
            minimum_service_fee: 1.0,
            tier_threshold: 10_000.0,
            tier_discount_pct: 0.05,
            rejected_services: vec![],
        })
    }

    #[tokio::test]
    async fn unknown_session_is_an_error() {
        let svc = service();
        let err = svc.achieved_total("missing").await.unwrap_err();
        assert!(matches!(err, EstimateError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn submit_then_measure_applies_rounding() {
        let svc = service();
        let session = svc.create_session("test").await.unwrap();
        // 3.333 * 1.0 = 3.333 rounds to 3.33
        let receipt = svc
            .submit_usage(&session, &plan(&[("ec2", "hours", 1.0, 3.333)]))
            .await
            .unwrap();
        assert!(receipt.is_clean());
        let total = svc.achieved_total(&session).await.unwrap();
        assert!((total - 3.33).abs() < 1e-9);
    }

    #[tokio::test]
    async fn minimum_fee_floors_tiny_services() {
        let svc = service();
        let session = svc.create_session("test").await.unwrap();
        svc.submit_usage(&session, &plan(&[("s3", "gb", 0.01, 1.0)]))
            .await
            .unwrap();
        // Naive cost 0.01, billed at the 1.0 minimum
        let total = svc.achieved_total(&session).await.unwrap();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn tier_discount_applies_above_threshold() {
        let svc = service();
        let session = svc.create_session("test").await.unwrap();
        svc.submit_usage(&session, &plan(&[("ec2", "hours", 1.0, 20_000.0)]))
            .await
            .unwrap();
        let total = svc.achieved_total(&session).await.unwrap();
        assert!((total - 19_000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn delete_removes_contribution() {
        let svc = service();
        let session = svc.create_session("test").await.unwrap();
        let receipt = svc
            .submit_usage(
                &session,
                &plan(&[("ec2", "hours", 1.0, 100.0), ("s3", "gb", 1.0, 50.0)]),
            )
            .await
            .unwrap();
        assert!((svc.achieved_total(&session).await.unwrap() - 150.0).abs() < 1e-9);

        svc.delete_usage(&session, &receipt.submission_ids)
            .await
            .unwrap();
        assert!((svc.achieved_total(&session).await.unwrap() - 0.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn configured_services_are_rejected_per_line() {
        let svc = SimulatedEstimateService::new(SimulatedServiceConfig {
            rejected_services: vec!["mainframe".to_string()],
            ..SimulatedServiceConfig::default()
        });
        let session = svc.create_session("test").await.unwrap();
        let receipt = svc
            .submit_usage(
                &session,
                &plan(&[("ec2", "hours", 1.0, 10.0), ("mainframe", "mips", 5.0, 2.0)]),
            )
            .await
            .unwrap();
        assert_eq!(receipt.submission_ids.len(), 1);
        assert_eq!(receipt.rejections.len(), 1);
        assert_eq!(receipt.rejections[0].service_group, "mainframe");
        assert_eq!(receipt.rejections[0].code, "UNSUPPORTED_SERVICE");
    }
}
