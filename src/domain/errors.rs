//! Domain errors for the costforge estimation engine.

use thiserror::Error;

use super::ports::LineRejection;

/// Format rejected lines as `service (code): message; ...` for aggregation
/// into a single error message.
fn format_rejections(rejections: &[LineRejection]) -> String {
    rejections
        .iter()
        .map(|r| format!("{} ({}): {}", r.service_group, r.code, r.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Domain-level errors that can occur while driving an estimate service.
///
/// A target of zero or less, or an empty catalog, is a documented no-op and
/// never surfaces as an error; exhausting the attempt budget is a best-effort
/// result, not a failure.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// The service rejected one or more lines of a submission. The attempt is
    /// all-or-nothing, so a single rejection fails the entire convergence run.
    #[error("Estimate service rejected {} line(s): {}", .0.len(), format_rejections(.0))]
    LinesRejected(Vec<LineRejection>),

    /// A create/delete/measure call failed at the transport level. Propagated
    /// immediately; retry policy belongs to the service adapter, not the loop.
    #[error("Transport failure during {operation}: {message}")]
    Transport {
        /// The service operation that failed (e.g. `submit_usage`).
        operation: String,
        /// The adapter-reported failure message.
        message: String,
    },

    /// The referenced estimate session does not exist.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Tolerance or attempt budget failed validation.
    #[error("Invalid convergence settings: {0}")]
    InvalidSettings(String),
}

impl EstimateError {
    /// Build a [`EstimateError::Transport`] for a failed service call.
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for results carrying [`EstimateError`].
pub type EstimateResult<T> = Result<T, EstimateError>;
