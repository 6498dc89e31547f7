use std::fmt;

use thiserror::Error;

/// The action a transient failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    SaveDraft,
    ResetToInput,
    SaveRanking,
    Generate,
}

impl fmt::Display for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowAction::SaveDraft => write!(f, "Saving your jobs"),
            FlowAction::ResetToInput => write!(f, "Going back"),
            FlowAction::SaveRanking => write!(f, "Saving your ranking"),
            FlowAction::Generate => write!(f, "AI analysis"),
        }
    }
}

/// Failures the wizard can meet. None of them is fatal: each one resolves to
/// a renderable state and, where it matters, a notice for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// A save, fetch or generate call failed. Retried only by the user.
    #[error("{action} failed: {message}")]
    TransientIo { action: FlowAction, message: String },
    /// Fewer than the required number of entries are filled in.
    #[error("Please fill in all {required} jobs ({filled} so far)")]
    Validation { filled: usize, required: usize },
    /// The service answered but produced no usable narrative.
    #[error("No AI feedback was produced this time")]
    DegradedGeneration,
}
