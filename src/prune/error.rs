// ABOUTME: Fatal pipeline errors and the abort reason the orchestrator reports.
// ABOUTME: Per-image rejections are outcomes, not errors.

use super::outcome::DeletionOutcome;
use crate::registry::RegistryError;
use snafu::Snafu;

/// A listing page could not be fetched. Nothing has been deleted.
#[derive(Debug, thiserror::Error)]
#[error(
    "failed to list images after {pages_fetched} page(s) and {images_fetched} image(s): {source}"
)]
pub struct EnumerationError {
    pub pages_fetched: usize,
    pub images_fetched: usize,
    pub source: RegistryError,
}

/// The delete request itself failed. Some images may or may not be gone.
#[derive(Debug, thiserror::Error)]
#[error(
    "batch delete of {attempted} image(s) failed after {} were processed: {source}",
    .completed.len()
)]
pub struct BatchCallError {
    pub attempted: usize,
    /// Outcomes of earlier requests when the batch limit forced several.
    pub completed: Vec<DeletionOutcome>,
    pub source: RegistryError,
}

/// Why a run stopped before reporting outcomes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AbortReason {
    #[snafu(display("image enumeration failed: {source}"))]
    Enumeration { source: EnumerationError },

    #[snafu(display("batch delete failed: {source}"))]
    BatchCall { source: BatchCallError },
}

/// Abort stage for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortKind {
    /// Listing failed before any mutation.
    Enumeration,
    /// The delete request failed; repository state is indeterminate.
    BatchCall,
}

impl AbortReason {
    pub fn kind(&self) -> AbortKind {
        match self {
            AbortReason::Enumeration { .. } => AbortKind::Enumeration,
            AbortReason::BatchCall { .. } => AbortKind::BatchCall,
        }
    }

    /// The registry error underneath either stage.
    pub fn registry_error(&self) -> &RegistryError {
        match self {
            AbortReason::Enumeration { source } => &source.source,
            AbortReason::BatchCall { source } => &source.source,
        }
    }

    /// Per-image outcomes known before the run stopped.
    pub fn completed_outcomes(&self) -> &[DeletionOutcome] {
        match self {
            AbortReason::Enumeration { .. } => &[],
            AbortReason::BatchCall { source } => &source.completed,
        }
    }

    /// What the caller should do before running again.
    pub fn advice(&self) -> &'static str {
        match self.kind() {
            AbortKind::Enumeration => "nothing was deleted; the run can be retried as is",
            AbortKind::BatchCall => {
                "some images may already be deleted; list the repository again before retrying"
            }
        }
    }
}

impl From<EnumerationError> for AbortReason {
    fn from(source: EnumerationError) -> Self {
        AbortReason::Enumeration { source }
    }
}

impl From<BatchCallError> for AbortReason {
    fn from(source: BatchCallError) -> Self {
        AbortReason::BatchCall { source }
    }
}
