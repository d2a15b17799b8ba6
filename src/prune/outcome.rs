// ABOUTME: Per-image deletion outcomes and the aggregate result of one run.
// ABOUTME: One outcome exists for every identifier submitted for deletion.

use crate::types::ImageIdentifier;
use serde::Serialize;

/// What happened to one image submitted for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeletionOutcome {
    Success {
        image: ImageIdentifier,
    },
    /// The registry accepted the call but refused this image.
    Failure {
        image: ImageIdentifier,
        code: Option<String>,
        reason: Option<String>,
    },
}

impl DeletionOutcome {
    pub fn image(&self) -> &ImageIdentifier {
        match self {
            DeletionOutcome::Success { image } | DeletionOutcome::Failure { image, .. } => image,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DeletionOutcome::Failure { .. })
    }
}

/// Everything one run learned about the repository and did to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneResult {
    pub total_scanned: usize,
    pub candidates_for_deletion: usize,
    pub outcomes: Vec<DeletionOutcome>,
}

impl PruneResult {
    /// Result for a repository with nothing dangling.
    pub fn nothing_to_delete(total_scanned: usize) -> Self {
        Self {
            total_scanned,
            candidates_for_deletion: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn deleted(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(DeletionOutcome::is_failure)
    }
}
