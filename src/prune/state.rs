// ABOUTME: Run state marker types for the type state pattern.
// ABOUTME: Each marker carries the data the next transition needs.

use super::outcome::PruneResult;
use crate::types::{ImageIdentifier, ImageRecord};
use nonempty::NonEmpty;

/// Initial state: nothing fetched yet.
/// Available actions: `enumerate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Enumerating;

/// Every page drained.
/// Available actions: `filter()`
#[derive(Debug, Clone)]
pub struct Filtering {
    pub(crate) records: Vec<ImageRecord>,
}

/// At least one dangling image found.
/// Available actions: `prune()`
#[derive(Debug, Clone)]
pub struct Pruning {
    pub(crate) scanned: usize,
    pub(crate) candidates: NonEmpty<ImageIdentifier>,
}

/// Outcomes known, ready for the reporter.
/// Available actions: `result()`, `into_result()`
#[derive(Debug, Clone)]
pub struct Reporting {
    pub(crate) result: PruneResult,
}
