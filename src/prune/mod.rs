// ABOUTME: The prune pipeline: enumerate, filter, batch delete.
// ABOUTME: Exports state markers, the Prune<S> orchestrator, and outcome types.

mod batch;
mod enumerate;
mod error;
mod filter;
mod outcome;
mod pipeline;
mod state;

pub use batch::{NOT_REPORTED, batch_delete};
pub use enumerate::enumerate_images;
pub use error::{AbortKind, AbortReason, BatchCallError, EnumerationError};
pub use filter::{dangling, deletion_candidates};
pub use outcome::{DeletionOutcome, PruneResult};
pub use pipeline::{Filtered, Prune, RunOutcome, run};
pub use state::{Enumerating, Filtering, Pruning, Reporting};
