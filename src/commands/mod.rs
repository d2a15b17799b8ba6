// ABOUTME: Command module aggregator for the registry-prune CLI.
// ABOUTME: Re-exports the prune command handler.

mod prune;

pub use prune::prune;
