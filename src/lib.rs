// ABOUTME: Library root for registry-prune - exposes the pipeline for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cancel;
pub mod config;
pub mod error;
pub mod output;
pub mod prune;
pub mod registry;
pub mod report;
pub mod types;
