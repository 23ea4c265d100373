//! # conveyor-sync
//!
//! Hash-gated build-output synchronization.
//!
//! Call [`pipeline::run`] to scan a root's source directory, copy changed
//! files into the distribution directory under hash-suffixed names, and
//! sweep artifacts the ledger no longer references. [`status::check`] and
//! [`diff::diff_root`] inspect the same state without writing.

pub mod copier;
pub mod diff;
pub mod error;
pub mod hasher;
pub mod ledger;
pub mod pipeline;
pub mod status;
pub mod sweep;

pub use copier::CopyOutcome;
pub use error::SyncError;
pub use pipeline::{run, SyncFailure, SyncOptions, SyncReport};
pub use status::{SourceState, StatusReport};
