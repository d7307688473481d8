//! # foldsync-engine
//!
//! One-way tree mirroring: compare a source and a replica directory tree
//! and apply the minimal set of copy and delete operations to make the
//! replica match the source.
//!
//! Call [`run_pass`] for one full pass. Every mutating action is recorded
//! through a [`Journal`], which appends timestamped lines to stdout and
//! an append-only log file.

pub mod error;
pub mod journal;
pub mod mirror;
pub mod types;

pub use error::EngineError;
pub use journal::Journal;
pub use mirror::{ensure_replica_root, run_pass};
pub use types::{EndpointRole, PassOutcome, SyncEndpoint};
