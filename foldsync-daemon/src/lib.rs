//! Periodic scheduler runtime: one immediate mirroring pass at startup,
//! then one pass per interval tick until a stop signal arrives.

mod error;
mod runtime;

pub use error::DaemonError;
pub use runtime::{Scheduler, StopHandle};
