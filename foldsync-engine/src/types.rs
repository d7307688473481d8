//! Domain types for the mirroring engine.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths.

use std::fmt;
use std::path::{Path, PathBuf};

/// Which side of the mirror an endpoint plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    /// Read-only ground truth. Must exist before any pass runs.
    Source,
    /// Read-write tree kept in sync with the source. Created if absent.
    Replica,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Source => write!(f, "source"),
            EndpointRole::Replica => write!(f, "replica"),
        }
    }
}

/// A role-tagged directory root.
///
/// Entries under the two endpoints correspond iff their paths relative to
/// each root are equal; that relative path is the only correspondence key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEndpoint {
    pub role: EndpointRole,
    pub root: PathBuf,
}

impl SyncEndpoint {
    pub fn source(root: impl Into<PathBuf>) -> Self {
        Self {
            role: EndpointRole::Source,
            root: root.into(),
        }
    }

    pub fn replica(root: impl Into<PathBuf>) -> Self {
        Self {
            role: EndpointRole::Replica,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Terminal outcome of one mirroring pass.
///
/// A pass never escapes as an error; failures are folded into
/// [`PassOutcome::Failed`] so the scheduler can retry on the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Completed,
    Failed(String),
}

impl PassOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PassOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_constructors_tag_roles() {
        let src = SyncEndpoint::source("/data/in");
        let dst = SyncEndpoint::replica("/data/out");
        assert_eq!(src.role, EndpointRole::Source);
        assert_eq!(dst.role, EndpointRole::Replica);
        assert_eq!(src.root(), Path::new("/data/in"));
        assert_eq!(dst.root(), Path::new("/data/out"));
    }

    #[test]
    fn outcome_predicate() {
        assert!(PassOutcome::Completed.is_completed());
        assert!(!PassOutcome::Failed("boom".into()).is_completed());
    }
}
