//! Error types for the symbol layer.

use shimwire_host::HostFault;

use crate::{MemberKind, VersionId};

/// A named symbol could not be found for the current version.
///
/// Cached alongside successes, so it is `Clone`. Recoverable: the caller
/// decides whether the missing symbol is fatal to its feature.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("class {name} not found for version {version}")]
    ClassNotFound { name: String, version: VersionId },

    #[error("{kind} {class}.{name}{signature} not found for version {version}")]
    MemberNotFound {
        class: String,
        name: String,
        kind: MemberKind,
        /// Rendered signature, empty when none was requested.
        signature: String,
        version: VersionId,
    },
}

impl ResolutionError {
    /// The symbolic name that failed to resolve.
    pub fn symbol(&self) -> &str {
        match self {
            Self::ClassNotFound { name, .. } => name,
            Self::MemberNotFound { name, .. } => name,
        }
    }

    pub fn version(&self) -> &VersionId {
        match self {
            Self::ClassNotFound { version, .. } | Self::MemberNotFound { version, .. } => version,
        }
    }
}

/// A resolved member could not be applied.
///
/// Never invalidates the handle: the same handle may succeed on the next
/// call with a well-formed target and value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvocationError {
    /// The host rejected the operation (type mismatch, wrong target,
    /// host code raised).
    #[error("{member} ({version}) rejected the operation: {source}")]
    Fault {
        member: String,
        version: VersionId,
        #[source]
        source: HostFault,
    },

    /// The operation does not apply to this kind of member, e.g. `get` on
    /// a method handle.
    #[error("cannot {operation} {member}: it is a {kind}")]
    WrongMemberKind {
        member: String,
        kind: MemberKind,
        operation: &'static str,
    },

    /// The member returned something other than what the caller needed.
    #[error("{member} returned {actual}, expected {expected}")]
    UnexpectedReturn {
        member: String,
        expected: &'static str,
        actual: String,
    },
}
