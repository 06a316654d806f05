//! Error types for the dispatch layer.

use shimwire_symbols::{InvocationError, ResolutionError, VersionId};

/// Delivery to one client failed.
///
/// Always per-client: a batch keeps going after one of these. Each variant
/// names the client by its description, never by a stored reference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// The message was built under a different version than the
    /// dispatcher resolves for.
    #[error("message built for {message} cannot be sent under {running}")]
    VersionMismatch { message: VersionId, running: VersionId },

    /// A symbol on the path to the client's connection is missing.
    #[error("cannot reach {client}: {source}")]
    Unresolved {
        client: String,
        #[source]
        source: ResolutionError,
    },

    /// The client has no internal representation (e.g. already gone).
    #[error("{client} has no internal handle")]
    NoInternalHandle { client: String },

    /// The client's internal representation has no connection; it has
    /// disconnected.
    #[error("{client} has no connection")]
    NoConduit { client: String },

    /// The host raised while walking to or writing into the connection.
    #[error("{client} rejected the message: {source}")]
    Rejected {
        client: String,
        #[source]
        source: InvocationError,
    },

    /// The worker delivering to this client did not finish.
    #[error("delivery to {client} was interrupted: {reason}")]
    Interrupted { client: String, reason: String },
}

impl DispatchError {
    /// The client this failure belongs to, if it is client-specific.
    pub fn client(&self) -> Option<&str> {
        match self {
            Self::VersionMismatch { .. } => None,
            Self::Unresolved { client, .. }
            | Self::NoInternalHandle { client }
            | Self::NoConduit { client }
            | Self::Rejected { client, .. }
            | Self::Interrupted { client, .. } => Some(client),
        }
    }

    /// Whether the client is simply gone, as opposed to something being
    /// wrong with the host layout or the message.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::NoInternalHandle { .. } | Self::NoConduit { .. })
    }
}
