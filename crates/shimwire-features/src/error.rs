//! Error types for the feature layer.

use shimwire_symbols::{InvocationError, ResolutionError};

/// A feature could not set up host-side state.
///
/// Message build and delivery failures are not errors here: features log
/// those and skip the effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// The world object did not expose an internal handle.
    #[error("{0} has no internal handle")]
    NoWorldHandle(String),

    /// The host's entity id accessor returned something other than an int.
    #[error("entity id accessor returned {0}")]
    BadEntityId(String),
}
