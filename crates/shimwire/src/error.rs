//! Unified error type for Shimwire.

use shimwire_dispatch::DispatchError;
use shimwire_features::FeatureError;
use shimwire_protocol::BuildError;
use shimwire_symbols::{InvocationError, ResolutionError};

use crate::ConfigError;

/// Top-level error that wraps every layer's error.
///
/// `?` converts layer errors automatically through the `#[from]` impls.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A symbol is missing for the running version.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A resolved member rejected an operation.
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// A message could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A message could not be delivered to one client.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Feature(#[from] FeatureError),
}
