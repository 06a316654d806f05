//! # Shimwire
//!
//! Version-adaptive access to a host application's private protocol.
//!
//! The host ships a new internal layout with every release. Shimwire finds
//! the classes and members it needs by name at runtime, caches them per
//! release, and builds and sends protocol messages through them, so a
//! plugin's code stays the same across host versions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shimwire::prelude::*;
//! # use shimwire::host::memory::Release;
//!
//! # fn main() -> Result<(), BridgeError> {
//! # let release = Release::install("v1_8_R3");
//! # let host = release.host().clone();
//! let config = BridgeConfig::default();
//! init_logging(&config);
//!
//! let bridge = Bridge::new(host, &config);
//! let report = bridge.send_to_all(TabCompleteBuilder::new(["home", "hub"]))?;
//! # let _ = report;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | crate | role |
//! |---|---|
//! | `shimwire-host` | the host boundary and an in-memory host |
//! | `shimwire-symbols` | version detection, symbol table, member handles |
//! | `shimwire-protocol` | one builder per message kind |
//! | `shimwire-dispatch` | per-client delivery |
//! | `shimwire-features` | particles, fake bosses, scoreboards, completions |

mod bridge;
mod config;
mod error;
mod logging;

pub use bridge::Bridge;
pub use config::{BridgeConfig, ConfigError};
pub use error::BridgeError;
pub use logging::init_logging;

pub use shimwire_dispatch as dispatch;
pub use shimwire_features as features;
pub use shimwire_host as host;
pub use shimwire_protocol as protocol;
pub use shimwire_symbols as symbols;

/// Common imports for plugin code.
pub mod prelude {
    pub use crate::{Bridge, BridgeConfig, BridgeError, init_logging};
    pub use shimwire_dispatch::{DispatchError, DispatchReport, Dispatcher};
    pub use shimwire_features::{FakeBoss, ObjectiveDisplay, ParticleEffect, TabCompleter};
    pub use shimwire_host::{HostRuntime, ObjectRef};
    pub use shimwire_protocol::{
        BuildError, DestroyEntitiesBuilder, DisplayObjectiveBuilder, DisplaySlot,
        EntityMetadataBuilder, EntityTeleportBuilder, EntityType, Location, MessageBuilder,
        MessageObject, MetadataValue, SpawnEntityBuilder, TabCompleteBuilder, Vector3,
        WorldParticlesBuilder,
    };
    pub use shimwire_symbols::{Resolver, VersionId};
}
