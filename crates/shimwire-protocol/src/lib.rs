//! Message construction for Shimwire.
//!
//! Each message the plugin can send is an instance of a version-specific
//! internal class with obfuscated private fields. A builder here knows one
//! such layout: it validates its inputs up front, then resolves the class,
//! its constructor and every field through the [`Resolver`] and only then
//! allocates and populates the object.
//!
//! ```text
//! Builder::new(..)?.setter(..)?   ← input validation, no host access
//!        │
//!        ▼
//! .build(&resolver)               ← resolve all symbols, then allocate
//!        │
//!        ▼
//! MessageObject                   ← complete, immutable, ready to dispatch
//! ```
//!
//! [`Resolver`]: shimwire_symbols::Resolver

mod builder;
mod entity;
mod error;
mod geometry;
mod message;
mod particles;
mod scoreboard;
mod tab_complete;

pub use builder::MessageBuilder;
pub use entity::{
    DestroyEntitiesBuilder, EntityMetadataBuilder, EntityTeleportBuilder, EntityType,
    MAX_METADATA_INDEX, MetadataValue, SpawnEntityBuilder,
};
pub use error::BuildError;
pub use geometry::{Location, Vector3, angle_byte, fixed_point};
pub use message::{MessageKind, MessageObject};
pub use particles::WorldParticlesBuilder;
pub use scoreboard::{DisplayObjectiveBuilder, DisplaySlot, MAX_OBJECTIVE_LEN};
pub use tab_complete::{TabCompleteBuilder, complete};
