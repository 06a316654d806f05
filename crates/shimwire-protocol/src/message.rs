//! Message kinds and built message objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use shimwire_host::{ObjectRef, Value};
use shimwire_symbols::VersionId;

/// The internal message types this crate knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    WorldParticles,
    TabComplete,
    DisplayObjective,
    SpawnEntity,
    DestroyEntities,
    EntityMetadata,
    EntityTeleport,
}

impl MessageKind {
    /// Simple name of the internal class implementing this message.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::WorldParticles => "PacketPlayOutWorldParticles",
            Self::TabComplete => "PacketPlayOutTabComplete",
            Self::DisplayObjective => "PacketPlayOutScoreboardDisplayObjective",
            Self::SpawnEntity => "PacketPlayOutSpawnEntityLiving",
            Self::DestroyEntities => "PacketPlayOutEntityDestroy",
            Self::EntityMetadata => "PacketPlayOutEntityMetadata",
            Self::EntityTeleport => "PacketPlayOutEntityTeleport",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WorldParticles => "world particles",
            Self::TabComplete => "tab complete",
            Self::DisplayObjective => "display objective",
            Self::SpawnEntity => "spawn entity",
            Self::DestroyEntities => "destroy entities",
            Self::EntityMetadata => "entity metadata",
            Self::EntityTeleport => "entity teleport",
        };
        f.write_str(name)
    }
}

/// A fully populated instance of an internal message type.
///
/// Only builders in this crate can create one, and only after every field
/// was assigned, so holding a `MessageObject` means holding a complete
/// message. It is never mutated after construction.
#[derive(Debug, Clone)]
pub struct MessageObject {
    kind: MessageKind,
    version: VersionId,
    object: ObjectRef,
}

impl MessageObject {
    pub(crate) fn new(kind: MessageKind, version: VersionId, object: ObjectRef) -> Self {
        Self { kind, version, object }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The version whose symbols built this message.
    pub fn version(&self) -> &VersionId {
        &self.version
    }

    /// The host object, for handing to a transport conduit.
    pub fn as_object(&self) -> &ObjectRef {
        &self.object
    }

    /// Reads a field of the underlying object by its internal name.
    /// Intended for diagnostics and tests.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.object.raw_get(name)
    }
}
