//! Client-side boss entities.
//!
//! A [`FakeBoss`] exists only in the messages its viewers receive. The
//! host allocates its entity id through the real entity constructor so the
//! id never collides with a server-side entity, but the entity itself is
//! never added to a world.

use shimwire_dispatch::{DispatchReport, Dispatcher};
use shimwire_host::{ObjectRef, Value, ValueKind};
use shimwire_protocol::{
    DestroyEntitiesBuilder, EntityMetadataBuilder, EntityTeleportBuilder, EntityType, Location,
    MessageBuilder, MetadataValue, SpawnEntityBuilder,
};
use shimwire_symbols::{Namespace, Resolver, Signature};

use crate::{FeatureError, deliver};

/// Metadata slots a boss uses.
pub mod metadata_index {
    /// Entity flags byte.
    pub const FLAGS: u8 = 0;
    pub const CUSTOM_NAME: u8 = 2;
    pub const NAME_VISIBLE: u8 = 3;
    pub const HEALTH: u8 = 6;
}

/// Bit in [`metadata_index::FLAGS`] that hides the entity model.
const INVISIBLE: i8 = 0x20;

/// A scripted boss shown to a set of viewers.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeBoss {
    entity_id: i32,
    entity_type: EntityType,
    name: String,
    health: f32,
    location: Location,
}

impl FakeBoss {
    /// Allocates an entity id for a new boss in `world`.
    ///
    /// Walks `world.getHandle()` to the internal world, runs the entity
    /// type's `(world)` constructor and reads the id back with `getId()`.
    /// Nothing is sent yet; call [`show`](Self::show).
    pub fn spawn(
        resolver: &Resolver,
        world: &ObjectRef,
        entity_type: EntityType,
        name: impl Into<String>,
        location: Location,
    ) -> Result<Self, FeatureError> {
        let world_class = resolver.class_of(world)?;
        let get_handle = resolver.method(&world_class, "getHandle", Some(&Signature::empty()))?;
        let world_handle = get_handle
            .invoke_object(world, &[])?
            .ok_or_else(|| FeatureError::NoWorldHandle(world.describe()))?;

        let entity_class = resolver.class(Namespace::Internal, entity_type.internal_class())?;
        let constructor =
            resolver.constructor(&entity_class, &Signature::of(&[ValueKind::Object]))?;
        let entity = constructor.construct(&[Value::Object(world_handle)])?;

        let get_id = resolver.method(&entity_class, "getId", Some(&Signature::empty()))?;
        let entity_id = match get_id.invoke(&entity, &[])? {
            Value::Int(id) => id,
            other => return Err(FeatureError::BadEntityId(other.type_name().to_string())),
        };

        tracing::debug!(entity_id, ?entity_type, "allocated fake boss");
        Ok(Self {
            entity_id,
            entity_type,
            name: name.into(),
            health: entity_type.max_health(),
            location,
        })
    }

    pub fn entity_id(&self) -> i32 {
        self.entity_id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Health as a fraction of the type's maximum, for boss bars.
    pub fn health_fraction(&self) -> f32 {
        self.health / self.entity_type.max_health()
    }

    /// Spawns the boss for `viewers`, followed by its name and health.
    pub fn show(&self, dispatcher: &Dispatcher, viewers: &[ObjectRef]) -> Option<DispatchReport> {
        let resolver = dispatcher.resolver();
        let spawn = SpawnEntityBuilder::new(self.entity_id, self.entity_type)
            .at(self.location)
            .and_then(|b| b.head_yaw(self.location.yaw))
            .and_then(|b| b.build(resolver));
        let metadata = self.metadata().and_then(|b| b.build(resolver));
        deliver("boss", dispatcher, [spawn, metadata], viewers)
    }

    /// Updates health, clamped to `0..=max`, and tells `viewers`.
    pub fn set_health(
        &mut self,
        dispatcher: &Dispatcher,
        health: f32,
        viewers: &[ObjectRef],
    ) -> Option<DispatchReport> {
        self.health = if health.is_nan() {
            0.0
        } else {
            health.clamp(0.0, self.entity_type.max_health())
        };
        let built = EntityMetadataBuilder::new(self.entity_id)
            .entry(metadata_index::HEALTH, MetadataValue::Float(self.health))
            .and_then(|b| b.build(dispatcher.resolver()));
        deliver("boss", dispatcher, [built], viewers)
    }

    pub fn rename(
        &mut self,
        dispatcher: &Dispatcher,
        name: impl Into<String>,
        viewers: &[ObjectRef],
    ) -> Option<DispatchReport> {
        self.name = name.into();
        let built = EntityMetadataBuilder::new(self.entity_id)
            .entry(metadata_index::CUSTOM_NAME, MetadataValue::Str(self.name.clone()))
            .and_then(|b| b.build(dispatcher.resolver()));
        deliver("boss", dispatcher, [built], viewers)
    }

    /// Teleports the boss. The stored location only changes if the new
    /// one is valid.
    pub fn move_to(
        &mut self,
        dispatcher: &Dispatcher,
        location: Location,
        viewers: &[ObjectRef],
    ) -> Option<DispatchReport> {
        let built = EntityTeleportBuilder::new(self.entity_id)
            .at(location)
            .and_then(|b| b.build(dispatcher.resolver()));
        if built.is_ok() {
            self.location = location;
        }
        deliver("boss", dispatcher, [built], viewers)
    }

    /// Removes the boss from `viewers`.
    pub fn hide(&self, dispatcher: &Dispatcher, viewers: &[ObjectRef]) -> Option<DispatchReport> {
        let built = DestroyEntitiesBuilder::new([self.entity_id])
            .and_then(|b| b.build(dispatcher.resolver()));
        deliver("boss", dispatcher, [built], viewers)
    }

    fn metadata(&self) -> Result<EntityMetadataBuilder, shimwire_protocol::BuildError> {
        EntityMetadataBuilder::new(self.entity_id)
            .entry(metadata_index::FLAGS, MetadataValue::Byte(INVISIBLE))?
            .entry(metadata_index::CUSTOM_NAME, MetadataValue::Str(self.name.clone()))?
            .entry(metadata_index::NAME_VISIBLE, MetadataValue::Byte(1))?
            .entry(metadata_index::HEALTH, MetadataValue::Float(self.health))
    }
}
