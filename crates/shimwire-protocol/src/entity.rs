//! Messages describing client-side entities: spawn, metadata, teleport and
//! destroy.
//!
//! Positions go on the wire as 1/32 block fixed point and angles as 1/256
//! of a turn; see [`fixed_point`] and [`angle_byte`].

use serde::{Deserialize, Serialize};
use shimwire_host::{Value, ValueKind};
use shimwire_symbols::{Namespace, Resolver, Signature};

use crate::builder::Assembler;
use crate::{
    BuildError, Location, MessageBuilder, MessageKind, MessageObject, angle_byte, fixed_point,
};

/// Highest metadata index the host's watcher accepts.
pub const MAX_METADATA_INDEX: u8 = 31;

/// Living entity types that can be spawned client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    EnderDragon,
    Wither,
}

impl EntityType {
    /// The host's numeric type id.
    pub fn type_id(self) -> i32 {
        match self {
            Self::EnderDragon => 63,
            Self::Wither => 64,
        }
    }

    /// Simple name of the internal class for this type.
    pub fn internal_class(self) -> &'static str {
        match self {
            Self::EnderDragon => "EntityEnderDragon",
            Self::Wither => "EntityWither",
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            Self::EnderDragon => 200.0,
            Self::Wither => 300.0,
        }
    }
}

// -- Spawn --------------------------------------------------------------------

/// Builds a message that makes a living entity appear for its recipients.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnEntityBuilder {
    entity_id: i32,
    entity_type: EntityType,
    location: Location,
    head_yaw: f32,
}

impl SpawnEntityBuilder {
    pub fn new(entity_id: i32, entity_type: EntityType) -> Self {
        Self {
            entity_id,
            entity_type,
            location: Location::default(),
            head_yaw: 0.0,
        }
    }

    pub fn at(mut self, location: Location) -> Result<Self, BuildError> {
        location.validate("location")?;
        self.location = location;
        Ok(self)
    }

    pub fn head_yaw(mut self, degrees: f32) -> Result<Self, BuildError> {
        if !degrees.is_finite() {
            return Err(BuildError::invalid("head_yaw", "angle must be finite"));
        }
        self.head_yaw = degrees;
        Ok(self)
    }
}

impl MessageBuilder for SpawnEntityBuilder {
    const KIND: MessageKind = MessageKind::SpawnEntity;

    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError> {
        let loc = self.location;
        Assembler::new(resolver, Self::KIND)
            .set("a", self.entity_id)
            .set("b", self.entity_type.type_id())
            .set("c", fixed_point(loc.x))
            .set("d", fixed_point(loc.y))
            .set("e", fixed_point(loc.z))
            .set("i", Value::Byte(angle_byte(loc.yaw)))
            .set("j", Value::Byte(angle_byte(loc.pitch)))
            .set("k", Value::Byte(angle_byte(self.head_yaw)))
            .finish()
    }
}

// -- Destroy ------------------------------------------------------------------

/// Builds a message that removes entities from its recipients' view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyEntitiesBuilder {
    ids: Vec<i32>,
}

impl DestroyEntitiesBuilder {
    pub fn new(ids: impl IntoIterator<Item = i32>) -> Result<Self, BuildError> {
        let ids: Vec<i32> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(BuildError::invalid("ids", "at least one entity id is required"));
        }
        Ok(Self { ids })
    }
}

impl MessageBuilder for DestroyEntitiesBuilder {
    const KIND: MessageKind = MessageKind::DestroyEntities;

    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError> {
        Assembler::new(resolver, Self::KIND)
            .set("a", Value::IntArray(self.ids))
            .finish()
    }
}

// -- Teleport -----------------------------------------------------------------

/// Builds a message that moves an entity to an absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTeleportBuilder {
    entity_id: i32,
    location: Location,
    on_ground: bool,
}

impl EntityTeleportBuilder {
    pub fn new(entity_id: i32) -> Self {
        Self {
            entity_id,
            location: Location::default(),
            on_ground: false,
        }
    }

    pub fn at(mut self, location: Location) -> Result<Self, BuildError> {
        location.validate("location")?;
        self.location = location;
        Ok(self)
    }

    pub fn on_ground(mut self, on_ground: bool) -> Self {
        self.on_ground = on_ground;
        self
    }
}

impl MessageBuilder for EntityTeleportBuilder {
    const KIND: MessageKind = MessageKind::EntityTeleport;

    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError> {
        let loc = self.location;
        Assembler::new(resolver, Self::KIND)
            .set("a", self.entity_id)
            .set("b", fixed_point(loc.x))
            .set("c", fixed_point(loc.y))
            .set("d", fixed_point(loc.z))
            .set("e", Value::Byte(angle_byte(loc.yaw)))
            .set("f", Value::Byte(angle_byte(loc.pitch)))
            .set("g", self.on_ground)
            .finish()
    }
}

// -- Metadata -----------------------------------------------------------------

/// One typed metadata value. The host tags each entry with a type code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
    Str(String),
}

impl MetadataValue {
    pub fn type_code(&self) -> i32 {
        match self {
            Self::Byte(_) => 0,
            Self::Short(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::Str(_) => 4,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Byte(v) => Value::Byte(v),
            Self::Short(v) => Value::Short(v),
            Self::Int(v) => Value::Int(v),
            Self::Float(v) => Value::Float(v),
            Self::Str(v) => Value::Str(v),
        }
    }
}

/// Builds a message updating watched values (health, custom name, flags)
/// of an entity.
///
/// Each entry becomes a host `WatchableObject(type, index, value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadataBuilder {
    entity_id: i32,
    entries: Vec<(u8, MetadataValue)>,
}

impl EntityMetadataBuilder {
    pub fn new(entity_id: i32) -> Self {
        Self {
            entity_id,
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, index: u8, value: MetadataValue) -> Result<Self, BuildError> {
        if index > MAX_METADATA_INDEX {
            return Err(BuildError::invalid(
                "index",
                format!("{index} is above {MAX_METADATA_INDEX}"),
            ));
        }
        if matches!(value, MetadataValue::Float(f) if !f.is_finite()) {
            return Err(BuildError::invalid("value", "float entries must be finite"));
        }
        self.entries.push((index, value));
        Ok(self)
    }
}

impl MessageBuilder for EntityMetadataBuilder {
    const KIND: MessageKind = MessageKind::EntityMetadata;

    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError> {
        let (mut prepared, watchable) = Assembler::new(resolver, Self::KIND)
            .set("a", self.entity_id)
            .set("b", Value::List(Vec::new()))
            .prepare_with(|resolver| {
                let class = resolver.class(Namespace::Internal, "WatchableObject")?;
                resolver.constructor(
                    &class,
                    &Signature::of(&[ValueKind::Int, ValueKind::Int, ValueKind::Any]),
                )
            })?;

        let items = self
            .entries
            .into_iter()
            .map(|(index, value)| {
                let args = [
                    Value::Int(value.type_code()),
                    Value::Int(i32::from(index)),
                    value.into_value(),
                ];
                watchable.construct(&args).map(Value::Object)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| BuildError::Invocation {
                kind: Self::KIND,
                source,
            })?;

        prepared.assign("b", Value::List(items));
        prepared.populate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_ids() {
        assert_eq!(EntityType::EnderDragon.type_id(), 63);
        assert_eq!(EntityType::Wither.type_id(), 64);
        assert_eq!(EntityType::Wither.internal_class(), "EntityWither");
    }

    #[test]
    fn test_metadata_type_codes() {
        assert_eq!(MetadataValue::Byte(0).type_code(), 0);
        assert_eq!(MetadataValue::Short(0).type_code(), 1);
        assert_eq!(MetadataValue::Int(0).type_code(), 2);
        assert_eq!(MetadataValue::Float(0.0).type_code(), 3);
        assert_eq!(MetadataValue::Str(String::new()).type_code(), 4);
    }

    #[test]
    fn test_metadata_entry_rejects_high_index() {
        let err = EntityMetadataBuilder::new(1)
            .entry(32, MetadataValue::Byte(0))
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidInput { field: "index", .. }));
    }

    #[test]
    fn test_metadata_entry_rejects_nan_float() {
        assert!(EntityMetadataBuilder::new(1)
            .entry(6, MetadataValue::Float(f32::NAN))
            .is_err());
    }

    #[test]
    fn test_destroy_requires_ids() {
        assert!(DestroyEntitiesBuilder::new(Vec::new()).is_err());
        assert!(DestroyEntitiesBuilder::new([7]).is_ok());
    }

    #[test]
    fn test_spawn_rejects_infinite_location() {
        let result = SpawnEntityBuilder::new(1, EntityType::Wither)
            .at(Location::new(f64::INFINITY, 0.0, 0.0));
        assert!(result.is_err());
    }
}
