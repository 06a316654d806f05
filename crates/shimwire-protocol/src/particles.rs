//! The "world particle display" message.

use shimwire_host::Value;
use shimwire_symbols::Resolver;

use crate::builder::Assembler;
use crate::{BuildError, Location, MessageBuilder, MessageKind, MessageObject, Vector3};

/// Builds a message that shows `amount` particles of one effect around a
/// location.
///
/// ## Layout
///
/// | field | value |
/// |---|---|
/// | `a` | effect name |
/// | `b`, `c`, `d` | location x, y, z |
/// | `e`, `f`, `g` | deviation x, y, z |
/// | `h` | speed |
/// | `i` | amount |
///
/// ## Example
///
/// ```rust,no_run
/// # use shimwire_host::memory::Release;
/// # use shimwire_protocol::{BuildError, Location, MessageBuilder, Vector3, WorldParticlesBuilder};
/// # use shimwire_symbols::{Resolver, SymbolConfig};
/// # fn main() -> Result<(), BuildError> {
/// # let release = Release::install("v1_8_R3");
/// # let resolver = Resolver::new(release.host().clone(), &SymbolConfig::default());
/// let message = WorldParticlesBuilder::new("flame")?
///     .at(Location::new(10.0, 64.0, -3.0))?
///     .deviation(Vector3::new(0.1, 0.2, 0.1))?
///     .speed(0.5)?
///     .amount(20)?
///     .build(&resolver)?;
/// # let _ = message;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WorldParticlesBuilder {
    effect: String,
    location: Location,
    deviation: Vector3,
    speed: f32,
    amount: i32,
}

impl WorldParticlesBuilder {
    /// Starts a message for the named effect (e.g. `"flame"`).
    pub fn new(effect: impl Into<String>) -> Result<Self, BuildError> {
        let effect = effect.into();
        if effect.trim().is_empty() {
            return Err(BuildError::invalid("effect", "name must not be empty"));
        }
        Ok(Self {
            effect,
            location: Location::default(),
            deviation: Vector3::default(),
            speed: 0.0,
            amount: 1,
        })
    }

    pub fn at(mut self, location: Location) -> Result<Self, BuildError> {
        location.validate("location")?;
        self.location = location;
        Ok(self)
    }

    /// Random spread around the location, per axis.
    pub fn deviation(mut self, deviation: Vector3) -> Result<Self, BuildError> {
        deviation.validate("deviation")?;
        self.deviation = deviation;
        Ok(self)
    }

    pub fn speed(mut self, speed: f32) -> Result<Self, BuildError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(BuildError::invalid(
                "speed",
                format!("{speed} is not a finite, non-negative number"),
            ));
        }
        self.speed = speed;
        Ok(self)
    }

    pub fn amount(mut self, amount: i32) -> Result<Self, BuildError> {
        if amount < 0 {
            return Err(BuildError::invalid("amount", format!("{amount} is negative")));
        }
        self.amount = amount;
        Ok(self)
    }
}

impl MessageBuilder for WorldParticlesBuilder {
    const KIND: MessageKind = MessageKind::WorldParticles;

    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError> {
        Assembler::new(resolver, Self::KIND)
            .set("a", Value::Str(self.effect))
            .set("b", self.location.x as f32)
            .set("c", self.location.y as f32)
            .set("d", self.location.z as f32)
            .set("e", self.deviation.x)
            .set("f", self.deviation.y)
            .set("g", self.deviation.z)
            .set("h", self.speed)
            .set("i", self.amount)
            .finish()
    }
}
