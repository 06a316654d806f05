//! Visual particle effects.

use serde::{Deserialize, Serialize};
use shimwire_dispatch::{DispatchReport, Dispatcher};
use shimwire_host::ObjectRef;
use shimwire_protocol::{
    BuildError, Location, MessageBuilder, MessageObject, Vector3, WorldParticlesBuilder,
};
use shimwire_symbols::Resolver;

use crate::deliver;

/// A named particle effect with its spread, speed and count.
///
/// Plain data, so effects can live in plugin config:
///
/// ```json
/// { "name": "flame", "deviation": { "x": 0.1, "y": 0.2, "z": 0.1 }, "speed": 0.5, "amount": 20 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleEffect {
    pub name: String,
    #[serde(default)]
    pub deviation: Vector3,
    #[serde(default)]
    pub speed: f32,
    #[serde(default = "default_amount")]
    pub amount: i32,
}

fn default_amount() -> i32 {
    1
}

impl ParticleEffect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deviation: Vector3::default(),
            speed: 0.0,
            amount: default_amount(),
        }
    }

    pub fn with_deviation(mut self, deviation: Vector3) -> Self {
        self.deviation = deviation;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    /// Builds the message for one location.
    pub fn message(
        &self,
        resolver: &Resolver,
        location: Location,
    ) -> Result<MessageObject, BuildError> {
        WorldParticlesBuilder::new(self.name.as_str())?
            .at(location)?
            .deviation(self.deviation)?
            .speed(self.speed)?
            .amount(self.amount)?
            .build(resolver)
    }

    /// Shows the effect at `location` to `targets`. Builds once.
    ///
    /// Returns `None` if the message could not be built.
    pub fn play(
        &self,
        dispatcher: &Dispatcher,
        location: Location,
        targets: &[ObjectRef],
    ) -> Option<DispatchReport> {
        let built = self.message(dispatcher.resolver(), location);
        deliver("particles", dispatcher, [built], targets)
    }

    /// Shows the effect to every online client.
    pub fn play_for_all(
        &self,
        dispatcher: &Dispatcher,
        location: Location,
    ) -> Option<DispatchReport> {
        let targets = dispatcher.resolver().host().online_clients();
        self.play(dispatcher, location, &targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_from_json_defaults() {
        let effect: ParticleEffect = serde_json::from_str(r#"{"name":"heart"}"#).unwrap();
        assert_eq!(effect, ParticleEffect::new("heart"));
        assert_eq!(effect.amount, 1);
    }

    #[test]
    fn test_effect_from_json_full() {
        let effect: ParticleEffect = serde_json::from_str(
            r#"{"name":"flame","deviation":{"x":0.1,"y":0.2,"z":0.1},"speed":0.5,"amount":20}"#,
        )
        .unwrap();
        assert_eq!(effect.deviation, Vector3::new(0.1, 0.2, 0.1));
        assert_eq!(effect.amount, 20);
    }
}
