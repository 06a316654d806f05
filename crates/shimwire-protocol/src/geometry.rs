//! Positions and vectors, plus the host's fixed-point encodings.

use serde::{Deserialize, Serialize};

use crate::BuildError;

/// A position in a world, with facing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, yaw: 0.0, pitch: 0.0 }
    }

    pub fn with_facing(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    pub(crate) fn validate(&self, field: &'static str) -> Result<(), BuildError> {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.yaw.is_finite()
            && self.pitch.is_finite();
        if finite {
            Ok(())
        } else {
            Err(BuildError::invalid(field, "coordinates must be finite"))
        }
    }
}

/// A direction or spread.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn validate(&self, field: &'static str) -> Result<(), BuildError> {
        if self.x.is_finite() && self.y.is_finite() && self.z.is_finite() {
            Ok(())
        } else {
            Err(BuildError::invalid(field, "components must be finite"))
        }
    }
}

/// Absolute coordinate as 1/32 block fixed point.
pub fn fixed_point(coordinate: f64) -> i32 {
    (coordinate * 32.0).floor() as i32
}

/// Angle in degrees as 1/256 of a turn, wrapped into a byte.
pub fn angle_byte(degrees: f32) -> i8 {
    ((degrees * 256.0 / 360.0) as i32) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_floors() {
        assert_eq!(fixed_point(1.0), 32);
        assert_eq!(fixed_point(64.5), 2064);
        assert_eq!(fixed_point(-0.01), -1);
    }

    #[test]
    fn test_angle_byte_wraps() {
        assert_eq!(angle_byte(0.0), 0);
        assert_eq!(angle_byte(90.0), 64);
        assert_eq!(angle_byte(180.0), -128);
        assert_eq!(angle_byte(360.0), 0);
    }

    #[test]
    fn test_location_rejects_nan() {
        assert!(Location::new(0.0, f64::NAN, 0.0).validate("location").is_err());
        assert!(Location::new(1.0, 2.0, 3.0).validate("location").is_ok());
    }

    #[test]
    fn test_location_facing_defaults_in_json() {
        let loc: Location = serde_json::from_str(r#"{"x":1.0,"y":2.0,"z":3.0}"#).unwrap();
        assert_eq!(loc, Location::new(1.0, 2.0, 3.0));
    }
}
