//! Three-component vector value type for vertex kinematics.
//!
//! A [`Vector3`] is read by copy and never mutated in place. The event record
//! only ever replaces a whole vector, so a vertex position or momentum
//! direction is never observed half-updated.

use serde::{Deserialize, Serialize};

/// An immutable `(x, y, z)` triple of `f64` components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    /// The zero vector `(0, 0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Build a vector from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The x component.
    pub const fn x(self) -> f64 {
        self.x
    }

    /// The y component.
    pub const fn y(self) -> f64 {
        self.y
    }

    /// The z component.
    pub const fn z(self) -> f64 {
        self.z
    }

    /// Components as an `[x, y, z]` array.
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl core::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert_eq!(Vector3::default(), Vector3::ZERO);
        assert_eq!(Vector3::ZERO.to_array(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn components_read_back_exactly() {
        let v = Vector3::new(1.0, 2.0, -3.0);
        assert_eq!(v.x().to_bits(), 1.0_f64.to_bits());
        assert_eq!(v.y().to_bits(), 2.0_f64.to_bits());
        assert_eq!(v.z().to_bits(), (-3.0_f64).to_bits());
    }

    #[test]
    fn array_conversions_preserve_order() {
        let v = Vector3::from([0.5, -0.25, 4.0]);
        let back: [f64; 3] = v.into();
        assert_eq!(back, [0.5, -0.25, 4.0]);
    }

    #[test]
    fn display_lists_components() {
        assert_eq!(Vector3::new(1.0, 2.5, -3.0).to_string(), "(1, 2.5, -3)");
    }

    #[test]
    fn serde_uses_named_components() {
        let json = serde_json::to_string(&Vector3::new(1.0, 0.0, -1.0)).ok();
        assert_eq!(json.as_deref(), Some(r#"{"x":1.0,"y":0.0,"z":-1.0}"#));
    }

    #[test]
    fn serde_rejects_extra_components() {
        let result = serde_json::from_str::<Vector3>(r#"{"x":1.0,"y":2.0,"z":3.0,"w":4.0}"#);
        assert!(result.is_err());
        let ok = serde_json::from_str::<Vector3>(r#"{"x":1.0,"y":2.0,"z":3.0}"#).ok();
        assert_eq!(ok, Some(Vector3::new(1.0, 2.0, 3.0)));
    }
}
