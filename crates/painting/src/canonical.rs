//! Canonical vertex positions
//!
//! A vertex is identified by its local-space position quantized to a fixed
//! number of decimal digits, so duplicate vertices (split normals, UV seams,
//! re-exported index orders) all address the same color entry.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::CANONICAL_PRECISION;

/// Integer-quantized vertex position.
///
/// Persisted as a plain `[x, y, z]` array. Ordering is lexicographic on
/// (x, y, z), which gives persisted lists a stable order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct CanonicalPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CanonicalPosition {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Canonicalize at the system precision
    pub fn from_vec3(position: Vec3) -> Self {
        canonicalize(position, CANONICAL_PRECISION)
    }

    /// Reconstruct a point at the system precision
    pub fn to_vec3(self) -> Vec3 {
        decanonicalize(self, CANONICAL_PRECISION)
    }

    pub const fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[i32; 3]> for CanonicalPosition {
    fn from(v: [i32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<CanonicalPosition> for [i32; 3] {
    fn from(p: CanonicalPosition) -> Self {
        p.to_array()
    }
}

impl From<Vec3> for CanonicalPosition {
    fn from(position: Vec3) -> Self {
        Self::from_vec3(position)
    }
}

#[inline]
fn scale_for(precision: u32) -> f32 {
    10f32.powi(precision as i32)
}

#[inline]
fn quantize_axis(value: f32, scale: f32) -> i32 {
    // `as` truncates toward zero (and saturates out-of-range values)
    (value * scale).trunc() as i32
}

/// Quantize a position: scale by 10^precision and truncate toward zero.
pub fn canonicalize(position: Vec3, precision: u32) -> CanonicalPosition {
    let scale = scale_for(precision);
    CanonicalPosition::new(
        quantize_axis(position.x, scale),
        quantize_axis(position.y, scale),
        quantize_axis(position.z, scale),
    )
}

/// Reconstruct a point from a canonical key.
///
/// The result is not the original float, but it always canonicalizes back
/// to `key`.
pub fn decanonicalize(key: CanonicalPosition, precision: u32) -> Vec3 {
    let scale = scale_for(precision);
    Vec3::new(
        reconstruct_axis(key.x, scale),
        reconstruct_axis(key.y, scale),
        reconstruct_axis(key.z, scale),
    )
}

/// Divide back and, when the nearest float lands on the wrong side of a
/// truncation boundary, step it away from zero until it quantizes to `k`.
fn reconstruct_axis(k: i32, scale: f32) -> f32 {
    let mut value = k as f32 / scale;
    for _ in 0..4 {
        if quantize_axis(value, scale) == k {
            break;
        }
        // Incrementing the bit pattern grows the magnitude for either sign
        value = f32::from_bits(value.to_bits() + 1);
    }
    value
}
