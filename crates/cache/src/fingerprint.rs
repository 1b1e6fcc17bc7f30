//! Translation-invariant cache keys for ordered panel pairs

use quadra_core::{vec_sub, Vec3};
use std::hash::{Hash, Hasher};

/// Number of floating-point components in a fingerprint
pub const FINGERPRINT_LEN: usize = 15;

/// Relative tolerance for key matching
pub const RELATIVE_TOLERANCE: f64 = 1.0e-8;

/// Geometric descriptor of an ordered pair of triangular panels.
///
/// The fifteen components are five 3-vectors, all relative to the first
/// panel's first vertex:
///
/// | components | value        |
/// |------------|--------------|
/// | 0..3       | `a1 - a0`    |
/// | 3..6       | `a2 - a0`    |
/// | 6..9       | `b0 - a0`    |
/// | 9..12      | `b1 - a0`    |
/// | 12..15     | `b2 - a0`    |
///
/// Subtracting `a0` from everything makes the descriptor invariant under
/// translation, so panel pairs that are shifted copies of one another
/// produce identical fingerprints. Both panels' vertices must already be
/// in canonical order; ordering is the caller's concern.
///
/// Equality is tolerance-based (see [`PartialEq`] below) while bucket
/// hashing is byte-exact, so two keys that compare equal can still hash to
/// different buckets and coexist in a table as separate entries.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprint {
    values: [f64; FINGERPRINT_LEN],
}

impl Fingerprint {
    /// Build the fingerprint for an ordered pair of panels given their
    /// canonically ordered corner coordinates.
    pub fn from_panel_pair(panel_a: &[Vec3; 3], panel_b: &[Vec3; 3]) -> Self {
        let origin = &panel_a[0];
        let mut values = [0.0; FINGERPRINT_LEN];
        let parts = [
            vec_sub(&panel_a[1], origin),
            vec_sub(&panel_a[2], origin),
            vec_sub(&panel_b[0], origin),
            vec_sub(&panel_b[1], origin),
            vec_sub(&panel_b[2], origin),
        ];
        for (slot, part) in values.chunks_exact_mut(3).zip(parts.iter()) {
            slot.copy_from_slice(part);
        }
        Self { values }
    }

    /// Wrap raw component values as a fingerprint.
    pub fn from_values(values: [f64; FINGERPRINT_LEN]) -> Self {
        Self { values }
    }

    /// The raw component values.
    pub fn values(&self) -> &[f64; FINGERPRINT_LEN] {
        &self.values
    }

    /// Encode the components as little-endian bytes into `buf`.
    ///
    /// `buf` must hold exactly `FINGERPRINT_LEN * 8` bytes.
    pub(crate) fn write_le(&self, buf: &mut [u8]) {
        for (chunk, value) in buf.chunks_exact_mut(8).zip(self.values.iter()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
    }

    /// Decode a fingerprint from little-endian bytes.
    pub(crate) fn read_le(buf: &[u8]) -> Self {
        let mut values = [0.0; FINGERPRINT_LEN];
        for (chunk, value) in buf.chunks_exact(8).zip(values.iter_mut()) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *value = f64::from_le_bytes(bytes);
        }
        Self { values }
    }
}

/// Tolerance-based key matching: every component of `other` must lie within
/// `RELATIVE_TOLERANCE` of the corresponding component of `self`, with
/// `self` supplying the reference magnitude. The relation is not symmetric
/// when the operands' magnitudes differ and is not transitive.
impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(x1, x2)| (x1 - x2).abs() <= RELATIVE_TOLERANCE * x1.abs())
    }
}

impl Eq for Fingerprint {}

/// Byte-exact hashing over the components' raw bit patterns.
impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in &self.values {
            state.write(&value.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::OneAtATimeBuildHasher;
    use proptest::prelude::*;
    use std::hash::BuildHasher;

    fn hash_of(key: &Fingerprint) -> u64 {
        OneAtATimeBuildHasher.hash_one(key)
    }

    const PANEL_A: [Vec3; 3] = [[1.0, 1.0, 1.0], [2.0, 1.0, 1.0], [1.0, 2.0, 1.0]];
    const PANEL_B: [Vec3; 3] = [[1.0, 1.0, 2.0], [2.0, 1.0, 2.0], [1.0, 2.0, 2.0]];

    #[test]
    fn test_fingerprint_layout() {
        let key = Fingerprint::from_panel_pair(&PANEL_A, &PANEL_B);
        let v = key.values();
        assert_eq!(&v[0..3], &[1.0, 0.0, 0.0]); // a1 - a0
        assert_eq!(&v[3..6], &[0.0, 1.0, 0.0]); // a2 - a0
        assert_eq!(&v[6..9], &[0.0, 0.0, 1.0]); // b0 - a0
        assert_eq!(&v[9..12], &[1.0, 0.0, 1.0]); // b1 - a0
        assert_eq!(&v[12..15], &[0.0, 1.0, 1.0]); // b2 - a0
    }

    #[test]
    fn test_translation_invariance() {
        let shift = [10.0, -3.0, 0.25];
        let shifted_a = PANEL_A.map(|v| [v[0] + shift[0], v[1] + shift[1], v[2] + shift[2]]);
        let shifted_b = PANEL_B.map(|v| [v[0] + shift[0], v[1] + shift[1], v[2] + shift[2]]);

        let original = Fingerprint::from_panel_pair(&PANEL_A, &PANEL_B);
        let shifted = Fingerprint::from_panel_pair(&shifted_a, &shifted_b);
        assert_eq!(original.values(), shifted.values());
    }

    #[test]
    fn test_equality_within_relative_tolerance() {
        let base = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 0.5, 0.5, 0.0];
        let near = base.map(|v| if v == 0.0 { v } else { v + 1e-9 * v });
        let far = {
            let mut f = base;
            f[0] += 1e-3;
            f
        };

        let k1 = Fingerprint::from_values(base);
        let k2 = Fingerprint::from_values(near);
        let k3 = Fingerprint::from_values(far);

        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
    }

    #[test]
    fn test_zero_components_require_exact_match() {
        // A zero reference component leaves no tolerance budget at all.
        let mut perturbed = [0.0; FINGERPRINT_LEN];
        perturbed[14] = 1e-300;
        let zero = Fingerprint::from_values([0.0; FINGERPRINT_LEN]);
        let almost_zero = Fingerprint::from_values(perturbed);
        assert_ne!(zero, almost_zero);
        // The reverse direction also fails: 1e-300 as reference magnitude
        // leaves a budget far smaller than the difference.
        assert_ne!(almost_zero, zero);
    }

    #[test]
    fn test_comparison_is_not_transitive() {
        let k1 = Fingerprint::from_values([1.0; FINGERPRINT_LEN]);
        let k2 = Fingerprint::from_values([1.0 + 0.9e-8; FINGERPRINT_LEN]);
        let k3 = Fingerprint::from_values([1.0 + 1.8e-8; FINGERPRINT_LEN]);
        assert_eq!(k1, k2);
        assert_eq!(k2, k3);
        assert_ne!(k1, k3);
    }

    #[test]
    fn test_identical_bytes_hash_identically() {
        let k1 = Fingerprint::from_panel_pair(&PANEL_A, &PANEL_B);
        let k2 = Fingerprint::from_panel_pair(&PANEL_A, &PANEL_B);
        assert_eq!(hash_of(&k1), hash_of(&k2));
    }

    #[test]
    fn test_tolerance_equal_keys_may_hash_apart() {
        // The comparator accepts these as equal but the hasher sees
        // different bytes; equal hashes would be a coincidence.
        let base = [1.0; FINGERPRINT_LEN];
        let near = base.map(|v| v + 1e-12);
        let k1 = Fingerprint::from_values(base);
        let k2 = Fingerprint::from_values(near);
        assert_eq!(k1, k2);
        assert_ne!(hash_of(&k1), hash_of(&k2));
    }

    #[test]
    fn test_le_byte_round_trip() {
        let key = Fingerprint::from_panel_pair(&PANEL_A, &PANEL_B);
        let mut buf = [0u8; FINGERPRINT_LEN * 8];
        key.write_le(&mut buf);
        let back = Fingerprint::read_le(&buf);
        assert_eq!(key.values(), back.values());
    }

    proptest! {
        #[test]
        fn prop_perturbation_within_tolerance_compares_equal(
            values in proptest::array::uniform15(-1e3f64..1e3),
            scale in -0.99f64..0.99,
        ) {
            let perturbed = values.map(|v| v + scale * RELATIVE_TOLERANCE * v.abs());
            let reference = Fingerprint::from_values(values);
            let other = Fingerprint::from_values(perturbed);
            prop_assert_eq!(reference, other);
        }

        #[test]
        fn prop_identical_values_hash_identically(
            values in proptest::array::uniform15(-1e6f64..1e6),
        ) {
            let k1 = Fingerprint::from_values(values);
            let k2 = Fingerprint::from_values(values);
            prop_assert_eq!(hash_of(&k1), hash_of(&k2));
        }
    }
}
