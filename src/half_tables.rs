//! Table-driven `f32 -> f16` truncation
//!
//! The sign bit and the 8-bit exponent of an `f32` form a 9-bit index into two
//! 512-entry tables. `base` holds the half-precision sign/exponent bits (plus
//! the implicit leading one for subnormal results) and `shift` says how far to
//! shift the 23-bit mantissa down. One lookup, one shift and one add per value.
//!
//! The low mantissa bits are dropped, never rounded: the magnitude of the
//! result never exceeds the magnitude of the input for values within half range.

use half::f16;
use once_cell::sync::Lazy;

/// Number of entries in each table: 1 sign bit + 8 exponent bits
pub const TABLE_SIZE: usize = 512;

/// Precomputed base and shift tables for half-precision conversion
#[derive(Clone, PartialEq, Eq)]
pub struct HalfTables {
    pub base: [u16; TABLE_SIZE],
    pub shift: [u16; TABLE_SIZE],
}

impl std::fmt::Debug for HalfTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HalfTables")
            .field("entries", &TABLE_SIZE)
            .finish()
    }
}

static TABLES: Lazy<HalfTables> = Lazy::new(|| {
    tracing::debug!("Generating half-precision lookup tables");
    generate_tables()
});

/// Build the base and shift tables.
///
/// Pure function of the table index; every call returns identical tables.
pub fn generate_tables() -> HalfTables {
    let mut base = [0u16; TABLE_SIZE];
    let mut shift = [0u16; TABLE_SIZE];

    for i in 0..256usize {
        let e = i as i32 - 127;
        let (b, s): (u16, u16) = if e < -24 {
            // Too small for a half subnormal: flush to zero
            (0x0000, 24)
        } else if e < -14 {
            // Half subnormal
            (0x0400 >> (-e - 14), (-e - 1) as u16)
        } else if e <= 15 {
            // Normal
            (((e + 15) << 10) as u16, 13)
        } else if e < 128 {
            // Overflow to infinity
            (0x7C00, 24)
        } else {
            // Infinity and NaN keep the top mantissa bits
            (0x7C00, 13)
        };

        base[i] = b;
        base[i | 0x100] = b | 0x8000;
        shift[i] = s;
        shift[i | 0x100] = s;
    }

    HalfTables { base, shift }
}

/// The process-wide tables, generated on first use.
#[inline]
pub fn tables() -> &'static HalfTables {
    &TABLES
}

impl HalfTables {
    /// Truncate an `f32` to half-precision bits using these tables
    #[inline]
    pub fn convert(&self, value: f32) -> u16 {
        let bits = value.to_bits();
        let idx = ((bits >> 23) & 0x1FF) as usize;
        let mantissa = bits & 0x007F_FFFF;
        (u32::from(self.base[idx]) + (mantissa >> self.shift[idx])) as u16
    }
}

/// Truncate an `f32` to half-precision bits
#[inline]
pub fn to_half_bits(value: f32) -> u16 {
    tables().convert(value)
}

/// Truncate an `f32` to a half-precision value
#[inline]
pub fn to_half(value: f32) -> f16 {
    f16::from_bits(to_half_bits(value))
}

/// Truncate a whole slice
pub fn quantize_slice(values: &[f32]) -> Vec<f16> {
    let t = tables();
    values
        .iter()
        .map(|&v| f16::from_bits(t.convert(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generation_is_idempotent() {
        let first = generate_tables();
        let second = generate_tables();
        assert!(first == second);
        assert!(*tables() == first);
    }

    #[test]
    fn test_known_bit_patterns() {
        assert_eq!(to_half_bits(1.0), 0x3C00);
        assert_eq!(to_half_bits(-2.0), 0xC000);
        assert_eq!(to_half_bits(0.5), 0x3800);
        assert_eq!(to_half_bits(65504.0), 0x7BFF);
        assert_eq!(to_half_bits(0.0), 0x0000);
        assert_eq!(to_half_bits(-0.0), 0x8000);
    }

    #[test]
    fn test_special_values() {
        assert_eq!(to_half_bits(f32::INFINITY), 0x7C00);
        assert_eq!(to_half_bits(f32::NEG_INFINITY), 0xFC00);
        assert!(to_half(f32::NAN).is_nan());
        // Above the largest finite half
        assert_eq!(to_half_bits(1.0e6), 0x7C00);
        assert_eq!(to_half_bits(-1.0e6), 0xFC00);
        // Below the smallest half subnormal
        assert_eq!(to_half_bits(1.0e-10), 0x0000);
    }

    #[test]
    fn test_subnormals() {
        // Smallest half subnormal is 2^-24
        assert_eq!(to_half_bits(2.0f32.powi(-24)), 0x0001);
        // Largest half subnormal is 1023 * 2^-24
        assert_eq!(to_half_bits(1023.0 * 2.0f32.powi(-24)), 0x03FF);
        assert_eq!(to_half_bits(2.0f32.powi(-15)), 0x0200);
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        // 1 + 2^-11 + 2^-12 rounds up under round-to-nearest but truncates to 1.0 here
        let v = 1.0 + 2.0f32.powi(-11) + 2.0f32.powi(-12);
        assert_eq!(to_half_bits(v), 0x3C00);
        assert_eq!(half::f16::from_f32(v).to_bits(), 0x3C01);
    }

    #[test]
    fn test_exact_halves_roundtrip() {
        for bits in 0u16..0x7C00 {
            let h = f16::from_bits(bits);
            assert_eq!(to_half_bits(h.to_f32()), bits);
            assert_eq!(to_half_bits(-h.to_f32()), bits | 0x8000);
        }
    }

    #[test]
    fn test_monotonic_truncation() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100_000 {
            let exp = rng.gen_range(-30i32..16);
            let v = rng.gen_range(-1.0f32..1.0) * 2.0f32.powi(exp);
            let back = to_half(v).to_f32();
            assert!(back.abs() <= v.abs(), "{} widened to {}", v, back);
            assert!(back == 0.0 || back.signum() == v.signum());
        }
    }

    #[test]
    fn test_quantize_slice() {
        let halves = quantize_slice(&[1.0, 2.0, -0.25]);
        let widened: Vec<f32> = halves.iter().map(|h| h.to_f32()).collect();
        assert_eq!(widened, vec![1.0, 2.0, -0.25]);
    }
}
