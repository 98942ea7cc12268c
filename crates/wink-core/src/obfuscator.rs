use crate::error::{CoreError, Result};

pub const DEFAULT_PRIME: u64 = 0x9E37_79B9_7F4A_7C15;
pub const DEFAULT_MASK: u64 = 0xDEAD_BEEF_CAFE_BABE;

/// A reversible scrambler for sequence ids.
///
/// Uses a multiplicative and XOR-based permutation of the whole `u64` space,
/// so consecutive ids no longer map to adjacent short codes. The multiplier
/// must be odd to be invertible modulo 2^64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obfuscator {
    prime: u64,
    inverse: u64,
    mask: u64,
}

impl Obfuscator {
    pub fn new(prime: u64, mask: u64) -> Result<Self> {
        if prime % 2 == 0 {
            return Err(CoreError::InvalidObfuscator(format!(
                "multiplier must be odd, got {prime:#x}"
            )));
        }

        Ok(Self {
            prime,
            inverse: mod_inverse(prime),
            mask,
        })
    }

    pub fn obfuscate(&self, id: u64) -> u64 {
        id.wrapping_mul(self.prime) ^ self.mask
    }

    pub fn reveal(&self, value: u64) -> u64 {
        (value ^ self.mask).wrapping_mul(self.inverse)
    }
}

impl Default for Obfuscator {
    fn default() -> Self {
        Self {
            prime: DEFAULT_PRIME,
            inverse: mod_inverse(DEFAULT_PRIME),
            mask: DEFAULT_MASK,
        }
    }
}

/// Multiplicative inverse of an odd number modulo 2^64 (Newton iteration).
///
/// `a * a == 1 (mod 8)` for odd `a`, and every step doubles the number of
/// correct low bits: 3, 6, 12, 24, 48, 96.
fn mod_inverse(a: u64) -> u64 {
    let mut inverse = a;
    for _ in 0..5 {
        inverse = inverse.wrapping_mul(2u64.wrapping_sub(a.wrapping_mul(inverse)));
    }
    inverse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_is_exact() {
        for a in [1u64, 3, 5, 0xFFFF_FFFF_FFFF_FFFF, DEFAULT_PRIME, 0x1234_5679] {
            assert_eq!(a.wrapping_mul(mod_inverse(a)), 1, "inverse failed for {a:#x}");
        }
    }

    #[test]
    fn reveal_undoes_obfuscate() {
        let obfuscator = Obfuscator::default();
        for id in (0..5_000u64).chain([u64::MAX, u64::MAX / 2, 1 << 63]) {
            assert_eq!(obfuscator.reveal(obfuscator.obfuscate(id)), id);
        }
    }

    #[test]
    fn consecutive_ids_are_scattered() {
        let obfuscator = Obfuscator::default();
        let a = obfuscator.obfuscate(1);
        let b = obfuscator.obfuscate(2);
        assert!(a.abs_diff(b) > 1_000_000);
    }

    #[test]
    fn even_multiplier_is_rejected() {
        assert!(matches!(
            Obfuscator::new(4, 0),
            Err(CoreError::InvalidObfuscator(_))
        ));
        assert!(Obfuscator::new(7, 0xABCD).is_ok());
    }
}
