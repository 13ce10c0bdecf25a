//! Arithmetic over the integers modulo a fixed modulus.
//!
//! Every operand passed to `add` and `sub` must already lie in `[0, m)`.
//! `mul` widens to 128 bits so it is exact for any operands below the modulus.

use crate::error::{MatchError, Result};

/// Radix of the byte polynomial. The modulus must leave room for one multiplication by it.
pub const RADIX: u64 = 256;

/// Large prime for the rolling hash; `DEFAULT_MODULUS * 256` fits in 64 bits.
pub const DEFAULT_MODULUS: u64 = 5_003_943_032_159_437;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulus(u64);

impl Modulus {
    pub fn new(m: u64) -> Result<Self> {
        if m < 2 || m > u64::MAX / RADIX {
            return Err(MatchError::InvalidModulus(m));
        }
        Ok(Self(m))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn reduce(self, x: u64) -> u64 {
        x % self.0
    }

    #[inline]
    pub fn add(self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.0 && b < self.0);
        let sum = a + b;
        if sum < self.0 {
            sum
        } else {
            sum - self.0
        }
    }

    #[inline]
    pub fn sub(self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.0 && b < self.0);
        if a >= b {
            a - b
        } else {
            a + self.0 - b
        }
    }

    #[inline]
    pub fn mul(self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.0 as u128) as u64
    }

    /// `base^exp mod m` by repeated multiplication.
    pub fn pow(self, base: u64, exp: usize) -> u64 {
        let base = self.reduce(base);
        let mut acc = self.reduce(1);
        for _ in 0..exp {
            acc = self.mul(acc, base);
        }
        acc
    }
}

impl Default for Modulus {
    fn default() -> Self {
        Self(DEFAULT_MODULUS)
    }
}
