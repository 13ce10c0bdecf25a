use crate::modular::{Modulus, RADIX};

/// Base-256 polynomial rolling hash (Rabin-Karp) over a fixed-width window.
///
/// `H(w) = (w[0]*256^(k-1) + ... + w[k-1]) mod M`.
/// Supports O(1) sliding window updates: remove oldest byte, add new byte.
#[derive(Debug, Clone)]
pub struct RollingHash {
    modulus: Modulus,
    value: u64,
    /// `256^(k-1) mod M`, the weight of the byte about to leave the window.
    top_coeff: u64,
    window_size: usize,
}

impl RollingHash {
    pub fn new(modulus: Modulus, window_size: usize) -> Self {
        Self {
            modulus,
            value: 0,
            top_coeff: modulus.pow(RADIX, window_size.saturating_sub(1)),
            window_size,
        }
    }

    /// Hash a whole window from scratch without touching the rolling state.
    pub fn hash_window(&self, data: &[u8]) -> u64 {
        let m = self.modulus;
        data.iter()
            .fold(0, |h, &byte| m.add(m.mul(h, RADIX), m.reduce(byte as u64)))
    }

    /// Compute hash over an initial window of data.
    pub fn init(&mut self, data: &[u8]) {
        debug_assert_eq!(data.len(), self.window_size);
        self.value = self.hash_window(data);
    }

    /// Slide the window: remove `old_byte` from front, add `new_byte` at back.
    pub fn rotate(&mut self, old_byte: u8, new_byte: u8) {
        let m = self.modulus;
        let outgoing = m.mul(old_byte as u64, self.top_coeff);
        self.value = m.add(
            m.mul(m.sub(self.value, outgoing), RADIX),
            m.reduce(new_byte as u64),
        );
    }

    pub fn digest(&self) -> u64 {
        self.value
    }
}
