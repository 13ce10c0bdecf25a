//! Fixed-size Bloom filter over rolling-hash values.
//!
//! Guarantees: zero false negatives (if we inserted it, we'll find it).
//! False positives are possible and are resolved by the caller.
//!
//! Bits are packed MSB-first: bit `idx` lives in byte `idx >> 3` under
//! mask `1 << (7 - idx % 8)`. Dumps compare byte-for-byte with other
//! implementations using the same layout.

use crate::error::{MatchError, Result};

/// Number of probe positions per element.
pub const BLOOM_HASH_NUM: u64 = 10;

const H1_PRIME: u64 = 4_189_793;
const H2_PRIME: u64 = 3_296_731;

/// The i-th probe hash for `x`: `(x mod P1) + i*(x mod P2) + 1 + i^2`.
#[inline]
pub fn hash_i(i: u64, x: u64) -> u64 {
    (x % H1_PRIME) + i * (x % H2_PRIME) + 1 + i * i
}

/// Byte index and mask addressing bit `idx`.
#[inline]
fn bit_address(idx: usize) -> (usize, u8) {
    (idx >> 3, 1u8 << (7 - (idx % 8)))
}

#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u8>,
    bsz: usize,
}

impl BloomFilter {
    /// Allocate a filter of `bsz` bits, all clear.
    pub fn new(bsz: usize) -> Result<Self> {
        if bsz == 0 || bsz % 8 != 0 {
            return Err(MatchError::InvalidFilterSize(bsz));
        }
        let len = bsz >> 3;
        let mut bits = Vec::new();
        bits.try_reserve_exact(len)
            .map_err(|_| MatchError::Allocation(len))?;
        bits.resize(len, 0);
        Ok(Self { bits, bsz })
    }

    #[inline]
    fn probe(&self, i: u64, elm: u64) -> usize {
        (hash_i(i, elm) % self.bsz as u64) as usize
    }

    pub fn insert(&mut self, elm: u64) {
        for i in 0..BLOOM_HASH_NUM {
            let (byte, mask) = bit_address(self.probe(i, elm));
            self.bits[byte] |= mask;
        }
    }

    /// Returns `true` if the element might have been inserted (may be a false positive).
    /// Returns `false` if it definitely was not.
    pub fn query(&self, elm: u64) -> bool {
        (0..BLOOM_HASH_NUM).all(|i| {
            let (byte, mask) = bit_address(self.probe(i, elm));
            self.bits[byte] & mask != 0
        })
    }

    pub fn bit_len(&self) -> usize {
        self.bsz
    }

    /// Number of set bits, for eyeballing saturation.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Render the first `count` bits as space-separated hex bytes.
    pub fn dump(&self, count: usize) -> Result<String> {
        if count % 8 != 0 {
            return Err(MatchError::InvalidDumpWidth(count));
        }
        let shown = (count >> 3).min(self.bits.len());
        Ok(self.bits[..shown]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" "))
    }
}
