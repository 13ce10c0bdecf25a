use clap::ValueEnum;
use serde::Serialize;

use crate::error::{MatchError, Result};
use crate::modular::Modulus;
pub use crate::modular::DEFAULT_MODULUS;

pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Filter bits allotted per query chunk in batch mode.
pub const FILTER_BITS_PER_CHUNK: usize = 10;

/// How many target hashes the single-pattern matcher reports per chunk.
pub const PRINT_RK_HASH: usize = 5;

/// How many leading filter bits the batch matcher reports.
pub const PRINT_BLOOM_BITS: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Byte-compare every window of the target
    #[value(alias = "0")]
    Naive,
    /// Rabin-Karp, one chunk at a time
    #[value(alias = "1")]
    Rk,
    /// Rabin-Karp over all chunks at once, gated by a Bloom filter
    #[value(alias = "2")]
    Batch,
}

/// Parameters fixed for a whole run and passed to every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub chunk_size: usize,
    pub modulus: Modulus,
}

impl MatchConfig {
    pub fn new(chunk_size: usize, modulus: u64) -> Result<Self> {
        if chunk_size == 0 {
            return Err(MatchError::InvalidChunkSize);
        }
        Ok(Self {
            chunk_size,
            modulus: Modulus::new(modulus)?,
        })
    }

    /// Number of whole chunks in a query of `query_len` bytes.
    pub fn chunk_count(&self, query_len: usize) -> usize {
        query_len / self.chunk_size
    }

    /// Batch filter size: `query_len * 10 / k`, rounded down to a multiple of 8.
    pub fn filter_bits(&self, query_len: usize) -> usize {
        ((query_len * FILTER_BITS_PER_CHUNK / self.chunk_size) >> 3) << 3
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            modulus: Modulus::default(),
        }
    }
}
