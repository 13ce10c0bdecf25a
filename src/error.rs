use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("Chunk size must be at least 1 byte")]
    InvalidChunkSize,

    #[error("Modulus {0} out of range (must be >= 2 and small enough that modulus * 256 fits in 64 bits)")]
    InvalidModulus(u64),

    #[error("Bloom filter size must be a positive multiple of 8 bits, got {0}")]
    InvalidFilterSize(usize),

    #[error("Bloom filter dump width must be a multiple of 8 bits, got {0}")]
    InvalidDumpWidth(usize),

    #[error("Failed to allocate {0} bytes for the Bloom filter")]
    Allocation(usize),
}

pub type Result<T> = std::result::Result<T, MatchError>;
