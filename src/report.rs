use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

use crate::config::{Algorithm, MatchConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Diagnostic lines followed by "<ratio> matched: <n> out of <total>"
    Text,
    /// One JSON object
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub algorithm: Algorithm,
    pub chunk_size: usize,
    pub modulus: u64,
    pub matched: usize,
    pub total: usize,
    pub ratio: f64,
    /// Per chunk, the first target window hashes seen by the single-pattern matcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_hashes: Option<Vec<Vec<u64>>>,
    /// Leading bits of the populated Bloom filter, as hex bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_candidates: Option<usize>,
}

impl MatchSummary {
    pub fn new(algorithm: Algorithm, config: &MatchConfig, total: usize) -> Self {
        Self {
            algorithm,
            chunk_size: config.chunk_size,
            modulus: config.modulus.get(),
            matched: 0,
            total,
            ratio: 0.0,
            leading_hashes: None,
            filter_prefix: None,
            filter_candidates: None,
        }
    }

    /// Fill in the ratio once `matched` is final.
    pub fn finish(mut self) -> Self {
        self.ratio = ratio(self.matched, self.total);
        self
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if let Some(per_chunk) = &self.leading_hashes {
            for hashes in per_chunk {
                let line: Vec<String> = hashes.iter().map(|h| h.to_string()).collect();
                writeln!(out, "{}", line.join(" "))?;
            }
        }
        if let Some(prefix) = &self.filter_prefix {
            writeln!(out, "{}", prefix)?;
        }
        writeln!(
            out,
            "{:.2} matched: {} out of {}",
            self.ratio, self.matched, self.total
        )
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out).map_err(serde_json::Error::io)
    }
}

/// `matched / total`, defined as 0 when there are no chunks.
pub fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}
