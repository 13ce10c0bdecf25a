use rayon::prelude::*;
use tracing::debug;

use crate::bloom::BloomFilter;
use crate::config::{Algorithm, MatchConfig, PRINT_BLOOM_BITS, PRINT_RK_HASH};
use crate::error::Result;
use crate::report::MatchSummary;
use crate::rolling_hash::RollingHash;

/// Result of looking for one chunk with the single-pattern Rabin-Karp matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RabinKarpOutcome {
    pub found: bool,
    /// The first few target window hashes, in the order the windows were visited.
    pub leading_hashes: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Target windows equal to at least one query chunk.
    pub matched: usize,
    /// Target windows the filter let through to byte verification.
    pub candidates: usize,
    /// Hex dump of the leading filter bits; `None` when no filter was built.
    pub filter_prefix: Option<String>,
}

/// Run `algorithm` over every whole chunk of `query` and summarize the result.
///
/// Chunks are tested independently for the naive and single-pattern
/// strategies, so those fan out over Rayon; results keep chunk order.
pub fn match_document(
    algorithm: Algorithm,
    query: &[u8],
    target: &[u8],
    config: &MatchConfig,
) -> Result<MatchSummary> {
    let k = config.chunk_size;
    let total = config.chunk_count(query.len());
    let mut summary = MatchSummary::new(algorithm, config, total);

    match algorithm {
        Algorithm::Naive => {
            summary.matched = query
                .par_chunks_exact(k)
                .filter(|chunk| simple_match(chunk, target))
                .count();
        }
        Algorithm::Rk => {
            let outcomes: Vec<RabinKarpOutcome> = query
                .par_chunks_exact(k)
                .map(|chunk| rabin_karp_match(chunk, target, config))
                .collect();
            summary.matched = outcomes.iter().filter(|o| o.found).count();
            summary.leading_hashes = Some(outcomes.into_iter().map(|o| o.leading_hashes).collect());
        }
        Algorithm::Batch => {
            let bsz = config.filter_bits(query.len());
            let outcome = rabin_karp_batchmatch(bsz, query, target, config)?;
            summary.matched = outcome.matched;
            summary.filter_candidates = Some(outcome.candidates);
            summary.filter_prefix = outcome.filter_prefix;
        }
    }

    Ok(summary.finish())
}

/// Check whether `chunk` occurs in `target` by comparing every window byte for byte.
pub fn simple_match(chunk: &[u8], target: &[u8]) -> bool {
    debug_assert!(!chunk.is_empty());
    target.windows(chunk.len()).any(|window| window == chunk)
}

/// Check whether `chunk` occurs in `target` by comparing rolling hashes.
///
/// Equal hashes count as a match without looking at the bytes, so a hash
/// collision is reported as found.
pub fn rabin_karp_match(chunk: &[u8], target: &[u8], config: &MatchConfig) -> RabinKarpOutcome {
    let k = chunk.len();
    let mut outcome = RabinKarpOutcome::default();
    if target.len() < k {
        return outcome;
    }

    let mut rolling = RollingHash::new(config.modulus, k);
    let query_hash = rolling.hash_window(chunk);
    rolling.init(&target[..k]);

    let mut pos: usize = 0;
    loop {
        let digest = rolling.digest();
        if outcome.leading_hashes.len() < PRINT_RK_HASH {
            outcome.leading_hashes.push(digest);
        }
        if digest == query_hash {
            outcome.found = true;
            break;
        }
        if pos + k >= target.len() {
            break;
        }
        rolling.rotate(target[pos], target[pos + k]);
        pos += 1;
    }

    outcome
}

/// Match all whole chunks of `query` against `target` in one scan.
///
/// Every chunk hash goes into a `bsz`-bit Bloom filter; each target window
/// whose hash passes the filter is compared byte for byte with every chunk.
/// The count is per window: overlapping or repeated occurrences all count.
pub fn rabin_karp_batchmatch(
    bsz: usize,
    query: &[u8],
    target: &[u8],
    config: &MatchConfig,
) -> Result<BatchOutcome> {
    let k = config.chunk_size;
    let chunks: Vec<&[u8]> = query.chunks_exact(k).collect();

    if target.len() < k || chunks.is_empty() {
        debug!(
            target_len = target.len(),
            chunks = chunks.len(),
            chunk_size = k,
            "Nothing to scan, skipping filter"
        );
        return Ok(BatchOutcome::default());
    }

    let mut rolling = RollingHash::new(config.modulus, k);
    let chunk_hashes: Vec<u64> = chunks
        .par_iter()
        .map(|chunk| rolling.hash_window(chunk))
        .collect();

    let mut filter = BloomFilter::new(bsz)?;
    for &hash in &chunk_hashes {
        filter.insert(hash);
    }
    debug!(
        bits = filter.bit_len(),
        inserted = chunk_hashes.len(),
        set = filter.count_ones(),
        "Populated Bloom filter"
    );
    let filter_prefix = filter.dump(PRINT_BLOOM_BITS)?;

    let windows = target.len() - k + 1;
    let mut matched: usize = 0;
    let mut candidates: usize = 0;

    rolling.init(&target[..k]);
    for pos in 0..windows {
        if filter.query(rolling.digest()) {
            candidates += 1;
            let window = &target[pos..pos + k];
            if chunks.iter().any(|chunk| *chunk == window) {
                matched += 1;
            }
        }
        if pos + 1 < windows {
            rolling.rotate(target[pos], target[pos + k]);
        }
    }

    debug!(
        windows,
        candidates,
        matched,
        rejected = candidates - matched,
        "Scanned target"
    );

    Ok(BatchOutcome {
        matched,
        candidates,
        filter_prefix: Some(filter_prefix),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"it was the best of times it was the worst of times it was the age of \
        wisdom it was the age of foolishness it was the epoch of belief it was the epoch of \
        incredulity it was the season of light it was the season of darkness";

    fn config(k: usize) -> MatchConfig {
        MatchConfig::new(k, crate::config::DEFAULT_MODULUS).unwrap()
    }

    #[test]
    fn test_simple_match() {
        assert!(simple_match(b"abc", b"xxabcxx"));
        assert!(simple_match(b"abc", b"abc"));
        assert!(!simple_match(b"abd", b"xxabcxx"));
        assert!(!simple_match(b"abcd", b"abc"));
    }

    #[test]
    fn test_repeated_chunk_scenario() {
        let cfg = config(3);
        for algorithm in [Algorithm::Naive, Algorithm::Rk, Algorithm::Batch] {
            let summary = match_document(algorithm, b"abcabc", b"xxabcxxabcxx", &cfg).unwrap();
            assert_eq!(summary.total, 2, "{:?}", algorithm);
            assert_eq!(summary.matched, 2, "{:?}", algorithm);
            assert_eq!(summary.ratio, 1.0, "{:?}", algorithm);
        }
    }

    #[test]
    fn test_rk_leading_hashes_stop_at_match() {
        let cfg = config(3);
        let target = b"xxabcxxabcxx";
        let outcome = rabin_karp_match(b"abc", target, &cfg);
        assert!(outcome.found);

        let hasher = RollingHash::new(cfg.modulus, 3);
        let expected: Vec<u64> = target
            .windows(3)
            .take(3)
            .map(|w| hasher.hash_window(w))
            .collect();
        assert_eq!(outcome.leading_hashes, expected);
    }

    #[test]
    fn test_rk_leading_hashes_capped() {
        let cfg = config(3);
        let target = b"xxabcxxabcxx";
        let outcome = rabin_karp_match(b"zzz", target, &cfg);
        assert!(!outcome.found);
        assert_eq!(outcome.leading_hashes.len(), PRINT_RK_HASH);

        let hasher = RollingHash::new(cfg.modulus, 3);
        assert_eq!(outcome.leading_hashes[4], hasher.hash_window(b"cxx"));
    }

    #[test]
    fn test_rk_short_target() {
        let outcome = rabin_karp_match(b"abcd", b"abc", &config(4));
        assert_eq!(outcome, RabinKarpOutcome::default());
    }

    #[test]
    fn test_naive_and_rk_agree_per_chunk() {
        let query: Vec<u8> = b"the season of light and the epoch of belief and the worst of times"
            .to_vec();
        for k in [1usize, 4, 7, 12] {
            let cfg = config(k);
            for chunk in query.chunks_exact(k) {
                assert_eq!(
                    simple_match(chunk, SAMPLE),
                    rabin_karp_match(chunk, SAMPLE, &cfg).found,
                    "chunk {:?} with k = {}",
                    String::from_utf8_lossy(chunk),
                    k
                );
            }
        }
    }

    #[test]
    fn test_rk_collision_is_reported_but_batch_rejects_it() {
        // With M = 101 and k = 1 the bytes 97 and 198 hash to the same value.
        let cfg = MatchConfig::new(1, 101).unwrap();
        assert!(rabin_karp_match(&[97], &[198], &cfg).found);
        assert!(!simple_match(&[97], &[198]));

        let outcome = rabin_karp_batchmatch(8, &[97], &[198], &cfg).unwrap();
        assert_eq!(outcome.candidates, 1);
        assert_eq!(outcome.matched, 0);
    }

    #[test]
    fn test_batch_rejects_filter_false_positives() {
        // In an 8-bit filter, 'a' (97) sets bits 0, 2, 4 and 6. Any byte that is
        // 1 mod 8 ('i', 'q', 'y') probes exactly those bits.
        let cfg = config(1);
        let outcome = rabin_karp_batchmatch(8, b"a", b"iqya", &cfg).unwrap();
        assert_eq!(outcome.candidates, 4);
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.filter_prefix.as_deref(), Some("aa"));
    }

    #[test]
    fn test_batch_counts_windows_not_chunks() {
        let cfg = config(1);
        let outcome = rabin_karp_batchmatch(16, b"ab", b"abab", &cfg).unwrap();
        assert_eq!(outcome.matched, 4);

        let summary = match_document(Algorithm::Batch, b"ab", b"abab", &cfg).unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.matched, 4);
    }

    #[test]
    fn test_batch_matches_naive_on_distinct_windows() {
        let query = b"zzzzzzzzzof beliefqqqqqqqqqof darknessyyyyyyyyyy";
        let cfg = config(9);
        let naive = match_document(Algorithm::Naive, query, SAMPLE, &cfg).unwrap();
        let batch = match_document(Algorithm::Batch, query, SAMPLE, &cfg).unwrap();
        // Each matching chunk occurs once in the sample, so window and chunk counts agree.
        assert_eq!(naive.matched, 2);
        assert_eq!(batch.matched, naive.matched);
    }

    #[test]
    fn test_batch_short_target_builds_no_filter() {
        let cfg = config(5);
        let outcome = rabin_karp_batchmatch(0, b"abcdefghij", b"abc", &cfg).unwrap();
        assert_eq!(outcome, BatchOutcome::default());
        assert!(outcome.filter_prefix.is_none());
    }

    #[test]
    fn test_short_query_has_no_chunks() {
        let cfg = config(10);
        for algorithm in [Algorithm::Naive, Algorithm::Rk, Algorithm::Batch] {
            let summary = match_document(algorithm, b"short", SAMPLE, &cfg).unwrap();
            assert_eq!(summary.total, 0);
            assert_eq!(summary.matched, 0);
            assert_eq!(summary.ratio, 0.0);
        }
    }

    #[test]
    fn test_trailing_partial_chunk_ignored() {
        let cfg = config(3);
        // "abc" is a whole chunk; "xy" is the discarded tail even though it occurs.
        let summary = match_document(Algorithm::Naive, b"abcxy", b"zzxyzz", &cfg).unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.matched, 0);
    }
}
