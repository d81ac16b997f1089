// Integration tests for the public chunking API
// Tests cover: partition, bounds, determinism, seeds, distribution, pooling

use std::io::{Cursor, Read};

use gearcdc::{
    BoundaryScanner, ChunkConfig, ChunkError, ChunkerPool, ConfigError, OwnedChunk, ScannerPool,
    StreamChunker,
};
use rand_chacha::{
    ChaCha8Rng, ChaCha20Rng,
    rand_core::{RngCore, SeedableRng},
};

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    ChaCha8Rng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

fn chunk_all<R: Read>(reader: R, config: ChunkConfig) -> Vec<OwnedChunk> {
    StreamChunker::new(reader, config)
        .unwrap()
        .into_owned_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn lengths(chunks: &[OwnedChunk]) -> Vec<usize> {
    chunks.iter().map(|c| c.len()).collect()
}

fn assert_partition(chunks: &[OwnedChunk], data: &[u8], config: &ChunkConfig) {
    let mut offset = 0u64;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.offset, offset, "chunk {} offset", i);
        assert!(chunk.len() <= config.max_size() as usize, "chunk {} too large", i);
        if i + 1 < chunks.len() {
            assert!(chunk.len() >= config.min_size() as usize, "chunk {} too small", i);
        }
        assert_eq!(&chunk.data[..], &data[offset as usize..chunk.end() as usize]);
        offset = chunk.end();
    }
    assert_eq!(offset, data.len() as u64, "chunks must cover the input");
}

// ============================================================================
// Partition and Bounds
// ============================================================================

#[test]
fn test_partition_across_configs() {
    let data = random_bytes(300_000, 1);
    let configs = [
        ChunkConfig::new(64, 256, 1024).unwrap(),
        ChunkConfig::new(1024, 4096, 16384).unwrap(),
        ChunkConfig::new(1024, 4096, 16384)
            .unwrap()
            .with_normalization_level(0),
        ChunkConfig::new(1024, 4096, 16384)
            .unwrap()
            .with_normalization_level(8),
        ChunkConfig::new(100, 101, 102).unwrap(),
        ChunkConfig::default().with_seed(12345),
    ];

    for config in configs {
        let chunks = chunk_all(Cursor::new(&data), config);
        assert_partition(&chunks, &data, &config);
    }
}

#[test]
fn test_small_input_single_chunk() {
    let config = ChunkConfig::new(1024, 4096, 16384).unwrap();
    let data = random_bytes(1000, 2);

    let mut chunker = StreamChunker::new(Cursor::new(&data), config).unwrap();
    let chunk = chunker.next_chunk().unwrap().unwrap();
    assert_eq!(chunk.offset, 0);
    assert_eq!(chunk.data, &data[..]);
    assert!(chunker.next_chunk().unwrap().is_none());
}

#[test]
fn test_empty_input_no_chunks() {
    let chunks = chunk_all(Cursor::new(Vec::new()), ChunkConfig::default());
    assert!(chunks.is_empty());
}

#[test]
fn test_one_mebibyte_random_scenario() {
    let mut data = vec![0u8; 1 << 20];
    ChaCha20Rng::seed_from_u64(0x5eed).fill_bytes(&mut data);
    let config = ChunkConfig::default().with_target_size(65536);

    let chunks = chunk_all(Cursor::new(&data), config);
    assert!(chunks.len() > 1);
    for chunk in &chunks[..chunks.len() - 1] {
        assert!((16384..=262144).contains(&chunk.len()));
    }
    assert!(chunks.last().unwrap().len() <= 262144);

    let total: usize = chunks.iter().map(|c| c.len()).sum();
    assert_eq!(total, 1 << 20);
    let rebuilt: Vec<u8> = chunks.iter().flat_map(|c| c.data.iter().copied()).collect();
    assert_eq!(rebuilt, data);
}

// ============================================================================
// Determinism and Seeds
// ============================================================================

#[test]
fn test_determinism() {
    let data = random_bytes(500_000, 3);
    let config = ChunkConfig::new(2048, 8192, 32768).unwrap().with_seed(77);

    let key = |chunks: Vec<OwnedChunk>| -> Vec<(u64, usize, u64)> {
        chunks
            .iter()
            .map(|c| (c.offset, c.len(), c.fingerprint))
            .collect()
    };
    let first = key(chunk_all(Cursor::new(&data), config));
    let second = key(chunk_all(Cursor::new(&data), config));
    assert_eq!(first, second);
}

#[test]
fn test_distinct_seeds_change_boundaries() {
    let data = random_bytes(500_000, 4);
    let base = ChunkConfig::new(2048, 8192, 32768).unwrap();

    let a = lengths(&chunk_all(Cursor::new(&data), base.with_seed(1)));
    let b = lengths(&chunk_all(Cursor::new(&data), base.with_seed(2)));
    let c = lengths(&chunk_all(Cursor::new(&data), base));
    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_local_edit_keeps_later_boundaries() {
    let config = ChunkConfig::new(1024, 4096, 16384).unwrap();
    let original = random_bytes(200_000, 5);
    let mut edited = original.clone();
    edited.splice(10_000..10_000, random_bytes(37, 6));

    let before = chunk_all(Cursor::new(&original), config);
    let after = chunk_all(Cursor::new(&edited), config);

    // most chunks after the edit are byte-identical, just shifted
    let shared = after
        .iter()
        .filter(|c| before.iter().any(|b| b.data == c.data))
        .count();
    assert!(shared * 10 >= before.len() * 8, "{} of {}", shared, before.len());
}

// ============================================================================
// Size Distribution
// ============================================================================

#[test]
fn test_distribution_on_ten_mebibytes() {
    let data = random_bytes(10 << 20, 7);
    let config = ChunkConfig::new(16 * 1024, 64 * 1024, 256 * 1024).unwrap();
    let chunks = chunk_all(Cursor::new(&data), config);
    assert_partition(&chunks, &data, &config);

    let n = chunks.len() as f64;
    let mean = chunks.iter().map(|c| c.len() as f64).sum::<f64>() / n;
    let variance = chunks
        .iter()
        .map(|c| (c.len() as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    assert!(std_dev < 400.0 * 1024.0, "std dev {}", std_dev);
    assert!(mean > 16.0 * 1024.0 && mean < 256.0 * 1024.0, "mean {}", mean);
}

// ============================================================================
// Scanner and Stream Agreement
// ============================================================================

#[test]
fn test_scanner_agrees_with_stream() {
    let data = random_bytes(100_000, 8);
    let config = ChunkConfig::new(512, 2048, 8192).unwrap();
    let expected = lengths(&chunk_all(Cursor::new(&data), config));

    let mut scanner = BoundaryScanner::new(&config).unwrap();
    let mut got = Vec::new();
    let mut rest = &data[..];
    while !rest.is_empty() {
        let result = scanner.scan(rest);
        let len = result.boundary().unwrap_or(rest.len());
        got.push(len);
        rest = &rest[len..];
        scanner.reset();
    }
    assert_eq!(got, expected);
}

#[test]
fn test_trickling_source_matches_bulk() {
    /// Hands out at most 7 bytes per read.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(7).min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    let data = random_bytes(50_000, 9);
    let config = ChunkConfig::new(256, 1024, 4096).unwrap();
    assert_eq!(
        chunk_all(Trickle(&data), config),
        chunk_all(Cursor::new(&data), config)
    );
}

// ============================================================================
// Pools
// ============================================================================

#[test]
fn test_pool_matches_fresh_instances() {
    let config = ChunkConfig::new(256, 1024, 4096).unwrap().with_seed(3);
    let pool = ChunkerPool::new(config).unwrap();

    for (i, len) in [10_000, 0, 17, 50_000, 4096, 123].into_iter().enumerate() {
        let data = random_bytes(len, 100 + i as u64);
        let expected = chunk_all(Cursor::new(&data), config);

        let mut chunker = pool.acquire(Cursor::new(&data));
        let mut got = Vec::new();
        while let Some(chunk) = chunker.next_chunk().unwrap() {
            got.push(chunk.to_owned_chunk());
        }
        pool.release(chunker);

        assert_eq!(got, expected, "source {}", i);
    }
    assert_eq!(pool.idle(), 1);
}

#[test]
fn test_pool_abandoned_mid_stream() {
    let config = ChunkConfig::new(64, 256, 1024).unwrap();
    let pool = ChunkerPool::new(config).unwrap();
    let data = random_bytes(20_000, 10);

    let mut chunker = pool.acquire(Cursor::new(&data));
    chunker.next_chunk().unwrap();
    chunker.next_chunk().unwrap();
    pool.release(chunker);

    let chunker = pool.acquire(Cursor::new(&data));
    let got: Vec<_> = chunker.into_owned_iter().map(Result::unwrap).collect();
    assert_eq!(got, chunk_all(Cursor::new(&data), config));
}

#[test]
fn test_pool_across_threads() {
    let config = ChunkConfig::new(256, 1024, 4096).unwrap().with_seed(11);
    let pool = ChunkerPool::with_max_idle(config, 4).unwrap();
    let inputs: Vec<Vec<u8>> = (0..8).map(|i| random_bytes(30_000, 200 + i)).collect();

    std::thread::scope(|s| {
        for data in &inputs {
            let pool = &pool;
            s.spawn(move || {
                let expected = chunk_all(Cursor::new(data), config);
                for _ in 0..5 {
                    let mut chunker = pool.acquire(Cursor::new(data));
                    let mut got = Vec::new();
                    while let Some(chunk) = chunker.next_chunk().unwrap() {
                        got.push(chunk.to_owned_chunk());
                    }
                    pool.release(chunker);
                    assert_eq!(got, expected);
                }
            });
        }
    });

    assert!(pool.idle() <= 4);
}

#[test]
fn test_scanner_pool_across_threads() {
    let config = ChunkConfig::new(128, 512, 2048).unwrap();
    let pool = ScannerPool::new(config).unwrap();
    let data = random_bytes(20_000, 12);
    let expected = BoundaryScanner::new(&config).unwrap().scan(&data);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..10 {
                    let mut scanner = pool.acquire();
                    assert_eq!(scanner.scan(&data), expected);
                    pool.release(scanner);
                }
            });
        }
    });
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_config_errors() {
    let cases = [
        (ChunkConfig::new(0, 10, 20), ConfigError::MinSizeZero),
        (
            ChunkConfig::new(10, 10, 20),
            ConfigError::TargetSizeNotGreaterThanMin { min: 10, target: 10 },
        ),
        (
            ChunkConfig::new(10, 20, 20),
            ConfigError::MaxSizeNotGreaterThanTarget { target: 20, max: 20 },
        ),
    ];
    for (result, expected) in cases {
        match result {
            Err(ChunkError::InvalidConfig(e)) => assert_eq!(e, expected),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    let level = ChunkConfig::default().with_normalization_level(9);
    assert!(matches!(
        StreamChunker::new(Cursor::new(Vec::new()), level),
        Err(ChunkError::InvalidConfig(ConfigError::NormalizationLevelOutOfRange { level: 9 }))
    ));
    assert!(BoundaryScanner::new(&level).is_err());
    assert!(ChunkerPool::new(level).is_err());
}

// ============================================================================
// Hashing Tests
// ============================================================================

#[test]
#[cfg(feature = "hash-blake3")]
fn test_equal_content_equal_hash() {
    let config = ChunkConfig::new(64, 256, 1024).unwrap();
    let block = random_bytes(5000, 13);
    let mut data = block.clone();
    data.extend_from_slice(&block);

    let chunks = chunk_all(Cursor::new(&data), config);
    let hashes: Vec<_> = chunks.iter().map(|c| c.strong_hash()).collect();
    let unique: std::collections::HashSet<_> = hashes.iter().collect();
    assert!(unique.len() < hashes.len(), "repeated block should dedupe");
}
