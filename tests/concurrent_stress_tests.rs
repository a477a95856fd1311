//! Stress Tests for Sharded Caches
//!
//! Verifies thread safety and post-join consistency under contention.
//! Compiled only with the `concurrent` feature (see Cargo.toml).

#![cfg(feature = "concurrent")]

use cachekit::config::{
    ArcCacheConfig, LfuCacheConfig, LruCacheConfig, ShardedArcCacheConfig, ShardedCacheConfig,
    ShardedLfuCacheConfig, ShardedLruCacheConfig,
};
use cachekit::{ShardedArcCache, ShardedLfuCache, ShardedLruCache};
use std::sync::Arc;
use std::thread;

const NUM_THREADS: usize = 16;
const OPS_PER_THREAD: usize = 10_000;

fn lru_config(capacity: usize, shards: usize) -> ShardedLruCacheConfig {
    ShardedCacheConfig {
        base: LruCacheConfig::new(capacity),
        shards,
    }
}

fn lfu_config(capacity: usize, shards: usize) -> ShardedLfuCacheConfig {
    ShardedCacheConfig {
        base: LfuCacheConfig::with_decay(capacity, 16),
        shards,
    }
}

fn arc_config(capacity: usize, shards: usize) -> ShardedArcCacheConfig {
    ShardedCacheConfig {
        base: ArcCacheConfig::new(capacity),
        shards,
    }
}

/// Cheap deterministic per-thread mixer for key selection.
fn mix(t: usize, i: usize) -> usize {
    let x = (t as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (i as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    (x >> 33) as usize
}

#[test]
fn stress_lru_high_contention() {
    let cache: Arc<ShardedLruCache<usize, usize>> =
        Arc::new(ShardedLruCache::init(lru_config(100, 16), None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = i % 10; // few keys: high contention
                if t % 2 == 0 {
                    cache.put(key, t * OPS_PER_THREAD + i);
                } else {
                    let _ = cache.get(&key);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert!(cache.len() <= cache.cap());
}

#[test]
fn stress_lfu_random_mix() {
    let cache: Arc<ShardedLfuCache<usize, usize>> =
        Arc::new(ShardedLfuCache::init(lfu_config(500, 8), None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = mix(t, i) % 300;
                match mix(t, i.wrapping_add(1)) % 4 {
                    0 | 1 => {
                        cache.put(key, i);
                    }
                    2 => {
                        let _ = cache.get(&key);
                    }
                    _ => {
                        let _ = cache.remove(&key);
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert!(cache.len() <= cache.cap());
}

#[test]
fn stress_arc_random_mix() {
    let cache: Arc<ShardedArcCache<usize, usize>> =
        Arc::new(ShardedArcCache::init(arc_config(256, 8), None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = mix(t, i) % 400;
                match mix(t, i.wrapping_add(7)) % 4 {
                    0 | 1 => {
                        cache.put(key, i);
                    }
                    2 => {
                        let _ = cache.get(&key);
                    }
                    _ => {
                        let _ = cache.remove(&key);
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert!(cache.len() <= cache.cap());
}

#[test]
fn stress_shard_count_sweep() {
    for shards in [1, 2, 4, 8, 16, 32] {
        let cache: Arc<ShardedLruCache<usize, usize>> =
            Arc::new(ShardedLruCache::init(lru_config(1000, shards), None));

        let mut handles = Vec::new();
        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..1000 {
                    cache.put(t * 1000 + i, i);
                    let _ = cache.get(&(t * 1000 + i));
                }
            }));
        }

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert_eq!(cache.shard_count(), shards);
        assert!(cache.len() <= cache.cap());
    }
}

#[test]
fn stress_clear_during_writes() {
    let cache: Arc<ShardedLruCache<usize, usize>> =
        Arc::new(ShardedLruCache::init(lru_config(200, 16), None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..2000 {
                cache.put(mix(t, i) % 500, i);
                if t == 0 && i % 500 == 0 {
                    cache.clear();
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert!(cache.len() <= cache.cap());
}

#[test]
fn sharded_residency_bounds_e5() {
    // E5: c=100, 4 shards, 10k random puts over keys 0..999.
    let cache: ShardedLruCache<usize, usize> = ShardedLruCache::init(lru_config(100, 4), None);

    for i in 0..10_000 {
        let key = mix(7, i) % 1000;
        cache.put(key, i);
    }

    // ceil(100 / 4) = 25 per shard, 100 total.
    assert!(cache.len() <= 100);
    for key in 0..1000 {
        assert!(cache.shard_len_for(&key) <= 25);
    }
}

#[test]
fn sharded_throughput_scales_on_disjoint_ranges() {
    // Not a benchmark: just verifies that disjoint key ranges land on
    // (mostly) different shards and the combined residency is sane.
    let cache: Arc<ShardedLruCache<usize, usize>> =
        Arc::new(ShardedLruCache::init(lru_config(4096, 16), None));

    let mut handles = Vec::new();
    for t in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            let base = t * 100_000;
            let mut hits = 0usize;
            for i in 0..2000 {
                cache.put(base + i, i);
                if cache.get(&(base + i)) == Some(i) {
                    hits += 1;
                }
            }
            // Read-back can only fail if other threads churned this key's
            // shard through its whole capacity in between; nearly all
            // immediate reads must succeed.
            assert!(hits > 1500);
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert!(cache.len() <= cache.cap());
    assert!(!cache.is_empty());
}
