//! Workload Tests
//!
//! Runs the three core policies against synthetic access patterns (hotspot,
//! cyclic scan) and checks the hard properties: residency bounds hold at
//! every step and every policy serves a non-trivial number of hits. The
//! relative hit-rate expectations are qualitative, so they are asserted
//! loosely; the workloads are deterministic (fixed xorshift seed) to keep
//! runs reproducible.

use cachekit::config::{ArcCacheConfig, LfuCacheConfig, LruCacheConfig};
use cachekit::{ArcCache, CachePolicy, LfuCache, LruCache};

/// Small deterministic PRNG (xorshift64*), enough for workload shaping.
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        XorShift(seed.max(1))
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

struct RunStats {
    hits: u64,
    requests: u64,
}

impl RunStats {
    fn hit_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.requests as f64
        }
    }
}

/// Hotspot workload: `hot` keys take `hot_ratio` percent of accesses, the
/// rest spread over a large cold range. 70% of operations are gets.
fn run_hotspot<C: CachePolicy<u64, u64>>(
    cache: &mut C,
    ops: u64,
    hot: u64,
    cold: u64,
    hot_percent: u64,
    seed: u64,
) -> RunStats {
    let mut rng = XorShift::new(seed);
    let mut stats = RunStats {
        hits: 0,
        requests: 0,
    };

    for i in 0..ops {
        let key = if rng.below(100) < hot_percent {
            rng.below(hot)
        } else {
            hot + rng.below(cold)
        };

        if i % 10 < 7 {
            stats.requests += 1;
            if cache.get(&key).is_some() {
                stats.hits += 1;
            } else {
                cache.put(key, key);
            }
        } else {
            cache.put(key, key);
        }

        assert!(
            cache.len() <= cache.capacity(),
            "capacity bound violated mid-workload"
        );
    }

    stats
}

/// Cyclic scan: sequential sweeps over a range larger than the cache.
fn run_cyclic_scan<C: CachePolicy<u64, u64>>(cache: &mut C, rounds: u64, range: u64) -> RunStats {
    let mut stats = RunStats {
        hits: 0,
        requests: 0,
    };
    for _ in 0..rounds {
        for key in 0..range {
            stats.requests += 1;
            if cache.get(&key).is_some() {
                stats.hits += 1;
            } else {
                cache.put(key, key);
            }
            assert!(cache.len() <= cache.capacity());
        }
    }
    stats
}

#[test]
fn hotspot_all_policies_hit_and_stay_bounded() {
    // E6 shape: 20 hot keys, 5000 cold, 70% hot accesses, c = 50.
    const OPS: u64 = 200_000;

    let mut lru: LruCache<u64, u64> = LruCache::init(LruCacheConfig::new(50), None);
    let mut lfu: LfuCache<u64, u64> = LfuCache::init(LfuCacheConfig::with_decay(50, 8), None);
    let mut arc: ArcCache<u64, u64> = ArcCache::init(ArcCacheConfig::new(50), None);

    let lru_stats = run_hotspot(&mut lru, OPS, 20, 5000, 70, 42);
    let lfu_stats = run_hotspot(&mut lfu, OPS, 20, 5000, 70, 42);
    let arc_stats = run_hotspot(&mut arc, OPS, 20, 5000, 70, 42);

    // Hard pass/fail: every policy serves hits on a 70%-hot workload.
    assert!(lru_stats.hit_rate() > 0.0);
    assert!(lfu_stats.hit_rate() > 0.0);
    assert!(arc_stats.hit_rate() > 0.0);

    // The hot set (20 keys) fits in the cache (50), so steady-state hit
    // rates must at least approach the hot-access share for the
    // frequency-aware policies. Keep the bound loose: the workload is
    // random and LRU legitimately churns on cold keys.
    assert!(lfu_stats.hit_rate() > 0.4, "LFU pins the hot set");
    assert!(arc_stats.hit_rate() > 0.4, "ARC pins the hot set");

    // Qualitative comparison only: frequency-aware policies should not be
    // dramatically worse than plain LRU on a stable hotspot.
    assert!(lfu_stats.hit_rate() + 0.05 >= lru_stats.hit_rate());
    assert!(arc_stats.hit_rate() + 0.05 >= lru_stats.hit_rate());
}

#[test]
fn cyclic_scan_never_violates_bounds() {
    // A scan over 3x the capacity with no repeats inside a window defeats
    // every policy (with equal counts LFU degenerates to FIFO order). The
    // hard property here is the invariants, not the (terrible) hit rate.
    let mut lru: LruCache<u64, u64> = LruCache::init(LruCacheConfig::new(32), None);
    let stats = run_cyclic_scan(&mut lru, 4, 96);
    assert_eq!(stats.hits, 0, "pure cyclic scan defeats plain LRU");

    let mut lfu: LfuCache<u64, u64> = LfuCache::init(LfuCacheConfig::new(32), None);
    let stats = run_cyclic_scan(&mut lfu, 4, 96);
    assert_eq!(stats.hits, 0, "without repeats LFU is FIFO, same outcome");

    let mut arc: ArcCache<u64, u64> = ArcCache::init(ArcCacheConfig::new(32), None);
    let stats = run_cyclic_scan(&mut arc, 4, 96);
    assert!(stats.requests > 0);
    assert!(arc.len() <= arc.capacity());
}

#[test]
fn lfu_pinned_subset_survives_cyclic_scan() {
    // Establish a hot subset first; the scan then churns only the
    // remaining slots while the pinned keys keep serving hits.
    let mut lfu: LfuCache<u64, u64> = LfuCache::init(LfuCacheConfig::new(32), None);
    for key in 0..16u64 {
        lfu.put(key, key);
        lfu.get(&key);
        lfu.get(&key);
    }

    let stats = run_cyclic_scan(&mut lfu, 4, 96);
    // 16 pinned keys hit on every one of the 4 rounds.
    assert!(stats.hits >= 16 * 4, "pinned subset keeps hitting");
    for key in 0..16u64 {
        assert!(lfu.contains(&key), "pinned key evicted by the scan");
    }
}

#[test]
fn phase_shift_keeps_serving_after_hot_set_moves() {
    // Hotspot phase A, then the hot set jumps: adaptive policies must
    // recover without violating any bound.
    let mut arc: ArcCache<u64, u64> = ArcCache::init(ArcCacheConfig::new(50), None);

    let phase_a = run_hotspot(&mut arc, 50_000, 20, 5000, 70, 7);
    assert!(phase_a.hit_rate() > 0.3);

    // Phase B: different seed, hot keys offset into the old cold range.
    let mut rng = XorShift::new(99);
    let mut hits = 0u64;
    let mut requests = 0u64;
    for i in 0..50_000u64 {
        let key = if rng.below(100) < 70 {
            10_000 + rng.below(20)
        } else {
            rng.below(5000)
        };
        if i % 10 < 7 {
            requests += 1;
            if arc.get(&key).is_some() {
                hits += 1;
            } else {
                arc.put(key, key);
            }
        } else {
            arc.put(key, key);
        }
        assert!(arc.len() <= arc.capacity());
    }
    assert!(
        hits as f64 / requests as f64 > 0.3,
        "ARC recovers after the phase shift"
    );
}
