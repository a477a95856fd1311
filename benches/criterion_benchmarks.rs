#![allow(missing_docs)]

use cachekit::config::{ArcCacheConfig, LfuCacheConfig, LruCacheConfig, LruKCacheConfig};
use cachekit::{ArcCache, LfuCache, LruCache, LruKCache};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_lru(cap: usize) -> LruCache<usize, usize> {
    LruCache::init(LruCacheConfig::new(cap), None)
}

fn make_lru_k(cap: usize) -> LruKCache<usize, usize> {
    LruKCache::init(LruKCacheConfig::new(cap, cap * 2, 2), None)
}

fn make_lfu(cap: usize) -> LfuCache<usize, usize> {
    LfuCache::init(LfuCacheConfig::with_decay(cap, 16), None)
}

fn make_arc(cap: usize) -> ArcCache<usize, usize> {
    ArcCache::init(ArcCacheConfig::new(cap), None)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Cache Operations");

    // LRU benchmarks
    {
        let mut cache = make_lru(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function("LRU get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("LRU get miss", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function("LRU put existing", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(i % CACHE_SIZE, i));
                }
            });
        });
    }

    // LRU-k benchmarks
    {
        let mut cache = make_lru_k(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
            cache.get(&i); // second access admits into the main cache
        }

        group.bench_function("LRU-K get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("LRU-K staged put", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(CACHE_SIZE + (i % 500), i));
                }
            });
        });
    }

    // LFU benchmarks
    {
        let mut cache = make_lfu(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function("LFU get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("LFU put evicting", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(CACHE_SIZE + i, i));
                }
            });
        });
    }

    // ARC benchmarks
    {
        let mut cache = make_arc(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
            cache.get(&i);
        }

        group.bench_function("ARC get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("ARC put cycling", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.put(CACHE_SIZE + (i % 2000), i));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
