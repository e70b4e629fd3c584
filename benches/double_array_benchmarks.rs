//! Benchmarks for double-array trie construction, lookup and loading.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use libdarts::prelude::*;

/// Sorted keys of varying lengths with their index as value
fn create_entries(size: usize) -> Vec<(String, i32)> {
    let mut words: Vec<String> = (0..size)
        .map(|i| {
            let len = 4 + (i % 9);
            format!("word{:0width$}", i, width = len - 4)
        })
        .collect();
    words.sort();
    words.dedup();
    words
        .into_iter()
        .enumerate()
        .map(|(i, w)| (w, i as i32))
        .collect()
}

fn create_trie(size: usize) -> DoubleArrayTrie {
    let entries = create_entries(size);
    DoubleArrayTrie::from_entries(entries.iter().map(|(k, v)| (k.as_str(), *v))).unwrap()
}

/// Benchmark: DAWG minimization plus packing
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [1_000, 10_000, 100_000].iter() {
        let entries = create_entries(*size);
        group.throughput(Throughput::Elements(entries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| {
                let mut dawg = DawgBuilder::new();
                for (key, value) in entries {
                    dawg.insert(key.as_bytes(), *value).unwrap();
                }
                let units = DoubleArrayBuilder::new().build(&dawg.finish()).unwrap();
                black_box(units);
            });
        });
    }
    group.finish();
}

/// Benchmark: exact-match lookup, hits and misses
fn bench_get(c: &mut Criterion) {
    let trie = create_trie(100_000);
    let mut group = c.benchmark_group("get");

    group.bench_function("hit", |b| {
        b.iter(|| black_box(trie.get(black_box("word0042017"))));
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(trie.get(black_box("word9x"))));
    });
    group.bench_function("sweep_1000", |b| {
        let keys: Vec<String> = create_entries(1_000).into_iter().map(|(k, _)| k).collect();
        b.iter(|| {
            for key in &keys {
                black_box(trie.get(key));
            }
        });
    });
    group.finish();
}

/// Benchmark: common-prefix enumeration over nested keys
fn bench_common_prefix(c: &mut Criterion) {
    let trie = DoubleArrayTrie::from_entries(
        (1..=32).map(|len| ("a".repeat(len), len as i32)),
    )
    .unwrap();
    let mut group = c.benchmark_group("common_prefix");

    for len in [4usize, 16, 32].iter() {
        let query = "a".repeat(*len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &query, |b, query| {
            b.iter(|| black_box(trie.find_by_common_prefix(black_box(query)).count()));
        });
    }
    group.finish();
}

/// Benchmark: raw format write and load
fn bench_raw_io(c: &mut Criterion) {
    let trie = create_trie(100_000);
    let mut bytes = Vec::with_capacity(trie.total_size());
    trie.write_to(&mut bytes).unwrap();

    let mut group = c.benchmark_group("raw_io");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("write_to", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(bytes.len());
            trie.write_to(&mut out).unwrap();
            black_box(out);
        });
    });
    group.bench_function("load", |b| {
        b.iter(|| black_box(DoubleArrayTrie::load(black_box(&bytes[..])).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_get, bench_common_prefix, bench_raw_io);
criterion_main!(benches);
