// In benches/batch_assembly_bench.rs

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qdb_ingest::arena::BlobArena;
use qdb_ingest::kernels::{apply_permutation, apply_permutation_with_scratch, sort_permutation};
use qdb_ingest::types::Timespec;

const ROWS: usize = 100_000;

/// Payloads between 1 and 256 bytes, like short string and blob cells.
fn generate_payloads(count: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|_| {
            let len = rng.random_range(1..=256);
            (0..len).map(|_| rng.random::<u8>()).collect()
        })
        .collect()
}

/// A mostly ordered index with local jitter, as produced by several feeds merged late.
fn generate_index(count: usize) -> Vec<Timespec> {
    let mut rng = StdRng::seed_from_u64(11);
    (0..count as i64)
        .map(|i| Timespec::from_nanos(i * 1_000 + rng.random_range(-5_000..5_000)))
        .collect()
}

fn bench_blob_arena(c: &mut Criterion) {
    let payloads = generate_payloads(ROWS / 10);
    let total: usize = payloads.iter().map(Vec::len).sum();

    let mut group = c.benchmark_group("Blob Arena");
    group.throughput(Throughput::Bytes(total as u64));

    group.bench_function("fill (fresh arena)", |b| {
        b.iter(|| {
            let mut arena = BlobArena::new().unwrap();
            for payload in &payloads {
                black_box(arena.add(payload).unwrap());
            }
            arena
        })
    });

    group.bench_function("fill (cleared arena)", |b| {
        let mut arena = BlobArena::new().unwrap();
        b.iter(|| {
            arena.clear();
            for payload in &payloads {
                black_box(arena.add(payload).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_sort_and_apply(c: &mut Criterion) {
    let index = generate_index(ROWS);
    let column: Vec<f64> = (0..ROWS).map(|i| i as f64).collect();

    let mut group = c.benchmark_group("Sort & Permute");
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function("sort_permutation", |b| {
        b.iter(|| sort_permutation(black_box(&index), |a, b| a < b))
    });

    group.bench_function("sort + apply (index and 4 columns)", |b| {
        b.iter_batched(
            || (index.clone(), vec![column.clone(); 4]),
            |(mut index, mut columns)| {
                let mut perm = sort_permutation(&index, |a, b| a < b);
                let mut scratch = Vec::with_capacity(perm.len());
                for column in &mut columns {
                    apply_permutation_with_scratch(column, &perm, &mut scratch);
                }
                apply_permutation(&mut index, &mut perm);
                (index, columns)
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_blob_arena, bench_sort_and_apply);
criterion_main!(benches);
