use criterion::{black_box, criterion_group, criterion_main, Criterion};
use verdict_crypto::{blake2b_256, commit, random_salt, verify};

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| blake2b_256(black_box(&data)))
    });
}

fn blake2b_256_1kb_bench(c: &mut Criterion) {
    let data = vec![0xABu8; 1024];

    c.bench_function("blake2b_256_1KB", |b| {
        b.iter(|| blake2b_256(black_box(&data)))
    });
}

fn commit_bench(c: &mut Criterion) {
    let salt = random_salt();

    c.bench_function("commit_i64_32B_salt", |b| {
        b.iter(|| commit(black_box(1_234_567), black_box(&salt)))
    });
}

fn verify_bench(c: &mut Criterion) {
    let salt = random_salt();
    let digest = commit(1_234_567, &salt);

    c.bench_function("verify_i64_32B_salt", |b| {
        b.iter(|| verify(black_box(&digest), black_box(1_234_567), black_box(&salt)))
    });
}

criterion_group!(
    benches,
    blake2b_256_bench,
    blake2b_256_1kb_bench,
    commit_bench,
    verify_bench
);
criterion_main!(benches);
