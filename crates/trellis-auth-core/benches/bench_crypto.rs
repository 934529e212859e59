//! Benchmarks for the auth hot paths: token signing/verification and
//! refresh-token fingerprinting

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use trellis_auth_core::{crypto, SigningKeys, TokenSigner};
use trellis_types::{SessionId, UserId};

fn bench_token_operations(c: &mut Criterion) {
    let signer = TokenSigner::new(SigningKeys::generate().expect("key generation"));
    let user_id = UserId::new();
    let session_id = SessionId::new();
    let ttl = Duration::from_secs(900);

    let mut group = c.benchmark_group("token");

    group.bench_function("issue_access", |b| {
        b.iter(|| signer.issue_access(black_box(user_id), ttl).unwrap());
    });

    group.bench_function("issue_refresh", |b| {
        b.iter(|| {
            signer
                .issue_refresh(black_box(session_id), user_id, ttl)
                .unwrap()
        });
    });

    let access = signer.issue_access(user_id, ttl).unwrap();
    group.bench_function("verify_access", |b| {
        b.iter(|| signer.verify_access(black_box(&access)).unwrap());
    });

    let refresh = signer.issue_refresh(session_id, user_id, ttl).unwrap();
    group.bench_function("verify_refresh", |b| {
        b.iter(|| signer.verify_refresh(black_box(&refresh)).unwrap());
    });

    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let sizes = [64, 256, 1024];

    let mut group = c.benchmark_group("fingerprint");

    for size in sizes {
        let token: String = (0..size).map(|i| ((i % 26) as u8 + b'a') as char).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &token, |b, token| {
            b.iter(|| crypto::fingerprint(black_box(token)));
        });
    }

    group.finish();
}

fn bench_constant_time_eq(c: &mut Criterion) {
    let a = crypto::fingerprint("token-a");
    let b = crypto::fingerprint("token-b");
    let a2 = a.clone();

    let mut group = c.benchmark_group("constant_time_eq");

    group.bench_function("equal", |bench| {
        bench.iter(|| crypto::constant_time_str_eq(black_box(&a), black_box(&a2)));
    });

    group.bench_function("different", |bench| {
        bench.iter(|| crypto::constant_time_str_eq(black_box(&a), black_box(&b)));
    });

    group.finish();
}

fn bench_password_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("password");
    // argon2 is deliberately slow; keep the sample count down
    group.sample_size(10);

    group.bench_function("hash", |b| {
        b.iter(|| crypto::hash_password(black_box("correct horse battery staple")).unwrap());
    });

    let hash = crypto::hash_password("correct horse battery staple").unwrap();
    group.bench_function("verify", |b| {
        b.iter(|| crypto::verify_password(black_box("correct horse battery staple"), &hash));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_token_operations,
    bench_fingerprint,
    bench_constant_time_eq,
    bench_password_hash,
);
criterion_main!(benches);
