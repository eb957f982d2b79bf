// Text codec & signing benchmarks for mira-crypto.
//
// Covers encoding and decoding across algorithm families, the decoder's
// rejection paths (which run on every piece of untrusted input, so their
// speed matters as much as the happy path), and per-family sign/verify.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mira_crypto::{batch_verify, KeyFamily, MiraPrivateKey, MiraPublicKey};

const FAMILIES: [KeyFamily; 4] = [
    KeyFamily::Ed25519,
    KeyFamily::Secp256k1,
    KeyFamily::NistP256,
    KeyFamily::Bls12381,
];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/encode");
    for family in FAMILIES {
        let key = MiraPrivateKey::generate(family).unwrap().public_key();
        group.bench_with_input(BenchmarkId::from_parameter(family.tag()), &key, |b, key| {
            b.iter(|| key.to_text());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode");
    for family in FAMILIES {
        let text = MiraPrivateKey::generate(family)
            .unwrap()
            .public_key()
            .to_text();
        group.bench_with_input(BenchmarkId::from_parameter(family.tag()), &text, |b, text| {
            b.iter(|| MiraPublicKey::from_text(text).unwrap());
        });
    }
    group.finish();
}

fn bench_decode_rejections(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/reject");

    let valid = MiraPrivateKey::generate(KeyFamily::Bls12381)
        .unwrap()
        .public_key()
        .to_text();
    let unknown_tag = valid.replacen("PUB_BLS_", "PUB_ZZ_", 1);
    let corrupted = {
        let mut s: Vec<char> = valid.chars().collect();
        let last = s.len() - 1;
        s[last] = if s[last] == '2' { '3' } else { '2' };
        s.into_iter().collect::<String>()
    };

    group.bench_function("unknown_tag", |b| {
        b.iter(|| MiraPublicKey::from_text(&unknown_tag).unwrap_err());
    });
    group.bench_function("checksum_mismatch", |b| {
        b.iter(|| MiraPublicKey::from_text(&corrupted).unwrap_err());
    });
    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign");
    let message = b"finalize block 1024; round 2";
    for family in FAMILIES {
        let key = MiraPrivateKey::generate(family).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(family.tag()), &key, |b, key| {
            b.iter(|| key.sign(message));
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    let message = b"finalize block 1024; round 2";
    for family in FAMILIES {
        let key = MiraPrivateKey::generate(family).unwrap();
        let public = key.public_key();
        let signature = key.sign(message);
        group.bench_with_input(
            BenchmarkId::from_parameter(family.tag()),
            &(public, signature),
            |b, (public, signature)| {
                b.iter(|| public.verify(message, signature));
            },
        );
    }
    group.finish();
}

fn bench_batch_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify/batch_ed25519");
    for size in [10, 50, 100] {
        let items: Vec<_> = (0..size)
            .map(|i| {
                let key = MiraPrivateKey::generate(KeyFamily::Ed25519).unwrap();
                let message = format!("tx-{i:06}").into_bytes();
                let signature = key.sign(&message);
                (key.public_key(), message, signature)
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| assert!(batch_verify(items)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_decode_rejections,
    bench_sign,
    bench_verify,
    bench_batch_verify,
);
criterion_main!(benches);
