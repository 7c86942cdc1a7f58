use criterion::{criterion_group, BatchSize, Criterion};
use num_bigint::BigUint;
use pomode_protocol::{composed::zk_pomode, mocks};
use std::hint::black_box;

fn benchmark_zk_pomode_verify(c: &mut Criterion) {
    let mut rng = mocks::rng(0);
    let pp = mocks::public_parameters();
    let n = BigUint::from(1_000_003u32);
    let x = BigUint::from(123_456_789u64);
    let c_x = pp.commit(&x);
    for e in [3u32, 17, 257] {
        let e = BigUint::from(e);
        let xmod = x.modpow(&e, &n);
        c.bench_function(&format!("{}/e={}", module_path!(), e), |b| {
            b.iter_batched(
                || zk_pomode::prove(&mut rng, &pp, &c_x, &n, &e, &xmod, &x).unwrap(),
                |proof| {
                    assert!(black_box(zk_pomode::verify(
                        &pp, &c_x, &n, &e, &xmod, &proof
                    )));
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_zk_pomode_verify
}
