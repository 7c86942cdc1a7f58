use criterion::{criterion_group, Criterion};
use pomode_protocol::mocks;
use pomode_vtlp::puzzle;
use std::hint::black_box;

fn benchmark_puzzle_prove(c: &mut Criterion) {
    let mut rng = mocks::rng(0);
    let pp = mocks::public_parameters();
    let setup = mocks::rsa_exp_setup(1 << 10);
    let message = b"benchmark";
    let s = puzzle::evaluate(&setup, message);
    c.bench_function(module_path!(), |b| {
        b.iter(|| {
            black_box(puzzle::prove(&mut rng, &pp, setup.public(), message, &s).unwrap());
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_puzzle_prove
}
