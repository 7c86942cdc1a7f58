use criterion::{criterion_group, Criterion};
use num_bigint::BigUint;
use pomode_protocol::mocks;
use pomode_vtlp::puzzle::{gen_puzzle, solve_puzzle};
use std::hint::black_box;

fn benchmark_solve_puzzle(c: &mut Criterion) {
    for time in [1u64 << 10, 1 << 14, 1 << 16] {
        let setup = mocks::rsa_exp_setup(time);
        let s = BigUint::from(42u32).pow(2);
        let z = gen_puzzle(&s, &setup);
        c.bench_function(&format!("{}/time={}", module_path!(), time), |b| {
            b.iter(|| {
                let solution = solve_puzzle(&z, setup.rsa_mod(), time);
                assert_eq!(black_box(solution), s);
            });
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = benchmark_solve_puzzle
}
