//! Deterministic fixtures for tests and benchmarks.
//!
//! Generating safe primes is slow, so fixtures are built from four fixed 512-bit safe primes.
//! Moduli of this size are far too small for production use.

use crate::{setup::Config, PublicParameters, RsaExpSetup};
use num_bigint::BigUint;
use rand::{rngs::StdRng, SeedableRng};

/// Fixed 512-bit safe primes.
const SAFE_PRIMES: [&str; 4] = [
    "fda09b50763a79704384c64f1a74c70b8b8b190ac292f2b1cedda5aeecd7297dd83a8a9aedb5b7b9b9f30197fe4fb615e77491d19b8ea2540253b16f059297fb",
    "887654116dfe7eaabdeeb73553a41bcdb3dadf4abb6a249a3cfdb031ca040e952443e373c04f598ea612fbb0caec8120a4437bf0de2b6ba40c2765ccdc9b75b7",
    "890d8c352050e2495a0bb24b737b924a8c90e15ddc96852255f2cb28dfc7d7c67d780bc3f0e298a2db2921948ceaf669ea448b66d2527b193869cbd65aa3da8b",
    "911ce94fb01c5f1be151e6c67c43259c955a4af79bb3b349303ef6e96316e6a524a094d7bcbc8fb1f39ab11e1df6e4ce0d8752f9d1d39e822ec525c92fbfb883",
];

/// Seeded random number generator.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// The fixed safe primes.
pub fn safe_primes() -> [BigUint; 4] {
    SAFE_PRIMES.map(|hex| BigUint::parse_bytes(hex.as_bytes(), 16).expect("invalid fixture"))
}

/// Public parameters over a 1024-bit modulus built from the last two fixed primes.
pub fn public_parameters() -> PublicParameters {
    let [_, _, p, q] = safe_primes();
    PublicParameters::from_primes(&mut rng(0), &p, &q).expect("invalid fixture")
}

/// Trapdoor over a 1024-bit modulus built from the first two fixed primes.
pub fn rsa_exp_setup(time: u64) -> RsaExpSetup {
    let [p, q, _, _] = safe_primes();
    let config = Config {
        modulus_bits: 1024,
        time,
        ..Config::default()
    };
    RsaExpSetup::from_primes(&mut rng(1), p, q, &config).expect("invalid fixture")
}
