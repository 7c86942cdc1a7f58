//! Prove modular double exponentiation over groups of unknown order.
//!
//! This crate implements a stack of succinct, Fiat-Shamir transformed proofs over the
//! quadratic-residue subgroup of an RSA modulus. At the top of the stack, [composed::zk_pomode]
//! convinces a verifier that a value `x` committed as `C = G^x` satisfies `x^e mod n = xmod`,
//! without revealing `x` and without the verifier computing `x^e`.
//!
//! The protocols, leaves first:
//!
//! * [base::poe]: proof of exponentiation (PoE).
//! * [base::poke_star]: proof of knowledge of an unbounded exponent (PoKE*).
//! * [base::zk_poke]: zero-knowledge proof of knowledge of an exponent (ZKPoKE).
//! * [composed::pokde] / [composed::zk_pokde]: (zero-knowledge) proof of knowledge of a double
//!   exponent.
//! * [composed::zk_poke_mod]: zero-knowledge proof of knowledge of a modular reduction.
//! * [composed::zk_pomode] / [composed::zk_pomode_fast]: zero-knowledge proof of modular double
//!   exponentiation.
//!
//! Every protocol exposes a `prove` function (returning `Result<Proof, Error>`) and a `verify`
//! function (returning `bool`). Each invocation derives its challenges from a fresh
//! [transcript::Transcript] that the verifier reconstructs from public data.
//!
//! # Example
//!
//! ```rust
//! use num_bigint::BigUint;
//! use pomode_protocol::{composed::zk_pomode, setup::PublicParameters};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let pp = PublicParameters::generate(&mut rng, 256).unwrap();
//!
//! // Commit to x = 6 and prove that 6^7 mod 10 = 6
//! let x = BigUint::from(6u32);
//! let (n, e, xmod) = (BigUint::from(10u32), BigUint::from(7u32), BigUint::from(6u32));
//! let commitment = pp.commit(&x);
//! let proof = zk_pomode::prove(&mut rng, &pp, &commitment, &n, &e, &xmod, &x).unwrap();
//! assert!(zk_pomode::verify(&pp, &commitment, &n, &e, &xmod, &proof));
//! ```
//!
//! # Status
//!
//! `pomode-protocol` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

use thiserror::Error;

pub mod base;
pub mod composed;
pub mod encoding;
pub mod exp;
pub mod prime;
pub mod proof;
pub use proof::{Kind, Proof, Statement};
pub mod setup;
pub use setup::{Config, PublicParameters, PuzzleParameters, RsaExpSetup};
pub mod transcript;
pub use transcript::{ChallengeLength, Transcript};
pub mod utils;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

/// Statistical security parameter (λ) used to size blinding masks.
pub const SECURITY_PARAMETER: u64 = 128;

/// Bit limit of challenges that must fit in a circuit field element.
///
/// Under [ChallengeLength::Max252], challenges are reduced modulo `2^(CIRCUIT_BIT_LIMIT - 1)`.
pub const CIRCUIT_BIT_LIMIT: u64 = 240;

/// Number of Miller-Rabin rounds (false positive rate at most `4^-PRIMALITY_ROUNDS`).
pub const PRIMALITY_ROUNDS: usize = 30;

/// Maximum number of candidates examined when deriving a prime challenge.
pub const MAX_PRIME_ATTEMPTS: usize = 1 << 14;

/// Errors that can occur when generating parameters or proofs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid statement: {0}")]
    InvalidStatement(&'static str),
    #[error("randomness unavailable: {0}")]
    Randomness(#[from] rand::Error),
    #[error("no prime challenge after {0} attempts")]
    ChallengeExhausted(usize),
    #[error("no inverse")]
    NoInverse,
    #[error("not a safe prime")]
    NotSafePrime,
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),
    #[error("exponent too large: {0} bits")]
    ExponentTooLarge(u64),
}
