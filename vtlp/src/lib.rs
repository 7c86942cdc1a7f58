//! Verifiable time-lock puzzles with a VRF-style output.
//!
//! A trapdoor holder (see [pomode_protocol::RsaExpSetup]) locks a value `s` into a puzzle `z`
//! that anyone can open with `T` sequential squarings modulo an RSA modulus. The value locked for
//! a message is the RSA root of the message's algebraic hash ([puzzle::gen_vrf]), so the opened
//! value is checkable with a single exponentiation by the small public exponent `d`. Before the
//! puzzle is opened, [puzzle::prove] convinces a verifier that the prover knows the root without
//! revealing it.
//!
//! [offload] prepares the witness that lets an arithmetic circuit check a large RSA
//! exponentiation modulo a small prime challenge.
//!
//! # Example
//!
//! ```rust
//! use pomode_protocol::mocks;
//! use pomode_vtlp::puzzle;
//!
//! let mut rng = mocks::rng(0);
//! let pp = mocks::public_parameters();
//! let setup = mocks::rsa_exp_setup(64);
//! let params = setup.public();
//!
//! // The trapdoor holder evaluates the VRF and proves it
//! let message = b"hello world";
//! let s = puzzle::evaluate(&setup, message);
//! let proof = puzzle::prove(&mut rng, &pp, params, message, &s).unwrap();
//! assert!(puzzle::verify(&pp, params, message, &proof));
//! ```
//!
//! # Status
//!
//! `pomode-vtlp` is **ALPHA** software and is not yet recommended for production use. Developers
//! should expect breaking changes and occasional instability.

use thiserror::Error;

pub mod mimc;
pub mod offload;
pub mod puzzle;

/// Errors that can occur when building puzzles, proofs or circuit witnesses.
#[derive(Error, Debug)]
pub enum Error {
    #[error("protocol error: {0}")]
    Protocol(#[from] pomode_protocol::Error),
    #[error("invalid statement: {0}")]
    InvalidStatement(&'static str),
}
