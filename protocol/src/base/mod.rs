//! Base proofs of exponentiation and of knowledge of an exponent.
//!
//! Each protocol reduces a claim about a (possibly enormous) exponent to a claim about its
//! remainder modulo a prime challenge `l`, which the verifier checks with a single
//! [multi_exp](crate::exp::multi_exp).

use num_bigint::BigUint;

pub mod poe;
pub mod poke_star;
pub mod zk_poke;

/// Returns whether `value` is a canonical residue modulo `n`.
pub(crate) fn is_residue(value: &BigUint, n: &BigUint) -> bool {
    value < n
}
