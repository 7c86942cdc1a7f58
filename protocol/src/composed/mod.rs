//! Proofs composed from the [base](crate::base) protocols.
//!
//! [zk_pomode] and [zk_pomode_fast] sit at the top: they prove `x^e mod n = xmod` for a
//! committed `x` by chaining [zk_pokde] (which relates `G^x` to `G^(x^e)`) with [zk_poke_mod]
//! (which relates `G^(x^e)` to its residue modulo `n`).

pub mod pokde;
pub mod zk_pokde;
pub mod zk_poke_mod;
pub mod zk_pomode;
pub mod zk_pomode_fast;
