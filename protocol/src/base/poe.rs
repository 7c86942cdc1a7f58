//! Proof of exponentiation (PoE).
//!
//! Convinces a verifier that `K = C^f mod N` for a public exponent `f` in time logarithmic in
//! `f`: the prover sends `Q = C^(f div l)` and the verifier checks `K = Q^l · C^(f mod l)`.

use super::is_residue;
use crate::{encoding, exp::multi_exp, Error, Transcript};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use tracing::debug;

/// Proof that `K = C^f mod N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub q: BigUint,
}

fn challenge(c: &BigUint, n: &BigUint, k: &BigUint, f: &BigUint) -> Result<BigUint, Error> {
    Transcript::labeled("PoE", &[c, n, k, f]).prime_challenge()
}

/// Prove that `k = c^f mod n`.
pub fn prove(c: &BigUint, n: &BigUint, k: &BigUint, f: &BigUint) -> Result<Proof, Error> {
    if &c.modpow(f, n) != k {
        return Err(Error::InvalidStatement("k != c^f"));
    }
    let l = challenge(c, n, k, f)?;
    let q = c.modpow(&(f / &l), n);
    debug!(f_bits = f.bits(), "generated PoE");
    Ok(Proof { q })
}

/// Verify that `k = c^f mod n`.
pub fn verify(c: &BigUint, n: &BigUint, k: &BigUint, f: &BigUint, proof: &Proof) -> bool {
    if !is_residue(&proof.q, n) {
        debug!("PoE commitment out of range");
        return false;
    }
    let l = match challenge(c, n, k, f) {
        Ok(l) => l,
        Err(err) => {
            debug!(?err, "PoE challenge failed");
            return false;
        }
    };
    if &multi_exp(&proof.q, &l, c, &(f % &l), n) != k {
        debug!("PoE equation failed");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.q, buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let q = encoding::read(buf, *max_len)?;
        Ok(Self { q })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.q)
    }
}
