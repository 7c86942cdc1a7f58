//! Proof of knowledge of an unbounded exponent (PoKE*).
//!
//! Convinces a verifier that the prover knows `m` with `D = base^m mod N`. The prover splits `m`
//! by a prime challenge `l` and sends `(base^(m div l), m mod l)`.

use super::is_residue;
use crate::{encoding, exp::multi_exp, Error, PublicParameters, Transcript};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use num_integer::Integer;
use tracing::debug;

/// Proof of knowledge of `m` with `D = base^m mod N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub q: BigUint,
    pub r: BigUint,
}

fn challenge(pp: &PublicParameters, base: &BigUint, d: &BigUint) -> Result<BigUint, Error> {
    Transcript::labeled("PoKEStar", &[base, pp.n(), d]).prime_challenge()
}

/// Prove knowledge of `m` with `d = base^m mod N`.
pub fn prove(
    pp: &PublicParameters,
    base: &BigUint,
    d: &BigUint,
    m: &BigUint,
) -> Result<Proof, Error> {
    if &base.modpow(m, pp.n()) != d {
        return Err(Error::InvalidStatement("d != base^m"));
    }
    let l = challenge(pp, base, d)?;
    let (q, r) = m.div_rem(&l);
    let q = base.modpow(&q, pp.n());
    debug!(m_bits = m.bits(), "generated PoKE*");
    Ok(Proof { q, r })
}

/// Verify knowledge of the discrete logarithm of `d` to `base`.
pub fn verify(pp: &PublicParameters, base: &BigUint, d: &BigUint, proof: &Proof) -> bool {
    if !is_residue(&proof.q, pp.n()) {
        debug!("PoKE* commitment out of range");
        return false;
    }
    let l = match challenge(pp, base, d) {
        Ok(l) => l,
        Err(err) => {
            debug!(?err, "PoKE* challenge failed");
            return false;
        }
    };
    if proof.r >= l {
        debug!("PoKE* remainder out of range");
        return false;
    }
    if &multi_exp(&proof.q, &l, base, &proof.r, pp.n()) != d {
        debug!("PoKE* equation failed");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.q, buf);
        encoding::write(&self.r, buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let q = encoding::read(buf, *max_len)?;
        let r = encoding::read(buf, *max_len)?;
        Ok(Self { q, r })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.q) + encoding::encode_size(&self.r)
    }
}
