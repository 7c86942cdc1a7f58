//! Proof of knowledge of a double exponent (PoKDE).
//!
//! Convinces a verifier that the prover knows `x` with `C1 = G^x` and `C2 = G^(x^e)`. The proof
//! is not zero-knowledge: it leaks `x mod l` and `x^e mod l`. [super::zk_pokde] only applies it to
//! masked exponents.

use crate::{
    base::is_residue,
    encoding,
    exp::{multi_exp, pow},
    Error, PublicParameters, Transcript,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use num_integer::Integer;
use tracing::debug;

/// Proof of knowledge of `x` with `C1 = G^x` and `C2 = G^(x^e)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub q1: BigUint,
    pub r1: BigUint,
    pub q2: BigUint,
    pub r2: BigUint,
}

fn challenge(
    pp: &PublicParameters,
    c1: &BigUint,
    c2: &BigUint,
    e: &BigUint,
) -> Result<BigUint, Error> {
    Transcript::labeled("PoKDE", &[pp.g(), pp.n(), c1, c2, e]).prime_challenge()
}

/// Prove knowledge of `x` with `c1 = G^x` and `c2 = G^(x^e)`.
pub fn prove(
    pp: &PublicParameters,
    c1: &BigUint,
    c2: &BigUint,
    x: &BigUint,
    e: &BigUint,
) -> Result<Proof, Error> {
    if &pp.commit(x) != c1 {
        return Err(Error::InvalidStatement("c1 != G^x"));
    }
    let xe = pow(x, e)?;
    if &pp.commit(&xe) != c2 {
        return Err(Error::InvalidStatement("c2 != G^(x^e)"));
    }

    let l = challenge(pp, c1, c2, e)?;
    let (q1, r1) = x.div_rem(&l);
    let (q2, r2) = xe.div_rem(&l);
    debug!(x_bits = x.bits(), "generated PoKDE");
    Ok(Proof {
        q1: pp.commit(&q1),
        r1,
        q2: pp.commit(&q2),
        r2,
    })
}

/// Verify knowledge of `x` with `c1 = G^x` and `c2 = G^(x^e)`.
pub fn verify(
    pp: &PublicParameters,
    c1: &BigUint,
    c2: &BigUint,
    e: &BigUint,
    proof: &Proof,
) -> bool {
    if !is_residue(&proof.q1, pp.n()) || !is_residue(&proof.q2, pp.n()) {
        debug!("PoKDE commitment out of range");
        return false;
    }
    let l = match challenge(pp, c1, c2, e) {
        Ok(l) => l,
        Err(err) => {
            debug!(?err, "PoKDE challenge failed");
            return false;
        }
    };
    if proof.r1 >= l || proof.r2 >= l {
        debug!("PoKDE remainder out of range");
        return false;
    }

    // (x mod l)^e = x^e (mod l)
    if proof.r1.modpow(e, &l) != proof.r2 {
        debug!("PoKDE remainders inconsistent");
        return false;
    }
    if &multi_exp(&proof.q1, &l, pp.g(), &proof.r1, pp.n()) != c1 {
        debug!("PoKDE first equation failed");
        return false;
    }
    if &multi_exp(&proof.q2, &l, pp.g(), &proof.r2, pp.n()) != c2 {
        debug!("PoKDE second equation failed");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.q1, buf);
        encoding::write(&self.r1, buf);
        encoding::write(&self.q2, buf);
        encoding::write(&self.r2, buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let q1 = encoding::read(buf, *max_len)?;
        let r1 = encoding::read(buf, *max_len)?;
        let q2 = encoding::read(buf, *max_len)?;
        let r2 = encoding::read(buf, *max_len)?;
        Ok(Self { q1, r1, q2, r2 })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.q1)
            + encoding::encode_size(&self.r1)
            + encoding::encode_size(&self.q2)
            + encoding::encode_size(&self.r2)
    }
}
