//! Zero-knowledge proof of knowledge of a modular reduction (ZKPoKEMod).
//!
//! Convinces a verifier that the prover knows `x` with `C = G^x` and `x mod n = xmod`. The
//! witness is shifted by a masked multiple of `n` (`x + m·n`, which has the same residue) and
//! split by `l·n` for a prime challenge `l`, so the revealed remainder carries the residue while
//! the quotient stays hidden in the exponent.

use crate::{
    base::{is_residue, poke_star},
    encoding,
    exp::multi_exp,
    utils::random_below,
    Error, PublicParameters, Transcript, SECURITY_PARAMETER,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Zero-knowledge proof of knowledge of `x` with `C = G^x` and `x mod n = xmod`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub d: BigUint,
    pub pi: poke_star::Proof,
    pub q: BigUint,
    pub r: BigUint,
}

fn challenge(
    pp: &PublicParameters,
    c: &BigUint,
    n: &BigUint,
    xmod: &BigUint,
    d: &BigUint,
    pi: &poke_star::Proof,
) -> Result<BigUint, Error> {
    Transcript::labeled(
        "ZKPoKEMod",
        &[pp.g(), pp.n(), c, n, xmod, d, &pi.q, &pi.r],
    )
    .prime_challenge()
}

/// Prove knowledge of `x` with `c = G^x` and `x mod n = xmod` in zero-knowledge.
pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
    pp: &PublicParameters,
    c: &BigUint,
    x: &BigUint,
    n: &BigUint,
    xmod: &BigUint,
) -> Result<Proof, Error> {
    if n.is_zero() {
        return Err(Error::InvalidStatement("zero modulus"));
    }
    if &(x % n) != xmod {
        return Err(Error::InvalidStatement("x mod n != xmod"));
    }
    if &pp.commit(x) != c {
        return Err(Error::InvalidStatement("c != G^x"));
    }

    // m < N · 2^(2λ - 2)
    let bound = pp.n() << (2 * SECURITY_PARAMETER - 2);
    let m = random_below(rng, &bound)?;
    let d = pp.commit(&m);
    let pi = poke_star::prove(pp, pp.g(), &d, &m)?;
    let l = challenge(pp, c, n, xmod, &d, &pi)?;

    let (q, r) = (x + m * n).div_rem(&(&l * n));
    debug!(x_bits = x.bits(), n_bits = n.bits(), "generated ZKPoKEMod");
    Ok(Proof {
        d,
        pi,
        q: pp.commit(&q),
        r,
    })
}

/// Verify knowledge of `x` with `c = G^x` and `x mod n = xmod`.
pub fn verify(
    pp: &PublicParameters,
    c: &BigUint,
    n: &BigUint,
    xmod: &BigUint,
    proof: &Proof,
) -> bool {
    if n.is_zero() {
        debug!("ZKPoKEMod zero modulus");
        return false;
    }
    if !is_residue(&proof.d, pp.n()) || !is_residue(&proof.q, pp.n()) {
        debug!("ZKPoKEMod commitment out of range");
        return false;
    }
    if !poke_star::verify(pp, pp.g(), &proof.d, &proof.pi) {
        debug!("ZKPoKEMod mask proof failed");
        return false;
    }
    let l = match challenge(pp, c, n, xmod, &proof.d, &proof.pi) {
        Ok(l) => l,
        Err(err) => {
            debug!(?err, "ZKPoKEMod challenge failed");
            return false;
        }
    };
    let ln = &l * n;
    if proof.r >= ln {
        debug!("ZKPoKEMod remainder out of range");
        return false;
    }

    // Q^(l·n) · G^r = D^n · C
    let lhs = multi_exp(&proof.q, &ln, pp.g(), &proof.r, pp.n());
    let rhs = proof.d.modpow(n, pp.n()) * c % pp.n();
    if lhs != rhs {
        debug!("ZKPoKEMod equation failed");
        return false;
    }
    if &(&proof.r % n) != xmod {
        debug!("ZKPoKEMod residue mismatch");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.d, buf);
        self.pi.write(buf);
        encoding::write(&self.q, buf);
        encoding::write(&self.r, buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let d = encoding::read(buf, *max_len)?;
        let pi = poke_star::Proof::read_cfg(buf, max_len)?;
        let q = encoding::read(buf, *max_len)?;
        let r = encoding::read(buf, *max_len)?;
        Ok(Self { d, pi, q, r })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.d)
            + self.pi.encode_size()
            + encoding::encode_size(&self.q)
            + encoding::encode_size(&self.r)
    }
}
