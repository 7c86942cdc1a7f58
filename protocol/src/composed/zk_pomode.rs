//! Zero-knowledge proof of modular double exponentiation (ZKPoMoDE).
//!
//! Convinces a verifier that the prover knows `x` with `C = G^x` and `x^e mod n = xmod`, given
//! only `C`. The prover shifts the witness to `s = x + m·n` (same residue modulo `n`), publishes
//! `C2 = G^(s^e)`, and chains a [zk_pokde] proof (from `G^s = C · D^n` to `C2`) with a
//! [zk_poke_mod] proof (from `C2` to `xmod`).

use super::{zk_pokde, zk_poke_mod};
use crate::{
    base::{is_residue, poke_star},
    encoding,
    exp::pow,
    utils::random_bits,
    Error, PublicParameters, SECURITY_PARAMETER,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Zero-knowledge proof of knowledge of `x` with `C = G^x` and `x^e mod n = xmod`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub d: BigUint,
    pub c2: BigUint,
    pub pi1: poke_star::Proof,
    pub pi2: zk_pokde::Proof,
    pub pi3: zk_poke_mod::Proof,
}

/// Prove knowledge of `x` with `c = G^x` and `x^e mod n = xmod` in zero-knowledge.
pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
    pp: &PublicParameters,
    c: &BigUint,
    n: &BigUint,
    e: &BigUint,
    xmod: &BigUint,
    x: &BigUint,
) -> Result<Proof, Error> {
    if n.is_zero() {
        return Err(Error::InvalidStatement("zero modulus"));
    }
    if &pp.commit(x) != c {
        return Err(Error::InvalidStatement("c != G^x"));
    }
    if &x.modpow(e, n) != xmod {
        return Err(Error::InvalidStatement("x^e mod n != xmod"));
    }

    let m = random_bits(rng, pp.n().bits() + 2 * SECURITY_PARAMETER)?;
    let d = pp.commit(&m);
    let pi1 = poke_star::prove(pp, pp.g(), &d, &m)?;

    // s = x + m·n, so G^s = C · D^n and s^e = x^e (mod n)
    let s = x + &m * n;
    let se = pow(&s, e)?;
    let c2 = pp.commit(&se);
    let cs = d.modpow(n, pp.n()) * c % pp.n();
    let pi2 = zk_pokde::prove(rng, pp, &cs, &c2, &s, e)?;
    let pi3 = zk_poke_mod::prove(rng, pp, &c2, &se, n, xmod)?;
    debug!(n_bits = n.bits(), "generated ZKPoMoDE");
    Ok(Proof {
        d,
        c2,
        pi1,
        pi2,
        pi3,
    })
}

/// Verify knowledge of `x` with `c = G^x` and `x^e mod n = xmod`.
pub fn verify(
    pp: &PublicParameters,
    c: &BigUint,
    n: &BigUint,
    e: &BigUint,
    xmod: &BigUint,
    proof: &Proof,
) -> bool {
    if !is_residue(&proof.d, pp.n()) || !is_residue(&proof.c2, pp.n()) {
        debug!("ZKPoMoDE commitment out of range");
        return false;
    }
    if !poke_star::verify(pp, pp.g(), &proof.d, &proof.pi1) {
        debug!("ZKPoMoDE mask proof failed");
        return false;
    }
    let cs = proof.d.modpow(n, pp.n()) * c % pp.n();
    if !zk_pokde::verify(pp, &cs, &proof.c2, e, &proof.pi2) {
        debug!("ZKPoMoDE double exponent proof failed");
        return false;
    }
    if !zk_poke_mod::verify(pp, &proof.c2, n, xmod, &proof.pi3) {
        debug!("ZKPoMoDE modular reduction proof failed");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.d, buf);
        encoding::write(&self.c2, buf);
        self.pi1.write(buf);
        self.pi2.write(buf);
        self.pi3.write(buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let d = encoding::read(buf, *max_len)?;
        let c2 = encoding::read(buf, *max_len)?;
        let pi1 = poke_star::Proof::read_cfg(buf, max_len)?;
        let pi2 = zk_pokde::Proof::read_cfg(buf, max_len)?;
        let pi3 = zk_poke_mod::Proof::read_cfg(buf, max_len)?;
        Ok(Self {
            d,
            c2,
            pi1,
            pi2,
            pi3,
        })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.d)
            + encoding::encode_size(&self.c2)
            + self.pi1.encode_size()
            + self.pi2.encode_size()
            + self.pi3.encode_size()
    }
}
