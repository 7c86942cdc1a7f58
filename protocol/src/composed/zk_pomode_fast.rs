//! Zero-knowledge proof of modular double exponentiation over caller-supplied commitments.
//!
//! Unlike [super::zk_pomode], the commitment `C2 = G^(x^e)` is part of the statement, so the
//! witness is not shifted by a masked multiple of `n` first. The caller must guarantee that
//! `C1` and `C2` are bound to the intended statement (for example, by deriving them itself).

use super::{zk_pokde, zk_poke_mod};
use crate::{exp::pow, Error, PublicParameters};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Proof that `C1 = G^x`, `C2 = G^(x^e)` and `x^e mod n = xmod`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub pi1: zk_pokde::Proof,
    pub pi2: zk_poke_mod::Proof,
}

/// Prove knowledge of `x` with `c1 = G^x`, `c2 = G^(x^e)` and `x^e mod n = xmod`.
#[allow(clippy::too_many_arguments)]
pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
    pp: &PublicParameters,
    c1: &BigUint,
    c2: &BigUint,
    n: &BigUint,
    e: &BigUint,
    xmod: &BigUint,
    x: &BigUint,
) -> Result<Proof, Error> {
    if n.is_zero() {
        return Err(Error::InvalidStatement("zero modulus"));
    }
    let xe = pow(x, e)?;
    if &(&xe % n) != xmod {
        return Err(Error::InvalidStatement("x^e mod n != xmod"));
    }
    let pi1 = zk_pokde::prove(rng, pp, c1, c2, x, e)?;
    let pi2 = zk_poke_mod::prove(rng, pp, c2, &xe, n, xmod)?;
    debug!(n_bits = n.bits(), "generated ZKPoMoDEFast");
    Ok(Proof { pi1, pi2 })
}

/// Verify knowledge of `x` with `c1 = G^x`, `c2 = G^(x^e)` and `x^e mod n = xmod`.
pub fn verify(
    pp: &PublicParameters,
    c1: &BigUint,
    c2: &BigUint,
    n: &BigUint,
    e: &BigUint,
    xmod: &BigUint,
    proof: &Proof,
) -> bool {
    if !zk_pokde::verify(pp, c1, c2, e, &proof.pi1) {
        debug!("ZKPoMoDEFast double exponent proof failed");
        return false;
    }
    if !zk_poke_mod::verify(pp, c2, n, xmod, &proof.pi2) {
        debug!("ZKPoMoDEFast modular reduction proof failed");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        self.pi1.write(buf);
        self.pi2.write(buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let pi1 = zk_pokde::Proof::read_cfg(buf, max_len)?;
        let pi2 = zk_poke_mod::Proof::read_cfg(buf, max_len)?;
        Ok(Self { pi1, pi2 })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        self.pi1.encode_size() + self.pi2.encode_size()
    }
}
