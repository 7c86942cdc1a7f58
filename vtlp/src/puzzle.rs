//! Time-lock puzzles over an RSA group and proofs of their VRF output.
//!
//! The output for a message `m` is `s = gen_vrf(m)^e mod N`, the RSA root that only the trapdoor
//! holder can compute quickly. Anyone can check an opened `s` by raising it to the public
//! exponent `d`. [prove] shows in zero-knowledge that the prover knows such an `s`, by proving
//! `s^d mod N = gen_vrf(m)` for `s` committed as `C1 = G^s`.

use crate::{mimc, Error};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use pomode_protocol::{
    composed::zk_pomode_fast,
    encoding,
    exp::{pow, pow_fits},
    PublicParameters, PuzzleParameters, RsaExpSetup, CIRCUIT_BIT_LIMIT, SECURITY_PARAMETER,
};
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Hash `message` to the VRF input, an element of the BN254 scalar field.
pub fn gen_vrf(message: &[u8]) -> BigUint {
    mimc::hash(message)
}

/// Lock `s` into a puzzle that opens after `T` sequential squarings.
///
/// The round trip holds for every quadratic residue `s` modulo `N`.
pub fn gen_puzzle(s: &BigUint, setup: &RsaExpSetup) -> BigUint {
    setup.lock(s)
}

/// Open a puzzle without the trapdoor by squaring `z` sequentially `time` times modulo `n`.
///
/// Returns zero when `n <= 1`.
pub fn solve_puzzle(z: &BigUint, n: &BigUint, time: u64) -> BigUint {
    if n <= &BigUint::one() {
        return BigUint::zero();
    }
    let mut value = z % n;
    for _ in 0..time {
        value = &value * &value % n;
    }
    value
}

/// Compute the VRF output for `message` with the trapdoor.
pub fn evaluate(setup: &RsaExpSetup, message: &[u8]) -> BigUint {
    setup.root(&gen_vrf(message))
}

/// Proof that the prover knows the VRF output for a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleProof {
    /// `G^s`.
    pub c1: BigUint,
    /// `G^(s^d)`.
    pub c2: BigUint,
    pub proof: zk_pomode_fast::Proof,
}

/// Prove knowledge of `s` with `s^d mod N = gen_vrf(message)`.
pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
    pp: &PublicParameters,
    params: &PuzzleParameters,
    message: &[u8],
    s: &BigUint,
) -> Result<PuzzleProof, Error> {
    let n = params.rsa_mod();
    if n <= &BigUint::one() {
        return Err(Error::InvalidStatement("degenerate RSA modulus"));
    }

    // Widest base the proof raises to d: s · l + mask
    let z_bits = (n.bits() + CIRCUIT_BIT_LIMIT).max(pp.n().bits() + 2 * SECURITY_PARAMETER) + 1;
    if !pow_fits(z_bits, params.d()) {
        return Err(Error::InvalidStatement("public exponent too large to prove"));
    }
    let vrf = gen_vrf(message);
    if s.modpow(params.d(), n) != vrf {
        return Err(Error::InvalidStatement("s^d mod N != gen_vrf(message)"));
    }
    let c1 = pp.commit(s);
    let c2 = pp.commit(&pow(s, params.d())?);
    let proof = zk_pomode_fast::prove(rng, pp, &c1, &c2, n, params.d(), &vrf, s)?;
    debug!(
        message_len = message.len(),
        rsa_bits = n.bits(),
        "generated puzzle proof"
    );
    Ok(PuzzleProof { c1, c2, proof })
}

/// Verify that the prover knows the VRF output for `message`.
pub fn verify(
    pp: &PublicParameters,
    params: &PuzzleParameters,
    message: &[u8],
    proof: &PuzzleProof,
) -> bool {
    if &proof.c1 >= pp.n() || &proof.c2 >= pp.n() {
        debug!("puzzle commitment out of range");
        return false;
    }
    let vrf = gen_vrf(message);
    if !zk_pomode_fast::verify(
        pp,
        &proof.c1,
        &proof.c2,
        params.rsa_mod(),
        params.d(),
        &vrf,
        &proof.proof,
    ) {
        debug!(message_len = message.len(), "puzzle proof failed");
        return false;
    }
    true
}

impl Write for PuzzleProof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.c1, buf);
        encoding::write(&self.c2, buf);
        self.proof.write(buf);
    }
}

impl Read for PuzzleProof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let c1 = encoding::read(buf, *max_len)?;
        let c2 = encoding::read(buf, *max_len)?;
        let proof = zk_pomode_fast::Proof::read_cfg(buf, max_len)?;
        Ok(Self { c1, c2, proof })
    }
}

impl EncodeSize for PuzzleProof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.c1) + encoding::encode_size(&self.c2) + self.proof.encode_size()
    }
}
