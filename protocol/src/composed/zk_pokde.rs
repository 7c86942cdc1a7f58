//! Zero-knowledge proof of knowledge of a double exponent (ZKPoKDE).
//!
//! Convinces a verifier that the prover knows `x` with `C1 = G^x` and `C2 = G^(x^e)` without
//! revealing `x`. The witness is blinded as `z = x·l + m + γ` and the relation `C2 -> E = G^(z^e)`
//! is split into:
//!
//! * `K = C2^(l^e)`, proven with [poe],
//! * `F = G^(z^e - (xl)^e)`, a multiple of `m + γ`, proven with [zk_poke] over base `G^(m+γ)`,
//! * `(G^z, E)`, a double exponent over the blinded witness, proven with [pokde].
//!
//! The verifier checks that `F · K = E` and reconstructs `G^(m+γ) = D · G^γ` and
//! `G^z = C1^l · D · G^γ` itself.

use super::pokde;
use crate::{
    base::{is_residue, poe, poke_star, zk_poke},
    encoding,
    exp::pow,
    utils::random_bits,
    Error, PublicParameters, Transcript, SECURITY_PARAMETER,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Zero-knowledge proof of knowledge of `x` with `C1 = G^x` and `C2 = G^(x^e)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub d: BigUint,
    pub e: BigUint,
    pub f: BigUint,
    pub k: BigUint,
    pub pi1: poke_star::Proof,
    pub pi2: poe::Proof,
    pub pi3: zk_poke::Proof,
    pub pi4: pokde::Proof,
}

/// Bit length of the mask (and of the wide challenge `γ`).
fn mask_bits(pp: &PublicParameters) -> u64 {
    pp.n().bits() + 2 * SECURITY_PARAMETER
}

/// Derive the prime challenge `l` and the wide challenge `γ`.
fn challenges(
    pp: &PublicParameters,
    c1: &BigUint,
    c2: &BigUint,
    e: &BigUint,
    pi1: &poke_star::Proof,
    d: &BigUint,
) -> Result<(BigUint, BigUint), Error> {
    let mut transcript = Transcript::labeled(
        "ZKPoKDE",
        &[pp.g(), pp.h(), pp.n(), c1, c2, e, &pi1.q, &pi1.r, d],
    );
    let l = transcript.prime_challenge()?;
    let gamma = transcript.large_challenge(mask_bits(pp));
    Ok((l, gamma))
}

/// Prove knowledge of `x` with `c1 = G^x` and `c2 = G^(x^e)` in zero-knowledge.
pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
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

    let m = random_bits(rng, mask_bits(pp))?;
    let d = pp.commit(&m);
    let pi1 = poke_star::prove(pp, pp.g(), &d, &m)?;
    let (l, gamma) = challenges(pp, c1, c2, e, &pi1, &d)?;

    // z = x·l + (m + γ)
    let xl = x * &l;
    let blind = m + gamma;
    let z = &xl + &blind;
    let ze = pow(&z, e)?;
    let big_e = pp.commit(&ze);

    // K = C2^(l^e) = G^((xl)^e)
    let le = pow(&l, e)?;
    let k = c2.modpow(&le, pp.n());
    let pi2 = poe::prove(c2, pp.n(), &k, &le)?;

    // ω = z^e - (xl)^e is divisible by z - xl = m + γ
    let omega = ze - pow(&xl, e)?;
    let f = pp.commit(&omega);
    let omega_prime = omega / &blind;
    let pi3 = zk_poke::prove(rng, pp, &pp.commit(&blind), &omega_prime, &f)?;

    let pi4 = pokde::prove(pp, &pp.commit(&z), &big_e, &z, e)?;
    debug!(x_bits = x.bits(), "generated ZKPoKDE");
    Ok(Proof {
        d,
        e: big_e,
        f,
        k,
        pi1,
        pi2,
        pi3,
        pi4,
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
    let n = pp.n();
    if ![&proof.d, &proof.e, &proof.f, &proof.k]
        .iter()
        .all(|value| is_residue(value, n))
    {
        debug!("ZKPoKDE commitment out of range");
        return false;
    }
    if !poke_star::verify(pp, pp.g(), &proof.d, &proof.pi1) {
        debug!("ZKPoKDE mask proof failed");
        return false;
    }
    let (l, gamma) = match challenges(pp, c1, c2, e, &proof.pi1, &proof.d) {
        Ok(challenges) => challenges,
        Err(err) => {
            debug!(?err, "ZKPoKDE challenge failed");
            return false;
        }
    };
    if &proof.f * &proof.k % n != proof.e {
        debug!("ZKPoKDE F·K != E");
        return false;
    }
    let le = match pow(&l, e) {
        Ok(le) => le,
        Err(err) => {
            debug!(?err, "ZKPoKDE exponent too large");
            return false;
        }
    };
    if !poe::verify(c2, n, &proof.k, &le, &proof.pi2) {
        debug!("ZKPoKDE K proof failed");
        return false;
    }

    // G^(m+γ) = D · G^γ
    let blind = &proof.d * pp.commit(&gamma) % n;
    if !zk_poke::verify(pp, &blind, &proof.f, &proof.pi3) {
        debug!("ZKPoKDE F proof failed");
        return false;
    }

    // G^z = C1^l · D · G^γ
    let gz = c1.modpow(&l, n) * &blind % n;
    if !pokde::verify(pp, &gz, &proof.e, e, &proof.pi4) {
        debug!("ZKPoKDE blinded double exponent proof failed");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.d, buf);
        encoding::write(&self.e, buf);
        encoding::write(&self.f, buf);
        encoding::write(&self.k, buf);
        self.pi1.write(buf);
        self.pi2.write(buf);
        self.pi3.write(buf);
        self.pi4.write(buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let d = encoding::read(buf, *max_len)?;
        let e = encoding::read(buf, *max_len)?;
        let f = encoding::read(buf, *max_len)?;
        let k = encoding::read(buf, *max_len)?;
        let pi1 = poke_star::Proof::read_cfg(buf, max_len)?;
        let pi2 = poe::Proof::read_cfg(buf, max_len)?;
        let pi3 = zk_poke::Proof::read_cfg(buf, max_len)?;
        let pi4 = pokde::Proof::read_cfg(buf, max_len)?;
        Ok(Self {
            d,
            e,
            f,
            k,
            pi1,
            pi2,
            pi3,
            pi4,
        })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.d)
            + encoding::encode_size(&self.e)
            + encoding::encode_size(&self.f)
            + encoding::encode_size(&self.k)
            + self.pi1.encode_size()
            + self.pi2.encode_size()
            + self.pi3.encode_size()
            + self.pi4.encode_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::DEFAULT_MAX_INT_BYTES, mocks};
    use commonware_codec::{Decode, Encode};

    fn statement(pp: &PublicParameters, x: &BigUint, e: &BigUint) -> (BigUint, BigUint) {
        (pp.commit(x), pp.commit(&pow(x, e).unwrap()))
    }

    #[test]
    fn test_zk_pokde() {
        let mut rng = mocks::rng(0);
        let pp = mocks::public_parameters();
        let (x, e) = (BigUint::from(666u32), BigUint::from(17u32));
        let (c1, c2) = statement(&pp, &x, &e);
        let proof = prove(&mut rng, &pp, &c1, &c2, &x, &e).unwrap();
        assert!(verify(&pp, &c1, &c2, &e, &proof));

        // Different first commitment
        let other = pp.commit(&BigUint::from(66_777u32));
        assert!(!verify(&pp, &other, &c2, &e, &proof));

        // Different second commitment
        assert!(!verify(&pp, &c1, &other, &e, &proof));

        // Different exponent
        assert!(!verify(&pp, &c1, &c2, &BigUint::from(3u32), &proof));
    }

    #[test]
    fn test_zk_pokde_large_witness() {
        let mut rng = mocks::rng(1);
        let pp = mocks::public_parameters();
        let x = BigUint::from(3u32).pow(500);
        let e = BigUint::from(5u32);
        let (c1, c2) = statement(&pp, &x, &e);
        let proof = prove(&mut rng, &pp, &c1, &c2, &x, &e).unwrap();
        assert!(verify(&pp, &c1, &c2, &e, &proof));
    }

    #[test]
    fn test_zk_pokde_invalid_statement() {
        let mut rng = mocks::rng(2);
        let pp = mocks::public_parameters();
        let (x, e) = (BigUint::from(666u32), BigUint::from(17u32));
        let (c1, c2) = statement(&pp, &x, &e);
        assert!(matches!(
            prove(&mut rng, &pp, &c1, &c1, &x, &e),
            Err(Error::InvalidStatement(_))
        ));
        assert!(matches!(
            prove(&mut rng, &pp, &c2, &c2, &x, &e),
            Err(Error::InvalidStatement(_))
        ));
    }

    #[test]
    fn test_zk_pokde_tampered() {
        let mut rng = mocks::rng(3);
        let pp = mocks::public_parameters();
        let (x, e) = (BigUint::from(4242u32), BigUint::from(7u32));
        let (c1, c2) = statement(&pp, &x, &e);
        let proof = prove(&mut rng, &pp, &c1, &c2, &x, &e).unwrap();

        // F·K = E no longer holds
        let mut tampered = proof.clone();
        tampered.f = &tampered.f * pp.g() % pp.n();
        assert!(!verify(&pp, &c1, &c2, &e, &tampered));

        // F·K = E holds but F is no longer a multiple of m + γ
        let mut tampered = proof.clone();
        tampered.f = &tampered.f * pp.g() % pp.n();
        tampered.e = &tampered.e * pp.g() % pp.n();
        assert!(!verify(&pp, &c1, &c2, &e, &tampered));

        // Non-canonical commitment
        let mut tampered = proof;
        tampered.k += pp.n();
        assert!(!verify(&pp, &c1, &c2, &e, &tampered));
    }

    #[test]
    fn test_codec() {
        let mut rng = mocks::rng(4);
        let pp = mocks::public_parameters();
        let (x, e) = (BigUint::from(4242u32), BigUint::from(7u32));
        let (c1, c2) = statement(&pp, &x, &e);
        let proof = prove(&mut rng, &pp, &c1, &c2, &x, &e).unwrap();
        let encoded = proof.encode();
        assert_eq!(encoded.len(), proof.encode_size());
        let decoded = Proof::decode_cfg(encoded, &DEFAULT_MAX_INT_BYTES).unwrap();
        assert_eq!(decoded, proof);
        assert!(verify(&pp, &c1, &c2, &e, &decoded));
    }
}
