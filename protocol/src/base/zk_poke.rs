//! Zero-knowledge proof of knowledge of an exponent (ZKPoKE).
//!
//! Convinces a verifier that the prover knows `x` with `C = base^x mod N` without revealing `x`.
//! The prover commits to a statistically hiding mask `D = base^m` (proven with PoKE*) and then
//! reveals only `z = x·l + m` for a prime challenge `l`.

use super::{is_residue, poke_star};
use crate::{encoding, utils::random_bits, Error, PublicParameters, Transcript, SECURITY_PARAMETER};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, Read, Write};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Zero-knowledge proof of knowledge of `x` with `C = base^x mod N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub d: BigUint,
    pub pi: poke_star::Proof,
    pub z: BigUint,
}

fn challenge(
    pp: &PublicParameters,
    base: &BigUint,
    c: &BigUint,
    d: &BigUint,
    pi: &poke_star::Proof,
) -> Result<BigUint, Error> {
    Transcript::labeled("ZKPoKE", &[base, pp.n(), c, d, &pi.q, &pi.r]).prime_challenge()
}

/// Prove knowledge of `x` with `c = base^x mod N`.
pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
    pp: &PublicParameters,
    base: &BigUint,
    x: &BigUint,
    c: &BigUint,
) -> Result<Proof, Error> {
    if &base.modpow(x, pp.n()) != c {
        return Err(Error::InvalidStatement("c != base^x"));
    }

    // Mask x·l (l < 2^256) with 2λ bits of statistical slack
    let m = random_bits(rng, x.bits() + 256 + 2 * SECURITY_PARAMETER)?;
    let d = base.modpow(&m, pp.n());
    let pi = poke_star::prove(pp, base, &d, &m)?;

    let l = challenge(pp, base, c, &d, &pi)?;
    let z = x * &l + m;
    debug!(x_bits = x.bits(), "generated ZKPoKE");
    Ok(Proof { d, pi, z })
}

/// Verify knowledge of the discrete logarithm of `c` to `base`.
pub fn verify(pp: &PublicParameters, base: &BigUint, c: &BigUint, proof: &Proof) -> bool {
    if !is_residue(&proof.d, pp.n()) {
        debug!("ZKPoKE mask commitment out of range");
        return false;
    }
    if !poke_star::verify(pp, base, &proof.d, &proof.pi) {
        debug!("ZKPoKE mask proof failed");
        return false;
    }
    let l = match challenge(pp, base, c, &proof.d, &proof.pi) {
        Ok(l) => l,
        Err(err) => {
            debug!(?err, "ZKPoKE challenge failed");
            return false;
        }
    };
    let lhs = base.modpow(&proof.z, pp.n());
    let rhs = &proof.d * c.modpow(&l, pp.n()) % pp.n();
    if lhs != rhs {
        debug!("ZKPoKE equation failed");
        return false;
    }
    true
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        encoding::write(&self.d, buf);
        self.pi.write(buf);
        encoding::write(&self.z, buf);
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let d = encoding::read(buf, *max_len)?;
        let pi = poke_star::Proof::read_cfg(buf, max_len)?;
        let z = encoding::read(buf, *max_len)?;
        Ok(Self { d, pi, z })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        encoding::encode_size(&self.d) + self.pi.encode_size() + encoding::encode_size(&self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks;
    use commonware_codec::{Decode, Encode};

    #[test]
    fn test_zk_poke() {
        let mut rng = mocks::rng(0);
        let pp = mocks::public_parameters();
        let x = BigUint::from(666u32);
        let c = pp.commit(&x);
        let proof = prove(&mut rng, &pp, pp.g(), &x, &c).unwrap();
        assert!(verify(&pp, pp.g(), &c, &proof));

        // Proof does not transfer to another commitment
        let other = pp.commit(&BigUint::from(66_777u32));
        assert!(!verify(&pp, pp.g(), &other, &proof));
    }

    #[test]
    fn test_zk_poke_invalid_statement() {
        let mut rng = mocks::rng(0);
        let pp = mocks::public_parameters();
        let c = pp.commit(&BigUint::from(666u32));
        assert!(matches!(
            prove(&mut rng, &pp, pp.g(), &BigUint::from(667u32), &c),
            Err(Error::InvalidStatement(_))
        ));
    }

    #[test]
    fn test_zk_poke_hides_witness() {
        let mut rng = mocks::rng(1);
        let pp = mocks::public_parameters();
        let x = BigUint::from(11u32).pow(300);
        let c = pp.commit(&x);
        let a = prove(&mut rng, &pp, pp.g(), &x, &c).unwrap();
        let b = prove(&mut rng, &pp, pp.g(), &x, &c).unwrap();
        assert_ne!(a.z, b.z);
        assert!(verify(&pp, pp.g(), &c, &a));
        assert!(verify(&pp, pp.g(), &c, &b));
    }

    #[test]
    fn test_zk_poke_tampered() {
        let mut rng = mocks::rng(2);
        let pp = mocks::public_parameters();
        let x = BigUint::from(12_345u32);
        let c = pp.commit(&x);
        let proof = prove(&mut rng, &pp, pp.g(), &x, &c).unwrap();

        let mut tampered = proof.clone();
        tampered.z += 1u32;
        assert!(!verify(&pp, pp.g(), &c, &tampered));

        let mut tampered = proof.clone();
        tampered.d = pp.commit(&BigUint::from(1u32));
        assert!(!verify(&pp, pp.g(), &c, &tampered));

        let mut tampered = proof;
        tampered.pi.r += 1u32;
        assert!(!verify(&pp, pp.g(), &c, &tampered));
    }

    #[test]
    fn test_codec() {
        let mut rng = mocks::rng(3);
        let pp = mocks::public_parameters();
        let x = BigUint::from(12_345u32);
        let c = pp.commit(&x);
        let proof = prove(&mut rng, &pp, pp.g(), &x, &c).unwrap();
        let decoded = Proof::decode_cfg(proof.encode(), &256).unwrap();
        assert!(verify(&pp, pp.g(), &c, &decoded));
        assert_eq!(decoded, proof);
    }
}
