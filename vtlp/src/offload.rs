//! Witness generation for checking an RSA exponentiation inside an arithmetic circuit.
//!
//! A circuit over a ~254-bit field cannot multiply 1024-bit residues directly. Instead, the
//! exponentiation `base^exponent mod N` is rewritten as the integer product of the repeated
//! squares `base^(2^i) mod N` selected by the bits of `exponent`, and that product is checked
//! modulo a prime challenge `l` that fits in a field element. The challenge is bound to the
//! product through the commitment `acc = G^prod`, so the prover cannot pick the product after
//! seeing `l`.

use crate::Error;
use num_bigint::BigUint;
use num_traits::One;
use pomode_protocol::{exp::Squares, PublicParameters, RsaExpSetup, Transcript};
use tracing::debug;

/// Full witness of the exponentiation circuit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpCircuitInputs {
    /// Prime challenge `l`.
    pub challenge_l: BigUint,
    /// `prod mod l`.
    pub remainder_r: BigUint,
    /// `base^(2^i) mod N mod l`, least significant first.
    pub squares_mod: Vec<BigUint>,
    /// Secret exponent.
    pub exponent: BigUint,
}

/// Public part of [ExpCircuitInputs].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpCircuitPublicInputs {
    pub challenge_l: BigUint,
    pub remainder_r: BigUint,
    pub squares_mod: Vec<BigUint>,
}

impl ExpCircuitInputs {
    /// Build the witness for `base^exponent mod modulus`.
    pub fn generate(
        pp: &PublicParameters,
        base: &BigUint,
        modulus: &BigUint,
        exponent: &BigUint,
    ) -> Result<Self, Error> {
        if modulus <= &BigUint::one() {
            return Err(Error::InvalidStatement("degenerate modulus"));
        }
        let squares = Squares::new(base, modulus);
        let prod = squares.unreduced_prod(exponent)?;
        let acc = pp.commit(&prod);
        let challenge_l =
            Transcript::labeled("RSAExpOffload", &[base, modulus, pp.g(), pp.n(), &acc])
                .prime_challenge()?;
        let squares_mod = squares
            .squares()
            .iter()
            .map(|square| square % &challenge_l)
            .collect();
        let remainder_r = prod % &challenge_l;
        debug!(
            modulus_bits = modulus.bits(),
            exponent_bits = exponent.bits(),
            "generated circuit witness"
        );
        Ok(Self {
            challenge_l,
            remainder_r,
            squares_mod,
            exponent: exponent.clone(),
        })
    }

    /// Build the witness for the puzzle exponentiation `base^(2^T mod order) mod N` of `setup`.
    pub fn from_setup(pp: &PublicParameters, setup: &RsaExpSetup) -> Result<Self, Error> {
        let params = setup.public();
        Self::generate(pp, params.base(), params.rsa_mod(), setup.exponent())
    }

    /// Public inputs of the circuit.
    pub fn public(&self) -> ExpCircuitPublicInputs {
        ExpCircuitPublicInputs {
            challenge_l: self.challenge_l.clone(),
            remainder_r: self.remainder_r.clone(),
            squares_mod: self.squares_mod.clone(),
        }
    }

    /// Evaluate the relation enforced by the circuit:
    /// `Π_{bit i of exponent} squares_mod[i] = remainder_r (mod challenge_l)`.
    pub fn check(&self) -> bool {
        if self.exponent.bits() > self.squares_mod.len() as u64 {
            debug!(
                exponent_bits = self.exponent.bits(),
                squares = self.squares_mod.len(),
                "exponent exceeds squares"
            );
            return false;
        }
        let l = &self.challenge_l;
        let product = self
            .squares_mod
            .iter()
            .enumerate()
            .filter(|(i, _)| self.exponent.bit(*i as u64))
            .fold(BigUint::one() % l, |acc, (_, square)| acc * square % l);
        if product != self.remainder_r {
            debug!("circuit relation failed");
            return false;
        }
        true
    }
}
