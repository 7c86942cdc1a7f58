//! Sampling and modular arithmetic utilities.

use crate::Error;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

/// Samples a uniformly random integer in `[0, 2^bits)`.
///
/// Fails if the random number generator cannot produce bytes.
pub fn random_bits<R: RngCore + CryptoRng>(rng: &mut R, bits: u64) -> Result<BigUint, Error> {
    let len = bits.div_ceil(8) as usize;
    let mut bytes = vec![0u8; len];
    rng.try_fill_bytes(&mut bytes)?;
    let excess = (len as u64) * 8 - bits;
    if let Some(first) = bytes.first_mut() {
        *first &= 0xff >> excess;
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Samples a uniformly random integer in `[0, bound)` by rejection.
pub fn random_below<R: RngCore + CryptoRng>(
    rng: &mut R,
    bound: &BigUint,
) -> Result<BigUint, Error> {
    if bound.is_zero() {
        return Err(Error::InvalidParameters("empty sampling range"));
    }
    let bits = bound.bits();
    loop {
        let candidate = random_bits(rng, bits)?;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Samples a random non-trivial quadratic residue modulo `n`.
///
/// When `n` is the product of two safe primes, the result generates the quadratic-residue
/// subgroup with overwhelming probability.
pub fn random_quadratic_residue<R: RngCore + CryptoRng>(
    rng: &mut R,
    n: &BigUint,
) -> Result<BigUint, Error> {
    if n <= &BigUint::from(3u32) {
        return Err(Error::InvalidParameters("modulus too small"));
    }
    loop {
        let a = random_below(rng, n)?;
        if a <= BigUint::one() || !a.gcd(n).is_one() {
            continue;
        }
        let square = &a * &a % n;
        if !square.is_one() {
            return Ok(square);
        }
    }
}

/// Compute `a^-1 mod m` with the extended Euclidean algorithm.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, Error> {
    if m.is_zero() {
        return Err(Error::NoInverse);
    }
    let (a, m) = (BigInt::from(a.clone()), BigInt::from(m.clone()));
    let egcd = a.extended_gcd(&m);
    if !egcd.gcd.is_one() {
        return Err(Error::NoInverse);
    }
    egcd.x.mod_floor(&m).to_biguint().ok_or(Error::NoInverse)
}
