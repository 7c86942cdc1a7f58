//! Exponentiation helpers.
//!
//! Verification equations all take the form `a^x · b^y mod N` and are evaluated with
//! [multi_exp]. Provers that repeatedly exponentiate the same base can precompute [Squares].

use crate::Error;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

/// Largest integer power (in bits) that [pow] will materialize.
const MAX_POW_BITS: u64 = 1 << 26;

/// Table of repeated squares `base^(2^i) mod modulus`.
#[derive(Clone, Debug)]
pub struct Squares {
    modulus: BigUint,
    squares: Vec<BigUint>,
}

impl Squares {
    /// Build a table covering exponents up to the bit length of `modulus`.
    pub fn new(base: &BigUint, modulus: &BigUint) -> Self {
        Self::with_len(base, modulus, modulus.bits() as usize)
    }

    /// Build a table covering exponents of up to `len` bits.
    pub fn with_len(base: &BigUint, modulus: &BigUint, len: usize) -> Self {
        let mut squares = Vec::with_capacity(len);
        let mut current = base % modulus;
        for _ in 0..len {
            let next = &current * &current % modulus;
            squares.push(current);
            current = next;
        }
        Self {
            modulus: modulus.clone(),
            squares,
        }
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// Returns whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Entries of the table, least significant first.
    pub fn squares(&self) -> &[BigUint] {
        &self.squares
    }

    fn selected<'a>(&'a self, exp: &BigUint) -> Result<impl Iterator<Item = &'a BigUint>, Error> {
        if exp.bits() > self.squares.len() as u64 {
            return Err(Error::ExponentTooLarge(exp.bits()));
        }
        let bits = bits(exp);
        Ok(self
            .squares
            .iter()
            .zip(bits)
            .filter_map(|(square, bit)| bit.then_some(square)))
    }

    /// Compute `base^exp mod modulus` from the table.
    pub fn prod(&self, exp: &BigUint) -> Result<BigUint, Error> {
        Ok(self
            .selected(exp)?
            .fold(BigUint::one() % &self.modulus, |acc, square| {
                acc * square % &self.modulus
            }))
    }

    /// Compute the integer product (without reduction) of the entries selected by `exp`.
    pub fn unreduced_prod(&self, exp: &BigUint) -> Result<BigUint, Error> {
        Ok(self
            .selected(exp)?
            .fold(BigUint::one(), |acc, square| acc * square))
    }
}

/// Compute `base^exp mod modulus`.
pub fn prod(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Compute `a^x · b^y mod modulus` with a single pass of simultaneous square-and-multiply.
pub fn multi_exp(
    a: &BigUint,
    x: &BigUint,
    b: &BigUint,
    y: &BigUint,
    modulus: &BigUint,
) -> BigUint {
    let a = a % modulus;
    let b = b % modulus;
    let ab = &a * &b % modulus;
    let mut result = BigUint::one() % modulus;
    for i in (0..x.bits().max(y.bits())).rev() {
        result = &result * &result % modulus;
        match (x.bit(i), y.bit(i)) {
            (true, true) => result = result * &ab % modulus,
            (true, false) => result = result * &a % modulus,
            (false, true) => result = result * &b % modulus,
            (false, false) => {}
        }
    }
    result
}

/// Little-endian bit decomposition of `exp`.
pub fn bits(exp: &BigUint) -> Vec<bool> {
    (0..exp.bits()).map(|i| exp.bit(i)).collect()
}

/// Compute the integer power `x^e`.
///
/// Fails when `e` does not fit in a `u32` or the result would be unreasonably large.
pub fn pow(x: &BigUint, e: &BigUint) -> Result<BigUint, Error> {
    if !pow_fits(x.bits(), e) {
        return Err(Error::ExponentTooLarge(e.bits()));
    }
    let exponent = e.to_u32().ok_or(Error::ExponentTooLarge(e.bits()))?;
    Ok(x.pow(exponent))
}

/// Returns whether [pow] accepts `e` for every base of at most `bits` bits.
pub fn pow_fits(bits: u64, e: &BigUint) -> bool {
    match e.to_u32() {
        Some(exponent) => bits.saturating_mul(exponent as u64) <= MAX_POW_BITS,
        None => false,
    }
}
