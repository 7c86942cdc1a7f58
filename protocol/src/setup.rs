//! Trusted setup for RSA groups of hidden order.
//!
//! [PublicParameters] holds a modulus `N = pq` (for safe primes `p` and `q`) and two generators
//! of the quadratic-residue subgroup of `Z_N^*`. The factors are discarded after generation, so the
//! order of the group is unknown to everyone who receives the parameters.
//!
//! [RsaExpSetup] retains the factors as a trapdoor for time-lock puzzles: with the order of the
//! group known, `T` sequential squarings collapse into a single exponentiation. Only its public
//! half ([PuzzleParameters]) is handed to solvers.

use crate::{
    exp::pow_fits,
    prime::{is_safe_prime, random_safe_prime},
    utils::{mod_inverse, random_quadratic_residue},
    Error, CIRCUIT_BIT_LIMIT,
};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Smallest modulus accepted by parameter generation.
const MIN_MODULUS_BITS: u64 = 64;

/// Configuration for [RsaExpSetup::generate].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Bit length of the RSA modulus.
    pub modulus_bits: u64,

    /// Number of sequential squarings required to solve a puzzle.
    pub time: u64,

    /// Small public RSA exponent `d`.
    ///
    /// Must be at least 3 and small enough that `(s · l)^d` fits the bound of [crate::exp::pow].
    pub public_exponent: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modulus_bits: 2048,
            time: 1 << 20,
            public_exponent: 17,
        }
    }
}

/// Draw two distinct safe primes of `bits` bits each.
fn distinct_safe_primes<R: RngCore + CryptoRng>(
    rng: &mut R,
    bits: u64,
) -> Result<(BigUint, BigUint), Error> {
    let p = random_safe_prime(rng, bits)?;
    loop {
        let q = random_safe_prime(rng, bits)?;
        if q != p {
            return Ok((p, q));
        }
    }
}

fn check_modulus_bits(bits: u64) -> Result<(), Error> {
    if bits < MIN_MODULUS_BITS || bits % 2 != 0 {
        return Err(Error::InvalidParameters("modulus bits must be even and at least 64"));
    }
    Ok(())
}

fn check_primes(p: &BigUint, q: &BigUint) -> Result<(), Error> {
    if p == q {
        return Err(Error::InvalidParameters("factors must be distinct"));
    }
    if !is_safe_prime(p) || !is_safe_prime(q) {
        return Err(Error::NotSafePrime);
    }
    Ok(())
}

/// Public parameters `(N, G, H)` of a hidden-order group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicParameters {
    n: BigUint,
    g: BigUint,
    h: BigUint,
}

impl PublicParameters {
    /// Wrap externally generated parameters.
    ///
    /// Membership of `g` and `h` in the quadratic-residue subgroup cannot be checked without the
    /// factorization of `n`, so only structural properties are validated.
    pub fn new(n: BigUint, g: BigUint, h: BigUint) -> Result<Self, Error> {
        if n.bits() < MIN_MODULUS_BITS || n.is_even() {
            return Err(Error::InvalidParameters("modulus must be odd and at least 64 bits"));
        }
        for generator in [&g, &h] {
            if generator <= &BigUint::one() || generator >= &n {
                return Err(Error::InvalidParameters("generator out of range"));
            }
            if !generator.gcd(&n).is_one() {
                return Err(Error::InvalidParameters("generator not coprime to modulus"));
            }
        }
        Ok(Self { n, g, h })
    }

    /// Generate fresh parameters with a modulus of `modulus_bits` bits, discarding its factors.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, modulus_bits: u64) -> Result<Self, Error> {
        check_modulus_bits(modulus_bits)?;
        let (p, q) = distinct_safe_primes(rng, modulus_bits / 2)?;
        Self::from_primes(rng, &p, &q)
    }

    /// Derive parameters from known safe primes (the caller is responsible for discarding them).
    pub fn from_primes<R: RngCore + CryptoRng>(
        rng: &mut R,
        p: &BigUint,
        q: &BigUint,
    ) -> Result<Self, Error> {
        check_primes(p, q)?;
        let n = p * q;
        let g = random_quadratic_residue(rng, &n)?;
        let h = random_quadratic_residue(rng, &n)?;
        debug!(bits = n.bits(), "generated public parameters");
        Ok(Self { n, g, h })
    }

    /// Modulus `N`.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Primary generator `G`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Secondary generator `H`.
    pub fn h(&self) -> &BigUint {
        &self.h
    }

    /// Commit to `x` as `G^x mod N`.
    pub fn commit(&self, x: &BigUint) -> BigUint {
        self.g.modpow(x, &self.n)
    }
}

/// Public half of an [RsaExpSetup], sufficient to solve (slowly) and verify puzzles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleParameters {
    rsa_mod: BigUint,
    base: BigUint,
    d: BigUint,
    time: u64,
}

impl PuzzleParameters {
    /// Create puzzle parameters from their public components.
    pub fn new(rsa_mod: BigUint, base: BigUint, d: BigUint, time: u64) -> Self {
        Self {
            rsa_mod,
            base,
            d,
            time,
        }
    }

    /// RSA modulus.
    pub fn rsa_mod(&self) -> &BigUint {
        &self.rsa_mod
    }

    /// Generator of the quadratic-residue subgroup.
    pub fn base(&self) -> &BigUint {
        &self.base
    }

    /// Public RSA exponent.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// Number of sequential squarings.
    pub fn time(&self) -> u64 {
        self.time
    }
}

/// Trapdoor record of an RSA group with known factorization.
#[derive(Clone)]
pub struct RsaExpSetup {
    public: PuzzleParameters,
    p: BigUint,
    q: BigUint,
    e: BigUint,
    order: BigUint,
    exponent: BigUint,
    exponent_inverse: BigUint,
}

impl RsaExpSetup {
    /// Generate a fresh trapdoor from two random safe primes.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, config: &Config) -> Result<Self, Error> {
        check_modulus_bits(config.modulus_bits)?;
        let (p, q) = distinct_safe_primes(rng, config.modulus_bits / 2)?;
        Self::from_primes(rng, p, q, config)
    }

    /// Build a trapdoor from known safe primes `p` and `q`.
    pub fn from_primes<R: RngCore + CryptoRng>(
        rng: &mut R,
        p: BigUint,
        q: BigUint,
        config: &Config,
    ) -> Result<Self, Error> {
        check_primes(&p, &q)?;
        if config.public_exponent < 3 {
            return Err(Error::InvalidParameters("public exponent must be at least 3"));
        }
        let rsa_mod = &p * &q;
        let d = BigUint::from(config.public_exponent);

        // Proofs raise s · l + mask (s < N, l < 2^CIRCUIT_BIT_LIMIT) to the public exponent
        if !pow_fits(rsa_mod.bits() + CIRCUIT_BIT_LIMIT + 1, &d) {
            return Err(Error::InvalidParameters("public exponent too large to prove"));
        }
        let order = (&p >> 1u32) * (&q >> 1u32);
        let base = random_quadratic_residue(rng, &rsa_mod)?;

        // The inverse is taken modulo φ(N) = 4 · order
        let e = mod_inverse(&d, &(&order << 2u32))?;

        let exponent = BigUint::from(2u32).modpow(&BigUint::from(config.time), &order);
        let exponent_inverse = mod_inverse(&exponent, &order)?;
        debug!(
            bits = rsa_mod.bits(),
            time = config.time,
            "generated puzzle trapdoor"
        );
        Ok(Self {
            public: PuzzleParameters::new(rsa_mod, base, d, config.time),
            p,
            q,
            e,
            order,
            exponent,
            exponent_inverse,
        })
    }

    /// Public parameters to hand to solvers and verifiers.
    pub fn public(&self) -> &PuzzleParameters {
        &self.public
    }

    /// RSA modulus.
    pub fn rsa_mod(&self) -> &BigUint {
        &self.public.rsa_mod
    }

    /// Secret factors `(p, q)`.
    pub fn factors(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    /// Order of the quadratic-residue subgroup.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Private RSA exponent `e = d^-1 mod 4 · order`.
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// `2^T mod order`.
    pub fn exponent(&self) -> &BigUint {
        &self.exponent
    }

    /// Produce a puzzle `z` such that `T` sequential squarings of `z` yield `s`.
    ///
    /// `s` must be a quadratic residue modulo `N` for the round trip to hold.
    pub fn lock(&self, s: &BigUint) -> BigUint {
        s.modpow(&self.exponent_inverse, self.rsa_mod())
    }

    /// Solve a puzzle with the trapdoor: `z^(2^T) mod N` in a single exponentiation.
    pub fn solve_with_trapdoor(&self, z: &BigUint) -> BigUint {
        z.modpow(&self.exponent, self.rsa_mod())
    }

    /// Compute the RSA root `value^e mod N`, the unique `s` with `s^d = value (mod N)`.
    pub fn root(&self, value: &BigUint) -> BigUint {
        value.modpow(&self.e, self.rsa_mod())
    }
}
