//! Probabilistic primality testing and safe-prime generation.

use crate::{utils::random_bits, Error, PRIMALITY_ROUNDS};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Primes below 512, used for trial division.
const SMALL_PRIMES: [u32; 97] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419, 421,
    431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509,
];

/// Every composite below this bound has a factor in [SMALL_PRIMES].
const TRIAL_DIVISION_BOUND: u32 = 509 * 509;

/// Returns `Some(result)` if trial division settles the primality of `n`.
fn trial_division(n: &BigUint) -> Option<bool> {
    if n < &BigUint::from(2u32) {
        return Some(false);
    }
    for p in SMALL_PRIMES {
        if (n % p).is_zero() {
            return Some(n == &BigUint::from(p));
        }
    }
    if n < &BigUint::from(TRIAL_DIVISION_BOUND) {
        return Some(true);
    }
    None
}

/// Derive the Miller-Rabin base for `round` from `n`, in `[2, n - 2]`.
fn witness(n: &BigUint, round: usize) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update(n.to_bytes_be());
    hasher.update((round as u64).to_be_bytes());
    let digest = BigUint::from_bytes_be(&hasher.finalize());
    (digest % (n - 3u32)) + 2u32
}

/// Returns whether `n` passes the Miller-Rabin test to base `a`, where `n - 1 = d * 2^s`.
fn miller_rabin(n: &BigUint, n_minus_one: &BigUint, a: &BigUint, d: &BigUint, s: u64) -> bool {
    let mut x = a.modpow(d, n);
    if x.is_one() || &x == n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = &x * &x % n;
        if &x == n_minus_one {
            return true;
        }
        if x.is_one() {
            return false;
        }
    }
    false
}

/// Returns whether `n` is probably prime.
///
/// Composites are accepted with probability at most `4^-rounds`. Bases are derived
/// deterministically from `n`, so the result for a given `(n, rounds)` never changes.
pub fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    if let Some(result) = trial_division(n) {
        return result;
    }
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    (0..rounds).all(|round| miller_rabin(n, &n_minus_one, &witness(n, round), &d, s))
}

/// Returns whether `p` is a safe prime (`p` and `(p - 1) / 2` are both probably prime).
pub fn is_safe_prime(p: &BigUint) -> bool {
    if p.is_even() {
        return false;
    }
    let q = p >> 1u32;
    is_probable_prime(&q, PRIMALITY_ROUNDS) && is_probable_prime(p, PRIMALITY_ROUNDS)
}

/// Returns whether `q` or `2q + 1` has a small factor (other than being that factor).
fn sieved(q: &BigUint) -> bool {
    SMALL_PRIMES[1..].iter().any(|&p| {
        let r = q % p;
        // 2q + 1 = 0 (mod p) iff q = (p - 1) / 2 (mod p)
        r.is_zero() || r == BigUint::from((p - 1) / 2)
    })
}

/// Generate a random safe prime `p = 2q + 1` of exactly `bits` bits.
pub fn random_safe_prime<R: RngCore + CryptoRng>(rng: &mut R, bits: u64) -> Result<BigUint, Error> {
    if bits < 16 {
        return Err(Error::InvalidParameters("safe prime too small"));
    }
    let top = BigUint::one() << (bits - 2);
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let q = random_bits(rng, bits - 1)? | &top | BigUint::one();
        if sieved(&q) {
            continue;
        }
        // Cheap single-round filter before the full test
        let p = (&q << 1u32) + 1u32;
        if !is_probable_prime(&q, 1) || !is_probable_prime(&p, 1) {
            continue;
        }
        if is_probable_prime(&q, PRIMALITY_ROUNDS) && is_probable_prime(&p, PRIMALITY_ROUNDS) {
            debug!(bits, attempts, "generated safe prime");
            return Ok(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_small_values() {
        let primes: Vec<u32> = (0..200u32)
            .filter(|&n| is_probable_prime(&BigUint::from(n), PRIMALITY_ROUNDS))
            .collect();
        assert_eq!(primes.len(), 46);
        assert_eq!(&primes[..6], &[2, 3, 5, 7, 11, 13]);
        assert!(!is_probable_prime(&BigUint::zero(), PRIMALITY_ROUNDS));
        assert!(!is_probable_prime(&BigUint::one(), PRIMALITY_ROUNDS));
    }

    #[test]
    fn test_large_primes() {
        // 2^127 - 1 and 2^521 - 1 are Mersenne primes
        let m127 = (BigUint::one() << 127u32) - 1u32;
        let m521 = (BigUint::one() << 521u32) - 1u32;
        assert!(is_probable_prime(&m127, PRIMALITY_ROUNDS));
        assert!(is_probable_prime(&m521, PRIMALITY_ROUNDS));
        assert!(!is_probable_prime(&(&m127 * &m521), PRIMALITY_ROUNDS));
        assert!(!is_probable_prime(&((BigUint::one() << 128u32) + 1u32), PRIMALITY_ROUNDS));
    }

    #[test]
    fn test_carmichael_numbers() {
        for n in [561u64, 41041, 825265, 321197185, 5394826801, 232250619601] {
            assert!(!is_probable_prime(&BigUint::from(n), PRIMALITY_ROUNDS));
        }
    }

    #[test]
    fn test_safe_prime_fixtures() {
        for p in mocks::safe_primes() {
            assert_eq!(p.bits(), 512);
            assert!(is_safe_prime(&p));
        }
        // 23 is safe, 29 is not (14 is even)
        assert!(is_safe_prime(&BigUint::from(23u32)));
        assert!(!is_safe_prime(&BigUint::from(29u32)));
    }

    #[test]
    fn test_random_safe_prime() {
        let mut rng = StdRng::seed_from_u64(0);
        for bits in [16u64, 64, 128] {
            let p = random_safe_prime(&mut rng, bits).unwrap();
            assert_eq!(p.bits(), bits);
            assert!(is_safe_prime(&p));
        }
        assert!(matches!(
            random_safe_prime(&mut rng, 8),
            Err(Error::InvalidParameters(_))
        ));
    }
}
