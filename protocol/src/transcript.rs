//! Fiat-Shamir transcript for deriving non-interactive challenges.
//!
//! A [Transcript] is an ordered list of strings. Every challenge is derived from the SHA-256
//! digest of the concatenation of all strings appended so far and is itself appended (as a decimal
//! string) before being returned. Two transcripts holding the same ordered list therefore derive
//! the same sequence of challenges, while any reordering or omission changes them.
//!
//! Challenges are reduced according to a [ChallengeLength] policy chosen at construction.

use crate::{
    prime::is_probable_prime, Error, CIRCUIT_BIT_LIMIT, MAX_PRIME_ATTEMPTS, PRIMALITY_ROUNDS,
};
use num_bigint::BigUint;
use num_traits::One;
use sha2::{Digest, Sha256};
use tracing::trace;

/// Bit length of a single SHA-256 output.
const DIGEST_BITS: u64 = 256;

/// Reduction applied to every raw challenge digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeLength {
    /// Full 256-bit digest.
    Default,
    /// Reduce modulo `2^(CIRCUIT_BIT_LIMIT - 1)` so the challenge fits a circuit field element.
    ///
    /// A raw value exactly equal to the modulus is returned unmodified.
    Max252,
    /// Reduce modulo `2^k`.
    Bits(u64),
}

impl ChallengeLength {
    /// Apply the reduction to `value`.
    pub fn reduce(&self, value: BigUint) -> BigUint {
        match self {
            Self::Default => truncate(value, DIGEST_BITS),
            Self::Max252 => {
                let bound = BigUint::one() << (CIRCUIT_BIT_LIMIT - 1);
                if value == bound {
                    return value;
                }
                value % bound
            }
            Self::Bits(bits) => truncate(value, *bits),
        }
    }
}

fn truncate(value: BigUint, bits: u64) -> BigUint {
    if value.bits() <= bits {
        return value;
    }
    value & ((BigUint::one() << bits) - 1u32)
}

/// Big-endian bytes of `value`, with zero encoded as the empty string.
pub(crate) fn to_bytes(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 {
        return Vec::new();
    }
    value.to_bytes_be()
}

/// Hash `data` with SHA-256 and reduce the big-endian digest under `length`.
pub fn hash_to_int(data: &[u8], length: ChallengeLength) -> BigUint {
    let digest = Sha256::digest(data);
    length.reduce(BigUint::from_bytes_be(&digest))
}

/// Hash `data` to a probable prime under `length`.
///
/// Candidates that fail the primality test are re-hashed (over their own big-endian bytes) until a
/// probable prime is found or [MAX_PRIME_ATTEMPTS] candidates have been examined.
pub fn hash_to_prime(data: &[u8], length: ChallengeLength) -> Result<BigUint, Error> {
    let mut candidate = hash_to_int(data, length);
    for attempt in 1..=MAX_PRIME_ATTEMPTS {
        if is_probable_prime(&candidate, PRIMALITY_ROUNDS) {
            trace!(attempt, "found prime challenge");
            return Ok(candidate);
        }
        candidate = hash_to_int(&to_bytes(&candidate), length);
    }
    Err(Error::ChallengeExhausted(MAX_PRIME_ATTEMPTS))
}

/// Hash `data` to an integer of (at most) `bits` bits.
///
/// Widths above 256 bits are built from chained digests: block `0` is the digest of `data` and
/// block `i` is the digest of the decimal string of block `i - 1`. Full blocks are concatenated
/// most-significant first and any remaining width is filled with the digest of `data` reduced to
/// that width.
pub fn hash_to_large(data: &[u8], bits: u64) -> BigUint {
    if bits <= DIGEST_BITS {
        return hash_to_int(data, ChallengeLength::Bits(bits));
    }
    let mut block = hash_to_int(data, ChallengeLength::Default);
    let mut result = block.clone();
    for _ in 1..bits / DIGEST_BITS {
        block = hash_to_int(block.to_str_radix(10).as_bytes(), ChallengeLength::Default);
        result = (result << DIGEST_BITS) + &block;
    }
    let remainder = bits % DIGEST_BITS;
    if remainder != 0 {
        result = (result << remainder) + hash_to_int(data, ChallengeLength::Bits(remainder));
    }
    result
}

/// Challenge length used by every proof protocol.
///
/// Keeps prime challenges below [CIRCUIT_BIT_LIMIT] bits so they can be recomputed in a circuit.
pub const PROTOCOL_CHALLENGE_LENGTH: ChallengeLength = ChallengeLength::Max252;

/// An ordered list of strings from which challenges are derived.
#[derive(Clone, Debug)]
pub struct Transcript {
    info: Vec<String>,
    length: ChallengeLength,
}

impl Transcript {
    /// Create an empty transcript with the given challenge length policy.
    pub fn new(length: ChallengeLength) -> Self {
        Self {
            info: Vec::new(),
            length,
        }
    }

    /// Create a transcript that starts with the given strings.
    pub fn with_info<S: AsRef<str>>(length: ChallengeLength, info: &[S]) -> Self {
        let mut transcript = Self::new(length);
        transcript.append_slice(info);
        transcript
    }

    /// Create a protocol transcript: a domain label followed by the decimal representations of
    /// `items`.
    pub fn labeled(label: &str, items: &[&BigUint]) -> Self {
        let mut transcript = Self::new(PROTOCOL_CHALLENGE_LENGTH);
        transcript.append(label);
        transcript.append_ints(items);
        transcript
    }

    /// Append a single string.
    pub fn append(&mut self, item: impl Into<String>) {
        self.info.push(item.into());
    }

    /// Append the decimal representation of an integer.
    pub fn append_int(&mut self, value: &BigUint) {
        self.info.push(value.to_str_radix(10));
    }

    /// Append a sequence of strings, in order.
    pub fn append_slice<S: AsRef<str>>(&mut self, items: &[S]) {
        self.info
            .extend(items.iter().map(|item| item.as_ref().to_string()));
    }

    /// Append the decimal representations of a sequence of integers, in order.
    pub fn append_ints(&mut self, values: &[&BigUint]) {
        self.info
            .extend(values.iter().map(|value| value.to_str_radix(10)));
    }

    /// Strings appended so far.
    pub fn info(&self) -> &[String] {
        &self.info
    }

    /// Challenge length policy of this transcript.
    pub fn length(&self) -> ChallengeLength {
        self.length
    }

    fn data(&self) -> Vec<u8> {
        self.info.concat().into_bytes()
    }

    /// Derive a prime challenge and append it.
    pub fn prime_challenge(&mut self) -> Result<BigUint, Error> {
        let challenge = hash_to_prime(&self.data(), self.length)?;
        self.append_int(&challenge);
        Ok(challenge)
    }

    /// Derive an integer challenge and append it.
    pub fn int_challenge(&mut self) -> BigUint {
        let challenge = hash_to_int(&self.data(), self.length);
        self.append_int(&challenge);
        challenge
    }

    /// Derive a challenge of (at most) `bits` bits and append it.
    pub fn large_challenge(&mut self, bits: u64) -> BigUint {
        let challenge = hash_to_large(&self.data(), bits);
        self.append_int(&challenge);
        challenge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_utils::hex;
    use num_traits::Num;

    fn int(value: &str) -> BigUint {
        BigUint::from_str_radix(value, 10).unwrap()
    }

    #[test]
    fn test_int_challenge_known_answer() {
        let mut transcript = Transcript::with_info(ChallengeLength::Default, &["abc"]);
        let challenge = transcript.int_challenge();
        assert_eq!(
            hex(&challenge.to_bytes_be()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(transcript.info().len(), 2);
        assert_eq!(transcript.info()[1], challenge.to_str_radix(10));

        let mut transcript = Transcript::with_info(ChallengeLength::Max252, &["abc"]);
        let challenge = transcript.int_challenge();
        assert_eq!(
            hex(&challenge.to_bytes_be()),
            "16bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_prime_challenge_known_answer() {
        let mut transcript = Transcript::with_info(ChallengeLength::Max252, &["abc"]);
        let challenge = transcript.prime_challenge().unwrap();
        assert_eq!(
            challenge,
            int("836585495936079023475692968557151870286647045552028492463102409059712717")
        );
        assert!(challenge.bits() < CIRCUIT_BIT_LIMIT);

        let mut transcript =
            Transcript::with_info(ChallengeLength::Default, &["PoKDE", "1", "2"]);
        let challenge = transcript.prime_challenge().unwrap();
        assert_eq!(
            challenge,
            int("52478874383511266718053295027231026414875919971946557506598246527743144033027")
        );
    }

    #[test]
    fn test_large_challenge_known_answer() {
        let mut transcript = Transcript::with_info(ChallengeLength::Default, &["abc"]);
        let challenge = transcript.large_challenge(300);
        assert_eq!(challenge, int("1483766637851590597659380466568697988937972676198316308197856557421138552187362074704221613"));
        assert_eq!(challenge.bits(), 300);

        let mut transcript = Transcript::with_info(ChallengeLength::Default, &["abc"]);
        let challenge = transcript.large_challenge(512);
        assert_eq!(challenge, int("9766179058343823309491035975151568301576399698925186385925095693024346436702030508650579184256422874792380491608171466118901259919714537336658140860601418"));
    }

    #[test]
    fn test_large_challenge_narrow() {
        let mut narrow = Transcript::with_info(ChallengeLength::Default, &["abc"]);
        let mut int = Transcript::with_info(ChallengeLength::Bits(100), &["abc"]);
        assert_eq!(narrow.large_challenge(100), int.int_challenge());
    }

    #[test]
    fn test_determinism() {
        let items = ["PoE", "5", "77", "123"];
        let mut a = Transcript::with_info(ChallengeLength::Default, &items);
        let mut b = Transcript::new(ChallengeLength::Default);
        for item in items {
            b.append(item);
        }
        assert_eq!(a.prime_challenge().unwrap(), b.prime_challenge().unwrap());
        assert_eq!(a.int_challenge(), b.int_challenge());
        assert_eq!(a.large_challenge(600), b.large_challenge(600));
        assert_eq!(a.info(), b.info());
    }

    #[test]
    fn test_labeled() {
        let (a, b) = (BigUint::from(5u32), BigUint::from(77u32));
        let labeled = Transcript::labeled("PoE", &[&a, &b]);
        assert_eq!(labeled.info(), &["PoE", "5", "77"]);
        assert_eq!(labeled.length(), ChallengeLength::Max252);
    }

    #[test]
    fn test_order_sensitivity() {
        let mut a = Transcript::with_info(ChallengeLength::Default, &["a", "b", "c"]);
        let mut b = Transcript::with_info(ChallengeLength::Default, &["b", "a", "c"]);
        let mut c = Transcript::with_info(ChallengeLength::Default, &["a", "b"]);
        let (a, b, c) = (a.int_challenge(), b.int_challenge(), c.int_challenge());
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_challenges_chain() {
        let mut transcript = Transcript::with_info(ChallengeLength::Default, &["chain"]);
        let first = transcript.prime_challenge().unwrap();
        let second = transcript.prime_challenge().unwrap();
        assert_ne!(first, second);
        assert_eq!(transcript.info().len(), 3);
    }

    #[test]
    fn test_prime_challenges_are_prime() {
        for length in [
            ChallengeLength::Default,
            ChallengeLength::Max252,
            ChallengeLength::Bits(64),
        ] {
            for i in 0..8u32 {
                let mut transcript = Transcript::new(length);
                transcript.append(format!("prime-{i}"));
                let l = transcript.prime_challenge().unwrap();
                assert!(is_probable_prime(&l, PRIMALITY_ROUNDS));
                if let ChallengeLength::Bits(bits) = length {
                    assert!(l.bits() <= bits);
                }
            }
        }
    }

    #[test]
    fn test_max252_boundary() {
        let bound = BigUint::one() << (CIRCUIT_BIT_LIMIT - 1);
        assert_eq!(ChallengeLength::Max252.reduce(bound.clone()), bound);
        assert_eq!(
            ChallengeLength::Max252.reduce(&bound + 5u32),
            BigUint::from(5u32)
        );
        assert_eq!(
            ChallengeLength::Max252.reduce(&bound - 1u32),
            &bound - 1u32
        );
    }

    #[test]
    fn test_bits_reduction() {
        let value = BigUint::from(0b1011_0110u32);
        assert_eq!(ChallengeLength::Bits(4).reduce(value.clone()), BigUint::from(0b0110u32));
        assert_eq!(ChallengeLength::Bits(16).reduce(value.clone()), value);
    }

    #[test]
    fn test_exhausted_challenge() {
        // No prime fits in a single bit
        let mut transcript = Transcript::with_info(ChallengeLength::Bits(1), &["x"]);
        assert!(matches!(
            transcript.prime_challenge(),
            Err(Error::ChallengeExhausted(MAX_PRIME_ATTEMPTS))
        ));
    }
}
