//! MiMC hash over the BN254 scalar field.
//!
//! The block cipher applies [ROUNDS] rounds of `x -> (x + k + c_i)^5` and is turned into a hash
//! with the Miyaguchi-Preneel construction: `h' = E_h(m) + h + m`. Messages are absorbed in
//! [BLOCK_SIZE]-byte big-endian chunks, each strictly below the field modulus, so any byte string
//! is accepted without reduction.
//!
//! # Example
//!
//! ```rust
//! use pomode_vtlp::mimc::{self, Mimc};
//!
//! let mut hasher = Mimc::new();
//! hasher.update(b"hello,");
//! hasher.update(b" world!");
//! assert_eq!(hasher.finalize(), mimc::hash(b"hello, world!"));
//! ```

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Number of cipher rounds.
pub const ROUNDS: usize = 110;

/// Bytes absorbed per field element.
pub const BLOCK_SIZE: usize = 31;

/// Seed of the round-constant chain.
const SEED: &[u8] = b"seed";

/// Order of the BN254 scalar field.
const MODULUS: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

struct Field {
    modulus: BigUint,
    constants: Vec<BigUint>,
}

fn field() -> &'static Field {
    static FIELD: OnceLock<Field> = OnceLock::new();
    FIELD.get_or_init(|| {
        let modulus =
            BigUint::parse_bytes(MODULUS.as_bytes(), 10).expect("invalid modulus literal");

        // c_0 = SHA256(SHA256(seed)), c_i = SHA256(c_(i-1))
        let mut digest = Sha256::digest(SEED);
        let constants = (0..ROUNDS)
            .map(|_| {
                digest = Sha256::digest(digest);
                BigUint::from_bytes_be(&digest) % &modulus
            })
            .collect();
        Field { modulus, constants }
    })
}

/// Order of the BN254 scalar field.
pub fn modulus() -> &'static BigUint {
    &field().modulus
}

/// Encrypt `m` under key `k`.
fn encrypt(field: &Field, k: &BigUint, m: BigUint) -> BigUint {
    let p = &field.modulus;
    let mut state = m;
    for c in &field.constants {
        let t = (state + k + c) % p;
        let t2 = &t * &t % p;
        state = &t2 * &t2 % p * &t % p;
    }
    (state + k) % p
}

/// Incremental MiMC hasher.
#[derive(Clone, Debug)]
pub struct Mimc {
    state: BigUint,
    buffer: Vec<u8>,
}

impl Default for Mimc {
    fn default() -> Self {
        Self::new()
    }
}

impl Mimc {
    /// Create a hasher with an all-zero state.
    pub fn new() -> Self {
        Self {
            state: BigUint::zero(),
            buffer: Vec::with_capacity(BLOCK_SIZE),
        }
    }

    fn absorb(&mut self, block: &[u8]) {
        let field = field();
        let m = BigUint::from_bytes_be(block);
        let encrypted = encrypt(field, &self.state, m.clone());
        self.state = (encrypted + &self.state + m) % &field.modulus;
    }

    /// Absorb `message`.
    pub fn update(&mut self, mut message: &[u8]) {
        if !self.buffer.is_empty() {
            let take = (BLOCK_SIZE - self.buffer.len()).min(message.len());
            self.buffer.extend_from_slice(&message[..take]);
            message = &message[take..];
            if self.buffer.len() < BLOCK_SIZE {
                return;
            }
            let block = std::mem::take(&mut self.buffer);
            self.absorb(&block);
        }
        let mut chunks = message.chunks_exact(BLOCK_SIZE);
        for block in &mut chunks {
            self.absorb(block);
        }
        self.buffer.extend_from_slice(chunks.remainder());
    }

    /// Absorb any buffered partial block and return the digest as a field element.
    pub fn finalize(mut self) -> BigUint {
        if !self.buffer.is_empty() {
            let block = std::mem::take(&mut self.buffer);
            self.absorb(&block);
        }
        self.state
    }
}

/// Hash `message` to an element of the BN254 scalar field.
pub fn hash(message: &[u8]) -> BigUint {
    let mut hasher = Mimc::new();
    hasher.update(message);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        let field = field();
        assert_eq!(field.constants.len(), ROUNDS);
        assert!(field.constants.iter().all(|c| c < modulus()));
        assert_ne!(field.constants[0], field.constants[1]);
        assert_eq!(modulus().bits(), 254);
    }

    #[test]
    fn test_empty() {
        assert!(hash(&[]).is_zero());
    }

    #[test]
    fn test_in_field() {
        for len in [1, 30, 31, 32, 62, 100] {
            let message = vec![0xffu8; len];
            assert!(&hash(&message) < modulus());
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(hash(b"message"), hash(b"message"));
        assert_ne!(hash(b"message"), hash(b"messagf"));
        assert_ne!(hash(b"message"), hash(b""));
    }

    #[test]
    fn test_incremental() {
        let message: Vec<u8> = (0..200u8).collect();
        let expected = hash(&message);
        for split in [0, 1, 30, 31, 32, 61, 62, 150, 200] {
            let mut hasher = Mimc::new();
            hasher.update(&message[..split]);
            hasher.update(&message[split..]);
            assert_eq!(hasher.finalize(), expected, "split at {split}");
        }

        // Byte at a time
        let mut hasher = Mimc::new();
        for byte in &message {
            hasher.update(std::slice::from_ref(byte));
        }
        assert_eq!(hasher.finalize(), expected);
    }

    #[test]
    fn test_single_block() {
        // A single block m absorbed from a zero state is E_0(m) + m
        let field = field();
        let m = BigUint::from(42u32);
        let expected = (encrypt(field, &BigUint::zero(), m.clone()) + &m) % modulus();
        assert_eq!(hash(&[42]), expected);
    }

    #[test]
    fn test_block_boundaries() {
        // A trailing partial block is absorbed as-is, so zero padding changes the digest
        let mut padded = vec![1u8; BLOCK_SIZE];
        let short = padded.clone();
        padded.push(0);
        assert_ne!(hash(&short), hash(&padded));
    }
}
