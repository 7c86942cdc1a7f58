#![no_main]

use arbitrary::Arbitrary;
use num_bigint::BigUint;
use pomode_protocol::{prime::is_probable_prime, ChallengeLength, Transcript, PRIMALITY_ROUNDS};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Length {
    Default,
    Max252,
    Bits(u8),
}

impl From<Length> for ChallengeLength {
    fn from(length: Length) -> Self {
        match length {
            Length::Default => ChallengeLength::Default,
            Length::Max252 => ChallengeLength::Max252,
            // Narrow lengths exhaust the prime search; keep enough bits to find one
            Length::Bits(bits) => ChallengeLength::Bits(16 + (bits as u64 % 241)),
        }
    }
}

#[derive(Arbitrary, Debug, Clone)]
enum Operation {
    Append(String),
    AppendInt(Vec<u8>),
    IntChallenge,
    PrimeChallenge,
    LargeChallenge(u16),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    length: Length,
    operations: Vec<Operation>,
}

fn run(length: ChallengeLength, operations: &[Operation]) -> (Vec<String>, Vec<BigUint>) {
    let mut transcript = Transcript::new(length);
    let mut outputs = Vec::new();
    for operation in operations.iter().take(32) {
        match operation {
            Operation::Append(item) => transcript.append(item.clone()),
            Operation::AppendInt(bytes) => transcript.append_int(&BigUint::from_bytes_be(bytes)),
            Operation::IntChallenge => outputs.push(transcript.int_challenge()),
            Operation::PrimeChallenge => {
                if let Ok(prime) = transcript.prime_challenge() {
                    assert!(is_probable_prime(&prime, PRIMALITY_ROUNDS));
                    outputs.push(prime);
                }
            }
            Operation::LargeChallenge(bits) => {
                let bits = *bits as u64 % 4096;
                let value = transcript.large_challenge(bits);
                assert!(value.bits() <= bits);
                outputs.push(value);
            }
        }
    }
    (transcript.info().to_vec(), outputs)
}

fn fuzz(input: FuzzInput) {
    let length: ChallengeLength = input.length.into();

    // Challenges depend only on the sequence of operations
    let first = run(length, &input.operations);
    let second = run(length, &input.operations);
    assert_eq!(first, second);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
