#![no_main]

use arbitrary::Arbitrary;
use commonware_codec::{Decode, Encode};
use num_bigint::BigUint;
use pomode_protocol::{mocks, Proof, Statement};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    encoded: Vec<u8>,
    max_len: u8,
    c: Vec<u8>,
    n: Vec<u8>,
    e: u8,
}

fn fuzz(input: FuzzInput) {
    static PP: OnceLock<pomode_protocol::PublicParameters> = OnceLock::new();
    let pp = PP.get_or_init(mocks::public_parameters);

    let max_len = input.max_len as usize;
    let Ok(proof) = Proof::decode_cfg(&input.encoded[..], &max_len) else {
        return;
    };

    let encoded = proof.encode();
    assert_eq!(Proof::decode_cfg(encoded, &max_len).unwrap(), proof);

    // Verification of arbitrary proofs never panics
    let c = BigUint::from_bytes_be(&input.c);
    let n = BigUint::from_bytes_be(&input.n);
    let e = BigUint::from(input.e);
    let statement = Statement::ZkPomode {
        c: c.clone(),
        n: n.clone(),
        e: e.clone(),
        xmod: c.clone(),
    };
    let _ = proof.verify(pp, &statement);
    let statement = Statement::Pokde { c1: c.clone(), c2: n, e };
    let _ = proof.verify(pp, &statement);
    let statement = Statement::PokeStar { base: pp.g().clone(), d: c };
    let _ = proof.verify(pp, &statement);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
