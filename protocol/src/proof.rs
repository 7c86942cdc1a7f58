//! Uniform handling of every proof protocol.
//!
//! [Proof] wraps the proof of any protocol behind a one-byte tag, giving a single
//! self-describing wire format, and [Statement] carries the matching public inputs so that any
//! proof can be checked through [Proof::verify].

use crate::{
    base::{poe, poke_star, zk_poke},
    composed::{pokde, zk_pokde, zk_poke_mod, zk_pomode, zk_pomode_fast},
    PublicParameters,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, FixedSize, Read, ReadExt, Write};
use num_bigint::BigUint;
use tracing::debug;

/// Protocol identifier, used as the wire tag of a [Proof].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    Poe = 0,
    PokeStar = 1,
    ZkPoke = 2,
    Pokde = 3,
    ZkPokde = 4,
    ZkPokeMod = 5,
    ZkPomode = 6,
    ZkPomodeFast = 7,
}

impl TryFrom<u8> for Kind {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Ok(match tag {
            0 => Self::Poe,
            1 => Self::PokeStar,
            2 => Self::ZkPoke,
            3 => Self::Pokde,
            4 => Self::ZkPokde,
            5 => Self::ZkPokeMod,
            6 => Self::ZkPomode,
            7 => Self::ZkPomodeFast,
            _ => return Err(CodecError::InvalidEnum(tag)),
        })
    }
}

/// Public inputs of a proof, one variant per protocol.
///
/// The modulus `N` and generator `G` always come from the [PublicParameters] passed to
/// [Proof::verify].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// `k = c^f mod N`.
    Poe { c: BigUint, k: BigUint, f: BigUint },
    /// Knowledge of the discrete logarithm of `d` to `base`.
    PokeStar { base: BigUint, d: BigUint },
    /// Knowledge of the discrete logarithm of `c` to `base`, in zero-knowledge.
    ZkPoke { base: BigUint, c: BigUint },
    /// Knowledge of `x` with `c1 = G^x` and `c2 = G^(x^e)`.
    Pokde { c1: BigUint, c2: BigUint, e: BigUint },
    /// Knowledge of `x` with `c1 = G^x` and `c2 = G^(x^e)`, in zero-knowledge.
    ZkPokde { c1: BigUint, c2: BigUint, e: BigUint },
    /// Knowledge of `x` with `c = G^x` and `x mod n = xmod`.
    ZkPokeMod { c: BigUint, n: BigUint, xmod: BigUint },
    /// Knowledge of `x` with `c = G^x` and `x^e mod n = xmod`.
    ZkPomode {
        c: BigUint,
        n: BigUint,
        e: BigUint,
        xmod: BigUint,
    },
    /// Knowledge of `x` with `c1 = G^x`, `c2 = G^(x^e)` and `x^e mod n = xmod`.
    ZkPomodeFast {
        c1: BigUint,
        c2: BigUint,
        n: BigUint,
        e: BigUint,
        xmod: BigUint,
    },
}

impl Statement {
    /// Protocol this statement belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Poe { .. } => Kind::Poe,
            Self::PokeStar { .. } => Kind::PokeStar,
            Self::ZkPoke { .. } => Kind::ZkPoke,
            Self::Pokde { .. } => Kind::Pokde,
            Self::ZkPokde { .. } => Kind::ZkPokde,
            Self::ZkPokeMod { .. } => Kind::ZkPokeMod,
            Self::ZkPomode { .. } => Kind::ZkPomode,
            Self::ZkPomodeFast { .. } => Kind::ZkPomodeFast,
        }
    }
}

/// A proof of any protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Proof {
    Poe(poe::Proof),
    PokeStar(poke_star::Proof),
    ZkPoke(zk_poke::Proof),
    Pokde(pokde::Proof),
    ZkPokde(zk_pokde::Proof),
    ZkPokeMod(zk_poke_mod::Proof),
    ZkPomode(zk_pomode::Proof),
    ZkPomodeFast(zk_pomode_fast::Proof),
}

impl Proof {
    /// Protocol this proof belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Poe(_) => Kind::Poe,
            Self::PokeStar(_) => Kind::PokeStar,
            Self::ZkPoke(_) => Kind::ZkPoke,
            Self::Pokde(_) => Kind::Pokde,
            Self::ZkPokde(_) => Kind::ZkPokde,
            Self::ZkPokeMod(_) => Kind::ZkPokeMod,
            Self::ZkPomode(_) => Kind::ZkPomode,
            Self::ZkPomodeFast(_) => Kind::ZkPomodeFast,
        }
    }

    /// Verify the proof against `statement`.
    ///
    /// Returns `false` if the statement belongs to a different protocol.
    pub fn verify(&self, pp: &PublicParameters, statement: &Statement) -> bool {
        match (self, statement) {
            (Self::Poe(proof), Statement::Poe { c, k, f }) => poe::verify(c, pp.n(), k, f, proof),
            (Self::PokeStar(proof), Statement::PokeStar { base, d }) => {
                poke_star::verify(pp, base, d, proof)
            }
            (Self::ZkPoke(proof), Statement::ZkPoke { base, c }) => {
                zk_poke::verify(pp, base, c, proof)
            }
            (Self::Pokde(proof), Statement::Pokde { c1, c2, e }) => {
                pokde::verify(pp, c1, c2, e, proof)
            }
            (Self::ZkPokde(proof), Statement::ZkPokde { c1, c2, e }) => {
                zk_pokde::verify(pp, c1, c2, e, proof)
            }
            (Self::ZkPokeMod(proof), Statement::ZkPokeMod { c, n, xmod }) => {
                zk_poke_mod::verify(pp, c, n, xmod, proof)
            }
            (Self::ZkPomode(proof), Statement::ZkPomode { c, n, e, xmod }) => {
                zk_pomode::verify(pp, c, n, e, xmod, proof)
            }
            (
                Self::ZkPomodeFast(proof),
                Statement::ZkPomodeFast {
                    c1,
                    c2,
                    n,
                    e,
                    xmod,
                },
            ) => zk_pomode_fast::verify(pp, c1, c2, n, e, xmod, proof),
            _ => {
                debug!(
                    proof = ?self.kind(),
                    statement = ?statement.kind(),
                    "proof and statement kinds differ"
                );
                false
            }
        }
    }
}

impl Write for Proof {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.kind() as u8);
        match self {
            Self::Poe(proof) => proof.write(buf),
            Self::PokeStar(proof) => proof.write(buf),
            Self::ZkPoke(proof) => proof.write(buf),
            Self::Pokde(proof) => proof.write(buf),
            Self::ZkPokde(proof) => proof.write(buf),
            Self::ZkPokeMod(proof) => proof.write(buf),
            Self::ZkPomode(proof) => proof.write(buf),
            Self::ZkPomodeFast(proof) => proof.write(buf),
        }
    }
}

impl Read for Proof {
    type Cfg = usize;

    fn read_cfg(buf: &mut impl Buf, max_len: &usize) -> Result<Self, CodecError> {
        let kind = Kind::try_from(u8::read(buf)?)?;
        Ok(match kind {
            Kind::Poe => Self::Poe(poe::Proof::read_cfg(buf, max_len)?),
            Kind::PokeStar => Self::PokeStar(poke_star::Proof::read_cfg(buf, max_len)?),
            Kind::ZkPoke => Self::ZkPoke(zk_poke::Proof::read_cfg(buf, max_len)?),
            Kind::Pokde => Self::Pokde(pokde::Proof::read_cfg(buf, max_len)?),
            Kind::ZkPokde => Self::ZkPokde(zk_pokde::Proof::read_cfg(buf, max_len)?),
            Kind::ZkPokeMod => Self::ZkPokeMod(zk_poke_mod::Proof::read_cfg(buf, max_len)?),
            Kind::ZkPomode => Self::ZkPomode(zk_pomode::Proof::read_cfg(buf, max_len)?),
            Kind::ZkPomodeFast => {
                Self::ZkPomodeFast(zk_pomode_fast::Proof::read_cfg(buf, max_len)?)
            }
        })
    }
}

impl EncodeSize for Proof {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Poe(proof) => proof.encode_size(),
                Self::PokeStar(proof) => proof.encode_size(),
                Self::ZkPoke(proof) => proof.encode_size(),
                Self::Pokde(proof) => proof.encode_size(),
                Self::ZkPokde(proof) => proof.encode_size(),
                Self::ZkPokeMod(proof) => proof.encode_size(),
                Self::ZkPomode(proof) => proof.encode_size(),
                Self::ZkPomodeFast(proof) => proof.encode_size(),
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::DEFAULT_MAX_INT_BYTES, exp::pow, mocks};
    use commonware_codec::{Decode, Encode};

    #[test]
    fn test_kind_tags() {
        for tag in 0..8u8 {
            assert_eq!(Kind::try_from(tag).unwrap() as u8, tag);
        }
        assert!(matches!(Kind::try_from(8), Err(CodecError::InvalidEnum(8))));
    }

    #[test]
    fn test_dispatch() {
        let mut rng = mocks::rng(0);
        let pp = mocks::public_parameters();
        let x = BigUint::from(666u32);
        let c = pp.commit(&x);

        let proof = Proof::PokeStar(poke_star::prove(&pp, pp.g(), &c, &x).unwrap());
        let statement = Statement::PokeStar {
            base: pp.g().clone(),
            d: c.clone(),
        };
        assert!(proof.verify(&pp, &statement));

        let proof = Proof::ZkPoke(zk_poke::prove(&mut rng, &pp, pp.g(), &x, &c).unwrap());
        let statement = Statement::ZkPoke {
            base: pp.g().clone(),
            c: c.clone(),
        };
        assert!(proof.verify(&pp, &statement));

        let (n, xmod) = (BigUint::from(10u32), BigUint::from(6u32));
        let proof =
            Proof::ZkPokeMod(zk_poke_mod::prove(&mut rng, &pp, &c, &x, &n, &xmod).unwrap());
        let statement = Statement::ZkPokeMod { c, n, xmod };
        assert!(proof.verify(&pp, &statement));
    }

    #[test]
    fn test_kind_mismatch() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
        let pp = mocks::public_parameters();
        let f = BigUint::from(666u32);
        let k = pp.commit(&f);
        let proof = Proof::Poe(poe::prove(pp.g(), pp.n(), &k, &f).unwrap());
        assert!(proof.verify(
            &pp,
            &Statement::Poe {
                c: pp.g().clone(),
                k: k.clone(),
                f: f.clone(),
            }
        ));
        assert!(!proof.verify(
            &pp,
            &Statement::PokeStar {
                base: pp.g().clone(),
                d: k,
            }
        ));
    }

    #[test]
    fn test_codec() {
        let mut rng = mocks::rng(1);
        let pp = mocks::public_parameters();
        let (x, e) = (BigUint::from(6u32), BigUint::from(7u32));
        let (n, xmod) = (BigUint::from(10u32), BigUint::from(6u32));
        let c1 = pp.commit(&x);
        let c2 = pp.commit(&pow(&x, &e).unwrap());

        let proofs = vec![
            Proof::Pokde(pokde::prove(&pp, &c1, &c2, &x, &e).unwrap()),
            Proof::ZkPomodeFast(
                zk_pomode_fast::prove(&mut rng, &pp, &c1, &c2, &n, &e, &xmod, &x).unwrap(),
            ),
        ];
        let statements = [
            Statement::Pokde {
                c1: c1.clone(),
                c2: c2.clone(),
                e: e.clone(),
            },
            Statement::ZkPomodeFast {
                c1,
                c2,
                n,
                e,
                xmod,
            },
        ];
        for (proof, statement) in proofs.into_iter().zip(statements.iter()) {
            let encoded = proof.encode();
            assert_eq!(encoded[0], proof.kind() as u8);
            assert_eq!(encoded.len(), proof.encode_size());
            let decoded = Proof::decode_cfg(encoded, &DEFAULT_MAX_INT_BYTES).unwrap();
            assert_eq!(decoded, proof);
            assert!(decoded.verify(&pp, statement));
        }
    }

    #[test]
    fn test_decode_invalid_tag() {
        let buf: &[u8] = &[42, 0];
        assert!(matches!(
            Proof::decode_cfg(buf, &DEFAULT_MAX_INT_BYTES),
            Err(CodecError::InvalidEnum(42))
        ));
    }
}
