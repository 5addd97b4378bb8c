// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// extended: BIP-32 extended private/public keys — 78-byte serialized
// form, and normal/hardened child-key derivation (CKDpriv, CKDpub).
//
// Types:
//   ExtendedPrivateKey, ExtendedPublicKey
// Functions:
//   ExtendedPrivateKey::master()         — from a BIP-32 seed
//   ExtendedPrivateKey::derive_child()    — CKDpriv, normal or hardened
//   ExtendedPublicKey::derive_child()     — CKDpub, normal only
//   to_base58() / from_base58()           — 78-byte serialized form

use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroize;

use crate::base58;
use crate::error::{Error, Result};
use crate::field;
use crate::hash::hash160;
use crate::keys::{PrivateKey, PublicKey};
use crate::point::Point;
use crate::util::{from_be_bytes, to_be_32};

pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const XPRV_MAINNET: u32 = 0x0488ADE4;
const XPRV_TESTNET: u32 = 0x04358394;
const XPUB_MAINNET: u32 = 0x0488B21E;
const XPUB_TESTNET: u32 = 0x043587CF;

/// An extended private key: a private key plus the chain code and
/// positional metadata BIP-32 needs to derive children.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    pub private_key: PrivateKey,
    pub chain_code: [u8; 32],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub index: u32,
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.chain_code.zeroize();
    }
}

/// An extended public key — the same positional metadata, but only the
/// public point, so it can only derive non-hardened children.
#[derive(Clone)]
pub struct ExtendedPublicKey {
    pub public_key: PublicKey,
    pub chain_code: [u8; 32],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub index: u32,
}

fn split_hmac_output(i: [u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut i_l = [0u8; 32];
    let mut i_r = [0u8; 32];
    i_l.copy_from_slice(&i[..32]);
    i_r.copy_from_slice(&i[32..]);
    (i_l, i_r)
}

fn fingerprint_of(public_key: &PublicKey) -> [u8; 4] {
    let id = hash160(&public_key.to_sec1());
    [id[0], id[1], id[2], id[3]]
}

impl ExtendedPrivateKey {
    /// Derive the master extended private key from a BIP-32 seed:
    /// `I = HMAC-SHA-512(key = "Bitcoin seed", msg = seed)`, with
    /// `k = I[0:32]`, `chain_code = I[32:64]`. Rejects a seed whose
    /// derived `k` is zero or `>= n` (the reference implementation
    /// doesn't guard this; this crate does, per the specification).
    pub fn master(seed: &[u8], testnet: bool) -> Result<Self> {
        let i = crate::hash::hmac_sha512(b"Bitcoin seed", seed);
        let (i_l, i_r) = split_hmac_output(i);
        let k = from_be_bytes(&i_l);
        let private_key = PrivateKey::new(k, testnet, true)?;
        Ok(ExtendedPrivateKey {
            private_key,
            chain_code: i_r,
            depth: 0,
            parent_fingerprint: [0; 4],
            index: 0,
        })
    }

    pub fn generate_public_key(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            public_key: self.private_key.generate_public_key(),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            index: self.index,
        }
    }

    /// CKDpriv: derive child `index` (normal if `< 2^31`, hardened if
    /// `>= 2^31`). Fails with `UseNextIndex` in the rare case the
    /// derived scalar is out of range or zero — BIP-32 recommends the
    /// caller retry with `index + 1`, but this crate doesn't do that
    /// automatically (see DESIGN.md).
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        let public_key = self.private_key.generate_public_key();
        let parent_fingerprint = fingerprint_of(&public_key);

        let mut data = Vec::with_capacity(37);
        if index >= HARDENED_OFFSET {
            data.push(0x00);
            data.extend_from_slice(&self.private_key.k_bytes());
        } else {
            data.extend_from_slice(&public_key.to_sec1());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let i = crate::hash::hmac_sha512(&self.chain_code, &data);
        let (i_l, i_r) = split_hmac_output(i);

        let n = field::n();
        let i_l_int = from_be_bytes(&i_l);
        if i_l_int >= n {
            return Err(Error::UseNextIndex);
        }

        let child_k = (i_l_int + self.private_key.k()) % &n;
        if child_k.is_zero() {
            return Err(Error::UseNextIndex);
        }

        let child_private_key = PrivateKey::new(child_k, self.private_key.testnet, true)?;

        Ok(ExtendedPrivateKey {
            private_key: child_private_key,
            chain_code: i_r,
            depth: self.depth.wrapping_add(1),
            parent_fingerprint,
            index,
        })
    }

    /// Serialize the 78-byte extended-key layout, then Base58Check it.
    pub fn to_base58(&self) -> String {
        let version = if self.private_key.testnet {
            XPRV_TESTNET
        } else {
            XPRV_MAINNET
        };
        let mut payload = Vec::with_capacity(78);
        payload.extend_from_slice(&version.to_be_bytes());
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.index.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.push(0x00);
        payload.extend_from_slice(&self.private_key.k_bytes());
        base58::encode(&payload)
    }

    pub fn from_base58(s: &str) -> Result<Self> {
        let payload = base58::decode(s)?;
        if payload.len() != 78 {
            return Err(Error::BadExtendedKey(format!(
                "expected 78-byte payload, got {}",
                payload.len()
            )));
        }
        let version = u32::from_be_bytes(payload[0..4].try_into().unwrap());
        let testnet = match version {
            XPRV_MAINNET => false,
            XPRV_TESTNET => true,
            _ => return Err(Error::BadExtendedKey("not an xprv version".into())),
        };
        if payload[45] != 0x00 {
            return Err(Error::BadExtendedKey("private key data must start with 0x00".into()));
        }
        let depth = payload[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&payload[5..9]);
        let index = u32::from_be_bytes(payload[9..13].try_into().unwrap());
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[13..45]);
        let k = from_be_bytes(&payload[46..78]);
        let private_key = PrivateKey::new(k, testnet, true)?;

        Ok(ExtendedPrivateKey {
            private_key,
            chain_code,
            depth,
            parent_fingerprint,
            index,
        })
    }
}

impl ExtendedPublicKey {
    /// CKDpub: derive a non-hardened child. Hardened indices fail with
    /// `HardenedFromPublic` — deriving them requires the private key.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::HardenedFromPublic);
        }

        let parent_fingerprint = fingerprint_of(&self.public_key);

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.public_key.to_sec1());
        data.extend_from_slice(&index.to_be_bytes());

        let i = crate::hash::hmac_sha512(&self.chain_code, &data);
        let (i_l, i_r) = split_hmac_output(i);

        let n = field::n();
        let i_l_int = from_be_bytes(&i_l);
        if i_l_int >= n {
            return Err(Error::UseNextIndex);
        }

        let child_point = &(&Point::generator() * &i_l_int) + &self.public_key.point;
        if child_point.is_identity() {
            return Err(Error::UseNextIndex);
        }

        let child_public_key = PublicKey::new(child_point, self.public_key.testnet, true);

        Ok(ExtendedPublicKey {
            public_key: child_public_key,
            chain_code: i_r,
            depth: self.depth.wrapping_add(1),
            parent_fingerprint,
            index,
        })
    }

    pub fn to_base58(&self) -> String {
        let version = if self.public_key.testnet {
            XPUB_TESTNET
        } else {
            XPUB_MAINNET
        };
        let mut payload = Vec::with_capacity(78);
        payload.extend_from_slice(&version.to_be_bytes());
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.index.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(&self.public_key.to_sec1());
        base58::encode(&payload)
    }

    pub fn from_base58(s: &str) -> Result<Self> {
        let payload = base58::decode(s)?;
        if payload.len() != 78 {
            return Err(Error::BadExtendedKey(format!(
                "expected 78-byte payload, got {}",
                payload.len()
            )));
        }
        let version = u32::from_be_bytes(payload[0..4].try_into().unwrap());
        let testnet = match version {
            XPUB_MAINNET => false,
            XPUB_TESTNET => true,
            _ => return Err(Error::BadExtendedKey("not an xpub version".into())),
        };
        let depth = payload[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&payload[5..9]);
        let index = u32::from_be_bytes(payload[9..13].try_into().unwrap());
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[13..45]);
        let public_key = PublicKey::from_sec1(&payload[45..78], testnet)?;

        Ok(ExtendedPublicKey {
            public_key,
            chain_code,
            depth,
            parent_fingerprint,
            index,
        })
    }
}

/// `index` is hardened iff it's `>= 2^31`.
pub fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bip32_test_vector_1_seed() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn master_key_from_bip32_test_vector_1() {
        let seed = bip32_test_vector_1_seed();
        let master = ExtendedPrivateKey::master(&seed, false).unwrap();
        assert_eq!(
            master.to_base58(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPor6Ua6SLkrtNKP3cNbfkCVCcyxk7wjkD5HDhovJc7nQ9FfnDA3BRAJv"
        );
    }

    #[test]
    fn hardened_derivation_bip32_test_vector_1() {
        let seed = bip32_test_vector_1_seed();
        let master = ExtendedPrivateKey::master(&seed, false).unwrap();
        let child = master.derive_child(HARDENED_OFFSET).unwrap();
        assert_eq!(
            child.to_base58(),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
    }

    #[test]
    fn neutered_public_key_matches_derive_child_from_private() {
        let seed = bip32_test_vector_1_seed();
        let master = ExtendedPrivateKey::master(&seed, false).unwrap();
        let child_priv = master.derive_child(0).unwrap();
        let child_pub_via_priv = child_priv.generate_public_key();
        let child_pub_via_pub = master.generate_public_key().derive_child(0).unwrap();
        assert_eq!(child_pub_via_priv.public_key, child_pub_via_pub.public_key);
        assert_eq!(child_pub_via_priv.chain_code, child_pub_via_pub.chain_code);
    }

    #[test]
    fn hardened_derivation_from_public_key_fails() {
        let seed = bip32_test_vector_1_seed();
        let master_pub = ExtendedPrivateKey::master(&seed, false).unwrap().generate_public_key();
        assert_eq!(
            master_pub.derive_child(HARDENED_OFFSET),
            Err(Error::HardenedFromPublic)
        );
    }

    #[test]
    fn base58_round_trip() {
        let seed = bip32_test_vector_1_seed();
        let master = ExtendedPrivateKey::master(&seed, false).unwrap();
        let encoded = master.to_base58();
        let decoded = ExtendedPrivateKey::from_base58(&encoded).unwrap();
        assert_eq!(decoded.private_key.k(), master.private_key.k());
        assert_eq!(decoded.chain_code, master.chain_code);
    }
}
