// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// keys: raw private/public keys, WIF round-trip, SEC1 encoding, and
// P2PKH address derivation.
//
// Types:
//   PrivateKey — a scalar k with 1 <= k < n, plus testnet/compressed flags
//   PublicKey  — a curve point, plus testnet flag
// Functions:
//   PrivateKey::new() / generate() / to_wif() / from_wif()
//   PublicKey::generate_public_key() (via PrivateKey), to_sec1(), address(), hex()

use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base58;
use crate::error::{Error, Result};
use crate::field;
use crate::hash::hash160;
use crate::point::{Parity, Point};
use crate::util::{from_be_bytes, to_be_32};

const WIF_VERSION_MAINNET: u8 = 0x80;
const WIF_VERSION_TESTNET: u8 = 0xEF;
const ADDRESS_VERSION_MAINNET: u8 = 0x00;
const ADDRESS_VERSION_TESTNET: u8 = 0x6F;

/// A secp256k1 private key: a scalar `k` with `1 <= k < n`, plus the
/// network and SEC1-compression flags that only affect *encoding*, never
/// the arithmetic.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    k_bytes: [u8; 32],
    #[zeroize(skip)]
    pub testnet: bool,
    #[zeroize(skip)]
    pub compressed: bool,
}

impl PrivateKey {
    /// Construct a private key from an explicit scalar. Fails with
    /// `InvalidKey` unless `1 <= k < n`.
    pub fn new(k: BigUint, testnet: bool, compressed: bool) -> Result<Self> {
        let n = field::n();
        if k.is_zero() || k >= n {
            return Err(Error::InvalidKey);
        }
        Ok(PrivateKey {
            k_bytes: to_be_32(&k),
            testnet,
            compressed,
        })
    }

    /// Generate a new private key, sampling `k` uniformly from `[1, n)`
    /// using a cryptographic RNG.
    pub fn generate(testnet: bool, compressed: bool) -> Self {
        let n = field::n();
        let mut rng = rand::thread_rng();
        loop {
            let mut buf = [0u8; 32];
            rng.fill_bytes(&mut buf);
            let candidate = from_be_bytes(&buf);
            if !candidate.is_zero() && candidate < n {
                return PrivateKey {
                    k_bytes: buf,
                    testnet,
                    compressed,
                };
            }
        }
    }

    pub fn k(&self) -> BigUint {
        from_be_bytes(&self.k_bytes)
    }

    pub fn k_bytes(&self) -> [u8; 32] {
        self.k_bytes
    }

    pub fn generate_public_key(&self) -> PublicKey {
        let point = &Point::generator() * &self.k();
        PublicKey {
            point,
            testnet: self.testnet,
            compressed: self.compressed,
        }
    }

    /// Wallet Import Format: Base58Check of
    /// `version || k(32 bytes BE) || [0x01 if compressed]`.
    pub fn to_wif(&self) -> String {
        let version = if self.testnet {
            WIF_VERSION_TESTNET
        } else {
            WIF_VERSION_MAINNET
        };
        let mut payload = Vec::with_capacity(34);
        payload.push(version);
        payload.extend_from_slice(&self.k_bytes);
        if self.compressed {
            payload.push(0x01);
        }
        base58::encode(&payload)
    }

    /// Decode a WIF string back into a private key.
    pub fn from_wif(wif: &str) -> Result<Self> {
        let payload = base58::decode(wif)?;
        if payload.len() != 33 && payload.len() != 34 {
            return Err(Error::InvalidKey);
        }
        let version = payload[0];
        let testnet = match version {
            WIF_VERSION_MAINNET => false,
            WIF_VERSION_TESTNET => true,
            _ => return Err(Error::InvalidKey),
        };
        let compressed = match payload.len() {
            33 => false,
            34 if payload[33] == 0x01 => true,
            _ => return Err(Error::InvalidKey),
        };
        let k = from_be_bytes(&payload[1..33]);
        PrivateKey::new(k, testnet, compressed)
    }
}

/// A secp256k1 public key: a curve point plus the network flag used for
/// address derivation. SEC1 compression is a per-call encoding choice,
/// driven by `compressed` but not otherwise part of the key's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub point: Point,
    pub testnet: bool,
    pub compressed: bool,
}

impl PublicKey {
    pub fn new(point: Point, testnet: bool, compressed: bool) -> Self {
        PublicKey {
            point,
            testnet,
            compressed,
        }
    }

    /// SEC1 encoding: compressed (33 bytes, 0x02/0x03 prefix) or
    /// uncompressed (65 bytes, 0x04 prefix), per `self.compressed`.
    pub fn to_sec1(&self) -> Vec<u8> {
        if self.compressed {
            let prefix = match Parity::of(&self.point.y) {
                Parity::Even => 0x02,
                Parity::Odd => 0x03,
            };
            let mut out = Vec::with_capacity(33);
            out.push(prefix);
            out.extend_from_slice(&to_be_32(&self.point.x));
            out
        } else {
            let mut out = Vec::with_capacity(65);
            out.push(0x04);
            out.extend_from_slice(&to_be_32(&self.point.x));
            out.extend_from_slice(&to_be_32(&self.point.y));
            out
        }
    }

    /// Parse a SEC1-encoded point, recovering y from x when compressed.
    pub fn from_sec1(bytes: &[u8], testnet: bool) -> Result<Self> {
        match bytes.first() {
            Some(0x04) if bytes.len() == 65 => {
                let x = from_be_bytes(&bytes[1..33]);
                let y = from_be_bytes(&bytes[33..65]);
                Ok(PublicKey {
                    point: Point::new(x, y)?,
                    testnet,
                    compressed: false,
                })
            }
            Some(prefix @ (0x02 | 0x03)) if bytes.len() == 33 => {
                let x = from_be_bytes(&bytes[1..33]);
                let parity = if *prefix == 0x02 { Parity::Even } else { Parity::Odd };
                Ok(PublicKey {
                    point: Point::from_x(x, parity)?,
                    testnet,
                    compressed: true,
                })
            }
            _ => Err(Error::InvalidCoordinate),
        }
    }

    /// `hash160` of the SEC1 encoding, i.e. the address payload before
    /// Base58Check wrapping.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.to_sec1())
    }

    /// P2PKH address: Base58Check of `version || hash160(sec1)`.
    /// Mainnet addresses start with `'1'`, testnet with `'m'`/`'n'`.
    pub fn address(&self) -> String {
        let version = if self.testnet {
            ADDRESS_VERSION_TESTNET
        } else {
            ADDRESS_VERSION_MAINNET
        };
        let mut payload = Vec::with_capacity(21);
        payload.push(version);
        payload.extend_from_slice(&self.identifier());
        base58::encode(&payload)
    }

    pub fn hex(&self) -> String {
        hex::encode(self.to_sec1())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_scalar(seed: u64) -> BigUint {
        BigUint::from(seed) + BigUint::from(1u32)
    }

    #[test]
    fn generate_public_key_matches_scalar_mult() {
        let priv_key = PrivateKey::new(small_scalar(42), false, true).unwrap();
        let pub_key = priv_key.generate_public_key();
        assert_eq!(pub_key.point, &Point::generator() * &priv_key.k());
    }

    #[test]
    fn wif_round_trip() {
        for testnet in [false, true] {
            for compressed in [false, true] {
                let priv_key = PrivateKey::new(small_scalar(12345), testnet, compressed).unwrap();
                let wif = priv_key.to_wif();
                let decoded = PrivateKey::from_wif(&wif).unwrap();
                assert_eq!(decoded.k(), priv_key.k());
                assert_eq!(decoded.testnet, testnet);
                assert_eq!(decoded.compressed, compressed);
            }
        }
    }

    #[test]
    fn rejects_zero_and_out_of_range_key() {
        assert!(PrivateKey::new(BigUint::zero(), false, true).is_err());
        assert!(PrivateKey::new(field::n(), false, true).is_err());
    }

    #[test]
    fn sec1_compressed_is_33_bytes_with_02_or_03_prefix() {
        let priv_key = PrivateKey::new(small_scalar(7), false, true);
        let sec1 = priv_key.unwrap().generate_public_key().to_sec1();
        assert_eq!(sec1.len(), 33);
        assert!(sec1[0] == 0x02 || sec1[0] == 0x03);
    }

    #[test]
    fn sec1_uncompressed_is_65_bytes_with_04_prefix() {
        let priv_key = PrivateKey::new(small_scalar(7), false, false);
        let sec1 = priv_key.unwrap().generate_public_key().to_sec1();
        assert_eq!(sec1.len(), 65);
        assert_eq!(sec1[0], 0x04);
    }

    #[test]
    fn mainnet_and_testnet_address_prefixes() {
        let mainnet = PrivateKey::new(small_scalar(99), false, true)
            .unwrap()
            .generate_public_key()
            .address();
        let testnet = PrivateKey::new(small_scalar(99), true, true)
            .unwrap()
            .generate_public_key()
            .address();
        assert!(mainnet.starts_with('1'));
        assert!(testnet.starts_with('m') || testnet.starts_with('n'));
    }

    #[test]
    fn sec1_round_trips_through_from_sec1() {
        let priv_key = PrivateKey::new(small_scalar(555), false, true).unwrap();
        let pub_key = priv_key.generate_public_key();
        let sec1 = pub_key.to_sec1();
        let recovered = PublicKey::from_sec1(&sec1, false).unwrap();
        assert_eq!(recovered.point, pub_key.point);
    }

    proptest! {
        #[test]
        fn wif_round_trip_arbitrary_key(seed in 1u64..1_000_000, testnet: bool, compressed: bool) {
            let priv_key = PrivateKey::new(small_scalar(seed), testnet, compressed).unwrap();
            let wif = priv_key.to_wif();
            let decoded = PrivateKey::from_wif(&wif).unwrap();
            prop_assert_eq!(decoded.k(), priv_key.k());
            prop_assert_eq!(decoded.testnet, testnet);
            prop_assert_eq!(decoded.compressed, compressed);
        }
    }
}
