// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// hash: hashing and key-stretching primitives.
//
// Functions:
//   sha256() / dsha256()   — SHA-256, double SHA-256
//   ripemd160() / hash160() — RIPEMD-160, hash160 = RIPEMD160(SHA256(x))
//   hmac_sha512()          — HMAC-SHA-512, used for BIP-32 derivation
//   pbkdf2_hmac_sha512()   — PBKDF2-HMAC-SHA-512, 2048 iterations, used
//                            only for mnemonic -> seed stretching

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn dsha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// HMAC-SHA-512, used both for the master-key derivation
/// (`key = "Bitcoin seed"`) and for BIP-32 child-key derivation
/// (`key = parent chain code`).
pub fn hmac_sha512(key: &[u8], msg: &[u8]) -> [u8; 64] {
    let mut mac = Hmac::<sha2::Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(msg);
    mac.finalize().into_bytes().into()
}

/// PBKDF2-HMAC-SHA-512, 2048 iterations, 64-byte output. The one place
/// in this crate that stretches a mnemonic into a seed.
pub fn pbkdf2_hmac_sha512(password: &[u8], salt: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    pbkdf2::pbkdf2_hmac::<sha2::Sha512>(password, salt, 2048, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsha256_is_sha256_twice() {
        let data = b"hello";
        assert_eq!(dsha256(data), sha256(&sha256(data)));
    }

    #[test]
    fn hash160_matches_ripemd_of_sha256() {
        let data = b"hello";
        assert_eq!(hash160(data), ripemd160(&sha256(data)));
    }

    #[test]
    fn pbkdf2_seed_is_64_bytes_and_deterministic() {
        let a = pbkdf2_hmac_sha512(b"mnemonic phrase", b"mnemonic");
        let b = pbkdf2_hmac_sha512(b"mnemonic phrase", b"mnemonic");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
