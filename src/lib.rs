// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// wallet-core: secp256k1 field/point arithmetic, key encoding, BIP-32
// derivation, mnemonic generation, and a legacy transaction codec, with
// zero UI dependencies.
//
// Modules:
//   error       — the typed error taxonomy every other module returns
//   field       — modular inverse and Tonelli-Shanks square roots over P
//   point       — secp256k1 curve points and their group law
//   hash        — SHA-256, RIPEMD-160, HMAC-SHA-512, PBKDF2-HMAC-SHA-512
//   base58      — Base58 and Base58Check
//   util        — fixed-width big-endian byte <-> integer conversions
//   keys        — PrivateKey/PublicKey, WIF, SEC1, P2PKH addresses
//   extended    — BIP-32 extended keys and child derivation
//   mnemonic    — BIP-39-style mnemonic generation, validation, seeding
//   wallet      — HDWallet and its path-indexed KeyStore
//   script      — the OpCodes table and script token (en/de)coder
//   transaction — the custom varint and Vin/Vout/Transaction codec

pub mod base58;
pub mod error;
pub mod extended;
pub mod field;
pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod point;
pub mod script;
pub mod transaction;
pub mod util;
pub mod wallet;

pub use error::{Error, Result};
