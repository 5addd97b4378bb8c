// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// error: the typed error taxonomy shared by every module in this crate.
//
// Types:
//   Error — one enum covering every named failure in the external
//           interface (field/point construction, key decoding, HD
//           derivation rarities, mnemonic validation, script parsing).

use thiserror::Error;

/// Every checked failure this crate can report.
///
/// Variants map 1:1 onto the error taxonomy named in the specification's
/// external-interface section. `UseNextIndex` is not really an error in
/// the usual sense — it's a structured "try the next index" signal from
/// BIP-32 child derivation — but it still needs to be distinguishable
/// from every other outcome, so it lives here too.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("coordinate out of range: both x and y must be < P")]
    InvalidCoordinate,

    #[error("point is not on the curve")]
    NotOnCurve,

    #[error("{0} is not a quadratic residue mod p")]
    NotAQuadraticResidue(String),

    #[error("invalid private key: k must satisfy 1 <= k < n")]
    InvalidKey,

    #[error("base58 string contains a character outside the alphabet")]
    BadAlphabet,

    #[error("base58check checksum mismatch")]
    BadCheck,

    #[error("mnemonic must have 12, 15, 18, 21, or 24 words, got {0}")]
    BadWordCount(usize),

    #[error("mnemonic contains a word not in the wordlist: {0}")]
    BadWord(String),

    #[error("mnemonic checksum does not match its entropy")]
    BadChecksum,

    #[error("entropy size must be 128, 160, 192, 224, or 256 bits, got {0}")]
    BadEntropySize(usize),

    #[error("this child index is invalid, caller should retry with index + 1")]
    UseNextIndex,

    #[error("hardened child derivation requires a private key, not a public key")]
    HardenedFromPublic,

    #[error("malformed derivation path: {0}")]
    BadPath(String),

    #[error("unrecognized script token: {0}")]
    BadScriptToken(String),

    #[error("malformed extended key encoding: {0}")]
    BadExtendedKey(String),

    #[error("malformed transaction encoding: {0}")]
    BadTransaction(String),
}

pub type Result<T> = std::result::Result<T, Error>;
