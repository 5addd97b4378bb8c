// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// wallet: the HD wallet and its path-indexed KeyStore.
//
// Types:
//   KeyStore — owns a master extended private key, derives along a path
//   HDWallet — owns a seed (and, if created via `new`, a mnemonic)
// Functions:
//   HDWallet::new()           — fresh mnemonic -> seed -> wallet
//   HDWallet::from_mnemonic() — existing mnemonic -> seed -> wallet
//   HDWallet::from_seed()     — raw seed -> wallet
//   KeyStore::get_key()       — "m/44'/0'/0'/0/0" -> ExtendedPrivateKey

use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::extended::{is_hardened, ExtendedPrivateKey, HARDENED_OFFSET};
use crate::mnemonic;

/// Owns a master extended private key and derives children along a
/// `m/.../...` path. Derivation never mutates or caches: every call to
/// `get_key` walks the path from the master key again. (The reference
/// implementation this crate descends from keeps a `_keys` cache that is
/// declared but never populated by any derivation call — this crate
/// follows that precedent rather than guessing at an intended caching
/// policy. See DESIGN.md.)
pub struct KeyStore {
    master: ExtendedPrivateKey,
}

impl KeyStore {
    pub fn new(master: ExtendedPrivateKey) -> Self {
        KeyStore { master }
    }

    /// Resolve a derivation path such as `m/44'/0'/0'/0/0` into the
    /// extended private key at that position.
    ///
    /// Each non-`m` token is a decimal index, optionally suffixed with
    /// `'` for a hardened child. A `UseNextIndex` from any step along the
    /// way propagates as a hard error — this crate doesn't auto-retry at
    /// the wallet level; callers that want BIP-32's "try i+1" behavior
    /// re-derive with an adjusted path themselves.
    pub fn get_key(&self, path: &str) -> Result<ExtendedPrivateKey> {
        let mut tokens = path.split('/');
        match tokens.next() {
            Some("m") => {}
            _ => return Err(Error::BadPath(path.to_string())),
        }

        let mut current = self.master.clone();
        for token in tokens {
            let index = parse_index(token)?;
            current = current.derive_child(index)?;
        }
        Ok(current)
    }
}

fn parse_index(token: &str) -> Result<u32> {
    if token.is_empty() {
        return Err(Error::BadPath(token.to_string()));
    }
    let (digits, hardened) = match token.strip_suffix('\'') {
        Some(d) => (d, true),
        None => (token, false),
    };
    let base: u32 = digits
        .parse()
        .map_err(|_| Error::BadPath(token.to_string()))?;
    if is_hardened(base) {
        return Err(Error::BadPath(token.to_string()));
    }
    Ok(if hardened { base + HARDENED_OFFSET } else { base })
}

/// Owns the wallet's seed for its whole lifetime; derived children are
/// independent values that hold no reference back to the wallet.
pub struct HDWallet {
    seed: Vec<u8>,
    mnemonic: Option<String>,
    key_store: KeyStore,
}

impl Drop for HDWallet {
    fn drop(&mut self) {
        self.seed.zeroize();
        if let Some(m) = &mut self.mnemonic {
            m.zeroize();
        }
    }
}

impl HDWallet {
    /// Generate a fresh mnemonic of `size_bits` entropy, derive its seed,
    /// and build the wallet's master key from it.
    pub fn new(size_bits: usize, passphrase: &str, testnet: bool) -> Result<Self> {
        let phrase = mnemonic::generate(size_bits)?;
        Self::from_mnemonic(&phrase, passphrase, testnet)
    }

    /// Validate an existing mnemonic and build a wallet from it.
    pub fn from_mnemonic(phrase: &str, passphrase: &str, testnet: bool) -> Result<Self> {
        mnemonic::validate(phrase)?;
        let seed = mnemonic::to_seed(phrase, passphrase);
        let master = ExtendedPrivateKey::master(&seed, testnet)?;
        Ok(HDWallet {
            seed: seed.to_vec(),
            mnemonic: Some(phrase.to_string()),
            key_store: KeyStore::new(master),
        })
    }

    /// Build a wallet directly from a raw seed, bypassing the mnemonic
    /// layer entirely (e.g. the BIP-32 test vectors, which specify seeds
    /// with no corresponding mnemonic).
    pub fn from_seed(seed: &[u8], testnet: bool) -> Result<Self> {
        let master = ExtendedPrivateKey::master(seed, testnet)?;
        Ok(HDWallet {
            seed: seed.to_vec(),
            mnemonic: None,
            key_store: KeyStore::new(master),
        })
    }

    pub fn mnemonic(&self) -> Option<&str> {
        self.mnemonic.as_deref()
    }

    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    pub fn get_key(&self, path: &str) -> Result<ExtendedPrivateKey> {
        self.key_store.get_key(path)
    }
}
