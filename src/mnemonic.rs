// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// mnemonic: BIP-39-style checksummed mnemonic generation and validation,
// and PBKDF2-based seed stretching.
//
// The 2048-word English wordlist itself comes from the `bip39` crate
// (`Language::English.word_list()`) — reusing the ecosystem's already
// audited table rather than hand-transcribing 2048 checksum-sensitive
// words. The generation/validation bit-packing algorithm is hand-written
// per the specification; `bip39::Mnemonic` is not used.
//
// Functions:
//   generate()  — size_bits -> whitespace-joined mnemonic phrase
//   validate()  — phrase -> Ok(()) or a typed error
//   to_seed()   — phrase + passphrase -> 64-byte PBKDF2 seed

use std::collections::HashMap;

use bip39::Language;
use num_bigint::BigUint;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::hash::{pbkdf2_hmac_sha512, sha256};

const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];
const VALID_ENTROPY_BITS: [usize; 5] = [128, 160, 192, 224, 256];

fn wordlist() -> &'static [&'static str; 2048] {
    Language::English.word_list()
}

fn reverse_wordlist() -> &'static HashMap<&'static str, u16> {
    use std::sync::OnceLock;
    static MAP: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();
    MAP.get_or_init(|| {
        wordlist()
            .iter()
            .enumerate()
            .map(|(i, &w)| (w, i as u16))
            .collect()
    })
}

/// Generate a new mnemonic encoding `size_bits` of fresh entropy plus its
/// checksum. `size_bits` must be one of 128/160/192/224/256.
pub fn generate(size_bits: usize) -> Result<String> {
    if !VALID_ENTROPY_BITS.contains(&size_bits) {
        return Err(Error::BadEntropySize(size_bits));
    }

    let entropy_bytes = size_bits / 8;
    let mut entropy = vec![0u8; entropy_bytes];
    rand::thread_rng().fill_bytes(&mut entropy);

    Ok(encode_entropy(&entropy, size_bits))
}

fn encode_entropy(entropy: &[u8], size_bits: usize) -> String {
    let checksum_length = size_bits / 32;
    let checksum = sha256(entropy);
    let checksum_bits = (checksum[0] >> (8 - checksum_length)) as u32;

    let mut sequence = BigUint::from_bytes_be(entropy) << checksum_length;
    sequence |= BigUint::from(checksum_bits);

    let total_bits = size_bits + checksum_length;
    let num_words = total_bits / 11;
    let words_table = wordlist();

    let mut words = Vec::with_capacity(num_words);
    let word_mask = BigUint::from(0x7FFu32);
    for _ in 0..num_words {
        let index = (&sequence & &word_mask).to_u32_digits().first().copied().unwrap_or(0);
        words.push(words_table[index as usize]);
        sequence >>= 11;
    }
    words.reverse();

    words.join(" ")
}

/// Validate a mnemonic phrase: word count, wordlist membership, and
/// checksum. Splits on single ASCII spaces, per the specification.
pub fn validate(mnemonic: &str) -> Result<()> {
    let words: Vec<&str> = mnemonic.split(' ').collect();
    if !VALID_WORD_COUNTS.contains(&words.len()) {
        return Err(Error::BadWordCount(words.len()));
    }

    let reverse = reverse_wordlist();
    let mut data = BigUint::from(0u32);
    for word in &words {
        let index = *reverse
            .get(word)
            .ok_or_else(|| Error::BadWord(word.to_string()))?;
        data = (data << 11) | BigUint::from(index);
    }

    let num_words = words.len();
    let checksum_length = num_words / 3;
    let entropy_bytes = num_words * 4 / 3;

    let entropy_int = &data >> checksum_length;
    let mut entropy = entropy_int.to_bytes_be();
    while entropy.len() < entropy_bytes {
        entropy.insert(0, 0);
    }

    let mask = (BigUint::from(1u32) << checksum_length) - BigUint::from(1u32);
    let input_checksum = (&data & &mask)
        .to_u32_digits()
        .first()
        .copied()
        .unwrap_or(0);

    let sequence_checksum = sha256(&entropy);
    let expected = (sequence_checksum[0] >> (8 - checksum_length)) as u32;

    if expected != input_checksum {
        return Err(Error::BadChecksum);
    }

    Ok(())
}

/// Stretch a mnemonic + optional passphrase into a 64-byte seed via
/// PBKDF2-HMAC-SHA-512, 2048 iterations, salt = `"mnemonic" || passphrase`.
pub fn to_seed(mnemonic: &str, passphrase: &str) -> [u8; 64] {
    let mut salt = Vec::with_capacity(8 + passphrase.len());
    salt.extend_from_slice(b"mnemonic");
    salt.extend_from_slice(passphrase.as_bytes());
    pbkdf2_hmac_sha512(mnemonic.as_bytes(), &salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_and_validate_every_size() {
        for &bits in &VALID_ENTROPY_BITS {
            let phrase = generate(bits).unwrap();
            let expected_words = (bits + bits / 32) / 11;
            assert_eq!(phrase.split(' ').count(), expected_words);
            validate(&phrase).unwrap();
        }
    }

    #[test]
    fn rejects_bad_entropy_size() {
        assert_eq!(generate(100), Err(Error::BadEntropySize(100)));
    }

    #[test]
    fn rejects_bad_word_count() {
        assert!(matches!(validate("abandon abandon"), Err(Error::BadWordCount(2))));
    }

    #[test]
    fn rejects_unknown_word() {
        let mut words = vec!["abandon"; 11];
        words.push("notarealbip39word");
        let phrase = words.join(" ");
        assert!(matches!(validate(&phrase), Err(Error::BadWord(_))));
    }

    #[test]
    fn bip39_test_vector_seed() {
        let phrase = "answer act aspect mansion report own orphan mixed leader gate siren there";
        validate(phrase).unwrap();
        let seed = to_seed(phrase, "");
        let expected = hex::decode(
            "e57852d0c87f26d2f1591b3c9ffc1a5b5aa5d18ca5666520956ba0c631fcea02c46bbef05b050b7247221cac293dea7004f36d0d731c8bc94161c6748fff0e49",
        )
        .unwrap();
        assert_eq!(seed.to_vec(), expected);
    }

    #[test]
    fn reference_test_mnemonic_seed_is_deterministic() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        validate(phrase).unwrap();
        let seed1 = to_seed(phrase, "");
        let seed2 = to_seed(phrase, "");
        assert_eq!(seed1, seed2);
    }

    #[test]
    fn flipping_a_word_breaks_checksum_with_high_probability() {
        // 256 bits of entropy -> an 8-bit checksum, so a wrong word has
        // only a 1/256 chance of landing on a still-valid checksum.
        let phrase = generate(256).unwrap();
        let mut words: Vec<&str> = phrase.split(' ').collect();
        let table = wordlist();
        let original_index = table.iter().position(|&w| w == words[0]).unwrap();
        let replacement = table[(original_index + 1) % table.len()];
        words[0] = replacement;
        let tampered = words.join(" ");
        assert!(validate(&tampered).is_err());
    }
}
