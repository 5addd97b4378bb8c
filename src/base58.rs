// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// base58: Base58Check encoding, hand-written per the specification —
// one of the three hard subsystems this crate does not delegate to a
// crate for.
//
// Functions:
//   encode() — payload -> Base58Check string
//   decode() — Base58Check string -> payload, verifying the checksum

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::hash::dsha256;

const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn digit_value(c: u8) -> Option<u8> {
    ALPHABET.iter().position(|&a| a == c).map(|i| i as u8)
}

/// Encode `payload` as Base58Check: `payload || dsha256(payload)[0:4]`,
/// base-58 digits, with one leading `'1'` per leading zero byte of the
/// checksummed data.
pub fn encode(payload: &[u8]) -> String {
    let checksum = dsha256(payload);
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum[..4]);

    let leading_zeros = data.iter().take_while(|&&b| b == 0).count();

    let mut n = BigUint::from_bytes_be(&data);
    let mut digits = Vec::new();
    let fifty_eight = BigUint::from(58u32);
    while !n.is_zero() {
        let rem = (&n % &fifty_eight).to_u32_digits().first().copied().unwrap_or(0);
        digits.push(ALPHABET[rem as usize]);
        n /= &fifty_eight;
    }

    let mut out = vec![b'1'; leading_zeros];
    out.extend(digits.iter().rev());

    String::from_utf8(out).expect("alphabet is ASCII")
}

/// Decode a Base58Check string, verifying its trailing 4-byte checksum.
pub fn decode(s: &str) -> Result<Vec<u8>> {
    let bytes = s.as_bytes();
    if !bytes.iter().all(|&b| digit_value(b).is_some()) {
        return Err(Error::BadAlphabet);
    }

    let leading_ones = bytes.iter().take_while(|&&b| b == b'1').count();

    let mut n = BigUint::zero();
    let fifty_eight = BigUint::from(58u32);
    for &b in bytes {
        let v = digit_value(b).ok_or(Error::BadAlphabet)?;
        n = n * &fifty_eight + BigUint::from(v);
    }

    let mut body = n.to_bytes_be();
    if body == [0] && n.is_zero() {
        body.clear();
    }

    let mut data = vec![0u8; leading_ones];
    data.extend_from_slice(&body);

    if data.len() < 4 {
        return Err(Error::BadCheck);
    }
    let checksum_start = data.len() - 4;
    let (payload, checksum) = data.split_at(checksum_start);
    let expected = dsha256(payload);
    if &expected[..4] != checksum {
        return Err(Error::BadCheck);
    }

    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trip_simple() {
        let payload = b"hello bitcoin";
        let encoded = encode(payload);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn round_trip_with_leading_zeros() {
        for zeros in 0..100 {
            let mut payload = vec![0u8; zeros];
            payload.extend_from_slice(b"payload body");
            let encoded = encode(&payload);
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded, payload, "failed with {zeros} leading zero bytes");
        }
    }

    #[test]
    fn rejects_bad_alphabet() {
        for s in ["0OlI", "invalid0", "OOOO", "llll", "IIII"] {
            assert_eq!(decode(s), Err(Error::BadAlphabet));
        }
    }

    #[test]
    fn rejects_bad_checksum() {
        let encoded = encode(b"payload");
        let mut corrupted = encoded.clone();
        // Flip the last character to something else in the alphabet.
        let last = corrupted.pop().unwrap();
        let replacement = if last == '2' { '3' } else { '2' };
        corrupted.push(replacement);
        assert_eq!(decode(&corrupted), Err(Error::BadCheck));
    }

    proptest! {
        #[test]
        fn round_trip_arbitrary_payload(payload in proptest::collection::vec(any::<u8>(), 0..128)) {
            let encoded = encode(&payload);
            let decoded = decode(&encoded).unwrap();
            prop_assert_eq!(decoded, payload);
        }

        #[test]
        fn round_trip_with_random_leading_zero_run(
            zeros in 0usize..40,
            rest in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut payload = vec![0u8; zeros];
            payload.extend_from_slice(&rest);
            let encoded = encode(&payload);
            let decoded = decode(&encoded).unwrap();
            prop_assert_eq!(decoded, payload);
        }
    }
}
