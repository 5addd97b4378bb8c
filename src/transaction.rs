// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// transaction: the custom (non-canonical) varint, and Vin/Vout/Transaction
// (de)serialization built on top of it and of `script`.
//
// This is not Bitcoin's wire format. The varint here is a 7-bit-per-byte
// little-endian group scheme, not CompactSize, and the transaction
// version is 1 byte, not 4 — both preserved exactly as the source this
// crate descends from encodes them. See DESIGN.md for the wire-format
// discrepancies this carries forward rather than fixes.
//
// Functions:
//   varint_encode() / varint_decode()
// Types:
//   Vin, Vout, Transaction — each with serialize()/deserialize()

use crate::error::{Error, Result};
use crate::script::{script_decode, script_encode};

const MSB: u8 = 0x80;
const VARINT_MASK: u8 = 0x7F;

/// Encode `x` as the source's custom varint: 7 payload bits per byte,
/// continuation bit (0x80) set on every non-final byte, little-endian
/// group order. `0` encodes to the *empty* byte string — not a single
/// zero byte — exactly as the source does. This makes a bare `0` count
/// indistinguishable, on the wire, from no count field at all; callers
/// serializing a count of zero into a stream with following data should
/// expect `varint_decode` to consume zero bytes and return `0` only when
/// it's given nothing else to misinterpret as the value.
pub fn varint_encode(mut x: u64) -> Vec<u8> {
    let mut data = Vec::new();
    while x != 0 {
        let mut byte = (x & VARINT_MASK as u64) as u8;
        x >>= 7;
        if x != 0 {
            byte |= MSB;
        }
        data.push(byte);
    }
    data
}

/// Decode a varint starting at `bytes[0]`, returning `(value, bytes_consumed)`.
///
/// Because `varint_encode(0)` produces zero bytes, this function cannot
/// distinguish "the next field is a zero-valued varint" from "there is
/// no varint here at all" — it always reads at least one byte when one
/// is available, so a literal `0x00` byte decodes as the single-byte
/// value `0`, which is *not* what `varint_encode(0)` would have written.
/// This is the same asymmetry the source's own serializer has; it is
/// documented, not patched over.
pub fn varint_decode(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    let mut consumed = 0;
    loop {
        let byte = *bytes
            .get(consumed)
            .ok_or_else(|| Error::BadTransaction("truncated varint".to_string()))?;
        value |= ((byte & VARINT_MASK) as u64) << shift;
        consumed += 1;
        if byte & MSB == 0 {
            break;
        }
        shift += 7;
    }
    Ok((value, consumed))
}

/// A transaction input: the outpoint it spends, its unlocking script
/// (given as a whitespace-token string, same convention as `script`),
/// and its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vin {
    pub txid: [u8; 32],
    pub vout: u32,
    pub script_sig: String,
    pub sequence: u32,
}

impl Vin {
    pub fn new(txid: [u8; 32], vout: u32, script_sig: impl Into<String>, sequence: u32) -> Self {
        Vin {
            txid,
            vout,
            script_sig: script_sig.into(),
            sequence,
        }
    }

    /// `txid(32 BE) || vout(4 LE) || varint(script_len) || script || sequence(4 LE)`.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let script = script_encode(&self.script_sig)?;
        let mut out = Vec::with_capacity(32 + 4 + 9 + script.len() + 4);
        out.extend_from_slice(&self.txid);
        out.extend_from_slice(&self.vout.to_le_bytes());
        out.extend_from_slice(&varint_encode(script.len() as u64));
        out.extend_from_slice(&script);
        out.extend_from_slice(&self.sequence.to_le_bytes());
        Ok(out)
    }

    /// Inverse of `serialize`, returning the decoded `Vin` and the number
    /// of bytes it consumed so callers can keep decoding what follows.
    pub fn deserialize(bytes: &[u8]) -> Result<(Self, usize)> {
        if bytes.len() < 36 {
            return Err(Error::BadTransaction("truncated vin".to_string()));
        }
        let mut txid = [0u8; 32];
        txid.copy_from_slice(&bytes[0..32]);
        let vout = u32::from_le_bytes(bytes[32..36].try_into().unwrap());

        let (script_len, varint_len) = varint_decode(&bytes[36..])?;
        let script_start = 36 + varint_len;
        let script_end = script_start
            .checked_add(script_len as usize)
            .ok_or_else(|| Error::BadTransaction("vin script length overflow".to_string()))?;
        if bytes.len() < script_end + 4 {
            return Err(Error::BadTransaction("truncated vin script".to_string()));
        }
        let script_sig = script_decode(&bytes[script_start..script_end])?;
        let sequence = u32::from_le_bytes(bytes[script_end..script_end + 4].try_into().unwrap());

        Ok((
            Vin {
                txid,
                vout,
                script_sig,
                sequence,
            },
            script_end + 4,
        ))
    }
}

/// A transaction output: the amount in satoshis and its locking script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vout {
    pub value: i64,
    pub script_pub_key: String,
}

impl Vout {
    pub fn new(value: i64, script_pub_key: impl Into<String>) -> Self {
        Vout {
            value,
            script_pub_key: script_pub_key.into(),
        }
    }

    /// `value(8 LE, signed) || varint(script_len) || script`.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let script = script_encode(&self.script_pub_key)?;
        let mut out = Vec::with_capacity(8 + 9 + script.len());
        out.extend_from_slice(&self.value.to_le_bytes());
        out.extend_from_slice(&varint_encode(script.len() as u64));
        out.extend_from_slice(&script);
        Ok(out)
    }

    /// Inverse of `serialize`, returning the decoded `Vout` and the
    /// number of bytes it consumed.
    pub fn deserialize(bytes: &[u8]) -> Result<(Self, usize)> {
        if bytes.len() < 8 {
            return Err(Error::BadTransaction("truncated vout".to_string()));
        }
        let value = i64::from_le_bytes(bytes[0..8].try_into().unwrap());

        let (script_len, varint_len) = varint_decode(&bytes[8..])?;
        let script_start = 8 + varint_len;
        let script_end = script_start
            .checked_add(script_len as usize)
            .ok_or_else(|| Error::BadTransaction("vout script length overflow".to_string()))?;
        if bytes.len() < script_end {
            return Err(Error::BadTransaction("truncated vout script".to_string()));
        }
        let script_pub_key = script_decode(&bytes[script_start..script_end])?;

        Ok((
            Vout {
                value,
                script_pub_key,
            },
            script_end,
        ))
    }
}

/// `version(1 LE) || varint(vin_count) || vins || varint(vout_count) || vouts || locktime(4 LE)`.
/// The 1-byte version is itself a carried-over defect: Bitcoin's wire
/// format uses 4 bytes little-endian. Left as-is; see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub locktime: u32,
    pub vins: Vec<Vin>,
    pub vouts: Vec<Vout>,
}

impl Transaction {
    pub fn new(version: u8, locktime: u32, vins: Vec<Vin>, vouts: Vec<Vout>) -> Self {
        Transaction {
            version,
            locktime,
            vins,
            vouts,
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.push(self.version);
        out.extend_from_slice(&varint_encode(self.vins.len() as u64));
        for vin in &self.vins {
            out.extend_from_slice(&vin.serialize()?);
        }
        out.extend_from_slice(&varint_encode(self.vouts.len() as u64));
        for vout in &self.vouts {
            out.extend_from_slice(&vout.serialize()?);
        }
        out.extend_from_slice(&self.locktime.to_le_bytes());
        Ok(out)
    }

    /// Inverse of `serialize`. Note the same zero-count ambiguity
    /// `varint_decode` documents applies here: a transaction serialized
    /// with zero vins or zero vouts cannot be told apart from one whose
    /// count field was simply omitted, since `varint_encode(0)` writes
    /// no bytes at all. This decoder reads vin/vout counts the same way
    /// `varint_decode` always does — at least one byte, when one is
    /// available — which is not a faithful inverse of that edge case.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let version = *bytes
            .first()
            .ok_or_else(|| Error::BadTransaction("truncated transaction".to_string()))?;
        let mut offset = 1;

        let (vin_count, varint_len) = varint_decode(&bytes[offset..])?;
        offset += varint_len;
        let mut vins = Vec::with_capacity(vin_count as usize);
        for _ in 0..vin_count {
            let (vin, consumed) = Vin::deserialize(&bytes[offset..])?;
            offset += consumed;
            vins.push(vin);
        }

        let (vout_count, varint_len) = varint_decode(&bytes[offset..])?;
        offset += varint_len;
        let mut vouts = Vec::with_capacity(vout_count as usize);
        for _ in 0..vout_count {
            let (vout, consumed) = Vout::deserialize(&bytes[offset..])?;
            offset += consumed;
            vouts.push(vout);
        }

        if bytes.len() < offset + 4 {
            return Err(Error::BadTransaction("truncated transaction locktime".to_string()));
        }
        let locktime = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap());

        Ok(Transaction {
            version,
            locktime,
            vins,
            vouts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_zero_encodes_to_nothing() {
        assert_eq!(varint_encode(0), Vec::<u8>::new());
    }

    #[test]
    fn varint_round_trips_nonzero_values() {
        for &v in &[1u64, 127, 128, 300, 16384, 1 << 40] {
            let encoded = varint_encode(v);
            let (decoded, consumed) = varint_decode(&encoded).unwrap();
            assert_eq!(decoded, v);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn varint_continuation_bit_set_on_non_final_bytes() {
        let encoded = varint_encode(300);
        assert_eq!(encoded.len(), 2);
        assert_ne!(encoded[0] & 0x80, 0);
        assert_eq!(encoded[1] & 0x80, 0);
    }

    #[test]
    fn vin_serializes_in_declared_field_order() {
        let vin = Vin::new([0x11; 32], 7, "OP_DUP OP_HASH160", 0xFFFFFFFF);
        let serialized = vin.serialize().unwrap();
        assert_eq!(&serialized[0..32], &[0x11; 32]);
        assert_eq!(&serialized[32..36], &7u32.to_le_bytes());
        // varint(2) is a single byte 0x02, then the two opcode bytes.
        assert_eq!(serialized[36], 0x02);
        assert_eq!(&serialized[37..39], &[0x76, 0xa9]);
        assert_eq!(&serialized[39..43], &0xFFFFFFFFu32.to_le_bytes());
    }

    #[test]
    fn vout_serializes_value_little_endian_signed() {
        let vout = Vout::new(5_000_000_000, "OP_DUP");
        let serialized = vout.serialize().unwrap();
        assert_eq!(&serialized[0..8], &5_000_000_000i64.to_le_bytes());
        assert_eq!(serialized[8], 0x01);
        assert_eq!(serialized[9], 0x76);
    }

    #[test]
    fn transaction_serializes_with_one_byte_version() {
        let vin = Vin::new([0xaa; 32], 0, "OP_DUP", 0);
        let vout = Vout::new(1000, "OP_DUP");
        let tx = Transaction::new(1, 0, vec![vin], vec![vout]);
        let serialized = tx.serialize().unwrap();
        assert_eq!(serialized[0], 1);
    }

    #[test]
    fn transaction_propagates_bad_script_token() {
        let vin = Vin::new([0; 32], 0, "NOT_AN_OPCODE", 0);
        let tx = Transaction::new(1, 0, vec![vin], vec![]);
        assert!(matches!(tx.serialize(), Err(Error::BadScriptToken(_))));
    }

    #[test]
    fn vin_round_trips_through_deserialize() {
        let vin = Vin::new([0x11; 32], 7, "OP_DUP OP_HASH160", 0xFFFFFFFF);
        let serialized = vin.serialize().unwrap();
        let (decoded, consumed) = Vin::deserialize(&serialized).unwrap();
        assert_eq!(consumed, serialized.len());
        assert_eq!(decoded.txid, vin.txid);
        assert_eq!(decoded.vout, vin.vout);
        assert_eq!(decoded.sequence, vin.sequence);
        assert_eq!(decoded.script_sig, "OP_DUP OP_HASH160");
    }

    #[test]
    fn vout_round_trips_through_deserialize() {
        let vout = Vout::new(5_000_000_000, "OP_DUP OP_EQUAL");
        let serialized = vout.serialize().unwrap();
        let (decoded, consumed) = Vout::deserialize(&serialized).unwrap();
        assert_eq!(consumed, serialized.len());
        assert_eq!(decoded.value, vout.value);
        assert_eq!(decoded.script_pub_key, "OP_DUP OP_EQUAL");
    }

    #[test]
    fn transaction_round_trips_through_deserialize() {
        let vin = Vin::new([0xaa; 32], 0, "OP_DUP OP_HASH160", 1);
        let vout = Vout::new(1000, "OP_DUP OP_EQUAL");
        let tx = Transaction::new(1, 42, vec![vin], vec![vout]);
        let serialized = tx.serialize().unwrap();
        let decoded = Transaction::deserialize(&serialized).unwrap();
        assert_eq!(decoded.version, tx.version);
        assert_eq!(decoded.locktime, tx.locktime);
        assert_eq!(decoded.vins.len(), 1);
        assert_eq!(decoded.vouts.len(), 1);
        assert_eq!(decoded.vins[0].script_sig, "OP_DUP OP_HASH160");
        assert_eq!(decoded.vouts[0].script_pub_key, "OP_DUP OP_EQUAL");
    }

    #[test]
    fn vin_deserialize_rejects_truncated_input() {
        assert!(matches!(
            Vin::deserialize(&[0u8; 10]),
            Err(Error::BadTransaction(_))
        ));
    }
}
