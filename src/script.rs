// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// script: the whitespace-token script mini-language used by Vin/Vout,
// and the fixed OpCodes table it's built on.
//
// Functions:
//   script_encode() — "OP_DUP OP_HASH160 89abcdef OP_EQUALVERIFY" -> bytes
//   script_decode() — bytes -> the same kind of token string

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// `(name, encoded bytes)` pairs, transcribed from the reference opcode
/// table. Most opcodes are a single byte; `OP_RSHIFT` is carried over as
/// a two-byte encoding (`0x99 0x62`) because that's what the table this
/// was transcribed from actually contains — a stray ASCII `'b'` appended
/// to what should have been a bare `0x99`. Preserved rather than
/// "corrected"; see DESIGN.md.
const OPCODES: &[(&str, &[u8])] = &[
    ("OP_0", &[0x00]),
    ("OP_FALSE", &[0x00]),
    ("OP_PUSHDATA1", &[0x4c]),
    ("OP_PUSHDATA2", &[0x4d]),
    ("OP_PUSHDATA4", &[0x4e]),
    ("OP_1NEGATE", &[0x4f]),
    ("OP_RESERVED", &[0x50]),
    ("OP_1", &[0x51]),
    ("OP_TRUE", &[0x51]),
    ("OP_2", &[0x52]),
    ("OP_3", &[0x53]),
    ("OP_4", &[0x54]),
    ("OP_5", &[0x55]),
    ("OP_6", &[0x56]),
    ("OP_7", &[0x57]),
    ("OP_8", &[0x58]),
    ("OP_9", &[0x59]),
    ("OP_10", &[0x5a]),
    ("OP_11", &[0x5b]),
    ("OP_12", &[0x5c]),
    ("OP_13", &[0x5d]),
    ("OP_14", &[0x5e]),
    ("OP_15", &[0x5f]),
    ("OP_16", &[0x60]),
    ("OP_NOP", &[0x61]),
    ("OP_VER", &[0x62]),
    ("OP_IF", &[0x63]),
    ("OP_NOTIF", &[0x64]),
    ("OP_VERIF", &[0x65]),
    ("OP_VERNOTIF", &[0x66]),
    ("OP_ELSE", &[0x67]),
    ("OP_ENDIF", &[0x68]),
    ("OP_VERIFY", &[0x69]),
    ("OP_RETURN", &[0x6a]),
    ("OP_TOALTSTACK", &[0x6b]),
    ("OP_FROMALTSTACK", &[0x6c]),
    ("OP_2DROP", &[0x6d]),
    ("OP_2DUP", &[0x6e]),
    ("OP_3DUP", &[0x6f]),
    ("OP_2OVER", &[0x70]),
    ("OP_2ROT", &[0x71]),
    ("OP_2SWAP", &[0x72]),
    ("OP_IFDUP", &[0x73]),
    ("OP_DEPTH", &[0x74]),
    ("OP_DROP", &[0x75]),
    ("OP_DUP", &[0x76]),
    ("OP_NIP", &[0x77]),
    ("OP_OVER", &[0x78]),
    ("OP_PICK", &[0x79]),
    ("OP_ROLL", &[0x7a]),
    ("OP_ROT", &[0x7b]),
    ("OP_SWAP", &[0x7c]),
    ("OP_TUCK", &[0x7d]),
    ("OP_CAT", &[0x7e]),
    ("OP_SUBSTR", &[0x7f]),
    ("OP_LEFT", &[0x80]),
    ("OP_RIGHT", &[0x81]),
    ("OP_SIZE", &[0x82]),
    ("OP_INVERT", &[0x83]),
    ("OP_AND", &[0x84]),
    ("OP_OR", &[0x85]),
    ("OP_XOR", &[0x86]),
    ("OP_EQUAL", &[0x87]),
    ("OP_EQUALVERIFY", &[0x88]),
    ("OP_RESERVED1", &[0x89]),
    ("OP_RESERVED2", &[0x8a]),
    ("OP_1ADD", &[0x8b]),
    ("OP_1SUB", &[0x8c]),
    ("OP_2MUL", &[0x8d]),
    ("OP_2DIV", &[0x8e]),
    ("OP_NEGATE", &[0x8f]),
    ("OP_ABS", &[0x90]),
    ("OP_NOT", &[0x91]),
    ("OP_0NOTEQUAL", &[0x92]),
    ("OP_ADD", &[0x93]),
    ("OP_SUB", &[0x94]),
    ("OP_MUL", &[0x95]),
    ("OP_DIV", &[0x96]),
    ("OP_MOD", &[0x97]),
    ("OP_LSHIFT", &[0x98]),
    ("OP_RSHIFT", &[0x99, 0x62]),
    ("OP_BOOLAND", &[0x9a]),
    ("OP_BOOLOR", &[0x9b]),
    ("OP_NUMEQUAL", &[0x9c]),
    ("OP_NUMEQUALVERIFY", &[0x9d]),
    ("OP_NUMNOTEQUAL", &[0x9e]),
    ("OP_LESSTHAN", &[0x9f]),
    ("OP_GREATERTHAN", &[0xa0]),
    ("OP_LESSTHANOREQUAL", &[0xa1]),
    ("OP_GREATERTHANOREQUAL", &[0xa2]),
    ("OP_MIN", &[0xa3]),
    ("OP_MAX", &[0xa4]),
    ("OP_WITHIN", &[0xa5]),
    ("OP_RIPEMD160", &[0xa6]),
    ("OP_SHA1", &[0xa7]),
    ("OP_SHA256", &[0xa8]),
    ("OP_HASH160", &[0xa9]),
    ("OP_HASH256", &[0xaa]),
    ("OP_CODESEPARATOR", &[0xab]),
    ("OP_CHECKSIG", &[0xac]),
    ("OP_CHECKSIGVERIFY", &[0xad]),
    ("OP_CHECKMULTISIG", &[0xae]),
    ("OP_CHECKMULTISIGVERIFY", &[0xaf]),
    ("OP_NOP1", &[0xb0]),
    ("OP_CHECKLOCKTIMEVERIFY", &[0xb1]),
    ("OP_NOP2", &[0xb1]),
    ("OP_CHECKSEQUENCEVERIFY", &[0xb2]),
    ("OP_NOP3", &[0xb2]),
    ("OP_NOP4", &[0xb3]),
    ("OP_NOP5", &[0xb4]),
    ("OP_NOP6", &[0xb5]),
    ("OP_NOP7", &[0xb6]),
    ("OP_NOP8", &[0xb7]),
    ("OP_NOP9", &[0xb8]),
    ("OP_NOP10", &[0xb9]),
    ("OP_INVALIDOPCODE", &[0xff]),
];

fn opcode_table() -> &'static HashMap<&'static str, &'static [u8]> {
    static TABLE: OnceLock<HashMap<&'static str, &'static [u8]>> = OnceLock::new();
    TABLE.get_or_init(|| OPCODES.iter().copied().collect())
}

/// Reverse lookup, two bytes first so `OP_RSHIFT`'s two-byte encoding
/// wins over any single-byte opcode sharing its first byte. Where
/// several names share one encoding (`OP_0`/`OP_FALSE`, `OP_1`/`OP_TRUE`,
/// the NOP2/NOP3 aliases for CLTV/CSV), the first table entry for that
/// encoding is the canonical decoded name.
fn reverse_opcode_table() -> &'static (HashMap<[u8; 2], &'static str>, HashMap<u8, &'static str>) {
    static TABLE: OnceLock<(HashMap<[u8; 2], &'static str>, HashMap<u8, &'static str>)> =
        OnceLock::new();
    TABLE.get_or_init(|| {
        let mut two_byte = HashMap::new();
        let mut one_byte = HashMap::new();
        for &(name, bytes) in OPCODES {
            match bytes {
                [a, b] => {
                    two_byte.entry([*a, *b]).or_insert(name);
                }
                [a] => {
                    one_byte.entry(*a).or_insert(name);
                }
                _ => unreachable!("every opcode encodes to one or two bytes"),
            }
        }
        (two_byte, one_byte)
    })
}

/// Encode a whitespace-separated script string. Each token matching an
/// `OP_` name becomes its opcode bytes; anything else is parsed as hex
/// and pushed with a single length-prefix byte.
pub fn script_encode(script: &str) -> Result<Vec<u8>> {
    let table = opcode_table();
    let mut out = Vec::new();
    for token in script.split_whitespace() {
        if let Some(bytes) = table.get(token) {
            out.extend_from_slice(bytes);
        } else {
            let data = hex::decode(token).map_err(|_| Error::BadScriptToken(token.to_string()))?;
            if data.len() > u8::MAX as usize {
                return Err(Error::BadScriptToken(token.to_string()));
            }
            out.push(data.len() as u8);
            out.extend_from_slice(&data);
        }
    }
    Ok(out)
}

/// Decode script bytes back into the token form `script_encode` accepts:
/// `OP_` names for recognized opcodes, uppercase hex for anything else,
/// read as a length byte followed by that many push-data bytes.
pub fn script_decode(data: &[u8]) -> Result<String> {
    let (two_byte, one_byte) = reverse_opcode_table();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < data.len() {
        if i + 1 < data.len() {
            if let Some(name) = two_byte.get(&[data[i], data[i + 1]]) {
                tokens.push(name.to_string());
                i += 2;
                continue;
            }
        }
        if let Some(name) = one_byte.get(&data[i]) {
            tokens.push(name.to_string());
            i += 1;
            continue;
        }
        let len = data[i] as usize;
        i += 1;
        if i + len > data.len() {
            return Err(Error::BadScriptToken(hex::encode_upper([data[i - 1]])));
        }
        tokens.push(hex::encode_upper(&data[i..i + len]));
        i += len;
    }
    Ok(tokens.join(" "))
}
