//! Minimal ABI call-data encoding.
//!
//! Covers the handful of call shapes the deploy scripts need (static
//! words plus a single dynamic `string` parameter); no external codegen.

use std::fmt;

use alloy_core::primitives::{Address, B256, Bytes, U256, keccak256};

/// Compute the 4-byte function selector for a solidity signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// A value encodable as a single static 32-byte word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word {
    Address(Address),
    Uint(U256),
    Bytes32(B256),
}

impl Word {
    /// The 32-byte encoding: left-padded for addresses and integers,
    /// verbatim for bytes32.
    pub fn encode(&self) -> [u8; 32] {
        match self {
            Word::Address(address) => {
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(address.as_slice());
                word
            }
            Word::Uint(value) => value.to_be_bytes::<32>(),
            Word::Bytes32(value) => value.0,
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Word::Address(address) => write!(f, "{address}"),
            Word::Uint(value) => write!(f, "{value}"),
            Word::Bytes32(value) => write!(f, "{value}"),
        }
    }
}

/// Concatenate static words, e.g. for constructor arguments appended to
/// creation bytecode.
pub fn encode_words(args: &[Word]) -> Vec<u8> {
    let mut data = Vec::with_capacity(32 * args.len());
    for arg in args {
        data.extend_from_slice(&arg.encode());
    }
    data
}

/// Encode a call to a function taking only static arguments.
pub fn encode_call(signature: &str, args: &[Word]) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&encode_words(args));
    Bytes::from(data)
}

/// Encode a call to a function taking a single dynamic `string`.
pub fn encode_string_call(signature: &str, value: &str) -> Bytes {
    let mut data = Vec::new();
    data.extend_from_slice(&selector(signature));
    // Head: offset to the string data (one head word, so 0x20).
    data.extend_from_slice(&Word::Uint(U256::from(32)).encode());
    // Tail: length word, then the bytes padded to a word boundary.
    data.extend_from_slice(&Word::Uint(U256::from(value.len())).encode());
    data.extend_from_slice(value.as_bytes());
    let partial = value.len() % 32;
    if partial != 0 {
        data.resize(data.len() + 32 - partial, 0);
    }
    Bytes::from(data)
}

/// Decode a solidity `string` return value from raw call output.
pub fn decode_string_return(output: &[u8]) -> Option<String> {
    let offset = word_to_usize(output.get(..32)?)?;
    let length_end = offset.checked_add(32)?;
    let length = word_to_usize(output.get(offset..length_end)?)?;
    let data = output.get(length_end..length_end.checked_add(length)?)?;
    String::from_utf8(data.to_vec()).ok()
}

/// Decode a single `uint256` return value from raw call output.
pub fn decode_uint_return(output: &[u8]) -> Option<U256> {
    output.get(..32).map(U256::from_be_slice)
}

fn word_to_usize(word: &[u8]) -> Option<usize> {
    U256::from_be_slice(word).try_into().ok()
}
