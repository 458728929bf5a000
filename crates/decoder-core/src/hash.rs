//! SHA256, RIPEMD160 and the Bitcoin hash compositions built from them.

use alloc::string::String;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use crate::error::HexError;
use crate::hexutil::parse_hex;

/// Single SHA256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Bitcoin's double SHA256: SHA256(SHA256(data)).
///
/// This is used for Base58Check checksums and transaction IDs.
#[inline]
pub fn hash256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Single RIPEMD160 hash.
#[inline]
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// RIPEMD160(SHA256(data)), the public-key-hash and script-hash payload
/// of P2PKH, P2SH and P2WPKH outputs.
#[inline]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Reverse the byte order of a 32-byte array.
///
/// Bitcoin often displays hashes in reverse byte order (little-endian display).
#[inline]
pub fn reverse_bytes(bytes: &[u8; 32]) -> [u8; 32] {
    let mut reversed = *bytes;
    reversed.reverse();
    reversed
}

/// Convert a hash to its display format (reversed hex).
pub fn hash_to_display_hex(hash: &[u8; 32]) -> String {
    hex::encode(reverse_bytes(hash))
}

/// How the hash tool should read its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// UTF-8 text, hashed as its bytes.
    #[default]
    Text,
    /// Hex-encoded bytes.
    Hex,
}

impl InputFormat {
    /// Parse a format name ("text", "utf8", "hex").
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "utf8" | "utf-8" => Some(InputFormat::Text),
            "hex" => Some(InputFormat::Hex),
            _ => None,
        }
    }
}

/// Every digest the hash tool shows for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashDigests {
    /// Number of bytes that were hashed.
    pub input_len: usize,
    pub sha256: [u8; 32],
    pub hash256: [u8; 32],
    pub ripemd160: [u8; 20],
    pub hash160: [u8; 20],
}

impl HashDigests {
    /// Hash `data` with all four functions.
    pub fn compute(data: &[u8]) -> Self {
        let sha = sha256(data);
        HashDigests {
            input_len: data.len(),
            sha256: sha,
            hash256: sha256(&sha),
            ripemd160: ripemd160(data),
            hash160: ripemd160(&sha),
        }
    }

    /// Parse `input` according to `format` and hash the resulting bytes.
    pub fn from_input(input: &str, format: InputFormat) -> Result<Self, HexError> {
        match format {
            InputFormat::Text => Ok(Self::compute(input.as_bytes())),
            InputFormat::Hex => {
                let bytes = parse_hex(input)?;
                Ok(Self::compute(&bytes))
            }
        }
    }
}
