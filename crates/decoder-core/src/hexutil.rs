//! Hex text handling shared by the transaction decoder and the hash tool.

use alloc::string::String;
use alloc::vec::Vec;
use crate::error::HexError;

/// Parse user-supplied hex into bytes.
///
/// Whitespace anywhere in the input is ignored so pasted, wrapped hex
/// works. Positions in errors count characters of `input` as given.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, HexError> {
    let mut cleaned = String::with_capacity(input.len());

    for (position, character) in input.chars().enumerate() {
        if character.is_whitespace() {
            continue;
        }
        if !character.is_ascii_hexdigit() {
            return Err(HexError::InvalidCharacter { character, position });
        }
        cleaned.push(character);
    }

    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }

    Ok(hex::decode(&cleaned)?)
}
