//! Base58 and Base58Check, as used by legacy P2PKH and P2SH addresses.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use crate::error::AddressError;
use crate::hash::hash256;

/// The Bitcoin Base58 alphabet (no `0`, `O`, `I` or `l`).
pub const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of the Base58Check checksum.
pub const CHECKSUM_LEN: usize = 4;

/// Longest Base58Check string accepted (an extended key is 111 characters).
pub const MAX_BASE58CHECK_LEN: usize = 111;

/// Outcome of a Base58Check decode.
///
/// Fields are filled in as far as decoding got, so a string with a bad
/// checksum still shows its version byte and payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Base58CheckResult {
    /// Whether the embedded checksum matches the payload.
    pub valid: bool,
    /// First decoded byte.
    pub version_byte: Option<u8>,
    /// Decoded bytes between the version byte and the checksum.
    pub payload: Vec<u8>,
    /// Checksum carried by the string.
    pub checksum: Option<[u8; CHECKSUM_LEN]>,
    /// Checksum computed over version byte and payload.
    pub expected_checksum: Option<[u8; CHECKSUM_LEN]>,
    pub error: Option<AddressError>,
}

/// Decode a Base58 string into bytes.
///
/// Each leading `1` becomes a leading zero byte.
pub fn decode_base58(input: &str) -> Result<Vec<u8>, AddressError> {
    let mut result: Vec<u8> = Vec::new();

    // Count leading '1's (they become leading zeros)
    let leading_zeros = input.chars().take_while(|&c| c == '1').count();

    for (position, c) in input.chars().enumerate() {
        let value = base58_value(c)
            .ok_or(AddressError::InvalidBase58Char { character: c, position })?;

        // Multiply result by 58 and add value
        let mut carry = value as u32;
        for byte in result.iter_mut().rev() {
            let temp = (*byte as u32) * 58 + carry;
            *byte = (temp & 0xFF) as u8;
            carry = temp >> 8;
        }

        while carry > 0 {
            result.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut final_result = vec![0u8; leading_zeros];
    final_result.extend(result);

    Ok(final_result)
}

fn base58_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    BASE58_ALPHABET
        .iter()
        .position(|&x| x == c as u8)
        .map(|i| i as u8)
}

/// Decode and verify a Base58Check string.
///
/// Never fails outright: problems are reported through `error`, with
/// `valid` left false.
pub fn decode_base58check(input: &str) -> Base58CheckResult {
    let mut result = Base58CheckResult::default();

    let length = input.chars().count();
    if length > MAX_BASE58CHECK_LEN {
        result.error = Some(AddressError::TooLong { length, max: MAX_BASE58CHECK_LEN });
        return result;
    }

    let decoded = match decode_base58(input) {
        Ok(decoded) => decoded,
        Err(err) => {
            log::debug!("base58 decode failed: {}", err);
            result.error = Some(err);
            return result;
        }
    };

    if decoded.len() < 1 + CHECKSUM_LEN {
        result.error = Some(AddressError::Base58TooShort(decoded.len()));
        return result;
    }

    // Verify checksum (last 4 bytes)
    let (body, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    let expected = checksum_of(body);

    result.version_byte = Some(body[0]);
    result.payload = body[1..].to_vec();
    result.checksum = Some(to_checksum(checksum));
    result.expected_checksum = Some(expected);
    result.valid = checksum == expected;

    if !result.valid {
        result.error = Some(AddressError::ChecksumMismatch);
    }

    result
}

fn checksum_of(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    to_checksum(&hash256(data)[..CHECKSUM_LEN])
}

fn to_checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(bytes);
    checksum
}

/// Encode bytes as Base58, preserving leading zero bytes as `1`s.
pub fn encode_base58(data: &[u8]) -> String {
    let leading_zeros = data.iter().take_while(|&&b| b == 0).count();

    // Base-58 digits, least significant first
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[leading_zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let temp = ((*digit as u32) << 8) + carry;
            *digit = (temp % 58) as u8;
            carry = temp / 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut encoded = String::with_capacity(leading_zeros + digits.len());
    for _ in 0..leading_zeros {
        encoded.push('1');
    }
    for &digit in digits.iter().rev() {
        encoded.push(BASE58_ALPHABET[digit as usize] as char);
    }
    encoded
}

/// Encode `version || payload || checksum` as Base58.
pub fn encode_base58check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = checksum_of(&data);
    data.extend_from_slice(&checksum);
    encode_base58(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_p2pkh() {
        let result = decode_base58check("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2");

        assert!(result.valid);
        assert_eq!(result.error, None);
        assert_eq!(result.version_byte, Some(0x00));
        assert_eq!(result.payload.len(), 20);
        assert_eq!(result.checksum, result.expected_checksum);
    }

    #[test]
    fn test_decode_known_payload() {
        let result = decode_base58check("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");

        assert!(result.valid);
        assert_eq!(
            hex::encode(&result.payload),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn test_leading_ones_become_zero_bytes() {
        assert_eq!(decode_base58("111").unwrap(), vec![0, 0, 0]);
        assert_eq!(decode_base58("1112").unwrap(), vec![0, 0, 0, 1]);
        assert_eq!(decode_base58("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_invalid_character_position() {
        let result = decode_base58check("1BvB0SEY");
        assert!(!result.valid);
        assert_eq!(
            result.error,
            Some(AddressError::InvalidBase58Char { character: '0', position: 4 })
        );
        assert_eq!(result.version_byte, None);
    }

    #[test]
    fn test_too_short() {
        let result = decode_base58check("11");
        assert_eq!(result.error, Some(AddressError::Base58TooShort(2)));
        assert!(!result.valid);
    }

    #[test]
    fn test_too_long_is_rejected_before_decoding() {
        let result = decode_base58check(&"z".repeat(20_000));

        assert!(!result.valid);
        assert_eq!(
            result.error,
            Some(AddressError::TooLong { length: 20_000, max: MAX_BASE58CHECK_LEN })
        );
        assert_eq!(result.version_byte, None);
    }

    #[test]
    fn test_checksum_mismatch_keeps_fields() {
        // Changed last char
        let result = decode_base58check("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN3");

        assert!(!result.valid);
        assert_eq!(result.error, Some(AddressError::ChecksumMismatch));
        assert_eq!(result.version_byte, Some(0x00));
        assert_eq!(result.payload.len(), 20);
        assert_ne!(result.checksum, result.expected_checksum);
    }

    #[test]
    fn test_encode_matches_known_address() {
        let payload = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        assert_eq!(
            encode_base58check(0x00, &payload),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
        assert_eq!(encode_base58(&[0, 0, 1]), "112");
    }
}
