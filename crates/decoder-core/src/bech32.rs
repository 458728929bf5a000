//! Bech32 (BIP173) and Bech32m (BIP350) for native SegWit addresses.

use alloc::string::String;
use alloc::vec::Vec;
use crate::error::AddressError;

/// The 32-character data alphabet; a character's index is its 5-bit value.
pub const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Number of checksum characters at the end of the data part.
pub const CHECKSUM_CHARS: usize = 6;

/// Longest string BIP173 allows.
pub const MAX_BECH32_LEN: usize = 90;

const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

/// Which checksum constant a string verifies against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bech32Encoding {
    /// BIP173, used by witness version 0.
    Bech32,
    /// BIP350, used by witness versions 1 through 16.
    Bech32m,
}

impl Bech32Encoding {
    /// The value the polymod of a valid string equals.
    pub const fn constant(self) -> u32 {
        match self {
            Bech32Encoding::Bech32 => 1,
            Bech32Encoding::Bech32m => 0x2bc830a3,
        }
    }

    fn from_polymod(checksum: u32) -> Option<Self> {
        [Bech32Encoding::Bech32, Bech32Encoding::Bech32m]
            .into_iter()
            .find(|encoding| encoding.constant() == checksum)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bech32Encoding::Bech32 => "bech32",
            Bech32Encoding::Bech32m => "bech32m",
        }
    }
}

/// Outcome of a Bech32/Bech32m decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bech32Result {
    /// Whether the checksum matched one of the two constants.
    pub valid: bool,
    /// Set only when `valid` is true.
    pub encoding: Option<Bech32Encoding>,
    /// Lower-cased human-readable part.
    pub hrp: String,
    /// First data value, when there is one.
    pub witness_version: Option<u8>,
    /// Witness program, repacked from 5-bit groups into bytes.
    pub data: Vec<u8>,
    pub error: Option<AddressError>,
}

/// Decode a Bech32 or Bech32m string.
///
/// A bad checksum is reported through `error` but the human-readable part,
/// witness version and program are still filled in.
pub fn decode_bech32(input: &str) -> Bech32Result {
    let mut result = Bech32Result::default();

    let length = input.chars().count();
    if length > MAX_BECH32_LEN {
        result.error = Some(AddressError::TooLong { length, max: MAX_BECH32_LEN });
        return result;
    }

    let input_lower = input.to_lowercase();

    let values = match split_and_map(&input_lower, &mut result) {
        Ok(values) => values,
        Err(err) => {
            log::debug!("bech32 decode failed: {}", err);
            result.error = Some(err);
            return result;
        }
    };

    let checksum = bech32_polymod(&hrp_expand(&result.hrp), &values);
    let body = &values[..values.len() - CHECKSUM_CHARS];

    if let Some((&version, program)) = body.split_first() {
        result.witness_version = Some(version);
        result.data = convert_bits(program, 5, 8, false);
    }

    match Bech32Encoding::from_polymod(checksum) {
        Some(encoding) => {
            result.valid = true;
            result.encoding = Some(encoding);
        }
        None => result.error = Some(AddressError::InvalidBech32Checksum),
    }

    result
}

/// Split at the last `1`, record the HRP and map the data characters.
fn split_and_map(input: &str, result: &mut Bech32Result) -> Result<Vec<u8>, AddressError> {
    let sep_pos = input.rfind('1').ok_or(AddressError::InvalidSeparator)?;

    let hrp = &input[..sep_pos];
    let data_part = &input[sep_pos + 1..];

    if sep_pos < 1 || data_part.chars().count() < CHECKSUM_CHARS {
        return Err(AddressError::InvalidSeparator);
    }

    for (position, character) in hrp.chars().enumerate() {
        if !(33..=126).contains(&(character as u32)) {
            return Err(AddressError::InvalidBech32Char { character, position });
        }
    }
    result.hrp = String::from(hrp);

    let offset = hrp.chars().count() + 1;
    let mut values = Vec::with_capacity(data_part.len());
    for (i, character) in data_part.chars().enumerate() {
        let value = BECH32_CHARSET
            .find(character)
            .ok_or(AddressError::InvalidBech32Char { character, position: offset + i })?;
        values.push(value as u8);
    }

    Ok(values)
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut result = Vec::with_capacity(bytes.len() * 2 + 1);

    result.extend(bytes.iter().map(|b| b >> 5));
    result.push(0);
    result.extend(bytes.iter().map(|b| b & 31));

    result
}

/// The BCH checksum over `hrp ++ data`, both already in 5-bit values.
pub fn bech32_polymod(hrp: &[u8], data: &[u8]) -> u32 {
    let mut chk: u32 = 1;

    for &value in hrp.iter().chain(data.iter()) {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (value as u32);
        for (i, &g) in GEN.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }

    chk
}

/// Regroup bits MSB-first.
///
/// Without `pad`, leftover bits that do not fill a whole output group are
/// dropped.
fn convert_bits(data: &[u8], from_bits: u32, to_bits: u32, pad: bool) -> Vec<u8> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut result = Vec::with_capacity(data.len() * from_bits as usize / to_bits as usize + 1);
    let max_value = (1u32 << to_bits) - 1;
    let max_acc = (1u32 << (from_bits + to_bits - 1)) - 1;

    for &value in data {
        acc = ((acc << from_bits) | value as u32) & max_acc;
        bits += from_bits;

        while bits >= to_bits {
            bits -= to_bits;
            result.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad && bits > 0 {
        result.push(((acc << (to_bits - bits)) & max_value) as u8);
    }

    result
}

/// Encode a witness program as a SegWit address.
///
/// Version 0 uses Bech32, later versions Bech32m.
pub fn encode_segwit_address(hrp: &str, witness_version: u8, program: &[u8]) -> String {
    let encoding = if witness_version == 0 {
        Bech32Encoding::Bech32
    } else {
        Bech32Encoding::Bech32m
    };

    let mut values = Vec::with_capacity(1 + program.len() * 8 / 5 + 1 + CHECKSUM_CHARS);
    values.push(witness_version);
    values.extend(convert_bits(program, 8, 5, true));

    let mut checksum_input = values.clone();
    checksum_input.extend_from_slice(&[0u8; CHECKSUM_CHARS]);
    let polymod = bech32_polymod(&hrp_expand(hrp), &checksum_input) ^ encoding.constant();
    for i in 0..CHECKSUM_CHARS {
        values.push(((polymod >> (5 * (5 - i))) & 31) as u8);
    }

    let charset = BECH32_CHARSET.as_bytes();
    let mut encoded = String::with_capacity(hrp.len() + 1 + values.len());
    encoded.push_str(hrp);
    encoded.push('1');
    for value in values {
        encoded.push(charset[value as usize] as char);
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_p2wpkh() {
        let result = decode_bech32("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq");

        assert!(result.valid);
        assert_eq!(result.encoding, Some(Bech32Encoding::Bech32));
        assert_eq!(result.hrp, "bc");
        assert_eq!(result.witness_version, Some(0));
        assert_eq!(result.data.len(), 20);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_decode_taproot_is_bech32m() {
        let result =
            decode_bech32("bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr");

        assert!(result.valid);
        assert_eq!(result.encoding, Some(Bech32Encoding::Bech32m));
        assert_eq!(result.witness_version, Some(1));
        assert_eq!(result.data.len(), 32);
    }

    #[test]
    fn test_uppercase_input() {
        let result = decode_bech32("BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4");

        assert!(result.valid);
        assert_eq!(result.hrp, "bc");
        assert_eq!(
            hex::encode(&result.data),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn test_bad_checksum_keeps_fields() {
        let result = decode_bech32("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdr");

        assert!(!result.valid);
        assert_eq!(result.encoding, None);
        assert_eq!(result.error, Some(AddressError::InvalidBech32Checksum));
        assert_eq!(result.hrp, "bc");
        assert_eq!(result.witness_version, Some(0));
        assert_eq!(result.data.len(), 20);
    }

    #[test]
    fn test_invalid_character() {
        // 'b' is not in the data alphabet
        let result = decode_bech32("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdb");
        assert_eq!(
            result.error,
            Some(AddressError::InvalidBech32Char { character: 'b', position: 41 })
        );
        assert!(!result.valid);
    }

    #[test]
    fn test_too_long() {
        let input = format!("bc1{}", "q".repeat(88));
        let result = decode_bech32(&input);

        assert!(!result.valid);
        assert_eq!(result.error, Some(AddressError::TooLong { length: 91, max: MAX_BECH32_LEN }));
        assert!(result.hrp.is_empty());
    }

    #[test]
    fn test_separator_errors() {
        assert_eq!(decode_bech32("qqqqqqqq").error, Some(AddressError::InvalidSeparator));
        assert_eq!(decode_bech32("1qqqqqqq").error, Some(AddressError::InvalidSeparator));
        assert_eq!(decode_bech32("bc1qqqqq").error, Some(AddressError::InvalidSeparator));
    }

    #[test]
    fn test_encode_roundtrip_vectors() {
        let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        assert_eq!(
            encode_segwit_address("bc", 0, &program),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );

        let decoded =
            decode_bech32("bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr");
        assert_eq!(
            encode_segwit_address("bc", 1, &decoded.data),
            "bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr"
        );
    }
}
