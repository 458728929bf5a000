//! Error types for the decoders.
//!
//! The `Display` text of each variant is the message shown next to the
//! decoded fields, so wording changes here are user-visible.

use thiserror::Error;

/// Failures while decoding an address string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Nothing to decode.
    #[error("Enter an address")]
    Empty,
    /// Longer than any address the encoding can carry.
    #[error("Input too long: {length} characters (max {max})")]
    TooLong { length: usize, max: usize },
    /// Character outside the Base58 alphabet.
    #[error("Invalid Base58 character '{character}' at position {position}")]
    InvalidBase58Char { character: char, position: usize },
    /// Decoded Base58 data cannot hold a version byte and a checksum.
    #[error("Decoded data too short: {0} bytes (need at least 5)")]
    Base58TooShort(usize),
    /// Base58Check checksum does not match the payload.
    #[error("Checksum mismatch")]
    ChecksumMismatch,
    /// The `1` separator is missing or too close to either end.
    #[error("Invalid separator position")]
    InvalidSeparator,
    /// Character outside the Bech32 alphabet.
    #[error("Invalid Bech32 character '{character}' at position {position}")]
    InvalidBech32Char { character: char, position: usize },
    /// Polymod matched neither the bech32 nor the bech32m constant.
    #[error("Invalid Bech32 checksum")]
    InvalidBech32Checksum,
}

/// Failures while parsing hex text into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("Invalid hex character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("Hex string has odd length")]
    OddLength,
}

/// Failures while decoding a raw transaction.
///
/// Truncation errors name the part of the transaction that ran off the end
/// of the buffer, e.g. `Input 2: scriptSig extends past end of data`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    #[error("Enter raw transaction hex")]
    Empty,
    #[error(transparent)]
    Hex(#[from] HexError),
    #[error("Transaction too short: {0} bytes (need at least 10)")]
    TooShort(usize),
    /// A CompactSize with the 0xff prefix.
    #[error("VarInt overflow at byte {0}")]
    VarIntOverflow(usize),
    #[error("{0} extends past end of data")]
    Truncated(Field),
}

/// Location of a truncated read inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Version,
    InputCount,
    Input { index: usize, part: &'static str },
    OutputCount,
    Output { index: usize, part: &'static str },
    Witness { input: usize, part: &'static str },
    Locktime,
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Field::Version => write!(f, "Version"),
            Field::InputCount => write!(f, "Input count"),
            Field::Input { index, part } => write!(f, "Input {}: {}", index, part),
            Field::OutputCount => write!(f, "Output count"),
            Field::Output { index, part } => write!(f, "Output {}: {}", index, part),
            Field::Witness { input, part } => write!(f, "Witness for input {}: {}", input, part),
            Field::Locktime => write!(f, "Locktime"),
        }
    }
}

/// Low-level read failure, mapped to a [`TxError`] once the caller knows
/// which field it was reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("unexpected end of data")]
    UnexpectedEof,
    #[error("VarInt overflow at byte {0}")]
    VarIntOverflow(usize),
}

impl ReadError {
    /// Attach the field being read.
    pub fn at(self, field: Field) -> TxError {
        match self {
            ReadError::UnexpectedEof => TxError::Truncated(field),
            ReadError::VarIntOverflow(pos) => TxError::VarIntOverflow(pos),
        }
    }
}

impl From<hex::FromHexError> for HexError {
    fn from(err: hex::FromHexError) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => HexError::InvalidCharacter {
                character: c,
                position: index,
            },
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                HexError::OddLength
            }
        }
    }
}
