//! Core Bitcoin decoding logic for the interactive learning tools.
//!
//! This crate provides pure Rust implementations of:
//! - SHA256, HASH256, RIPEMD160 and HASH160 (the Hash Tool)
//! - Base58Check and Bech32/Bech32m address decoding (the Address Decoder)
//! - Legacy and SegWit raw transaction decoding (the Transaction Decoder)
//!
//! Every decoder takes caller-supplied text and returns a result struct with
//! an optional `error`; malformed input never panics, and whatever decoded
//! before a failure is kept for display.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod address;
pub mod base58;
pub mod bech32;
pub mod error;
pub mod hash;
pub mod hexutil;
pub mod network;
pub mod reader;
pub mod transaction;

pub use address::{decode_address, AddressDecoderResult, AddressEncoding, AddressType};
pub use base58::{decode_base58check, Base58CheckResult};
pub use bech32::{decode_bech32, Bech32Encoding, Bech32Result};
pub use error::{AddressError, Field, HexError, TxError};
pub use hash::{hash160, hash256, ripemd160, sha256, HashDigests, InputFormat};
pub use network::Network;
pub use transaction::{
    decode_raw_transaction, decode_transaction_bytes, DecodedInput, DecodedOutput, DecodedTx,
    Segment, SegmentKind, TxSizes,
};
