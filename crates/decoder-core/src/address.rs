//! Bitcoin address decoding and scriptPubKey classification.
//!
//! Supports:
//! - P2PKH (Pay to Public Key Hash) - Legacy addresses starting with 1 (mainnet) or m/n (testnet)
//! - P2SH (Pay to Script Hash) - Addresses starting with 3 (mainnet) or 2 (testnet)
//! - P2WPKH (Pay to Witness Public Key Hash) - Native SegWit v0, bc1q.../tb1q...
//! - P2WSH (Pay to Witness Script Hash) - Native SegWit v0, bc1q... (32-byte program)
//! - P2TR (Pay to Taproot) - SegWit v1, bc1p.../tb1p...
//!
//! Anything else that still decodes is reported as [`AddressType::Unknown`]
//! rather than rejected, so the tool can show what is inside it.

use alloc::string::String;
use alloc::vec::Vec;
use crate::base58::{decode_base58check, encode_base58check, Base58CheckResult};
use crate::bech32::{decode_bech32, encode_segwit_address, Bech32Result};
use crate::error::AddressError;
use crate::network::Network;

const OP_0: u8 = 0x00;
const OP_1: u8 = 0x51;
const OP_DUP: u8 = 0x76;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_HASH160: u8 = 0xa9;
const OP_CHECKSIG: u8 = 0xac;

/// Bitcoin address type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressType {
    /// Legacy P2PKH: OP_DUP OP_HASH160 <20-byte-hash> OP_EQUALVERIFY OP_CHECKSIG
    P2PKH,
    /// P2SH: OP_HASH160 <20-byte-hash> OP_EQUAL
    P2SH,
    /// Native SegWit v0 P2WPKH: OP_0 <20-byte-hash>
    P2WPKH,
    /// Native SegWit v0 P2WSH: OP_0 <32-byte-hash>
    P2WSH,
    /// Taproot P2TR: OP_1 <32-byte-x-only-pubkey>
    P2TR,
    /// Decoded, but not one of the standard templates above.
    #[default]
    Unknown,
}

impl AddressType {
    /// Get the display name for this address type.
    pub fn name(&self) -> &'static str {
        match self {
            AddressType::P2PKH => "P2PKH",
            AddressType::P2SH => "P2SH",
            AddressType::P2WPKH => "P2WPKH",
            AddressType::P2WSH => "P2WSH",
            AddressType::P2TR => "P2TR",
            AddressType::Unknown => "Unknown",
        }
    }

    /// Lower-case identifier used by the web pages.
    pub fn id(&self) -> &'static str {
        match self {
            AddressType::P2PKH => "p2pkh",
            AddressType::P2SH => "p2sh",
            AddressType::P2WPKH => "p2wpkh",
            AddressType::P2WSH => "p2wsh",
            AddressType::P2TR => "p2tr",
            AddressType::Unknown => "unknown",
        }
    }

    /// Human-readable locking script skeleton.
    pub fn script_template(&self) -> Option<&'static str> {
        match self {
            AddressType::P2PKH => Some("OP_DUP OP_HASH160 <20-byte-hash> OP_EQUALVERIFY OP_CHECKSIG"),
            AddressType::P2SH => Some("OP_HASH160 <20-byte-hash> OP_EQUAL"),
            AddressType::P2WPKH => Some("OP_0 <20-byte-hash>"),
            AddressType::P2WSH => Some("OP_0 <32-byte-hash>"),
            AddressType::P2TR => Some("OP_1 <32-byte-key>"),
            AddressType::Unknown => None,
        }
    }

    /// Hash or witness program length the type's script expects.
    pub fn program_len(&self) -> Option<usize> {
        match self {
            AddressType::P2PKH | AddressType::P2SH | AddressType::P2WPKH => Some(20),
            AddressType::P2WSH | AddressType::P2TR => Some(32),
            AddressType::Unknown => None,
        }
    }

    /// Build the scriptPubKey that locks to `program` under this template.
    ///
    /// `program` is the 20-byte hash for P2PKH/P2SH/P2WPKH and the 32-byte
    /// witness program for P2WSH/P2TR. Any other length gives `None`.
    pub fn script_pubkey(&self, program: &[u8]) -> Option<Vec<u8>> {
        if Some(program.len()) != self.program_len() {
            return None;
        }
        let script = match self {
            AddressType::P2PKH => {
                let mut script = Vec::with_capacity(25);
                script.push(OP_DUP);
                script.push(OP_HASH160);
                script.push(0x14); // Push 20 bytes
                script.extend_from_slice(program);
                script.push(OP_EQUALVERIFY);
                script.push(OP_CHECKSIG);
                script
            }
            AddressType::P2SH => {
                let mut script = Vec::with_capacity(23);
                script.push(OP_HASH160);
                script.push(0x14); // Push 20 bytes
                script.extend_from_slice(program);
                script.push(OP_EQUAL);
                script
            }
            AddressType::P2WPKH | AddressType::P2WSH => witness_script(0, program),
            AddressType::P2TR => witness_script(1, program),
            AddressType::Unknown => return None,
        };
        Some(script)
    }
}

/// Build `OP_n <program>`.
fn witness_script(witness_version: u8, program: &[u8]) -> Vec<u8> {
    // OP_0 = 0x00, OP_1 = 0x51, OP_2 = 0x52, etc.
    let version_opcode = if witness_version == 0 { OP_0 } else { 0x50 + witness_version };
    let mut script = Vec::with_capacity(2 + program.len());
    script.push(version_opcode);
    script.push(program.len() as u8);
    script.extend_from_slice(program);
    script
}

/// The encoding-specific half of a decoded address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressEncoding {
    Base58(Base58CheckResult),
    Bech32(Bech32Result),
}

/// Everything the address decoder learned about an input string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDecoderResult {
    pub address_type: AddressType,
    pub network: Network,
    /// Checksum validity only; an unknown type can still be valid.
    pub valid: bool,
    /// Set for classified types.
    pub script_template: Option<&'static str>,
    /// The locking script this address pays to, for classified types.
    pub script_pubkey: Option<Vec<u8>>,
    /// `None` only for empty input.
    pub encoding: Option<AddressEncoding>,
    pub error: Option<AddressError>,
}

impl AddressDecoderResult {
    fn failed(error: AddressError) -> Self {
        AddressDecoderResult {
            network: Network::Unknown,
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn base58(&self) -> Option<&Base58CheckResult> {
        match &self.encoding {
            Some(AddressEncoding::Base58(result)) => Some(result),
            _ => None,
        }
    }

    pub fn bech32(&self) -> Option<&Bech32Result> {
        match &self.encoding {
            Some(AddressEncoding::Bech32(result)) => Some(result),
            _ => None,
        }
    }
}

/// Decode a Bitcoin address string.
///
/// Strings starting with `bc1`/`tb1` (any case) are decoded as Bech32 or
/// Bech32m, everything else as Base58Check. Never fails: problems are
/// reported through `error` with `valid` false.
pub fn decode_address(input: &str) -> AddressDecoderResult {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return AddressDecoderResult::failed(AddressError::Empty);
    }

    let lower = trimmed.to_lowercase();
    let result = if lower.contains('1') && (lower.starts_with("bc1") || lower.starts_with("tb1")) {
        from_bech32(decode_bech32(trimmed))
    } else {
        from_base58(decode_base58check(trimmed))
    };

    match &result.error {
        Some(err) => log::debug!("address {} did not decode: {}", trimmed, err),
        None => log::debug!(
            "address {} decoded as {} on {}",
            trimmed,
            result.address_type.name(),
            result.network
        ),
    }

    result
}

fn from_base58(decoded: Base58CheckResult) -> AddressDecoderResult {
    let mut result = AddressDecoderResult {
        network: Network::Unknown,
        valid: decoded.valid,
        error: decoded.error.clone(),
        ..Default::default()
    };

    if decoded.valid {
        if let Some((network, is_p2sh)) = decoded.version_byte.and_then(Network::from_base58_version) {
            result.network = network;
            result.address_type = if is_p2sh { AddressType::P2SH } else { AddressType::P2PKH };
        }
        fill_script(&mut result, &decoded.payload);
    }

    result.encoding = Some(AddressEncoding::Base58(decoded));
    result
}

fn from_bech32(decoded: Bech32Result) -> AddressDecoderResult {
    let mut result = AddressDecoderResult {
        network: Network::Unknown,
        valid: decoded.valid,
        error: decoded.error.clone(),
        ..Default::default()
    };

    if decoded.valid {
        result.network = Network::from_hrp(&decoded.hrp);
        result.address_type = match (decoded.witness_version, decoded.data.len()) {
            (Some(0), 20) => AddressType::P2WPKH,
            (Some(0), 32) => AddressType::P2WSH,
            (Some(1), 32) => AddressType::P2TR,
            _ => AddressType::Unknown,
        };
        fill_script(&mut result, &decoded.data);
    }

    result.encoding = Some(AddressEncoding::Bech32(decoded));
    result
}

fn fill_script(result: &mut AddressDecoderResult, program: &[u8]) {
    result.script_template = result.address_type.script_template();
    result.script_pubkey = result.address_type.script_pubkey(program);
}

/// Recognise a standard output script and return its type and program.
pub fn classify_script_pubkey(script: &[u8]) -> (AddressType, &[u8]) {
    match script {
        [OP_DUP, OP_HASH160, 0x14, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] if hash.len() == 20 => {
            (AddressType::P2PKH, hash)
        }
        [OP_HASH160, 0x14, hash @ .., OP_EQUAL] if hash.len() == 20 => (AddressType::P2SH, hash),
        [OP_0, 0x14, program @ ..] if program.len() == 20 => (AddressType::P2WPKH, program),
        [OP_0, 0x20, program @ ..] if program.len() == 32 => (AddressType::P2WSH, program),
        [OP_1, 0x20, program @ ..] if program.len() == 32 => (AddressType::P2TR, program),
        _ => (AddressType::Unknown, &script[..0]),
    }
}

/// Render the address a standard output script pays to.
///
/// Returns `None` for non-standard scripts and for [`Network::Unknown`].
pub fn address_from_script_pubkey(script: &[u8], network: Network) -> Option<String> {
    let (address_type, program) = classify_script_pubkey(script);
    match address_type {
        AddressType::P2PKH => Some(encode_base58check(network.p2pkh_version()?, program)),
        AddressType::P2SH => Some(encode_base58check(network.p2sh_version()?, program)),
        AddressType::P2WPKH | AddressType::P2WSH => {
            Some(encode_segwit_address(network.bech32_hrp()?, 0, program))
        }
        AddressType::P2TR => Some(encode_segwit_address(network.bech32_hrp()?, 1, program)),
        AddressType::Unknown => None,
    }
}
