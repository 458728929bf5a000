//! Serializable shapes handed to the web pages.
//!
//! Byte fields are rendered as hex, enums as lower-case identifiers and
//! errors as their display text. Satoshi amounts are decimal strings so
//! values past 2^53 survive the trip into JavaScript.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use decoder_core::{
    AddressDecoderResult, Base58CheckResult, Bech32Result, DecodedInput, DecodedOutput,
    DecodedTx, HashDigests, HexError, Network, Segment,
};

/// Conversion into a JS object via `serde-wasm-bindgen`.
pub trait ToJs: Serialize {
    /// Convert to JS value.
    fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

/// Per-call options for the transaction decoder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecodeOptions {
    /// Show sequence and locktime as signed 32-bit values, so 0xffffffff
    /// reads as -1.
    pub signed_integers: bool,
    /// Network used to render output addresses. Defaults to mainnet.
    pub network: Option<String>,
}

impl DecodeOptions {
    /// Read options from an optional JS object.
    pub fn from_js(value: &JsValue) -> Result<Self, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value.clone())
            .map_err(|e| JsValue::from_str(&format!("Invalid decode options: {:?}", e)))
    }

    pub fn network(&self) -> Result<Network, String> {
        match &self.network {
            None => Ok(Network::Mainnet),
            Some(name) => Network::from_str(name).ok_or_else(|| format!("Invalid network: {}", name)),
        }
    }

    fn render_u32(&self, value: u32) -> i64 {
        if self.signed_integers {
            value as i32 as i64
        } else {
            value as i64
        }
    }
}

/// Base58Check details for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Base58View {
    pub valid: bool,
    pub version_byte: Option<u8>,
    pub payload: String,
    pub checksum: Option<String>,
    pub expected_checksum: Option<String>,
    pub error: Option<String>,
}

impl From<&Base58CheckResult> for Base58View {
    fn from(result: &Base58CheckResult) -> Self {
        Base58View {
            valid: result.valid,
            version_byte: result.version_byte,
            payload: hex::encode(&result.payload),
            checksum: result.checksum.map(hex::encode),
            expected_checksum: result.expected_checksum.map(hex::encode),
            error: result.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Bech32/Bech32m details for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32View {
    pub valid: bool,
    pub encoding: Option<&'static str>,
    pub hrp: String,
    pub witness_version: Option<u8>,
    pub data: String,
    pub data_length: usize,
    pub error: Option<String>,
}

impl From<&Bech32Result> for Bech32View {
    fn from(result: &Bech32Result) -> Self {
        Bech32View {
            valid: result.valid,
            encoding: result.encoding.map(|e| e.name()),
            hrp: result.hrp.clone(),
            witness_version: result.witness_version,
            data: hex::encode(&result.data),
            data_length: result.data.len(),
            error: result.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Address Decoder page result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    #[serde(rename = "type")]
    pub address_type: &'static str,
    pub type_name: &'static str,
    pub network: &'static str,
    pub network_name: &'static str,
    pub valid: bool,
    pub script_template: Option<&'static str>,
    pub script_pub_key: Option<String>,
    pub base58: Option<Base58View>,
    pub bech32: Option<Bech32View>,
    pub error: Option<String>,
}

impl ToJs for AddressView {}

impl From<&AddressDecoderResult> for AddressView {
    fn from(result: &AddressDecoderResult) -> Self {
        AddressView {
            address_type: result.address_type.id(),
            type_name: result.address_type.name(),
            network: result.network.name(),
            network_name: result.network.display_name(),
            valid: result.valid,
            script_template: result.script_template,
            script_pub_key: result.script_pubkey.as_ref().map(hex::encode),
            base58: result.base58().map(Base58View::from),
            bech32: result.bech32().map(Bech32View::from),
            error: result.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// One transaction input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputView {
    pub prev_txid: String,
    pub prev_index: u32,
    pub script_sig: String,
    pub script_sig_length: usize,
    pub sequence: i64,
    pub witness: Vec<String>,
    pub coinbase: bool,
}

impl InputView {
    fn new(input: &DecodedInput, options: &DecodeOptions) -> Self {
        InputView {
            prev_txid: input.prev_txid_hex(),
            prev_index: input.prev_index,
            script_sig: hex::encode(&input.script_sig),
            script_sig_length: input.script_sig.len(),
            sequence: options.render_u32(input.sequence),
            witness: input.witness.iter().map(hex::encode).collect(),
            coinbase: input.is_coinbase(),
        }
    }
}

/// One transaction output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputView {
    pub value_satoshis: String,
    pub value_btc: String,
    pub script_pub_key: String,
    pub script_pub_key_length: usize,
    pub script_type: &'static str,
    pub address: Option<String>,
}

impl OutputView {
    fn new(output: &DecodedOutput, network: Network) -> Self {
        OutputView {
            value_satoshis: output.value_satoshis.to_string(),
            value_btc: output.value_btc(),
            script_pub_key: hex::encode(&output.script_pubkey),
            script_pub_key_length: output.script_pubkey.len(),
            script_type: if output.is_op_return() { "op_return" } else { output.script_type().id() },
            address: output.address(network),
        }
    }
}

/// Highlighted byte range of the hex dump.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentView {
    pub label: &'static str,
    pub start: usize,
    pub end: usize,
}

impl From<&Segment> for SegmentView {
    fn from(segment: &Segment) -> Self {
        SegmentView {
            label: segment.kind.label(),
            start: segment.start,
            end: segment.end,
        }
    }
}

/// Transaction Decoder page result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub version: i32,
    pub segwit: bool,
    pub inputs: Vec<InputView>,
    pub outputs: Vec<OutputView>,
    pub locktime: i64,
    pub raw_byte_length: usize,
    pub segments: Vec<SegmentView>,
    pub txid: Option<String>,
    pub wtxid: Option<String>,
    pub size: Option<usize>,
    pub base_size: Option<usize>,
    pub weight: Option<usize>,
    pub vsize: Option<usize>,
    pub total_output_satoshis: Option<String>,
    pub total_output_btc: Option<String>,
    pub coinbase: bool,
    pub error: Option<String>,
}

impl ToJs for TransactionView {}

impl TransactionView {
    pub fn new(tx: &DecodedTx, network: Network, options: &DecodeOptions) -> Self {
        let sizes = tx.sizes();
        let total = tx.total_output_value();

        TransactionView {
            version: tx.version,
            segwit: tx.segwit,
            inputs: tx.inputs.iter().map(|i| InputView::new(i, options)).collect(),
            outputs: tx.outputs.iter().map(|o| OutputView::new(o, network)).collect(),
            locktime: options.render_u32(tx.locktime),
            raw_byte_length: tx.raw_byte_length,
            segments: tx.segments.iter().map(SegmentView::from).collect(),
            txid: tx.txid_hex(),
            wtxid: tx.wtxid_hex(),
            size: sizes.map(|s| s.total),
            base_size: sizes.map(|s| s.base),
            weight: sizes.map(|s| s.weight),
            vsize: sizes.map(|s| s.vsize),
            total_output_satoshis: total.map(|t| t.to_string()),
            total_output_btc: total.map(decoder_core::transaction::format_btc),
            coinbase: tx.is_coinbase(),
            error: tx.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Hash Tool page result.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashView {
    pub input_length: usize,
    pub sha256: Option<String>,
    pub hash256: Option<String>,
    pub ripemd160: Option<String>,
    pub hash160: Option<String>,
    pub error: Option<String>,
}

impl ToJs for HashView {}

impl From<Result<HashDigests, HexError>> for HashView {
    fn from(result: Result<HashDigests, HexError>) -> Self {
        match result {
            Ok(digests) => HashView {
                input_length: digests.input_len,
                sha256: Some(hex::encode(digests.sha256)),
                hash256: Some(hex::encode(digests.hash256)),
                ripemd160: Some(hex::encode(digests.ripemd160)),
                hash160: Some(hex::encode(digests.hash160)),
                error: None,
            },
            Err(err) => HashView {
                error: Some(err.to_string()),
                ..Default::default()
            },
        }
    }
}
