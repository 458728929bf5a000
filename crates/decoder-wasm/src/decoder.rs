//! Entry points for the three learning tools.
//!
//! Decoding failures come back inside the returned object as `error`.
//! Only bad arguments (unknown format, network or options) throw.

use wasm_bindgen::prelude::*;
use decoder_core::{HashDigests, InputFormat};
use crate::views::{AddressView, DecodeOptions, HashView, ToJs, TransactionView};

/// Decode a Base58Check or Bech32/Bech32m address.
#[wasm_bindgen(js_name = decodeAddress)]
pub fn decode_address(input: &str) -> Result<JsValue, JsValue> {
    let result = decoder_core::decode_address(input);
    AddressView::from(&result).to_js()
}

/// Decode a raw transaction from hex.
///
/// # Arguments
/// * `hex` - The raw transaction; whitespace is ignored
/// * `options` - Optional `{ signedIntegers, network }`
#[wasm_bindgen(js_name = decodeTransaction)]
pub fn decode_transaction(hex: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options = DecodeOptions::from_js(&options)?;
    let network = options.network().map_err(|e| JsValue::from_str(&e))?;

    let tx = decoder_core::decode_raw_transaction(hex);
    TransactionView::new(&tx, network, &options).to_js()
}

/// Hash text or hex input with all four hash functions.
///
/// # Arguments
/// * `input` - The text, or hex when `format` is "hex"
/// * `format` - "text" or "hex"
#[wasm_bindgen(js_name = hashInput)]
pub fn hash_input(input: &str, format: &str) -> Result<JsValue, JsValue> {
    let format = InputFormat::from_str(format)
        .ok_or_else(|| JsValue::from_str("Invalid input format"))?;
    HashView::from(HashDigests::from_input(input, format)).to_js()
}

/// Hash raw bytes with all four hash functions.
#[wasm_bindgen(js_name = hashBytes)]
pub fn hash_bytes(data: &[u8]) -> Result<JsValue, JsValue> {
    HashView::from(Ok(HashDigests::compute(data))).to_js()
}
