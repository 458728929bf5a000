//! WebAssembly bindings for the Bitcoin learning tools.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Hashing text, hex or bytes (SHA256, HASH256, RIPEMD160, HASH160)
//! - Decoding Base58Check and Bech32/Bech32m addresses
//! - Decoding raw legacy and SegWit transactions

use wasm_bindgen::prelude::*;

pub mod decoder;
pub mod logger;
pub mod views;

pub use decoder::{decode_address, decode_transaction, hash_bytes, hash_input};
pub use views::DecodeOptions;

/// Initialize the WASM module with better panic messages and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logger::init(log::LevelFilter::Info);
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
