use proptest::prelude::*;

use decoder_core::base58::{encode_base58, encode_base58check, BASE58_ALPHABET};
use decoder_core::bech32::encode_segwit_address;
use decoder_core::reader::encode_compact_size;
use decoder_core::{
    decode_address, decode_base58check, decode_bech32, decode_raw_transaction,
    decode_transaction_bytes, hash160, ripemd160, sha256, AddressError, AddressType,
    SegmentKind,
};

fn arb_input() -> impl Strategy<Value = (Vec<u8>, u32, Vec<u8>, u32)> {
    (
        prop::collection::vec(any::<u8>(), 32),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..300),
        any::<u32>(),
    )
}

fn arb_output() -> impl Strategy<Value = (u64, Vec<u8>)> {
    (0u64..=2_100_000_000_000_000, prop::collection::vec(any::<u8>(), 0..300))
}

/// Serialize a legacy transaction. Callers pass at least one input so the
/// input count cannot be mistaken for a SegWit marker.
fn legacy_tx(
    version: u32,
    inputs: &[(Vec<u8>, u32, Vec<u8>, u32)],
    outputs: &[(u64, Vec<u8>)],
    locktime: u32,
) -> Vec<u8> {
    let mut raw = Vec::new();
    raw.extend_from_slice(&version.to_le_bytes());
    encode_compact_size(inputs.len() as u64, &mut raw);
    for (txid, index, script, sequence) in inputs {
        raw.extend_from_slice(txid);
        raw.extend_from_slice(&index.to_le_bytes());
        encode_compact_size(script.len() as u64, &mut raw);
        raw.extend_from_slice(script);
        raw.extend_from_slice(&sequence.to_le_bytes());
    }
    encode_compact_size(outputs.len() as u64, &mut raw);
    for (value, script) in outputs {
        raw.extend_from_slice(&value.to_le_bytes());
        encode_compact_size(script.len() as u64, &mut raw);
        raw.extend_from_slice(script);
    }
    raw.extend_from_slice(&locktime.to_le_bytes());
    raw
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hash160_is_ripemd_of_sha(data in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(hash160(&data), ripemd160(&sha256(&data)));
    }

    #[test]
    fn base58check_roundtrip_is_valid(version in any::<u8>(), payload in prop::collection::vec(any::<u8>(), 0..40)) {
        let encoded = encode_base58check(version, &payload);
        let decoded = decode_base58check(&encoded);

        prop_assert!(decoded.valid);
        prop_assert_eq!(decoded.version_byte, Some(version));
        prop_assert_eq!(decoded.payload, payload);
        prop_assert_eq!(decoded.checksum, decoded.expected_checksum);
    }

    #[test]
    fn base58check_single_flip_is_detected(
        payload in prop::collection::vec(any::<u8>(), 20),
        position in any::<prop::sample::Index>(),
        replacement in any::<prop::sample::Index>(),
    ) {
        let encoded = encode_base58check(0x00, &payload);
        let mut chars: Vec<char> = encoded.chars().collect();
        let i = position.index(chars.len());
        let new_char = BASE58_ALPHABET[replacement.index(58)] as char;
        prop_assume!(chars[i] != new_char);
        // Changing a leading '1' changes the decoded length, not just a digit.
        prop_assume!(chars[i] != '1' && new_char != '1');
        chars[i] = new_char;
        let flipped: String = chars.into_iter().collect();

        let decoded = decode_base58check(&flipped);
        prop_assert!(!decoded.valid);
        prop_assert!(decoded.error.is_some());
    }

    #[test]
    fn base58_encoding_preserves_leading_zeros(zeros in 0usize..5, rest in prop::collection::vec(1u8..=255, 0..10)) {
        let mut data = vec![0u8; zeros];
        data.extend(rest);
        let encoded = encode_base58(&data);
        prop_assert!(encoded.starts_with(&"1".repeat(zeros)));
        prop_assert_eq!(decoder_core::base58::decode_base58(&encoded).unwrap(), data);
    }

    #[test]
    fn segwit_addresses_classify(program in prop::collection::vec(any::<u8>(), 32), v0 in any::<bool>()) {
        let (version, expected) = if v0 { (0, AddressType::P2WSH) } else { (1, AddressType::P2TR) };
        let address = encode_segwit_address("tb", version, &program);
        let result = decode_address(&address);

        prop_assert!(result.valid);
        prop_assert_eq!(result.address_type, expected);
        prop_assert_eq!(&result.bech32().unwrap().data, &program);
    }

    #[test]
    fn bech32_decoding_never_panics(input in "\\PC{0,90}") {
        let result = decode_bech32(&input);
        prop_assert!(result.valid || result.error.is_some());
    }

    #[test]
    fn address_decoding_never_panics(input in "\\PC{0,90}") {
        let result = decode_address(&input);
        if !result.valid {
            prop_assert!(result.error.is_some());
        }
    }

    #[test]
    fn legacy_segments_cover_all_bytes(
        version in any::<u32>(),
        inputs in prop::collection::vec(arb_input(), 1..4),
        outputs in prop::collection::vec(arb_output(), 0..4),
        locktime in any::<u32>(),
    ) {
        let raw = legacy_tx(version, &inputs, &outputs, locktime);
        let tx = decode_transaction_bytes(&raw);

        prop_assert_eq!(&tx.error, &None);
        prop_assert!(!tx.segwit);
        prop_assert_eq!(tx.version, version as i32);
        prop_assert_eq!(tx.locktime, locktime);
        prop_assert_eq!(tx.inputs.len(), inputs.len());
        prop_assert_eq!(tx.outputs.len(), outputs.len());
        prop_assert!(tx.segment(SegmentKind::Witness).is_none());

        let covered: usize = tx.segments.iter().map(|s| s.len()).sum();
        prop_assert_eq!(covered, raw.len());

        for (decoded, (_, index, script, sequence)) in tx.inputs.iter().zip(&inputs) {
            prop_assert_eq!(decoded.prev_index, *index);
            prop_assert_eq!(&decoded.script_sig, script);
            prop_assert_eq!(decoded.sequence, *sequence);
        }
        for (decoded, (value, script)) in tx.outputs.iter().zip(&outputs) {
            prop_assert_eq!(decoded.value_satoshis, *value);
            prop_assert_eq!(&decoded.script_pubkey, script);
        }
    }

    #[test]
    fn truncation_never_panics_and_keeps_prefix(
        inputs in prop::collection::vec(arb_input(), 1..3),
        outputs in prop::collection::vec(arb_output(), 1..3),
        cut in any::<prop::sample::Index>(),
    ) {
        let raw = legacy_tx(1, &inputs, &outputs, 0);
        let end = cut.index(raw.len());
        let tx = decode_transaction_bytes(&raw[..end]);

        prop_assert!(tx.error.is_some());
        prop_assert!(tx.inputs.len() <= inputs.len());
        prop_assert!(tx.outputs.len() <= outputs.len());
        prop_assert_eq!(tx.txid, None);
    }

    #[test]
    fn decoders_are_idempotent(hex in "[0-9a-f ]{0,200}", address in "\\PC{0,64}") {
        prop_assert_eq!(decode_raw_transaction(&hex), decode_raw_transaction(&hex));
        prop_assert_eq!(decode_address(&address), decode_address(&address));
    }
}

#[test]
fn flipped_p2pkh_reports_checksum_mismatch() {
    let result = decode_address("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN3");
    assert_eq!(result.error, Some(AddressError::ChecksumMismatch));
}
