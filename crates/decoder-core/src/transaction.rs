//! Raw transaction decoding, legacy and SegWit serialization.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! version(4) [marker(1)=0x00 flag(1)!=0x00]
//! input_count(varint)  { prev_txid(32) prev_index(4) script_len(varint) script_sig sequence(4) }*
//! output_count(varint) { value(8) script_len(varint) script_pubkey }*
//! [ per input: item_count(varint) { item_len(varint) item }* ]
//! locktime(4)
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use crate::address::{address_from_script_pubkey, classify_script_pubkey, AddressType};
use crate::error::{Field, ReadError, TxError};
use crate::hash::{hash256, hash_to_display_hex};
use crate::hexutil::parse_hex;
use crate::network::Network;
use crate::reader::ByteReader;

/// Smallest possible transaction: version, two empty counts, locktime.
pub const MIN_TX_SIZE: usize = 10;

/// Smallest possible input: outpoint, empty script length, sequence.
const MIN_INPUT_SIZE: usize = 32 + 4 + 1 + 4;

/// Smallest possible output: value and empty script length.
const MIN_OUTPUT_SIZE: usize = 8 + 1;

pub const SATOSHIS_PER_BTC: u64 = 100_000_000;

/// A transaction input as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedInput {
    /// Previous txid in wire (internal) byte order.
    pub prev_txid: [u8; 32],
    pub prev_index: u32,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    /// Witness stack items; empty for legacy transactions.
    pub witness: Vec<Vec<u8>>,
}

impl DecodedInput {
    /// Previous txid as conventionally displayed (byte-reversed hex).
    pub fn prev_txid_hex(&self) -> String {
        hash_to_display_hex(&self.prev_txid)
    }

    /// Whether this input spends the null outpoint, as a coinbase input does.
    pub fn is_coinbase(&self) -> bool {
        self.prev_txid == [0u8; 32] && self.prev_index == u32::MAX
    }
}

/// A transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedOutput {
    pub value_satoshis: u64,
    pub script_pubkey: Vec<u8>,
}

impl DecodedOutput {
    /// Value in BTC with 8 decimals.
    pub fn value_btc(&self) -> String {
        format_btc(self.value_satoshis)
    }

    pub fn script_type(&self) -> AddressType {
        classify_script_pubkey(&self.script_pubkey).0
    }

    /// The address this output pays to, for standard scripts.
    pub fn address(&self, network: Network) -> Option<String> {
        address_from_script_pubkey(&self.script_pubkey, network)
    }

    /// Whether this is an OP_RETURN data carrier.
    pub fn is_op_return(&self) -> bool {
        self.script_pubkey.first() == Some(&0x6a)
    }
}

/// Named region of the raw bytes, used to highlight the hex dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Version,
    SegwitMarker,
    Inputs,
    Outputs,
    Witness,
    Locktime,
}

impl SegmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::Version => "Version",
            SegmentKind::SegwitMarker => "SegWit marker",
            SegmentKind::Inputs => "Inputs",
            SegmentKind::Outputs => "Outputs",
            SegmentKind::Witness => "Witness",
            SegmentKind::Locktime => "Locktime",
        }
    }
}

/// Half-open byte range `start..end` of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    fn new(kind: SegmentKind, start: usize, end: usize) -> Self {
        Segment { kind, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Size figures of a fully decoded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSizes {
    /// Serialized size including any witness data.
    pub total: usize,
    /// Size without marker, flag and witness.
    pub base: usize,
    /// `base * 3 + total` weight units.
    pub weight: usize,
    /// Weight divided by four, rounded up.
    pub vsize: usize,
}

/// Result of decoding a raw transaction.
///
/// On failure `error` is set and everything parsed before the failure
/// point (inputs, outputs, segments) is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTx {
    pub version: i32,
    pub segwit: bool,
    pub inputs: Vec<DecodedInput>,
    pub outputs: Vec<DecodedOutput>,
    pub locktime: u32,
    /// Number of bytes in the submitted hex.
    pub raw_byte_length: usize,
    pub segments: Vec<Segment>,
    /// Set only when decoding succeeded.
    pub txid: Option<[u8; 32]>,
    /// Hash of the full serialization, witness included. Equal to the txid
    /// for legacy transactions.
    pub wtxid: Option<[u8; 32]>,
    pub error: Option<TxError>,
}

impl DecodedTx {
    fn failed(error: TxError) -> Self {
        DecodedTx {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn segment(&self, kind: SegmentKind) -> Option<&Segment> {
        self.segments.iter().find(|s| s.kind == kind)
    }

    pub fn txid_hex(&self) -> Option<String> {
        self.txid.as_ref().map(hash_to_display_hex)
    }

    pub fn wtxid_hex(&self) -> Option<String> {
        self.wtxid.as_ref().map(hash_to_display_hex)
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_coinbase()
    }

    /// Sum of all output values, `None` on overflow.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, output| acc.checked_add(output.value_satoshis))
    }

    /// Size, weight and virtual size; `None` unless decoding succeeded.
    pub fn sizes(&self) -> Option<TxSizes> {
        if !self.is_valid() {
            return None;
        }
        let total = self.segment(SegmentKind::Locktime)?.end;
        let witness_overhead = [SegmentKind::SegwitMarker, SegmentKind::Witness]
            .iter()
            .filter_map(|kind| self.segment(*kind))
            .map(Segment::len)
            .sum::<usize>();
        let base = total - witness_overhead;
        let weight = base * 3 + total;
        Some(TxSizes {
            total,
            base,
            weight,
            vsize: weight.div_ceil(4),
        })
    }
}

/// Format satoshis as a BTC amount with exactly 8 decimals.
pub fn format_btc(satoshis: u64) -> String {
    format!(
        "{}.{:08}",
        satoshis / SATOSHIS_PER_BTC,
        satoshis % SATOSHIS_PER_BTC
    )
}

/// Decode a raw transaction given as hex.
///
/// Whitespace in the hex is ignored. Never fails: problems are reported
/// through `error`.
pub fn decode_raw_transaction(hex: &str) -> DecodedTx {
    let trimmed = hex.trim();
    if trimmed.is_empty() {
        return DecodedTx::failed(TxError::Empty);
    }

    match parse_hex(trimmed) {
        Ok(bytes) => decode_transaction_bytes(&bytes),
        Err(err) => {
            log::debug!("transaction hex rejected: {}", err);
            DecodedTx::failed(err.into())
        }
    }
}

/// Decode a raw transaction from bytes.
pub fn decode_transaction_bytes(bytes: &[u8]) -> DecodedTx {
    let mut tx = DecodedTx {
        raw_byte_length: bytes.len(),
        ..Default::default()
    };

    match parse_into(bytes, &mut tx) {
        Ok(()) => log::debug!(
            "decoded {} transaction: {} inputs, {} outputs",
            if tx.segwit { "segwit" } else { "legacy" },
            tx.inputs.len(),
            tx.outputs.len()
        ),
        Err(err) => {
            log::debug!(
                "transaction decode stopped after {} inputs, {} outputs: {}",
                tx.inputs.len(),
                tx.outputs.len(),
                err
            );
            tx.error = Some(err);
        }
    }

    tx
}

fn parse_into(bytes: &[u8], tx: &mut DecodedTx) -> Result<(), TxError> {
    if bytes.len() < MIN_TX_SIZE {
        return Err(TxError::TooShort(bytes.len()));
    }

    let mut reader = ByteReader::new(bytes);

    tx.version = reader.read_u32_le().map_err(|e| e.at(Field::Version))? as i32;
    tx.segments.push(Segment::new(SegmentKind::Version, 0, 4));

    // Marker 0x00 followed by a non-zero flag.
    if reader.peek(0) == Some(0x00) && reader.peek(1).is_some_and(|flag| flag != 0x00) {
        let start = reader.position();
        reader.read_bytes(2).map_err(|e| e.at(Field::Version))?;
        tx.segwit = true;
        tx.segments.push(Segment::new(SegmentKind::SegwitMarker, start, reader.position()));
    }

    let inputs_start = reader.position();
    let input_count = reader
        .read_compact_size()
        .map_err(|e| e.at(Field::InputCount))?;
    tx.inputs.reserve(bounded_capacity(input_count, reader.remaining(), MIN_INPUT_SIZE));
    for index in 0..input_count as usize {
        let input = read_input(&mut reader, index)?;
        tx.inputs.push(input);
    }
    tx.segments.push(Segment::new(SegmentKind::Inputs, inputs_start, reader.position()));

    let outputs_start = reader.position();
    let output_count = reader
        .read_compact_size()
        .map_err(|e| e.at(Field::OutputCount))?;
    tx.outputs.reserve(bounded_capacity(output_count, reader.remaining(), MIN_OUTPUT_SIZE));
    for index in 0..output_count as usize {
        let output = read_output(&mut reader, index)?;
        tx.outputs.push(output);
    }
    let outputs_end = reader.position();
    tx.segments.push(Segment::new(SegmentKind::Outputs, outputs_start, outputs_end));

    let locktime_start = if tx.segwit {
        let witness_start = reader.position();
        for (index, input) in tx.inputs.iter_mut().enumerate() {
            input.witness = read_witness(&mut reader, index)?;
        }
        tx.segments.push(Segment::new(SegmentKind::Witness, witness_start, reader.position()));

        // Locktime is the last four bytes.
        if reader.remaining() < 4 {
            return Err(TxError::Truncated(Field::Locktime));
        }
        bytes.len() - 4
    } else {
        if reader.remaining() < 4 {
            return Err(TxError::Truncated(Field::Locktime));
        }
        reader.position()
    };

    let locktime_end = locktime_start + 4;
    let locktime_bytes = &bytes[locktime_start..locktime_end];
    tx.locktime = u32::from_le_bytes([
        locktime_bytes[0],
        locktime_bytes[1],
        locktime_bytes[2],
        locktime_bytes[3],
    ]);
    tx.segments.push(Segment::new(SegmentKind::Locktime, locktime_start, locktime_end));

    // txid commits to the serialization without marker, flag and witness.
    let mut stripped = Vec::with_capacity(4 + (outputs_end - inputs_start) + 4);
    stripped.extend_from_slice(&bytes[..4]);
    stripped.extend_from_slice(&bytes[inputs_start..outputs_end]);
    stripped.extend_from_slice(locktime_bytes);
    let txid = hash256(&stripped);

    tx.txid = Some(txid);
    tx.wtxid = Some(if tx.segwit { hash256(&bytes[..locktime_end]) } else { txid });

    Ok(())
}

/// Capacity to reserve for `count` items, never more than the remaining
/// bytes could hold.
fn bounded_capacity(count: u64, remaining: usize, min_item_size: usize) -> usize {
    usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(remaining / min_item_size)
}

fn input_err(index: usize, part: &'static str) -> impl Fn(ReadError) -> TxError {
    move |err| err.at(Field::Input { index, part })
}

fn output_err(index: usize, part: &'static str) -> impl Fn(ReadError) -> TxError {
    move |err| err.at(Field::Output { index, part })
}

fn witness_err(input: usize, part: &'static str) -> impl Fn(ReadError) -> TxError {
    move |err| err.at(Field::Witness { input, part })
}

fn read_input(reader: &mut ByteReader<'_>, index: usize) -> Result<DecodedInput, TxError> {
    let prev_txid = reader.read_array::<32>().map_err(input_err(index, "previous txid"))?;
    let prev_index = reader.read_u32_le().map_err(input_err(index, "previous output index"))?;
    let script_sig = reader.read_var_bytes().map_err(input_err(index, "scriptSig"))?;
    let sequence = reader.read_u32_le().map_err(input_err(index, "sequence"))?;

    Ok(DecodedInput {
        prev_txid,
        prev_index,
        script_sig: script_sig.to_vec(),
        sequence,
        witness: Vec::new(),
    })
}

fn read_output(reader: &mut ByteReader<'_>, index: usize) -> Result<DecodedOutput, TxError> {
    let value_satoshis = reader.read_u64_le().map_err(output_err(index, "value"))?;
    let script_pubkey = reader.read_var_bytes().map_err(output_err(index, "scriptPubKey"))?;

    Ok(DecodedOutput {
        value_satoshis,
        script_pubkey: script_pubkey.to_vec(),
    })
}

fn read_witness(reader: &mut ByteReader<'_>, input: usize) -> Result<Vec<Vec<u8>>, TxError> {
    let count = reader
        .read_compact_size()
        .map_err(witness_err(input, "item count"))?;

    // Every item takes at least its one-byte length.
    let mut items = Vec::with_capacity(bounded_capacity(count, reader.remaining(), 1));
    for _ in 0..count {
        let item = reader.read_var_bytes().map_err(witness_err(input, "stack item"))?;
        items.push(item.to_vec());
    }
    Ok(items)
}
