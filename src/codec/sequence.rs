//! Plain and 2-bit packed sequence payloads.
//!
//! Plain sequences (types 0, 21, 32) are a property byte followed by the
//! symbols. Packed DNA (type 1) is `u32 region_len | u32 length | 14 opaque
//! bytes | packed`, where `region_len` counts everything after itself up to the
//! end of the packed bytes.

use super::{cursor::Cursor, nucleotide};
use crate::{
    constructs::COMPRESSED_HEADER_SIZE, BlockIssue, CompressedSequence, Sequence, SequenceFlags,
    SgffError,
};

pub fn decode_sequence(data: &[u8]) -> Result<Sequence, BlockIssue> {
    let mut cursor = Cursor::new(data);
    let flags = SequenceFlags(cursor.read_u8("sequence flags")?);
    let symbols = utf8(cursor.rest(), "sequence symbols")?;
    Ok(Sequence { flags, symbols })
}

pub fn encode_sequence(sequence: &Sequence) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + sequence.symbols.len());
    out.push(sequence.flags.bits());
    out.extend_from_slice(sequence.symbols.as_bytes());
    out
}

/// Decodes `u32 region_len | region | trailer`.
///
/// The packed bytes keep everything in the region after the opaque header, so
/// `region_len` is reproduced exactly on encode.
pub fn decode_compressed(data: &[u8]) -> Result<CompressedSequence, BlockIssue> {
    let mut cursor = Cursor::new(data);
    let region_len = cursor.read_u32("compressed region length")? as usize;
    let region = cursor.take(region_len, "compressed region")?;
    let mut sequence = decode_region(region)?;
    sequence.trailer = cursor.rest().to_vec();
    Ok(sequence)
}

fn decode_region(region: &[u8]) -> Result<CompressedSequence, BlockIssue> {
    let mut cursor = Cursor::new(region);
    let length = cursor.read_u32("symbol count")?;
    let header = cursor.read_array::<COMPRESSED_HEADER_SIZE>("compressed header")?;
    let packed = cursor.rest();
    let required = nucleotide::packed_len(length as usize);
    if packed.len() < required {
        log::warn!(
            "{length} symbols need {required} packed bytes, region holds {}; keeping the short sequence",
            packed.len()
        );
    }
    Ok(CompressedSequence {
        length,
        header,
        packed: packed.to_vec(),
        trailer: Vec::new(),
    })
}

/// Writes `u32 region_len | region | trailer`.
pub fn encode_compressed(
    sequence: &CompressedSequence,
    block_type: u8,
) -> crate::Result<Vec<u8>> {
    let region_len = sequence.region_len();
    let mut out = Vec::with_capacity(4 + region_len + sequence.trailer.len());
    write_compressed(&mut out, sequence, block_type)?;
    Ok(out)
}

pub(crate) fn write_compressed(
    out: &mut Vec<u8>,
    sequence: &CompressedSequence,
    block_type: u8,
) -> crate::Result<()> {
    let region_len = length_field(sequence.region_len(), block_type, "packed region")?;
    out.extend_from_slice(&region_len.to_be_bytes());
    out.extend_from_slice(&sequence.length.to_be_bytes());
    out.extend_from_slice(&sequence.header);
    out.extend_from_slice(&sequence.packed);
    out.extend_from_slice(&sequence.trailer);
    Ok(())
}

/// Checked conversion of an in-memory length to a u32 length field.
pub(crate) fn length_field(len: usize, block_type: u8, field: &str) -> crate::Result<u32> {
    u32::try_from(len).map_err(|_| {
        SgffError::unsupported(
            block_type,
            format!("{field} of {len} bytes exceeds the u32 length field"),
        )
    })
}

pub(crate) fn utf8(bytes: &[u8], field: &str) -> Result<String, BlockIssue> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| BlockIssue::decode(format!("{field} is not valid UTF-8: {e}")))
}
