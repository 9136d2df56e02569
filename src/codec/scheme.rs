//! Per-block-type decode/encode dispatch.
//!
//! Each block type maps to a [`SchemeEntry`]: an optional length override and
//! the [`Codec`] that turns its payload bytes into a [`Payload`] and back. Types
//! absent from the table use [`Codec::Opaque`] and are carried verbatim.

use super::{
    blocks::{parse_blocks, serialize_blocks},
    compression::{xz_compress, xz_decompress},
    history::{decode_history_node, encode_history_node},
    sequence::{decode_compressed, decode_sequence, encode_compressed, encode_sequence, utf8},
    trace::{decode_trace, encode_trace},
};
use crate::{Payload, SgffError};

pub const DNA_BLOCK: u8 = 0;
pub const COMPRESSED_DNA_BLOCK: u8 = 1;
pub const PRIMERS_BLOCK: u8 = 5;
pub const NOTES_BLOCK: u8 = 6;
pub const HISTORY_TREE_BLOCK: u8 = 7;
pub const PROPERTIES_BLOCK: u8 = 8;
pub const FEATURES_BLOCK: u8 = 10;
pub const HISTORY_NODE_BLOCK: u8 = 11;
pub const LEGACY_TRACE_BLOCK: u8 = 16;
pub const ALIGNMENTS_BLOCK: u8 = 17;
pub const TRACE_BLOCK: u8 = 18;
pub const PROTEIN_BLOCK: u8 = 21;
pub const HISTORY_MODIFIER_BLOCK: u8 = 29;
pub const HISTORY_CONTENT_BLOCK: u8 = 30;
pub const RNA_BLOCK: u8 = 32;

/// How a block type's payload is interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Codec {
    Sequence,
    CompressedSequence,
    Text,
    CompressedText,
    HistoryNode,
    Trace,
    CompressedBlocks,
    /// Read and discarded; cannot be written.
    Skip,
    Opaque,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SchemeEntry {
    /// Replaces the length field read from the stream.
    pub length_override: Option<u32>,
    pub codec: Codec,
}

/// Looks up the scheme entry for a block type.
///
/// # Examples
///
/// ```rust
/// use sgff::codec::scheme::{entry, Codec};
///
/// assert_eq!(entry(0).codec, Codec::Sequence);
/// assert_eq!(entry(16).length_override, Some(4));
/// assert_eq!(entry(200).codec, Codec::Opaque);
/// ```
pub fn entry(block_type: u8) -> SchemeEntry {
    let codec = match block_type {
        DNA_BLOCK | PROTEIN_BLOCK | RNA_BLOCK => Codec::Sequence,
        COMPRESSED_DNA_BLOCK => Codec::CompressedSequence,
        PRIMERS_BLOCK | NOTES_BLOCK | PROPERTIES_BLOCK | FEATURES_BLOCK | 14
        | ALIGNMENTS_BLOCK | 28 => Codec::Text,
        HISTORY_TREE_BLOCK | HISTORY_MODIFIER_BLOCK => Codec::CompressedText,
        HISTORY_NODE_BLOCK => Codec::HistoryNode,
        LEGACY_TRACE_BLOCK => Codec::Skip,
        TRACE_BLOCK => Codec::Trace,
        HISTORY_CONTENT_BLOCK => Codec::CompressedBlocks,
        _ => Codec::Opaque,
    };
    let length_override = match codec {
        Codec::Skip => Some(4),
        _ => None,
    };
    SchemeEntry {
        length_override,
        codec,
    }
}

/// Whether the block type has a dedicated codec.
pub fn is_known(block_type: u8) -> bool {
    entry(block_type).codec != Codec::Opaque
}

/// Decodes a payload; `Ok(None)` means the block is discarded.
///
/// Recoverable failures come back as [`SgffError::Block`] for the caller to
/// turn into an unparsed fallback.
pub fn decode(block_type: u8, data: &[u8], depth: usize) -> crate::Result<Option<Payload>> {
    let payload = match entry(block_type).codec {
        Codec::Sequence => Payload::Sequence(decode_sequence(data)?),
        Codec::CompressedSequence => Payload::CompressedSequence(decode_compressed(data)?),
        Codec::Text => Payload::Text(utf8(data, "text block")?),
        Codec::CompressedText => {
            Payload::CompressedText(utf8(&xz_decompress(data)?, "compressed text block")?)
        }
        Codec::HistoryNode => Payload::HistoryNode(decode_history_node(data, depth)?),
        Codec::Trace => Payload::Trace(decode_trace(data)?),
        Codec::CompressedBlocks => {
            let decompressed = xz_decompress(data)?;
            Payload::CompressedBlocks(parse_blocks(&mut decompressed.as_slice(), depth + 1)?)
        }
        Codec::Skip => return Ok(None),
        Codec::Opaque => Payload::Opaque(data.to_vec()),
    };
    Ok(Some(payload))
}

/// Encodes a payload under its block type.
///
/// Unparsed payloads are written back verbatim under any type that can be
/// written at all. Any other payload must match the type's codec.
pub fn encode(block_type: u8, payload: &Payload, depth: usize) -> crate::Result<Vec<u8>> {
    let codec = entry(block_type).codec;
    match (codec, payload) {
        (Codec::Skip, _) => Err(SgffError::unsupported(
            block_type,
            "legacy placeholder blocks are never written",
        )),
        (_, Payload::Unparsed { data, .. }) => Ok(data.clone()),
        (Codec::Sequence, Payload::Sequence(sequence)) => Ok(encode_sequence(sequence)),
        (Codec::CompressedSequence, Payload::CompressedSequence(sequence)) => {
            encode_compressed(sequence, block_type)
        }
        (Codec::Text, Payload::Text(text)) => Ok(text.as_bytes().to_vec()),
        (Codec::CompressedText, Payload::CompressedText(text)) => xz_compress(text.as_bytes()),
        (Codec::HistoryNode, Payload::HistoryNode(node)) => encode_history_node(node, depth),
        (Codec::Trace, Payload::Trace(trace)) => encode_trace(trace),
        (Codec::CompressedBlocks, Payload::CompressedBlocks(blocks)) => {
            xz_compress(&serialize_blocks(blocks, depth + 1)?)
        }
        (Codec::Opaque, Payload::Opaque(data)) => Ok(data.clone()),
        (codec, payload) => Err(SgffError::unsupported(
            block_type,
            format!("{} payload does not fit the {codec:?} codec", payload.kind()),
        )),
    }
}
