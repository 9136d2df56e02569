//! History node payloads (block type 11).
//!
//! ```text
//! [index: u32 BE][tag: u8][section][nested blocks ...]
//! ```
//!
//! The section depends on the tag: packed DNA nodes carry a compressed region,
//! plain nodes carry `u32 n | n symbol bytes`, and every other tag (including the
//! modifier-only tag) carries nothing. Whatever follows the section is a nested
//! container holding the node's annotations.

use byteorder::{BigEndian, WriteBytesExt};

use super::{
    blocks::{parse_blocks, serialize_blocks},
    cursor::Cursor,
    sequence::{decode_compressed, length_field, utf8, write_compressed},
};
use crate::{HistoryNode, NodeSequence, SequenceTag, SgffError, HISTORY_NODE_BLOCK};

pub fn decode_history_node(data: &[u8], depth: usize) -> crate::Result<HistoryNode> {
    let mut cursor = Cursor::new(data);
    let index = cursor.read_u32("node index")?;
    let tag = SequenceTag::from(cursor.read_u8("node tag")?);

    let sequence = match tag {
        SequenceTag::Compressed => {
            let start = cursor.position();
            let region_len = cursor.read_u32("compressed region length")? as usize;
            cursor.take(region_len, "compressed region")?;
            let region = &data[start..cursor.position()];
            Some(NodeSequence::Compressed(decode_compressed(region)?))
        }
        tag if tag.is_plain() => {
            let len = cursor.read_u32("sequence length")? as usize;
            let symbols = cursor.take(len, "sequence symbols")?;
            Some(NodeSequence::Plain(utf8(symbols, "sequence symbols")?))
        }
        _ => None,
    };

    let mut rest = cursor.rest();
    let info = if rest.is_empty() {
        Default::default()
    } else {
        parse_blocks(&mut rest, depth + 1)?
    };

    Ok(HistoryNode {
        index,
        tag,
        sequence,
        info,
    })
}

pub fn encode_history_node(node: &HistoryNode, depth: usize) -> crate::Result<Vec<u8>> {
    let mut out = Vec::new();
    out.write_u32::<BigEndian>(node.index)?;
    out.write_u8(node.tag.into())?;

    match (node.tag, &node.sequence) {
        (SequenceTag::Compressed, Some(NodeSequence::Compressed(compressed))) => {
            if !compressed.trailer.is_empty() {
                return Err(SgffError::unsupported(
                    HISTORY_NODE_BLOCK,
                    "compressed history sequence cannot carry trailing bytes",
                ));
            }
            write_compressed(&mut out, compressed, HISTORY_NODE_BLOCK)?;
        }
        (tag, Some(NodeSequence::Plain(symbols))) if tag.is_plain() => {
            out.write_u32::<BigEndian>(length_field(
                symbols.len(),
                HISTORY_NODE_BLOCK,
                "history sequence",
            )?)?;
            out.extend_from_slice(symbols.as_bytes());
        }
        (SequenceTag::Compressed, _) => {
            return Err(SgffError::unsupported(
                HISTORY_NODE_BLOCK,
                format!("node {} is tagged compressed without a packed sequence", node.index),
            ))
        }
        (tag, None) if !tag.is_plain() => {}
        (tag, _) => {
            return Err(SgffError::unsupported(
                HISTORY_NODE_BLOCK,
                format!("node {} sequence does not match tag {tag:?}", node.index),
            ))
        }
    }

    out.extend(serialize_blocks(&node.info, depth + 1)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blocks, CompressedSequence, Payload, MAX_DEPTH};

    #[test]
    fn test_modifier_only_exact() {
        let data = [0, 0, 0, 7, 29];
        let node = decode_history_node(&data, 0).unwrap();
        assert_eq!(node, HistoryNode::modifier_only(7));
        assert_eq!(encode_history_node(&node, 0).unwrap(), data.to_vec());
    }

    #[test]
    fn test_plain_node_with_info() {
        let mut info = Blocks::new();
        info.insert(6, vec![Payload::Text("<Notes/>".into())]);
        let node = HistoryNode::plain(2, SequenceTag::Dna, "ACGT").with_info(info);

        let bytes = encode_history_node(&node, 0).unwrap();
        assert_eq!(&bytes[..5], &[0, 0, 0, 2, 0]);
        assert_eq!(&bytes[5..9], &[0, 0, 0, 4]);
        assert_eq!(&bytes[9..13], b"ACGT");
        assert_eq!(bytes[13], 6);

        let decoded = decode_history_node(&bytes, 0).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(encode_history_node(&decoded, 0).unwrap(), bytes);
    }

    #[test]
    fn test_compressed_node() {
        let node = HistoryNode::compressed(5, CompressedSequence::from_symbols("GATTACAG"));
        let bytes = encode_history_node(&node, 0).unwrap();
        // index, tag, region length (4 + 14 + 2)
        assert_eq!(&bytes[..9], &[0, 0, 0, 5, 1, 0, 0, 0, 20]);
        assert_eq!(bytes.len(), 9 + 20);

        let decoded = decode_history_node(&bytes, 0).unwrap();
        assert_eq!(decoded.symbols().as_deref(), Some("GATTACAG"));
        assert_eq!(decoded, node);
    }

    #[test]
    fn test_short_packed_region_keeps_info() {
        // region declares 8 symbols but holds a single packed byte
        let mut data = vec![0, 0, 0, 3, 1, 0, 0, 0, 19, 0, 0, 0, 8];
        data.extend_from_slice(&[0u8; 14]);
        data.push(0b0001_1011);
        data.extend_from_slice(&[6, 0, 0, 0, 8]);
        data.extend_from_slice(b"<Notes/>");

        let node = decode_history_node(&data, 0).unwrap();
        assert_eq!(node.symbols().as_deref(), Some("GATC"));
        assert_eq!(node.info[&6], vec![Payload::Text("<Notes/>".into())]);
        assert_eq!(encode_history_node(&node, 0).unwrap(), data);
    }

    #[test]
    fn test_other_tag_has_no_section() {
        let mut data = vec![0, 0, 0, 1, 4];
        data.extend_from_slice(&[6, 0, 0, 0, 2, b'h', b'i']);
        let node = decode_history_node(&data, 0).unwrap();
        assert_eq!(node.tag, SequenceTag::Other(4));
        assert!(node.sequence.is_none());
        assert_eq!(node.info[&6], vec![Payload::Text("hi".into())]);
        assert_eq!(encode_history_node(&node, 0).unwrap(), data);
    }

    #[test]
    fn test_truncated_section() {
        let data = [0, 0, 0, 1, 0, 0, 0, 0, 10, b'A'];
        assert!(matches!(
            decode_history_node(&data, 0),
            Err(SgffError::Block(_))
        ));
    }

    #[test]
    fn test_mismatched_sequence_rejected() {
        let mut node = HistoryNode::modifier_only(1);
        node.sequence = Some(NodeSequence::Plain("ACGT".into()));
        assert!(matches!(
            encode_history_node(&node, 0),
            Err(SgffError::UnsupportedSerialization { block_type: 11, .. })
        ));

        let node = HistoryNode {
            index: 1,
            tag: SequenceTag::Rna,
            sequence: None,
            info: Blocks::new(),
        };
        assert!(encode_history_node(&node, 0).is_err());
    }

    #[test]
    fn test_depth_limit() {
        let data = [0, 0, 0, 1, 29, 6, 0, 0, 0, 0];
        assert!(decode_history_node(&data, MAX_DEPTH - 1).is_ok());
        assert!(matches!(
            decode_history_node(&data, MAX_DEPTH),
            Err(SgffError::RecursionLimit { .. })
        ));
    }
}
