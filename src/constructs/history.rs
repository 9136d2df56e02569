use crate::{Blocks, CompressedSequence};

/// Serialization tag of a history node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequenceTag {
    Dna,
    Compressed,
    Protein,
    ModifierOnly,
    Rna,
    Other(u8),
}
impl SequenceTag {
    /// Whether the node carries a `u32 n | n bytes` symbol section.
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Dna | Self::Protein | Self::Rna)
    }
}

impl From<u8> for SequenceTag {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Dna,
            1 => Self::Compressed,
            21 => Self::Protein,
            29 => Self::ModifierOnly,
            32 => Self::Rna,
            other => Self::Other(other),
        }
    }
}

impl From<SequenceTag> for u8 {
    fn from(tag: SequenceTag) -> Self {
        match tag {
            SequenceTag::Dna => 0,
            SequenceTag::Compressed => 1,
            SequenceTag::Protein => 21,
            SequenceTag::ModifierOnly => 29,
            SequenceTag::Rna => 32,
            SequenceTag::Other(other) => other,
        }
    }
}

/// Sequence snapshot stored inside a history node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeSequence {
    Plain(String),
    Compressed(CompressedSequence),
}
impl NodeSequence {
    pub fn symbols(&self) -> String {
        match self {
            Self::Plain(symbols) => symbols.clone(),
            Self::Compressed(compressed) => compressed.symbols(),
        }
    }
}

/// One node of the edit history (block type 11).
///
/// `info` holds the trailing nested container, which typically carries the
/// node's features, primers and notes as they were at that point in history.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryNode {
    pub index: u32,
    pub tag: SequenceTag,
    pub sequence: Option<NodeSequence>,
    pub info: Blocks,
}
impl HistoryNode {
    /// A node that records only modifier blocks, with no sequence snapshot.
    pub fn modifier_only(index: u32) -> Self {
        Self {
            index,
            tag: SequenceTag::ModifierOnly,
            sequence: None,
            info: Blocks::new(),
        }
    }

    /// A node holding a packed DNA snapshot.
    pub fn compressed(index: u32, sequence: CompressedSequence) -> Self {
        Self {
            index,
            tag: SequenceTag::Compressed,
            sequence: Some(NodeSequence::Compressed(sequence)),
            info: Blocks::new(),
        }
    }

    /// A node holding a plain snapshot; `tag` should be one of the plain tags.
    pub fn plain(index: u32, tag: SequenceTag, symbols: impl Into<String>) -> Self {
        Self {
            index,
            tag,
            sequence: Some(NodeSequence::Plain(symbols.into())),
            info: Blocks::new(),
        }
    }

    pub fn with_info(mut self, info: Blocks) -> Self {
        self.info = info;
        self
    }

    /// Symbols of the snapshot, if any.
    pub fn symbols(&self) -> Option<String> {
        self.sequence.as_ref().map(NodeSequence::symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_conversion() {
        for raw in [0u8, 1, 21, 29, 32, 7, 255] {
            let tag = SequenceTag::from(raw);
            assert_eq!(u8::from(tag), raw);
        }
        assert_eq!(SequenceTag::from(29), SequenceTag::ModifierOnly);
        assert_eq!(SequenceTag::from(4), SequenceTag::Other(4));
    }

    #[test]
    fn test_plain_tags() {
        assert!(SequenceTag::Dna.is_plain());
        assert!(SequenceTag::Rna.is_plain());
        assert!(!SequenceTag::Compressed.is_plain());
        assert!(!SequenceTag::Other(3).is_plain());
    }

    #[test]
    fn test_node_symbols() {
        let node = HistoryNode::compressed(3, CompressedSequence::from_symbols("GATTACA"));
        assert_eq!(node.symbols().as_deref(), Some("GATTACA"));
        assert_eq!(HistoryNode::modifier_only(1).symbols(), None);
    }
}
