use std::collections::BTreeMap;

use crate::{BlockIssue, CompressedSequence, HistoryNode, Sequence, Trace};

/// Decoded blocks keyed by block type.
///
/// Types iterate in ascending order; repeated blocks of one type keep their
/// read (and write) order within the vector.
pub type Blocks = BTreeMap<u8, Vec<Payload>>;

/// The decoded content of a single block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    /// Plain DNA, protein or RNA sequence (types 0, 21, 32).
    Sequence(Sequence),

    /// 2-bit packed DNA (type 1).
    CompressedSequence(CompressedSequence),

    /// UTF-8 text, usually XML (types 5, 6, 8, 10, 14, 17, 28).
    Text(String),

    /// XZ-compressed UTF-8 text (types 7, 29).
    CompressedText(String),

    /// One node of the edit history (type 11).
    HistoryNode(HistoryNode),

    /// ZTR chromatogram (type 18).
    Trace(Trace),

    /// XZ-compressed nested container (type 30).
    CompressedBlocks(Blocks),

    /// A block type without a decoder, carried verbatim.
    Opaque(#[cfg_attr(feature = "serde", serde(with = "crate::constructs::hex"))] Vec<u8>),

    /// Raw bytes of a block whose decoder failed, with the reason.
    ///
    /// Re-emitted verbatim on write.
    Unparsed {
        #[cfg_attr(feature = "serde", serde(with = "crate::constructs::hex"))]
        data: Vec<u8>,
        issue: BlockIssue,
    },
}
impl Payload {
    /// Short variant name, used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sequence(_) => "sequence",
            Self::CompressedSequence(_) => "compressed-sequence",
            Self::Text(_) => "text",
            Self::CompressedText(_) => "compressed-text",
            Self::HistoryNode(_) => "history-node",
            Self::Trace(_) => "trace",
            Self::CompressedBlocks(_) => "compressed-blocks",
            Self::Opaque(_) => "opaque",
            Self::Unparsed { .. } => "unparsed",
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Self::Unparsed { .. })
    }

    pub fn issue(&self) -> Option<&BlockIssue> {
        match self {
            Self::Unparsed { issue, .. } => Some(issue),
            _ => None,
        }
    }

    /// Text content of `Text` and `CompressedText` payloads.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::CompressedText(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_compressed_sequence(&self) -> Option<&CompressedSequence> {
        match self {
            Self::CompressedSequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_history_node(&self) -> Option<&HistoryNode> {
        match self {
            Self::HistoryNode(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_trace(&self) -> Option<&Trace> {
        match self {
            Self::Trace(trace) => Some(trace),
            _ => None,
        }
    }

    pub fn as_blocks(&self) -> Option<&Blocks> {
        match self {
            Self::CompressedBlocks(blocks) => Some(blocks),
            _ => None,
        }
    }
}

impl From<Sequence> for Payload {
    fn from(sequence: Sequence) -> Self {
        Self::Sequence(sequence)
    }
}

impl From<CompressedSequence> for Payload {
    fn from(sequence: CompressedSequence) -> Self {
        Self::CompressedSequence(sequence)
    }
}

impl From<HistoryNode> for Payload {
    fn from(node: HistoryNode) -> Self {
        Self::HistoryNode(node)
    }
}

impl From<Trace> for Payload {
    fn from(trace: Trace) -> Self {
        Self::Trace(trace)
    }
}
