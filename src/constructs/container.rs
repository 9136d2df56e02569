use std::{cell::OnceCell, collections::BTreeMap, path::Path};

use crate::{
    codec::scheme::{
        ALIGNMENTS_BLOCK, COMPRESSED_DNA_BLOCK, DNA_BLOCK, FEATURES_BLOCK, HISTORY_NODE_BLOCK,
        HISTORY_TREE_BLOCK, NOTES_BLOCK, PRIMERS_BLOCK, PROPERTIES_BLOCK, PROTEIN_BLOCK,
        RNA_BLOCK, TRACE_BLOCK,
    },
    Blocks, CompressedSequence, Header, HistoryNode, Payload, Reader, Sequence, SequenceFlags,
    SgffError, Trace, Writer,
};

/// Symbol alphabet of a sequence block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alphabet {
    Dna,
    Protein,
    Rna,
}
impl Alphabet {
    pub fn from_block_type(block_type: u8) -> Option<Self> {
        match block_type {
            DNA_BLOCK | COMPRESSED_DNA_BLOCK => Some(Self::Dna),
            PROTEIN_BLOCK => Some(Self::Protein),
            RNA_BLOCK => Some(Self::Rna),
            _ => None,
        }
    }
}

/// The primary sequence of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceView {
    pub block_type: u8,
    pub alphabet: Alphabet,
    pub symbols: String,
    /// Topology and methylation flags; packed DNA carries none.
    pub flags: SequenceFlags,
}
impl SequenceView {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Edit history: the history tree text and every history node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    pub tree: Option<String>,
    pub nodes: Vec<HistoryNode>,
}
impl History {
    pub fn is_empty(&self) -> bool {
        self.tree.is_none() && self.nodes.is_empty()
    }

    pub fn node(&self, index: u32) -> Option<&HistoryNode> {
        self.nodes.iter().find(|node| node.index == index)
    }
}

/// Lazily built typed views, dropped on every raw mutation.
#[derive(Clone, Debug, Default)]
struct Views {
    sequence: OnceCell<Option<SequenceView>>,
    history: OnceCell<History>,
    traces: OnceCell<Vec<Trace>>,
}

/// A decoded SnapGene file: its header and every block.
///
/// Raw accessors work on [`Payload`]s by block type. Typed views
/// ([`Container::sequence`], [`Container::history`], [`Container::traces`]) are
/// built on first access and rebuilt after any mutation.
///
/// # Examples
///
/// ```rust
/// use sgff::{Container, Header, Payload, Sequence, Trace};
///
/// let mut container = Container::new(Header::new(1, 16, 16));
/// container.append(0, Payload::Sequence(Sequence::new("ACGT")));
/// container.append(18, Payload::Trace(Trace::with_bases("ACGT")));
///
/// assert_eq!(container.sequence().unwrap().symbols, "ACGT");
/// assert_eq!(container.traces().len(), 1);
///
/// container.remove(18);
/// assert!(container.traces().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Container {
    header: Header,
    blocks: Blocks,
    views: Views,
}
impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.blocks == other.blocks
    }
}
impl Container {
    pub fn new(header: Header) -> Self {
        Self::from_parts(header, Blocks::new())
    }

    pub fn from_parts(header: Header, blocks: Blocks) -> Self {
        Self {
            header,
            blocks,
            views: Views::default(),
        }
    }

    pub fn into_parts(self) -> (Header, Blocks) {
        (self.header, self.blocks)
    }

    /// Decodes a file held in memory.
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        Reader::new(bytes)?.into_container()
    }

    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new(), self.header)?;
        writer.write_blocks(&self.blocks)?;
        writer.finish()?;
        Ok(writer.into_inner())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        Reader::from_path(path)?.into_container()
    }

    /// Writes the container to a file.
    ///
    /// Every block is encoded before the file is created, so a payload that
    /// cannot be serialized leaves no partial file behind.
    pub fn to_path<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn set_header(&mut self, header: Header) {
        self.header = header;
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    /// Mutable access to every block; typed views are invalidated.
    pub fn blocks_mut(&mut self) -> &mut Blocks {
        self.invalidate();
        &mut self.blocks
    }

    fn invalidate(&mut self) {
        self.views = Views::default();
    }

    /// All payloads of a type, in file order.
    pub fn get(&self, block_type: u8) -> &[Payload] {
        self.blocks.get(&block_type).map_or(&[], Vec::as_slice)
    }

    pub fn first(&self, block_type: u8) -> Option<&Payload> {
        self.get(block_type).first()
    }

    pub fn contains(&self, block_type: u8) -> bool {
        !self.get(block_type).is_empty()
    }

    pub fn append(&mut self, block_type: u8, payload: Payload) {
        self.invalidate();
        self.blocks.entry(block_type).or_default().push(payload);
    }

    /// Replaces every payload of a type; an empty vector removes the type.
    pub fn replace(&mut self, block_type: u8, payloads: Vec<Payload>) {
        self.invalidate();
        if payloads.is_empty() {
            self.blocks.remove(&block_type);
        } else {
            self.blocks.insert(block_type, payloads);
        }
    }

    pub fn remove(&mut self, block_type: u8) -> Vec<Payload> {
        self.invalidate();
        self.blocks.remove(&block_type).unwrap_or_default()
    }

    /// Drops every block type not listed in `keep`.
    pub fn retain_types(&mut self, keep: &[u8]) {
        self.invalidate();
        self.blocks.retain(|block_type, _| keep.contains(block_type));
    }

    /// Number of payloads per block type.
    pub fn counts(&self) -> BTreeMap<u8, usize> {
        self.blocks
            .iter()
            .map(|(&block_type, payloads)| (block_type, payloads.len()))
            .collect()
    }

    /// The primary sequence: the first plain sequence block, else packed DNA.
    pub fn sequence(&self) -> Option<&SequenceView> {
        self.views
            .sequence
            .get_or_init(|| self.build_sequence_view())
            .as_ref()
    }

    fn build_sequence_view(&self) -> Option<SequenceView> {
        for block_type in [DNA_BLOCK, PROTEIN_BLOCK, RNA_BLOCK] {
            if let Some(sequence) = self.first(block_type).and_then(Payload::as_sequence) {
                return Some(SequenceView {
                    block_type,
                    alphabet: Alphabet::from_block_type(block_type)?,
                    symbols: sequence.symbols.clone(),
                    flags: sequence.flags,
                });
            }
        }
        let compressed = self
            .first(COMPRESSED_DNA_BLOCK)
            .and_then(Payload::as_compressed_sequence)?;
        Some(SequenceView {
            block_type: COMPRESSED_DNA_BLOCK,
            alphabet: Alphabet::Dna,
            symbols: compressed.symbols(),
            flags: SequenceFlags::default(),
        })
    }

    pub fn history(&self) -> &History {
        self.views.history.get_or_init(|| History {
            tree: self
                .first(HISTORY_TREE_BLOCK)
                .and_then(Payload::as_text)
                .map(str::to_owned),
            nodes: self
                .get(HISTORY_NODE_BLOCK)
                .iter()
                .filter_map(Payload::as_history_node)
                .cloned()
                .collect(),
        })
    }

    /// Every decoded chromatogram; traces that failed to decode are skipped.
    pub fn traces(&self) -> &[Trace] {
        self.views.traces.get_or_init(|| {
            self.get(TRACE_BLOCK)
                .iter()
                .filter_map(Payload::as_trace)
                .cloned()
                .collect()
        })
    }

    /// Text of the first block of a text-bearing type.
    pub fn text(&self, block_type: u8) -> Option<&str> {
        self.first(block_type).and_then(Payload::as_text)
    }

    pub fn notes_xml(&self) -> Option<&str> {
        self.text(NOTES_BLOCK)
    }

    pub fn features_xml(&self) -> Option<&str> {
        self.text(FEATURES_BLOCK)
    }

    pub fn primers_xml(&self) -> Option<&str> {
        self.text(PRIMERS_BLOCK)
    }

    pub fn properties_xml(&self) -> Option<&str> {
        self.text(PROPERTIES_BLOCK)
    }

    pub fn alignments_xml(&self) -> Option<&str> {
        self.text(ALIGNMENTS_BLOCK)
    }

    /// Makes `sequence` the only sequence block, stored under `block_type`.
    ///
    /// `block_type` must be one of the plain sequence types (0, 21, 32).
    pub fn set_sequence(&mut self, block_type: u8, sequence: Sequence) -> crate::Result<()> {
        if !matches!(block_type, DNA_BLOCK | PROTEIN_BLOCK | RNA_BLOCK) {
            return Err(SgffError::unsupported(
                block_type,
                "not a plain sequence block type",
            ));
        }
        self.clear_sequences();
        self.append(block_type, Payload::Sequence(sequence));
        Ok(())
    }

    /// Makes packed DNA the only sequence block.
    pub fn set_compressed_sequence(&mut self, sequence: CompressedSequence) {
        self.clear_sequences();
        self.append(COMPRESSED_DNA_BLOCK, Payload::CompressedSequence(sequence));
    }

    fn clear_sequences(&mut self) {
        for block_type in [DNA_BLOCK, COMPRESSED_DNA_BLOCK, PROTEIN_BLOCK, RNA_BLOCK] {
            self.remove(block_type);
        }
    }

    /// Replaces every trace block.
    pub fn set_traces(&mut self, traces: Vec<Trace>) {
        self.replace(TRACE_BLOCK, traces.into_iter().map(Payload::Trace).collect());
    }

    pub fn push_history_node(&mut self, node: HistoryNode) {
        self.append(HISTORY_NODE_BLOCK, Payload::HistoryNode(node));
    }
}
