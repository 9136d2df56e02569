//! # sgff - SnapGene File Format reader and writer
//!
//! `sgff` reads and writes SnapGene files (`.dna`, `.prot`, `.rna`, `.ab1`
//! imports): a binary container of typed, length-prefixed blocks. Some blocks
//! hold sequences, some XML, some ZTR chromatograms, and some XZ streams that
//! contain another block sequence. Binary-structured payloads (sequences,
//! packed DNA, history nodes, traces) re-encode byte for byte; text and
//! compressed text re-encode to equivalent content.
//!
//! ## Format
//!
//! All integers are big-endian.
//!
//! ### Header (19 bytes)
//! - Magic: `0x09`
//! - Header length: `u32`, always `14`
//! - Format name: `"SnapGene"`
//! - Sequence kind, export version, import version: `u16` each
//!
//! ### Blocks
//! - Type: `u8`
//! - Length: `u32`
//! - Payload: `length` bytes, interpreted per type (see [`codec::scheme`])
//!
//! Blocks run until the end of the stream. A type may repeat; repeats are kept in
//! file order.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sgff::{Container, Header, Payload, Sequence, SequenceFlags};
//!
//! # fn main() -> sgff::Result<()> {
//! let mut flags = SequenceFlags::default();
//! flags.set_circular(true);
//! flags.set_double_stranded(true);
//!
//! let mut container = Container::new(Header::new(1, 16, 16));
//! container.set_sequence(0, Sequence::with_flags("ATGCATGC", flags))?;
//! container.append(6, Payload::Text("<Notes><Type>Synthetic</Type></Notes>".into()));
//!
//! let bytes = container.to_bytes()?;
//! let parsed = sgff::read(bytes.as_slice())?;
//!
//! let sequence = parsed.sequence().unwrap();
//! assert_eq!(sequence.symbols, "ATGCATGC");
//! assert!(sequence.flags.circular());
//! assert_eq!(parsed.notes_xml(), Some("<Notes><Type>Synthetic</Type></Notes>"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Tolerant Parsing
//!
//! A block that cannot be decoded does not fail the read. Its bytes are kept
//! as [`Payload::Unparsed`] along with a [`BlockIssue`] and written back
//! unchanged:
//!
//! ```rust
//! use sgff::{BlockIssue, Header, Payload};
//!
//! # fn main() -> sgff::Result<()> {
//! let mut bytes = Header::default().to_bytes().to_vec();
//! // a type-7 block should be XZ-compressed text
//! bytes.extend_from_slice(&[7, 0, 0, 0, 3, b'a', b'b', b'c']);
//!
//! let container = sgff::read(bytes.as_slice())?;
//! assert!(matches!(
//!     container.first(7).and_then(Payload::issue),
//!     Some(BlockIssue::CompressionFailed(_))
//! ));
//! assert_eq!(container.to_bytes()?, bytes);
//! # Ok(())
//! # }
//! ```
//!
//! ## Files
//!
//! ```rust,no_run
//! use sgff::{Container, Reader};
//!
//! # fn main() -> sgff::Result<()> {
//! // gzip/xz/bzip2/zstd wrappers are removed transparently
//! let container = Container::from_path("pUC19.dna.gz")?;
//! for (block_type, count) in container.counts() {
//!     println!("{block_type}: {count}");
//! }
//!
//! // or walk the raw blocks without decoding
//! for block in Reader::from_path("pUC19.dna")? {
//!     let block = block?;
//!     println!("type {} ({} bytes)", block.block_type, block.data.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod constructs;
mod error;
mod io;

/// Deepest nesting of compressed or sub-container blocks that is decoded.
pub const MAX_DEPTH: usize = 8;

pub use codec::blocks::RawBlock;
pub use codec::scheme::{
    ALIGNMENTS_BLOCK, COMPRESSED_DNA_BLOCK, DNA_BLOCK, FEATURES_BLOCK, HISTORY_CONTENT_BLOCK,
    HISTORY_MODIFIER_BLOCK, HISTORY_NODE_BLOCK, HISTORY_TREE_BLOCK, LEGACY_TRACE_BLOCK,
    NOTES_BLOCK, PRIMERS_BLOCK, PROPERTIES_BLOCK, PROTEIN_BLOCK, RNA_BLOCK, TRACE_BLOCK,
};
pub use constructs::{
    Alphabet, Blocks, Clip, CompressedSequence, Container, Header, History, HistoryNode,
    NodeSequence, Payload, Samples, Sequence, SequenceFlags, SequenceTag, SequenceView, Trace,
    FORMAT_NAME, HEADER_LENGTH, HEADER_SIZE, MAGIC, ZTR_VERSION,
};
pub use error::{BlockIssue, Result, SgffError};
pub use io::{load_mapped, read, write, Reader, Writer};
