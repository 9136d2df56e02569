mod container;
mod header;
#[cfg(feature = "serde")]
pub(crate) mod hex;
mod history;
mod payload;
mod sequence;
mod trace;

pub use container::{Alphabet, Container, History, SequenceView};
pub use header::{Header, FORMAT_NAME, HEADER_LENGTH, HEADER_SIZE, MAGIC};
pub use history::{HistoryNode, NodeSequence, SequenceTag};
pub use payload::{Blocks, Payload};
pub use sequence::{CompressedSequence, Sequence, SequenceFlags, COMPRESSED_HEADER_SIZE};
pub use trace::{Clip, Samples, Trace, ZTR_VERSION};
