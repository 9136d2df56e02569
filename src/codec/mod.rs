//! Binary codecs for block payloads and the block engine that drives them.

pub mod blocks;
pub mod compression;
pub(crate) mod cursor;
pub mod history;
pub mod nucleotide;
pub mod scheme;
pub mod sequence;
pub mod trace;
