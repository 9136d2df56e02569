//! The block engine: reads and writes `type | u32 BE length | payload` records.
//!
//! Parsing is tolerant. A block whose decoder fails is kept as
//! [`Payload::Unparsed`] and parsing moves on; a block that runs past the end of
//! the stream is kept the same way and ends the parse. Only I/O failures and
//! nesting beyond [`MAX_DEPTH`] abort.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, WriteBytesExt};

use super::scheme;
use crate::{BlockIssue, Blocks, Payload, SgffError, MAX_DEPTH};

/// An undecoded block as it appears in the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawBlock {
    pub block_type: u8,
    pub data: Vec<u8>,
    /// Set when the stream ended before the declared length was read.
    pub issue: Option<BlockIssue>,
}
impl RawBlock {
    pub fn is_truncated(&self) -> bool {
        self.issue.is_some()
    }
}

/// Reads into `buf` until it is full or the reader is exhausted.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reads the next block, returning `None` on a clean end of stream.
///
/// The scheme's length override replaces the declared length (the length field
/// is still consumed).
pub fn read_raw_block<R: Read>(reader: &mut R) -> crate::Result<Option<RawBlock>> {
    let mut tag = [0u8; 1];
    if read_up_to(reader, &mut tag)? == 0 {
        return Ok(None);
    }
    let block_type = tag[0];

    let mut length = [0u8; 4];
    let filled = read_up_to(reader, &mut length)?;
    if filled < length.len() {
        return Ok(Some(RawBlock {
            block_type,
            data: length[..filled].to_vec(),
            issue: Some(BlockIssue::Truncated {
                declared: length.len() as u64,
                available: filled as u64,
            }),
        }));
    }
    let declared = scheme::entry(block_type)
        .length_override
        .unwrap_or_else(|| u32::from_be_bytes(length));

    let mut data = Vec::new();
    reader
        .by_ref()
        .take(u64::from(declared))
        .read_to_end(&mut data)?;
    let issue = (data.len() < declared as usize).then(|| BlockIssue::Truncated {
        declared: u64::from(declared),
        available: data.len() as u64,
    });
    Ok(Some(RawBlock {
        block_type,
        data,
        issue,
    }))
}

/// Iterator over the raw blocks of a stream.
///
/// Ends after the first truncated block or I/O error.
pub struct RawBlocks<R: Read> {
    inner: R,
    done: bool,
}
impl<R: Read> RawBlocks<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for RawBlocks<R> {
    type Item = crate::Result<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_raw_block(&mut self.inner) {
            Ok(Some(block)) => {
                self.done = block.is_truncated();
                Some(Ok(block))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Decodes a raw block; `Ok(None)` for discarded types.
pub fn decode_raw_block(block: RawBlock, depth: usize) -> crate::Result<Option<Payload>> {
    let RawBlock {
        block_type,
        data,
        issue,
    } = block;
    if scheme::entry(block_type).codec == scheme::Codec::Skip {
        log::debug!("Discarding legacy block type {block_type} at depth {depth}");
        return Ok(None);
    }
    if let Some(issue) = issue {
        log::warn!("Block type {block_type} at depth {depth}: {issue}");
        return Ok(Some(Payload::Unparsed { data, issue }));
    }
    match scheme::decode(block_type, &data, depth) {
        Ok(payload) => {
            if let Some(payload) = &payload {
                log::debug!(
                    "Decoded block type {block_type} ({} bytes) as {} at depth {depth}",
                    data.len(),
                    payload.kind()
                );
            }
            Ok(payload)
        }
        Err(SgffError::Block(issue)) => {
            log::warn!("Keeping block type {block_type} at depth {depth} unparsed: {issue}");
            Ok(Some(Payload::Unparsed { data, issue }))
        }
        Err(e) => Err(e),
    }
}

/// Parses every block remaining in `reader` at the given nesting depth.
pub fn parse_blocks<R: Read>(reader: &mut R, depth: usize) -> crate::Result<Blocks> {
    if depth > MAX_DEPTH {
        return Err(SgffError::RecursionLimit { depth });
    }
    let mut blocks = Blocks::new();
    for raw in RawBlocks::new(reader) {
        let raw = raw?;
        let block_type = raw.block_type;
        if let Some(payload) = decode_raw_block(raw, depth)? {
            blocks.entry(block_type).or_default().push(payload);
        }
    }
    Ok(blocks)
}

/// Writes one block record.
pub fn write_block<W: Write>(
    writer: &mut W,
    block_type: u8,
    payload: &Payload,
    depth: usize,
) -> crate::Result<()> {
    let data = scheme::encode(block_type, payload, depth)?;
    let length = u32::try_from(data.len()).map_err(|_| {
        SgffError::unsupported(
            block_type,
            format!("payload of {} bytes exceeds the u32 length field", data.len()),
        )
    })?;
    writer.write_u8(block_type)?;
    writer.write_u32::<BigEndian>(length)?;
    writer.write_all(&data)?;
    Ok(())
}

/// Writes all blocks, types ascending and payloads in stored order.
pub fn write_blocks<W: Write>(writer: &mut W, blocks: &Blocks, depth: usize) -> crate::Result<()> {
    if depth > MAX_DEPTH {
        return Err(SgffError::RecursionLimit { depth });
    }
    for (&block_type, payloads) in blocks {
        for payload in payloads {
            write_block(writer, block_type, payload, depth)?;
        }
    }
    Ok(())
}

pub fn serialize_blocks(blocks: &Blocks, depth: usize) -> crate::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_blocks(&mut out, blocks, depth)?;
    Ok(out)
}
