//! Compressed streams embedded in block payloads.
//!
//! SnapGene wraps history trees, modifier records and nested containers in XZ
//! streams; these go through niffler so the format is detected from the stream
//! magic. ZTR chunks inside trace blocks use their own zlib and run-length
//! encodings, handled here with flate2.

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;
use niffler::compression::Format;

use crate::BlockIssue;

/// XZ compression preset used when re-encoding compressed blocks.
const XZ_LEVEL: niffler::Level = niffler::Level::Six;

/// Decompresses an XZ stream.
///
/// Uncompressed or differently compressed input is reported as a
/// [`BlockIssue::CompressionFailed`].
pub fn xz_decompress(data: &[u8]) -> Result<Vec<u8>, BlockIssue> {
    let (mut reader, format) =
        niffler::get_reader(Box::new(data)).map_err(BlockIssue::compression)?;
    if format != Format::Lzma {
        return Err(BlockIssue::compression(format!(
            "expected an xz stream, found {format:?}"
        )));
    }
    let mut decompressed = Vec::new();
    reader
        .read_to_end(&mut decompressed)
        .map_err(BlockIssue::compression)?;
    Ok(decompressed)
}

/// Compresses `data` into an XZ stream.
pub fn xz_compress(data: &[u8]) -> crate::Result<Vec<u8>> {
    let mut compressed = Vec::new();
    {
        let mut writer = niffler::get_writer(Box::new(&mut compressed), Format::Lzma, XZ_LEVEL)?;
        writer.write_all(data)?;
        writer.flush()?;
    }
    Ok(compressed)
}

/// ZTR chunk data encodings.
pub(crate) const ZTR_RAW: u8 = 0;
pub(crate) const ZTR_RLE: u8 = 1;
pub(crate) const ZTR_ZLIB: u8 = 2;

/// Expands a ZTR zlib chunk body (`u32 LE length | zlib stream`).
pub(crate) fn ztr_inflate(body: &[u8]) -> Result<Vec<u8>, BlockIssue> {
    if body.len() < 4 {
        return Err(BlockIssue::compression("zlib chunk shorter than its length prefix"));
    }
    let expected = LittleEndian::read_u32(&body[..4]) as usize;
    // one byte past the declared size is enough to detect an overlong stream
    let mut inflated = Vec::with_capacity(expected.min(body.len() * 4));
    ZlibDecoder::new(&body[4..])
        .take(expected as u64 + 1)
        .read_to_end(&mut inflated)
        .map_err(BlockIssue::compression)?;
    if inflated.len() != expected {
        return Err(BlockIssue::compression(format!(
            "zlib chunk inflated to {} bytes, header says {expected}",
            inflated.len()
        )));
    }
    Ok(inflated)
}

/// Expands a ZTR run-length chunk body (`u32 LE length | guard | data`).
///
/// A guard byte is followed by a count; a zero count is a literal guard byte,
/// otherwise the next byte is repeated `count` times.
pub(crate) fn ztr_unrle(body: &[u8]) -> Result<Vec<u8>, BlockIssue> {
    if body.len() < 5 {
        return Err(BlockIssue::compression("run-length chunk missing its header"));
    }
    let expected = LittleEndian::read_u32(&body[..4]) as usize;
    let guard = body[4];
    let mut out = Vec::with_capacity(expected.min(body.len() * 4));
    let mut iter = body[5..].iter().copied();
    while let Some(byte) = iter.next() {
        if byte != guard {
            out.push(byte);
        } else {
            match iter.next() {
                Some(0) => out.push(guard),
                Some(count) => {
                    let value = iter.next().ok_or_else(|| {
                        BlockIssue::compression("run-length chunk ends inside a run")
                    })?;
                    out.extend(std::iter::repeat_n(value, count as usize));
                }
                None => return Err(BlockIssue::compression("run-length chunk ends after a guard")),
            }
        }
        if out.len() > expected {
            break;
        }
    }
    if out.len() != expected {
        return Err(BlockIssue::compression(format!(
            "run-length chunk expanded to {} bytes, header says {expected}",
            out.len()
        )));
    }
    Ok(out)
}
