//! ZTR chromatogram payloads (block type 18).
//!
//! A trace is an 8-byte magic, two version bytes, then a run of chunks:
//!
//! ```text
//! [type: 4 bytes][meta_len: u32 BE][meta][data_len: u32 BE][data]
//! ```
//!
//! The first data byte selects the chunk encoding (stored, run-length or zlib).
//! Compressed chunks are expanded and re-prefixed with a stored format byte so
//! the interpreters below only ever see stored data.

use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use indexmap::IndexMap;

use super::{
    compression::{ztr_inflate, ztr_unrle, ZTR_RAW, ZTR_RLE, ZTR_ZLIB},
    cursor::Cursor,
};
use crate::{BlockIssue, Clip, Samples, SgffError, Trace, TRACE_BLOCK};

pub const ZTR_MAGIC: [u8; 8] = [0xAE, b'Z', b'T', b'R', 0x0D, 0x0A, 0x1A, 0x0A];

/// Type, metadata length and data length.
const CHUNK_HEADER_SIZE: usize = 12;

const BASE: [u8; 4] = *b"BASE";
const BPOS: [u8; 4] = *b"BPOS";
const CNF1: [u8; 4] = *b"CNF1";
const CNF4: [u8; 4] = *b"CNF4";
const SMP4: [u8; 4] = *b"SMP4";
const TEXT: [u8; 4] = *b"TEXT";
const CLIP: [u8; 4] = *b"CLIP";
const CMNT: [u8; 4] = *b"CMNT";

pub fn decode_trace(data: &[u8]) -> Result<Trace, BlockIssue> {
    let mut cursor = Cursor::new(data);
    let magic = cursor.read_array::<8>("ZTR magic")?;
    if magic != ZTR_MAGIC {
        return Err(BlockIssue::decode(format!(
            "not a ZTR trace, magic was {magic:02x?}"
        )));
    }
    let mut trace = Trace {
        version: cursor.read_array::<2>("ZTR version")?,
        ..Default::default()
    };

    while cursor.remaining() >= CHUNK_HEADER_SIZE {
        let kind = cursor.read_array::<4>("chunk type")?;
        let meta_len = cursor.read_u32("chunk metadata length")? as usize;
        cursor.take(meta_len, "chunk metadata")?;
        let data_len = cursor.read_u32("chunk data length")? as usize;
        let body = cursor.take(data_len, "chunk data")?;

        log::trace!(
            "ZTR chunk {} ({data_len} bytes)",
            String::from_utf8_lossy(&kind)
        );
        if let Some(body) = expand_chunk(&kind, body)? {
            apply_chunk(&mut trace, kind, &body)?;
        }
    }
    Ok(trace)
}

fn expand_chunk<'a>(kind: &[u8; 4], body: &'a [u8]) -> Result<Option<Cow<'a, [u8]>>, BlockIssue> {
    let Some((&format, rest)) = body.split_first() else {
        return Ok(Some(Cow::Borrowed(body)));
    };
    let expanded = match format {
        ZTR_RAW => return Ok(Some(Cow::Borrowed(body))),
        ZTR_RLE => ztr_unrle(rest)?,
        ZTR_ZLIB => ztr_inflate(rest)?,
        other => {
            log::warn!(
                "Skipping ZTR chunk {} with unsupported encoding {other}",
                String::from_utf8_lossy(kind)
            );
            return Ok(None);
        }
    };
    let mut stored = Vec::with_capacity(1 + expanded.len());
    stored.push(ZTR_RAW);
    stored.extend(expanded);
    Ok(Some(Cow::Owned(stored)))
}

fn after<'a>(body: &'a [u8], header: usize, kind: &str) -> Result<&'a [u8], BlockIssue> {
    body.get(header..)
        .ok_or_else(|| BlockIssue::decode(format!("{kind} chunk shorter than its {header}-byte header")))
}

fn apply_chunk(trace: &mut Trace, kind: [u8; 4], body: &[u8]) -> Result<(), BlockIssue> {
    match kind {
        BASE => {
            let bases = after(body, 2, "BASE")?;
            trace.bases = Some(String::from_utf8_lossy(bases).into_owned());
        }
        BPOS => {
            let positions = after(body, 4, "BPOS")?;
            trace.positions = Some(
                positions
                    .chunks_exact(4)
                    .map(BigEndian::read_u32)
                    .collect(),
            );
        }
        CNF1 => {
            trace.confidence = Some(after(body, 1, "CNF1")?.to_vec());
        }
        CNF4 => {
            // called-base confidences precede the three other-base blocks
            let values = after(body, 1, "CNF4")?;
            trace.confidence = Some(values[..values.len() / 4].to_vec());
        }
        SMP4 => {
            let values = after(body, 2, "SMP4")?;
            let n = values.len() / 8;
            let channel = |idx: usize| -> Vec<u16> {
                values[idx * n * 2..(idx + 1) * n * 2]
                    .chunks_exact(2)
                    .map(BigEndian::read_u16)
                    .collect()
            };
            trace.samples = Some(Samples {
                a: channel(0),
                c: channel(1),
                g: channel(2),
                t: channel(3),
            });
        }
        TEXT => {
            let inner = after(body, 2, "TEXT")?;
            let inner = &inner[..inner.len().saturating_sub(2)];
            let fields: Vec<&[u8]> = inner.split(|&b| b == 0).collect();
            let text = fields
                .chunks_exact(2)
                .map(|pair| {
                    (
                        String::from_utf8_lossy(pair[0]).into_owned(),
                        String::from_utf8_lossy(pair[1]).into_owned(),
                    )
                })
                .collect::<IndexMap<_, _>>();
            trace.text = Some(text);
        }
        CLIP => {
            let mut cursor = Cursor::new(body);
            cursor.read_u8("CLIP format")?;
            trace.clip = Some(Clip {
                left: cursor.read_u32("CLIP left")?,
                right: cursor.read_u32("CLIP right")?,
            });
        }
        CMNT => {
            let comment = after(body, 1, "CMNT")?;
            trace.comments.push(String::from_utf8_lossy(comment).into_owned());
        }
        other => {
            log::debug!(
                "Ignoring ZTR chunk {}",
                String::from_utf8_lossy(&other)
            );
        }
    }
    Ok(())
}

/// Encodes a trace as stored chunks in a fixed order.
///
/// Fails when the four sample channels differ in length.
pub fn encode_trace(trace: &Trace) -> crate::Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(&ZTR_MAGIC);
    out.extend_from_slice(&trace.version);

    if let Some(bases) = &trace.bases {
        let mut body = vec![ZTR_RAW, 0];
        body.extend_from_slice(bases.as_bytes());
        write_chunk(&mut out, BASE, &body);
    }
    if let Some(positions) = &trace.positions {
        let mut body = vec![ZTR_RAW, 0, 0, 0];
        for &position in positions {
            body.write_u32::<BigEndian>(position)?;
        }
        write_chunk(&mut out, BPOS, &body);
    }
    if let Some(confidence) = &trace.confidence {
        let mut body = vec![ZTR_RAW];
        body.extend_from_slice(confidence);
        write_chunk(&mut out, CNF1, &body);
    }
    if let Some(samples) = &trace.samples {
        let n = samples.len();
        if samples.channels().iter().any(|channel| channel.len() != n) {
            return Err(SgffError::unsupported(
                TRACE_BLOCK,
                "sample channels have different lengths",
            ));
        }
        let mut body = vec![ZTR_RAW, 0];
        for channel in samples.channels() {
            for &value in channel {
                body.write_u16::<BigEndian>(value)?;
            }
        }
        write_chunk(&mut out, SMP4, &body);
    }
    if let Some(text) = &trace.text {
        let mut body = vec![ZTR_RAW, 0];
        for (idx, (key, value)) in text.iter().enumerate() {
            if idx > 0 {
                body.push(0);
            }
            body.extend_from_slice(key.as_bytes());
            body.push(0);
            body.extend_from_slice(value.as_bytes());
        }
        body.extend_from_slice(&[0, 0]);
        write_chunk(&mut out, TEXT, &body);
    }
    if let Some(clip) = &trace.clip {
        let mut body = vec![ZTR_RAW];
        body.write_u32::<BigEndian>(clip.left)?;
        body.write_u32::<BigEndian>(clip.right)?;
        write_chunk(&mut out, CLIP, &body);
    }
    for comment in &trace.comments {
        let mut body = vec![ZTR_RAW];
        body.extend_from_slice(comment.as_bytes());
        write_chunk(&mut out, CMNT, &body);
    }
    Ok(out)
}

fn write_chunk(out: &mut Vec<u8>, kind: [u8; 4], body: &[u8]) {
    out.extend_from_slice(&kind);
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::ZlibEncoder, Compression};
    use std::io::Write;

    fn ztr(chunks: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut out = ZTR_MAGIC.to_vec();
        out.extend_from_slice(&[1, 2]);
        for (kind, body) in chunks {
            write_chunk(&mut out, *kind, body);
        }
        out
    }

    #[test]
    fn test_base_and_clip() {
        let mut clip = vec![0];
        clip.extend_from_slice(&10u32.to_be_bytes());
        clip.extend_from_slice(&50u32.to_be_bytes());
        let data = ztr(&[(BASE, b"\x00\x00ACGT".to_vec()), (CLIP, clip)]);

        let trace = decode_trace(&data).unwrap();
        assert_eq!(trace.version, [1, 2]);
        assert_eq!(trace.bases.as_deref(), Some("ACGT"));
        assert_eq!(trace.clip, Some(Clip { left: 10, right: 50 }));
        assert!(trace.samples.is_none());
        assert!(trace.comments.is_empty());
    }

    #[test]
    fn test_bad_magic() {
        let mut data = ztr(&[]);
        data[1] = b'X';
        assert!(matches!(
            decode_trace(&data),
            Err(BlockIssue::DecodeFailed(_))
        ));
        assert!(decode_trace(b"short").is_err());
    }

    #[test]
    fn test_metadata_skipped() {
        let mut data = ZTR_MAGIC.to_vec();
        data.extend_from_slice(&[1, 2]);
        data.extend_from_slice(b"BASE");
        data.extend_from_slice(&3u32.to_be_bytes());
        data.extend_from_slice(b"xyz");
        data.extend_from_slice(&4u32.to_be_bytes());
        data.extend_from_slice(b"\x00\x00GC");
        assert_eq!(decode_trace(&data).unwrap().bases.as_deref(), Some("GC"));
    }

    #[test]
    fn test_samples_channel_major() {
        let mut body = vec![0, 0];
        for value in [1u16, 2, 10, 20, 100, 200, 1000, 2000] {
            body.extend_from_slice(&value.to_be_bytes());
        }
        let trace = decode_trace(&ztr(&[(SMP4, body)])).unwrap();
        let samples = trace.samples.unwrap();
        assert_eq!(samples.a, vec![1, 2]);
        assert_eq!(samples.c, vec![10, 20]);
        assert_eq!(samples.g, vec![100, 200]);
        assert_eq!(samples.t, vec![1000, 2000]);
    }

    #[test]
    fn test_text_pairs() {
        let body = b"\x00\x00NAME\x00read1\x00MACH\x00ABI3730\x00\x00".to_vec();
        let trace = decode_trace(&ztr(&[(TEXT, body)])).unwrap();
        assert_eq!(trace.text_value("NAME"), Some("read1"));
        assert_eq!(trace.text_value("MACH"), Some("ABI3730"));
        assert_eq!(trace.text.unwrap().len(), 2);
    }

    #[test]
    fn test_zlib_chunk() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"\x00TTGA").unwrap();
        let mut body = vec![ZTR_ZLIB];
        body.extend_from_slice(&5u32.to_le_bytes());
        body.extend(encoder.finish().unwrap());
        let trace = decode_trace(&ztr(&[(BASE, body)])).unwrap();
        assert_eq!(trace.bases.as_deref(), Some("TTGA"));
    }

    #[test]
    fn test_corrupt_zlib_chunk() {
        let body = vec![ZTR_ZLIB, 4, 0, 0, 0, 0xDE, 0xAD];
        assert!(matches!(
            decode_trace(&ztr(&[(BASE, body)])),
            Err(BlockIssue::CompressionFailed(_))
        ));
    }

    #[test]
    fn test_unknown_encoding_and_chunk_skipped() {
        let data = ztr(&[
            (BASE, vec![9, 1, 2, 3]),
            (*b"XXXX", vec![0, 1, 2]),
            (CMNT, b"\x00hello".to_vec()),
        ]);
        let trace = decode_trace(&data).unwrap();
        assert!(trace.bases.is_none());
        assert_eq!(trace.comments, vec!["hello".to_string()]);
    }

    #[test]
    fn test_chunk_overrun() {
        let mut data = ztr(&[(BASE, b"\x00\x00ACGT".to_vec())]);
        data.truncate(data.len() - 2);
        assert!(decode_trace(&data).is_err());
    }

    #[test]
    fn test_encode_is_stable() {
        let trace = Trace {
            version: [1, 3],
            bases: Some("ACGTN".into()),
            positions: Some(vec![5, 17, 30, 41, 55]),
            confidence: Some(vec![40, 38, 12, 50, 2]),
            samples: Some(Samples {
                a: vec![0, 500, 20],
                c: vec![1, 2, 3],
                g: vec![9, 9, 9],
                t: vec![65535, 0, 7],
            }),
            clip: Some(Clip { left: 1, right: 4 }),
            text: Some(IndexMap::from([
                ("NAME".to_string(), "sample".to_string()),
                ("EMPTY".to_string(), String::new()),
            ])),
            comments: vec!["first".into(), "second".into()],
        };
        let bytes = encode_trace(&trace).unwrap();
        let decoded = decode_trace(&bytes).unwrap();
        assert_eq!(decoded, trace);
        assert_eq!(encode_trace(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_absent_fields_emit_nothing() {
        let bytes = encode_trace(&Trace::default()).unwrap();
        assert_eq!(bytes.len(), 10);
        assert_eq!(decode_trace(&bytes).unwrap(), Trace::default());
    }

    #[test]
    fn test_unequal_channels_rejected() {
        let trace = Trace {
            samples: Some(Samples {
                a: vec![1, 2],
                c: vec![1],
                g: vec![1, 2],
                t: vec![1, 2],
            }),
            ..Default::default()
        };
        assert!(matches!(
            encode_trace(&trace),
            Err(SgffError::UnsupportedSerialization { block_type: 18, .. })
        ));
    }
}
