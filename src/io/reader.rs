//! Streaming reader for SnapGene files.
//!
//! The reader validates the header on construction and then yields the
//! top-level blocks undecoded. [`Reader::into_container`] runs the full decode.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::{
    codec::blocks::{decode_raw_block, RawBlock, RawBlocks},
    Blocks, Container, Header,
};

type BoxedReader = Box<dyn Read + Send>;

/// Streaming reader over the top-level blocks of a SnapGene file.
///
/// Iterating yields [`RawBlock`]s without running any decoder, which is what
/// inspection tools want. Use [`Reader::into_container`] (or [`crate::read`])
/// to decode everything into a [`Container`].
///
/// # Examples
///
/// ```rust
/// use sgff::{Container, Header, Payload, Reader, Sequence};
/// use std::io::Cursor;
///
/// # fn main() -> sgff::Result<()> {
/// let mut container = Container::new(Header::new(1, 15, 15));
/// container.append(0, Payload::Sequence(Sequence::new("ACGT")));
/// container.append(6, Payload::Text("<Notes/>".into()));
/// let bytes = container.to_bytes()?;
///
/// let reader = Reader::new(Cursor::new(bytes))?;
/// assert_eq!(reader.header().sequence_kind, 1);
///
/// let types: Vec<u8> = reader
///     .map(|block| block.map(|block| block.block_type))
///     .collect::<sgff::Result<_>>()?;
/// assert_eq!(types, vec![0, 6]);
/// # Ok(())
/// # }
/// ```
pub struct Reader<R: Read> {
    /// Raw block stream positioned after the header
    blocks: RawBlocks<R>,

    /// Validated file header
    header: Header,
}
impl<R: Read> Reader<R> {
    /// Creates a reader, reading and validating the 19-byte header.
    ///
    /// # Errors
    ///
    /// Returns a header error if the input is shorter than a header or does not
    /// carry the SnapGene magic, length constant and name.
    pub fn new(mut inner: R) -> crate::Result<Self> {
        let header = Header::from_reader(&mut inner)?;
        log::debug!(
            "Read header: kind {}, export v{}, import v{}",
            header.sequence_kind,
            header.export_version,
            header.import_version
        );
        Ok(Self {
            blocks: RawBlocks::new(inner),
            header,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Decodes the remaining blocks into a [`Container`].
    ///
    /// Blocks already taken through the iterator are not included.
    pub fn into_container(self) -> crate::Result<Container> {
        let header = self.header;
        let mut blocks = Blocks::new();
        for raw in self {
            let raw = raw?;
            let block_type = raw.block_type;
            if let Some(payload) = decode_raw_block(raw, 0)? {
                blocks.entry(block_type).or_default().push(payload);
            }
        }
        Ok(Container::from_parts(header, blocks))
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = crate::Result<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        self.blocks.next()
    }
}

impl Reader<BoxedReader> {
    /// Opens a file, transparently decompressing gzip/xz/bzip2/zstd wrappers.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use sgff::Reader;
    ///
    /// # fn main() -> sgff::Result<()> {
    /// let container = Reader::from_path("plasmid.dna")?.into_container()?;
    /// println!("{} block types", container.counts().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let rdr = File::open(path).map(BufReader::new)?;
        let (pt, _format) = niffler::send::get_reader(Box::new(rdr))?;
        Self::new(pt)
    }

    /// Reads from standard input, with the same decompression as [`Reader::from_path`].
    pub fn from_stdin() -> crate::Result<Self> {
        let rdr = Box::new(std::io::stdin());
        let (pt, _format) = niffler::send::get_reader(rdr)?;
        Self::new(pt)
    }

    /// Reads from the path if given, otherwise from standard input.
    pub fn from_optional_path<P: AsRef<Path>>(path: Option<P>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::from_stdin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockIssue, Payload, Sequence, SgffError};
    use std::io::Cursor;

    fn file_bytes(blocks: &[(u8, &[u8])]) -> Vec<u8> {
        let mut out = Header::new(1, 16, 16).to_bytes().to_vec();
        for (block_type, data) in blocks {
            out.push(*block_type);
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.extend_from_slice(data);
        }
        out
    }

    #[test]
    fn test_reader_header() {
        let reader = Reader::new(Cursor::new(file_bytes(&[]))).unwrap();
        assert_eq!(reader.header(), Header::new(1, 16, 16));
        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn test_reader_invalid_header() {
        let result = Reader::new(Cursor::new(vec![0u8; 19]));
        assert!(matches!(result, Err(SgffError::InvalidMagic { .. })));

        let result = Reader::new(Cursor::new(vec![0x09u8; 5]));
        assert!(matches!(result, Err(SgffError::TruncatedHeader { .. })));
    }

    #[test]
    fn test_raw_iteration() {
        let bytes = file_bytes(&[(0, b"\x00ACGT"), (6, b"<Notes/>")]);
        let blocks: Vec<RawBlock> = Reader::new(Cursor::new(bytes))
            .unwrap()
            .collect::<crate::Result<_>>()
            .unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].block_type, 6);
        assert_eq!(blocks[1].data, b"<Notes/>".to_vec());
    }

    #[test]
    fn test_into_container() {
        let mut bytes = file_bytes(&[(0, b"\x00ACGTACGT")]);
        bytes.extend_from_slice(&[6, 0, 0, 1, 0, b'<']);
        let container = Reader::new(Cursor::new(bytes))
            .unwrap()
            .into_container()
            .unwrap();
        assert_eq!(
            container.get(0),
            &[Payload::Sequence(Sequence::new("ACGTACGT"))]
        );
        assert_eq!(
            container.get(6)[0].issue(),
            Some(&BlockIssue::Truncated {
                declared: 256,
                available: 1
            })
        );
    }

    #[test]
    fn test_from_path_decompresses() {
        use std::io::Write;
        let bytes = file_bytes(&[(0, b"\x00GATTACA")]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrapped.dna.gz");
        {
            let file = File::create(&path).unwrap();
            let mut writer =
                niffler::get_writer(Box::new(file), niffler::compression::Format::Gzip, niffler::Level::One)
                    .unwrap();
            writer.write_all(&bytes).unwrap();
        }
        let container = Reader::from_path(&path).unwrap().into_container().unwrap();
        assert_eq!(container.sequence().unwrap().symbols, "GATTACA");
    }
}
