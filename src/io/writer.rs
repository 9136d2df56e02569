//! Buffered writer for SnapGene files.

use std::{fs::File, io::Write, path::Path};

use crate::{codec::blocks, Blocks, Header, Payload};

const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;
pub type BoxedWriter = Box<dyn Write + Send>;

/// Writer that emits a header followed by encoded blocks.
///
/// The header is written on construction. Blocks are encoded into an internal
/// buffer that is flushed to the inner writer once it grows past a megabyte, on
/// [`Writer::finish`], and on drop. Blocks accepted before a rejected one are
/// still flushed; use [`Container::to_path`](crate::Container::to_path) to
/// encode a whole file before anything reaches disk.
///
/// # Examples
///
/// ```rust
/// use sgff::{Header, Payload, Sequence, Writer};
///
/// # fn main() -> sgff::Result<()> {
/// let mut writer = Writer::new(Vec::new(), Header::new(1, 16, 16))?;
/// writer.write_block(0, &Payload::Sequence(Sequence::new("ACGT")))?;
/// writer.finish()?;
/// assert_eq!(writer.blocks_written(), 1);
///
/// let bytes = writer.into_inner();
/// // header, then type 0 with a 5-byte payload
/// assert_eq!(bytes.len(), 19 + 5 + 5);
/// assert_eq!(&bytes[19..24], &[0, 0, 0, 0, 5]);
/// # Ok(())
/// # }
/// ```
pub struct Writer<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    blocks_written: u64,
}
impl<W: Write> Writer<W> {
    pub fn new(mut inner: W, header: Header) -> crate::Result<Self> {
        header.write_bytes(&mut inner)?;
        Ok(Self {
            inner,
            buffer: Vec::with_capacity(DEFAULT_BUFFER_SIZE),
            blocks_written: 0,
        })
    }

    pub fn blocks_written(&self) -> u64 {
        self.blocks_written
    }

    /// Encodes one payload under `block_type`.
    ///
    /// # Errors
    ///
    /// [`SgffError::UnsupportedSerialization`](crate::SgffError::UnsupportedSerialization)
    /// if the payload cannot be written under that type. Nothing is written in
    /// that case.
    pub fn write_block(&mut self, block_type: u8, payload: &Payload) -> crate::Result<()> {
        let mark = self.buffer.len();
        if let Err(e) = blocks::write_block(&mut self.buffer, block_type, payload, 0) {
            self.buffer.truncate(mark);
            return Err(e);
        }
        self.blocks_written += 1;
        if self.buffer.len() >= DEFAULT_BUFFER_SIZE {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Writes every block, types ascending and repeats in stored order.
    pub fn write_blocks(&mut self, blocks: &Blocks) -> crate::Result<()> {
        for (&block_type, payloads) in blocks {
            for payload in payloads {
                self.write_block(block_type, payload)?;
            }
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> crate::Result<()> {
        if !self.buffer.is_empty() {
            self.inner.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Flushes buffered blocks and the inner writer.
    pub fn finish(&mut self) -> crate::Result<()> {
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok(())
    }

    /// Returns the inner writer. Call [`Writer::finish`] first; unflushed
    /// blocks are discarded.
    pub fn into_inner(self) -> W {
        use std::mem::ManuallyDrop;
        let mut manual = ManuallyDrop::new(self);
        // drop the buffer here; only `inner` is moved out
        drop(std::mem::take(&mut manual.buffer));
        unsafe { std::ptr::read(&manual.inner) }
    }
}

/// Flushes on drop, ignoring errors. Call [`Writer::finish`] to observe them.
impl<W: Write> Drop for Writer<W> {
    fn drop(&mut self) {
        self.finish().ok();
    }
}

impl Writer<BoxedWriter> {
    /// Creates (or truncates) a file and writes the header.
    pub fn from_path<P: AsRef<Path>>(path: P, header: Header) -> crate::Result<Self> {
        let file = File::create(path)?;
        Self::new(Box::new(file), header)
    }

    pub fn from_stdout(header: Header) -> crate::Result<Self> {
        Self::new(Box::new(std::io::stdout()), header)
    }

    /// Writes to the path if given, otherwise to standard output.
    pub fn from_optional_path<P: AsRef<Path>>(
        path: Option<P>,
        header: Header,
    ) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_path(path, header),
            None => Self::from_stdout(header),
        }
    }
}
