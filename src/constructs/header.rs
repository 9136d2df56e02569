use std::io::{Read, Write};

use bytemuck::{Pod, Zeroable};

use crate::SgffError;

pub const MAGIC: u8 = 0x09;
pub const HEADER_LENGTH: u32 = 14;
pub const FORMAT_NAME: &[u8; 8] = b"SnapGene";
pub const HEADER_SIZE: usize = std::mem::size_of::<RawHeader>();

/// On-disk layout of the 19-byte file header (big-endian, unaligned).
#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
struct RawHeader {
    magic: u8,             // 0x09
    length: [u8; 4],       // always 14
    name: [u8; 8],         // "SnapGene"
    sequence_kind: [u8; 2],
    export_version: [u8; 2],
    import_version: [u8; 2],
}

/// File header ("cookie") of a SnapGene file.
///
/// Only the three version/kind fields vary between files; the magic byte, the
/// length constant and the format name are validated on read and regenerated on
/// write.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    pub sequence_kind: u16,
    pub export_version: u16,
    pub import_version: u16,
}
impl Header {
    pub fn new(sequence_kind: u16, export_version: u16, import_version: u16) -> Self {
        Self {
            sequence_kind,
            export_version,
            import_version,
        }
    }

    /// Parses and validates a header from exactly [`HEADER_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> crate::Result<Self> {
        let raw: RawHeader = bytemuck::pod_read_unaligned(bytes);
        if raw.magic != MAGIC {
            return Err(SgffError::InvalidMagic {
                expected: MAGIC,
                actual: raw.magic,
            });
        }
        let length = u32::from_be_bytes(raw.length);
        if length != HEADER_LENGTH {
            return Err(SgffError::InvalidHeaderLength {
                expected: HEADER_LENGTH,
                actual: length,
            });
        }
        if &raw.name != FORMAT_NAME {
            return Err(SgffError::InvalidFormatName(
                String::from_utf8_lossy(&raw.name).into_owned(),
            ));
        }
        Ok(Self {
            sequence_kind: u16::from_be_bytes(raw.sequence_kind),
            export_version: u16::from_be_bytes(raw.export_version),
            import_version: u16::from_be_bytes(raw.import_version),
        })
    }

    /// Parses a header from the start of an arbitrarily sized buffer.
    pub fn from_buffer(buffer: &[u8]) -> crate::Result<Self> {
        match buffer.get(..HEADER_SIZE) {
            Some(head) => {
                let mut bytes = [0u8; HEADER_SIZE];
                bytes.copy_from_slice(head);
                Self::from_bytes(&bytes)
            }
            None => Err(SgffError::TruncatedHeader {
                len: buffer.len(),
                expected: HEADER_SIZE,
            }),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let raw = RawHeader {
            magic: MAGIC,
            length: HEADER_LENGTH.to_be_bytes(),
            name: *FORMAT_NAME,
            sequence_kind: self.sequence_kind.to_be_bytes(),
            export_version: self.export_version.to_be_bytes(),
            import_version: self.import_version.to_be_bytes(),
        };
        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(bytemuck::bytes_of(&raw));
        bytes
    }

    /// Reads a header from a reader, failing with a header error on short input.
    pub fn from_reader<R: Read>(reader: &mut R) -> crate::Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        let mut filled = 0;
        while filled < HEADER_SIZE {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) => {
                    return Err(SgffError::TruncatedHeader {
                        len: filled,
                        expected: HEADER_SIZE,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Self::from_bytes(&bytes)
    }

    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> crate::Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }
}
