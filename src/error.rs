//! Error handling for the SGFF library.
//!
//! Errors come in two flavours. Fatal errors ([`SgffError`] variants other than
//! [`SgffError::Block`]) abort the whole read or write. Block-level problems
//! ([`BlockIssue`]) are recoverable: the block engine keeps the raw bytes of the
//! affected block as a [`Payload::Unparsed`](crate::Payload::Unparsed) value and
//! moves on to the next block.

use thiserror::Error;

/// A specialized `Result` type for SGFF operations.
///
/// This type is used throughout the SGFF library for any operation that can fail.
/// It's equivalent to `std::result::Result<T, SgffError>`.
///
/// # Examples
///
/// ```rust
/// use sgff::{Header, Result};
///
/// fn parse_header(bytes: &[u8]) -> Result<Header> {
///     Header::from_buffer(bytes)
/// }
///
/// assert!(parse_header(b"not a snapgene file").is_err());
/// ```
pub type Result<T> = std::result::Result<T, SgffError>;

/// Error types for SGFF operations.
///
/// # Examples
///
/// ```rust
/// use sgff::{Reader, SgffError};
/// use std::io::Cursor;
///
/// let invalid_data = vec![0u8; 19];
/// match Reader::new(Cursor::new(invalid_data)) {
///     Err(SgffError::InvalidMagic { expected, actual }) => {
///         println!("Wrong file type: expected {:#x}, got {:#x}", expected, actual);
///     }
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum SgffError {
    /// I/O error from the underlying reader or writer.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Compression/decompression error from niffler.
    ///
    /// Raised when a wrapped input file (gzip, xz, ...) cannot be opened, or when
    /// an XZ encoder cannot be constructed while writing compressed blocks.
    #[error("Niffler error")]
    Niffler(#[from] niffler::Error),

    /// The first byte of the file is not the SnapGene magic byte.
    #[error("Invalid magic byte, expected ({expected:#04x}), found ({actual:#04x})")]
    InvalidMagic { expected: u8, actual: u8 },

    /// The header length field does not hold the fixed constant.
    #[error("Invalid header length, expected ({expected}), found ({actual})")]
    InvalidHeaderLength { expected: u32, actual: u32 },

    /// The 8-byte format name is not `SnapGene`.
    #[error("Invalid format name: {0:?}")]
    InvalidFormatName(String),

    /// The input ended before a complete header could be read.
    #[error("Truncated header: {len} bytes available, {expected} required")]
    TruncatedHeader { len: usize, expected: usize },

    /// A payload cannot be written under its block type.
    ///
    /// Either the block type has no encoder (skipped legacy types) or the
    /// payload variant does not match what the type's encoder expects.
    #[error("Cannot serialize block type {block_type}: {reason}")]
    UnsupportedSerialization { block_type: u8, reason: String },

    /// Nested containers are deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("Nested block depth {depth} exceeds the limit of {}", crate::MAX_DEPTH)]
    RecursionLimit { depth: usize },

    /// A recoverable problem with a single block.
    ///
    /// The block engine never propagates this variant out of a parse; it is
    /// converted into a [`Payload::Unparsed`](crate::Payload::Unparsed) fallback.
    #[error(transparent)]
    Block(#[from] BlockIssue),
}

impl SgffError {
    /// Returns true if the error is a header validation failure.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic { .. }
                | Self::InvalidHeaderLength { .. }
                | Self::InvalidFormatName(_)
                | Self::TruncatedHeader { .. }
        )
    }

    pub(crate) fn unsupported(block_type: u8, reason: impl Into<String>) -> Self {
        Self::UnsupportedSerialization {
            block_type,
            reason: reason.into(),
        }
    }
}

/// Recoverable block-level failures.
///
/// These are stored alongside the raw bytes of the block they describe so that a
/// single anomalous block never prevents reading the rest of a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "detail"))]
pub enum BlockIssue {
    /// The declared block length runs past the end of the stream.
    #[error("Truncated block: declared {declared} bytes, {available} available")]
    Truncated { declared: u64, available: u64 },

    /// The type-specific decoder could not interpret the payload.
    #[error("Payload decode failed: {0}")]
    DecodeFailed(String),

    /// A compressed stream inside the payload could not be decompressed.
    #[error("Decompression failed: {0}")]
    CompressionFailed(String),
}

impl BlockIssue {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        Self::DecodeFailed(reason.into())
    }

    pub(crate) fn compression(reason: impl std::fmt::Display) -> Self {
        Self::CompressionFailed(reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display_messages() {
        let err = SgffError::InvalidMagic {
            expected: 0x09,
            actual: 0x42,
        };
        let display = format!("{}", err);
        assert!(display.contains("0x09"));
        assert!(display.contains("0x42"));

        let err = SgffError::InvalidHeaderLength {
            expected: 14,
            actual: 15,
        };
        let display = format!("{}", err);
        assert!(display.contains("expected (14)"));
        assert!(display.contains("found (15)"));

        let err = SgffError::InvalidFormatName("SnapGenX".to_string());
        assert!(format!("{}", err).contains("SnapGenX"));

        let err = SgffError::unsupported(16, "no encoder");
        let display = format!("{}", err);
        assert!(display.contains("16"));
        assert!(display.contains("no encoder"));

        let err = SgffError::RecursionLimit { depth: 9 };
        let display = format!("{}", err);
        assert!(display.contains('9'));
        assert!(display.contains('8'));

        let err = SgffError::from(BlockIssue::Truncated {
            declared: 100,
            available: 7,
        });
        let display = format!("{}", err);
        assert!(display.contains("100"));
        assert!(display.contains('7'));
    }

    #[test]
    fn test_header_error_classification() {
        assert!(SgffError::InvalidMagic {
            expected: 9,
            actual: 0
        }
        .is_header_error());
        assert!(SgffError::TruncatedHeader {
            len: 3,
            expected: 19
        }
        .is_header_error());
        assert!(!SgffError::RecursionLimit { depth: 9 }.is_header_error());
        assert!(!SgffError::from(BlockIssue::decode("bad")).is_header_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SgffError = io_err.into();

        match err {
            SgffError::Io(inner) => {
                assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let err = SgffError::Io(io_err);

        let source = err.source();
        assert!(source.is_some());
        let io_source = source.unwrap().downcast_ref::<std::io::Error>();
        assert_eq!(
            io_source.unwrap().kind(),
            std::io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_error_send_sync() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<SgffError>();
        is_sync::<SgffError>();
    }
}
