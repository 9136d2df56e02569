use std::{fs::File, path::Path};

use memmap2::Mmap;

use crate::{codec::blocks::parse_blocks, Container, Header, HEADER_SIZE};

/// Decodes a file through a read-only memory map.
///
/// Unlike [`Reader::from_path`](crate::Reader::from_path) this does not undo
/// any outer compression; the file must be a plain SnapGene file.
///
/// # Examples
///
/// ```rust,no_run
/// use sgff::load_mapped;
///
/// # fn main() -> sgff::Result<()> {
/// let container = load_mapped("plasmid.dna")?;
/// if let Some(sequence) = container.sequence() {
///     println!("{} bp", sequence.symbols.len());
/// }
/// # Ok(())
/// # }
/// ```
pub fn load_mapped<P: AsRef<Path>>(path: P) -> crate::Result<Container> {
    let file = File::open(path)?;
    let map = unsafe { Mmap::map(&file)? };

    let header = Header::from_buffer(&map)?;
    let mut body = &map[HEADER_SIZE..];
    let blocks = parse_blocks(&mut body, 0)?;
    Ok(Container::from_parts(header, blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Payload, Sequence, SgffError};

    #[test]
    fn test_load_mapped_matches_reader() {
        let mut container = Container::new(Header::new(1, 16, 16));
        container.append(0, Payload::Sequence(Sequence::new("ACGTACGT")));
        container.append(6, Payload::Text("<Notes/>".into()));

        let file = tempfile::NamedTempFile::new().unwrap();
        container.to_path(file.path()).unwrap();

        let mapped = load_mapped(file.path()).unwrap();
        assert_eq!(mapped, container);
    }

    #[test]
    fn test_load_mapped_short_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), [0x09, 0, 0]).unwrap();
        assert!(matches!(
            load_mapped(file.path()),
            Err(SgffError::TruncatedHeader { len: 3, .. })
        ));
    }
}
