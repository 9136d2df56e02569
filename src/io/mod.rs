mod mmap;
mod reader;
mod writer;

pub use mmap::load_mapped;
pub use reader::Reader;
pub use writer::Writer;

use std::io::{Read, Write};

use crate::Container;

/// Reads and decodes a whole SnapGene stream.
///
/// # Examples
///
/// ```rust
/// use sgff::{Container, Header, Payload, Sequence};
///
/// # fn main() -> sgff::Result<()> {
/// let mut container = Container::new(Header::new(1, 16, 16));
/// container.append(0, Payload::Sequence(Sequence::new("ACGTACGT")));
///
/// let mut bytes = Vec::new();
/// sgff::write(&container, &mut bytes)?;
/// let parsed = sgff::read(bytes.as_slice())?;
/// assert_eq!(parsed.sequence().unwrap().symbols, "ACGTACGT");
/// # Ok(())
/// # }
/// ```
pub fn read<R: Read>(source: R) -> crate::Result<Container> {
    Reader::new(source)?.into_container()
}

/// Encodes a container into `destination`.
pub fn write<W: Write>(container: &Container, destination: W) -> crate::Result<()> {
    let mut writer = Writer::new(destination, container.header())?;
    writer.write_blocks(container.blocks())?;
    writer.finish()
}
