use crate::codec::nucleotide;

/// Size of the opaque header that precedes packed DNA.
pub const COMPRESSED_HEADER_SIZE: usize = 14;

/// Property byte that prefixes plain sequence blocks.
///
/// Bits not covered by an accessor are preserved as read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceFlags(pub u8);
impl SequenceFlags {
    pub const CIRCULAR: u8 = 1 << 0;
    pub const DOUBLE_STRANDED: u8 = 1 << 1;
    pub const DAM_METHYLATED: u8 = 1 << 2;
    pub const DCM_METHYLATED: u8 = 1 << 3;
    pub const ECOKI_METHYLATED: u8 = 1 << 4;

    pub fn bits(&self) -> u8 {
        self.0
    }

    fn get(&self, mask: u8) -> bool {
        self.0 & mask != 0
    }

    fn set(&mut self, mask: u8, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    pub fn circular(&self) -> bool {
        self.get(Self::CIRCULAR)
    }

    pub fn set_circular(&mut self, value: bool) {
        self.set(Self::CIRCULAR, value);
    }

    pub fn double_stranded(&self) -> bool {
        self.get(Self::DOUBLE_STRANDED)
    }

    pub fn set_double_stranded(&mut self, value: bool) {
        self.set(Self::DOUBLE_STRANDED, value);
    }

    pub fn dam_methylated(&self) -> bool {
        self.get(Self::DAM_METHYLATED)
    }

    pub fn dcm_methylated(&self) -> bool {
        self.get(Self::DCM_METHYLATED)
    }

    pub fn ecoki_methylated(&self) -> bool {
        self.get(Self::ECOKI_METHYLATED)
    }

    pub fn set_methylation(&mut self, dam: bool, dcm: bool, ecoki: bool) {
        self.set(Self::DAM_METHYLATED, dam);
        self.set(Self::DCM_METHYLATED, dcm);
        self.set(Self::ECOKI_METHYLATED, ecoki);
    }
}

/// A plain sequence block: one property byte followed by the symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    pub flags: SequenceFlags,
    pub symbols: String,
}
impl Sequence {
    pub fn new(symbols: impl Into<String>) -> Self {
        Self {
            flags: SequenceFlags::default(),
            symbols: symbols.into(),
        }
    }

    pub fn with_flags(symbols: impl Into<String>, flags: SequenceFlags) -> Self {
        Self {
            flags,
            symbols: symbols.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A 2-bit packed DNA region.
///
/// The packed bytes are kept exactly as read, including any padding bits in the
/// final byte, so re-encoding reproduces the input. `trailer` holds whatever
/// followed the declared region in a standalone block and is empty otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedSequence {
    /// Number of symbols.
    pub length: u32,
    #[cfg_attr(feature = "serde", serde(with = "crate::constructs::hex"))]
    pub header: [u8; COMPRESSED_HEADER_SIZE],
    #[cfg_attr(feature = "serde", serde(with = "crate::constructs::hex"))]
    pub packed: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(with = "crate::constructs::hex"))]
    pub trailer: Vec<u8>,
}
impl CompressedSequence {
    /// Packs a nucleotide string with a zeroed opaque header.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgff::CompressedSequence;
    ///
    /// let compressed = CompressedSequence::from_symbols("ACGTACGT");
    /// assert_eq!(compressed.length, 8);
    /// assert_eq!(compressed.packed.len(), 2);
    /// assert_eq!(compressed.symbols(), "ACGTACGT");
    /// ```
    pub fn from_symbols(symbols: &str) -> Self {
        Self {
            length: symbols.len() as u32,
            header: [0u8; COMPRESSED_HEADER_SIZE],
            packed: nucleotide::pack(symbols),
            trailer: Vec::new(),
        }
    }

    /// Unpacks the stored symbols.
    pub fn symbols(&self) -> String {
        nucleotide::unpack(&self.packed, self.length as usize)
    }

    /// Size of the encoded region (`length | header | packed`), excluding any trailer.
    pub fn region_len(&self) -> usize {
        4 + COMPRESSED_HEADER_SIZE + self.packed.len()
    }
}
