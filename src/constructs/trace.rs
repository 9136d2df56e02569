use indexmap::IndexMap;

/// ZTR version written for traces built in memory.
pub const ZTR_VERSION: [u8; 2] = [1, 2];

/// Per-channel sample intensities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Samples {
    pub a: Vec<u16>,
    pub c: Vec<u16>,
    pub g: Vec<u16>,
    pub t: Vec<u16>,
}
impl Samples {
    /// Samples per channel (channels are equal length when decoded).
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Channels in storage order: A, C, G, T.
    pub fn channels(&self) -> [&[u16]; 4] {
        [&self.a, &self.c, &self.g, &self.t]
    }
}

/// Quality clip points, in base coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clip {
    pub left: u32,
    pub right: u32,
}

/// A decoded Sanger chromatogram (block type 18).
///
/// Every field except `version` is optional; a field that is `None` (or, for
/// comments, empty) produces no chunk when encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    pub version: [u8; 2],
    pub bases: Option<String>,
    pub positions: Option<Vec<u32>>,
    pub confidence: Option<Vec<u8>>,
    pub samples: Option<Samples>,
    pub clip: Option<Clip>,
    pub text: Option<IndexMap<String, String>>,
    pub comments: Vec<String>,
}
impl Default for Trace {
    fn default() -> Self {
        Self {
            version: ZTR_VERSION,
            bases: None,
            positions: None,
            confidence: None,
            samples: None,
            clip: None,
            text: None,
            comments: Vec::new(),
        }
    }
}
impl Trace {
    pub fn with_bases(bases: impl Into<String>) -> Self {
        Self {
            bases: Some(bases.into()),
            ..Default::default()
        }
    }

    pub fn base_count(&self) -> usize {
        self.bases.as_ref().map_or(0, String::len)
    }

    /// Bases inside the clip window, or all bases when unclipped.
    ///
    /// Clip points past the end of the bases are clamped.
    pub fn clipped_bases(&self) -> Option<&str> {
        let bases = self.bases.as_deref()?;
        match self.clip {
            Some(Clip { left, right }) => {
                let right = (right as usize).min(bases.len());
                let left = (left as usize).min(right);
                bases.get(left..right)
            }
            None => Some(bases),
        }
    }

    pub fn text_value(&self, key: &str) -> Option<&str> {
        self.text.as_ref()?.get(key).map(String::as_str)
    }
}
