//! BIP-32 derivation paths and their binary encoding
//!
//! The text grammar is the one shared by the hierarchical deterministic key
//! ecosystem: decimal indices separated by `/`, a trailing `'` marking a
//! hardened index. There is no leading `m`. The binary form is four bytes
//! big-endian per index with bit 31 set on hardened indices.

use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, Bytes, BytesMut};
use derive_more::Deref;

/// Bit set on hardened indices
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// Largest index value before the hardened flag is applied
pub const MAX_INDEX: u32 = HARDENED_BIT - 1;

/// Deepest path the device accepts
pub const MAX_PATH_DEPTH: usize = 10;

/// Bytes per encoded index
const INDEX_SIZE: usize = 4;

/// Errors produced while parsing or encoding a derivation path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Segment is not a decimal numeral with an optional `'` suffix
    #[error("Invalid path segment {segment:?} at position {position}")]
    InvalidSegment {
        /// Zero based segment position
        position: usize,
        /// Offending segment text
        segment: String,
    },

    /// Segment value does not fit in 31 bits
    #[error("Path segment {segment:?} at position {position} exceeds {max}", max = MAX_INDEX)]
    IndexOutOfRange {
        /// Zero based segment position
        position: usize,
        /// Offending segment text
        segment: String,
    },

    /// More segments than the device accepts
    #[error("Path has {depth} segments, at most {max} are supported", max = MAX_PATH_DEPTH)]
    TooDeep {
        /// Number of segments in the path
        depth: usize,
    },

    /// Encoded bytes are not a whole number of indices
    #[error("Encoded path length {0} is not a multiple of {size}", size = INDEX_SIZE)]
    EncodedLength(usize),

    /// Wire payload does not match its declared segment count
    #[error("Malformed path payload: {0}")]
    Wire(&'static str),
}

/// A single derivation index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    value: u32,
    hardened: bool,
}

impl ChildIndex {
    /// Create an index, `None` if `value` does not fit in 31 bits
    pub const fn new(value: u32, hardened: bool) -> Option<Self> {
        if value > MAX_INDEX {
            None
        } else {
            Some(Self { value, hardened })
        }
    }

    /// Create a non-hardened index
    pub const fn normal(value: u32) -> Option<Self> {
        Self::new(value, false)
    }

    /// Create a hardened index
    pub const fn hardened(value: u32) -> Option<Self> {
        Self::new(value, true)
    }

    /// Split a raw 32-bit index into value and hardened flag
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            value: raw & MAX_INDEX,
            hardened: raw & HARDENED_BIT != 0,
        }
    }

    /// Raw 32-bit form, bit 31 set when hardened
    pub const fn to_raw(self) -> u32 {
        if self.hardened {
            self.value | HARDENED_BIT
        } else {
            self.value
        }
    }

    /// Index value without the hardened flag
    pub const fn value(self) -> u32 {
        self.value
    }

    /// Whether the index is hardened
    pub const fn is_hardened(self) -> bool {
        self.hardened
    }

    fn parse_segment(position: usize, segment: &str) -> Result<Self, PathError> {
        let (digits, hardened) = match segment.strip_suffix('\'') {
            Some(digits) => (digits, true),
            None => (segment, false),
        };

        // `u32::from_str` would also take a leading `+`
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::InvalidSegment {
                position,
                segment: segment.to_string(),
            });
        }

        digits
            .parse::<u32>()
            .ok()
            .and_then(|value| Self::new(value, hardened))
            .ok_or_else(|| PathError::IndexOutOfRange {
                position,
                segment: segment.to_string(),
            })
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// An ordered sequence of derivation indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// Parse the text form
    pub fn parse(path: &str) -> Result<Self, PathError> {
        path.parse()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segment at `position`
    pub fn get(&self, position: usize) -> Option<ChildIndex> {
        self.0.get(position).copied()
    }

    /// Iterate over the segments in order
    pub fn iter(&self) -> impl Iterator<Item = ChildIndex> + '_ {
        self.0.iter().copied()
    }

    /// Segments as a slice
    pub fn as_slice(&self) -> &[ChildIndex] {
        &self.0
    }

    /// Binary form, four bytes big-endian per segment
    pub fn encode(&self) -> EncodedPath {
        let bytes = self
            .iter()
            .fold(
                BytesMut::with_capacity(self.len() * INDEX_SIZE),
                |mut bytes, index| {
                    bytes.put_u32(index.to_raw());
                    bytes
                },
            )
            .freeze();
        EncodedPath(bytes)
    }

    /// Recover a path from its binary form
    pub fn decode(bytes: &[u8]) -> Result<Self, PathError> {
        EncodedPath::try_from(bytes).map(|encoded| encoded.decode())
    }

    /// Device payload: segment count byte followed by the encoded path
    pub fn to_wire(&self) -> Result<Bytes, PathError> {
        self.encode().to_wire()
    }

    /// Parse a device payload back into a path
    ///
    /// The count byte must be present and at most [`MAX_PATH_DEPTH`], and the
    /// buffer must hold exactly the announced segments.
    pub fn from_wire(data: &[u8]) -> Result<Self, PathError> {
        let (&count, rest) = data
            .split_first()
            .ok_or(PathError::Wire("missing segment count"))?;
        let count = count as usize;

        if count > MAX_PATH_DEPTH {
            return Err(PathError::TooDeep { depth: count });
        }
        if rest.len() != count * INDEX_SIZE {
            return Err(PathError::Wire("segment count does not match payload length"));
        }

        Self::decode(rest)
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }

        s.split('/')
            .enumerate()
            .map(|(position, segment)| ChildIndex::parse_segment(position, segment))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl From<Vec<ChildIndex>> for DerivationPath {
    fn from(indices: Vec<ChildIndex>) -> Self {
        Self(indices)
    }
}

impl FromIterator<ChildIndex> for DerivationPath {
    fn from_iter<I: IntoIterator<Item = ChildIndex>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = ChildIndex;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ChildIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Binary form of a derivation path, always a multiple of four bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref)]
pub struct EncodedPath(Bytes);

impl EncodedPath {
    /// Number of encoded segments
    pub fn segment_count(&self) -> usize {
        self.0.len() / INDEX_SIZE
    }

    /// Underlying bytes
    pub const fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Decode back into a path
    pub fn decode(&self) -> DerivationPath {
        self.0
            .chunks_exact(INDEX_SIZE)
            .map(|chunk| {
                let raw = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                ChildIndex::from_raw(raw)
            })
            .collect()
    }

    /// Device payload: segment count byte followed by the encoded path
    pub fn to_wire(&self) -> Result<Bytes, PathError> {
        let depth = self.segment_count();
        if depth > MAX_PATH_DEPTH {
            return Err(PathError::TooDeep { depth });
        }

        let mut wire = BytesMut::with_capacity(1 + self.0.len());
        wire.put_u8(depth as u8);
        wire.put_slice(&self.0);
        Ok(wire.freeze())
    }
}

impl TryFrom<&[u8]> for EncodedPath {
    type Error = PathError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() % INDEX_SIZE != 0 {
            return Err(PathError::EncodedLength(bytes.len()));
        }
        Ok(Self(Bytes::copy_from_slice(bytes)))
    }
}

impl AsRef<[u8]> for EncodedPath {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<EncodedPath> for Bytes {
    fn from(path: EncodedPath) -> Self {
        path.0
    }
}

/// Encode the text form of a path into its binary form
///
/// ```
/// let encoded = fantom_ledger::encode("44'/60'/0'/0/0").unwrap();
/// assert_eq!(encoded.len(), 20);
/// assert_eq!(&encoded[..4], &[0x80, 0x00, 0x00, 0x2C]);
/// ```
pub fn encode(path: &str) -> Result<EncodedPath, PathError> {
    DerivationPath::parse(path).map(|path| path.encode())
}
