//! Typed property model.
//!
//! Codec libraries describe archives and their items through a self-describing
//! property table: each property has a numeric [`PropertyId`], a declared
//! [`PropertyType`] tag, and a value that must be fetched through the accessor
//! matching that tag. This module provides the engine-native representation of
//! those triples; decoding lives in [`decode`].
//!
//! # Property Names
//!
//! A fixed table maps about a hundred well-known ids to human-readable names
//! (`path`, `size`, `mtime`, ...). Ids outside the table are rendered as
//! `prop<N>`. The table is advisory: ids are only guaranteed stable within a
//! single archive session.
//!
//! ```rust
//! use arcbridge::property::PropertyId;
//!
//! assert_eq!(PropertyId::PATH.name(), "path");
//! assert_eq!(PropertyId::new(4000).name(), "prop4000");
//! assert_eq!(PropertyId::from_name("isdir"), Some(PropertyId::IS_DIR));
//! ```

pub mod decode;

use std::borrow::Cow;
use std::fmt;

pub use decode::PropertyDecoder;

/// Well-known property names, indexed by property id.
const PROPERTY_NAMES: &[&str] = &[
    "noproperty",
    "mainsubfile",
    "handleritemindex",
    "path",
    "name",
    "extension",
    "isdir",
    "size",
    "packsize",
    "attrib",
    "ctime",
    "atime",
    "mtime",
    "solid",
    "commented",
    "encrypted",
    "splitbefore",
    "splitafter",
    "dictionarysize",
    "crc",
    "type",
    "isanti",
    "method",
    "hostos",
    "filesystem",
    "user",
    "group",
    "block",
    "comment",
    "position",
    "prefix",
    "numsubdirs",
    "numsubfiles",
    "unpackver",
    "volume",
    "isvolume",
    "offset",
    "links",
    "numblocks",
    "numvolumes",
    "timetype",
    "bit64",
    "bigendian",
    "cpu",
    "physize",
    "headerssize",
    "checksum",
    "characts",
    "va",
    "id",
    "shortname",
    "creatorapp",
    "sectorsize",
    "posixattrib",
    "symlink",
    "error",
    "totalsize",
    "freespace",
    "clustersize",
    "volumename",
    "localname",
    "provider",
    "ntsecure",
    "isaltstream",
    "isaux",
    "isdeleted",
    "istree",
    "sha1",
    "sha256",
    "errortype",
    "numerrors",
    "errorflags",
    "warningflags",
    "warning",
    "numstreams",
    "numaltstreams",
    "altstreamssize",
    "virtualsize",
    "unpacksize",
    "totalphysize",
    "volumeindex",
    "subtype",
    "shortcomment",
    "codepage",
    "isnotarctype",
    "physizecantbedetected",
    "zerostailisallowed",
    "tailsize",
    "embeddedstubsize",
    "ntreparse",
    "hardlink",
    "inode",
    "streamid",
    "readonly",
    "outname",
    "copylink",
    "arcfilename",
    "ishash",
    "changetime",
    "userid",
    "groupid",
    "devicemajor",
    "deviceminor",
    "devmajor",
    "devminor",
];

/// Identifier of a semantic archive or item attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u32);

impl PropertyId {
    /// Item path within the archive.
    pub const PATH: Self = Self(3);
    /// File name component.
    pub const NAME: Self = Self(4);
    /// Directory flag.
    pub const IS_DIR: Self = Self(6);
    /// Uncompressed size.
    pub const SIZE: Self = Self(7);
    /// Compressed (packed) size.
    pub const PACK_SIZE: Self = Self(8);
    /// Windows-style attribute word.
    pub const ATTRIB: Self = Self(9);
    /// Creation time.
    pub const CTIME: Self = Self(10);
    /// Access time.
    pub const ATIME: Self = Self(11);
    /// Modification time.
    pub const MTIME: Self = Self(12);
    /// Solid archive flag.
    pub const SOLID: Self = Self(13);
    /// Encryption flag.
    pub const ENCRYPTED: Self = Self(15);
    /// CRC-32 checksum.
    pub const CRC: Self = Self(19);
    /// Compression method description.
    pub const METHOD: Self = Self(22);
    /// Host operating system.
    pub const HOST_OS: Self = Self(23);
    /// Comment text.
    pub const COMMENT: Self = Self(28);
    /// Byte offset.
    pub const OFFSET: Self = Self(36);
    /// Physical size of the archive.
    pub const PHY_SIZE: Self = Self(44);
    /// POSIX mode bits.
    pub const POSIX_ATTRIB: Self = Self(53);

    /// Creates a property id from its raw value.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn id(&self) -> u32 {
        self.0
    }

    /// Returns the well-known name, or `prop<N>` for ids outside the table.
    pub fn name(&self) -> Cow<'static, str> {
        match PROPERTY_NAMES.get(self.0 as usize) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("prop{}", self.0)),
        }
    }

    /// Resolves a name produced by [`name`](Self::name) back to an id.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(pos) = PROPERTY_NAMES.iter().position(|n| *n == name) {
            return Some(Self(pos as u32));
        }
        name.strip_prefix("prop")
            .and_then(|n| n.parse::<u32>().ok())
            .map(Self)
    }
}

impl From<u32> for PropertyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Type tag a codec declares for a property.
///
/// The numeric codes follow the variant type codes used by COM-style codec
/// libraries (`VT_BSTR`, `VT_UI4`, `VT_FILETIME`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Wide string.
    String,
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 64-bit integer.
    U64,
    /// Windows FILETIME.
    FileTime,
    /// Any other tag the engine does not decode.
    Other(u16),
}

impl PropertyType {
    /// Maps a raw variant type code to a tag.
    pub fn from_code(code: u16) -> Self {
        match code {
            8 => Self::String,
            11 => Self::Bool,
            16 => Self::I8,
            17 => Self::U8,
            2 => Self::I16,
            18 => Self::U16,
            3 | 22 => Self::I32,
            19 | 23 => Self::U32,
            20 => Self::I64,
            21 => Self::U64,
            64 => Self::FileTime,
            other => Self::Other(other),
        }
    }

    /// Returns the raw variant type code.
    pub fn code(&self) -> u16 {
        match self {
            Self::String => 8,
            Self::Bool => 11,
            Self::I8 => 16,
            Self::U8 => 17,
            Self::I16 => 2,
            Self::U16 => 18,
            Self::I32 => 3,
            Self::U32 => 19,
            Self::I64 => 20,
            Self::U64 => 21,
            Self::FileTime => 64,
            Self::Other(code) => *code,
        }
    }

    /// Returns true for the 1, 2 and 4 byte integer tags.
    pub fn is_small_integer(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::U8 | Self::I16 | Self::U16 | Self::I32 | Self::U32
        )
    }

    /// Returns true for the 8 byte integer tags.
    pub fn is_wide_integer(&self) -> bool {
        matches!(self, Self::I64 | Self::U64)
    }
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// String value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// 32-bit unsigned integer (small integers are widened into this).
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// Timestamp as Unix epoch seconds.
    ///
    /// Sub-second precision and times past 2106 are truncated.
    Time(u32),
}

impl PropertyValue {
    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any integer or time value widened to 64 bits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U32(v) | Self::Time(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as 32 bits if it fits.
    pub fn as_u32(&self) -> Option<u32> {
        self.as_u64().and_then(|v| u32::try_from(v).ok())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", u8::from(*b)),
            Self::U32(v) | Self::Time(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
        }
    }
}

/// A single decoded property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// The property id.
    pub id: PropertyId,
    /// The decoded value.
    pub value: PropertyValue,
}

impl Property {
    /// Returns the display name of this property.
    pub fn name(&self) -> Cow<'static, str> {
        self.id.name()
    }
}

/// An ordered set of decoded properties.
///
/// Order follows the codec's declaration order; at most one value is kept
/// per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    properties: Vec<Property>,
}

impl PropertySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any value already stored for the id.
    ///
    /// A replaced value keeps its position; a new one is appended.
    pub fn insert(&mut self, id: PropertyId, value: PropertyValue) {
        match self.properties.iter_mut().find(|p| p.id == id) {
            Some(existing) => existing.value = value,
            None => self.properties.push(Property { id, value }),
        }
    }

    /// Returns the value for an id.
    pub fn get(&self, id: PropertyId) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.id == id)
            .map(|p| &p.value)
    }

    /// Returns the value for a property name.
    pub fn get_by_name(&self, name: &str) -> Option<&PropertyValue> {
        PropertyId::from_name(name).and_then(|id| self.get(id))
    }

    /// Returns true if a value is stored for the id.
    pub fn contains(&self, id: PropertyId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates over the properties in order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_names() {
        assert_eq!(PropertyId::PATH.name(), "path");
        assert_eq!(PropertyId::IS_DIR.name(), "isdir");
        assert_eq!(PropertyId::PHY_SIZE.name(), "physize");
        assert_eq!(PropertyId::POSIX_ATTRIB.name(), "posixattrib");
        assert_eq!(PropertyId::new(104).name(), "devminor");
    }

    #[test]
    fn test_unknown_id_synthetic_name() {
        assert_eq!(PropertyId::new(105).name(), "prop105");
        assert_eq!(PropertyId::new(0x10000).to_string(), "prop65536");
    }

    #[test]
    fn test_from_name_round_trip() {
        for id in [0u32, 3, 44, 104, 105, 9999] {
            let id = PropertyId::new(id);
            assert_eq!(PropertyId::from_name(&id.name()), Some(id));
        }
        assert_eq!(PropertyId::from_name("bogus"), None);
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(PropertyType::from_code(8), PropertyType::String);
        assert_eq!(PropertyType::from_code(21), PropertyType::U64);
        assert_eq!(PropertyType::from_code(64), PropertyType::FileTime);
        assert_eq!(PropertyType::from_code(72), PropertyType::Other(72));
        assert!(PropertyType::U16.is_small_integer());
        assert!(PropertyType::I64.is_wide_integer());
        assert!(!PropertyType::FileTime.is_small_integer());
    }

    #[test]
    fn test_property_set_insert_replaces_in_place() {
        let mut set = PropertySet::new();
        set.insert(PropertyId::PATH, PropertyValue::String("a".into()));
        set.insert(PropertyId::IS_DIR, PropertyValue::Bool(false));
        set.insert(PropertyId::PATH, PropertyValue::String("b".into()));

        assert_eq!(set.len(), 2);
        let ids: Vec<_> = set.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PropertyId::PATH, PropertyId::IS_DIR]);
        assert_eq!(set.get_by_name("path").and_then(|v| v.as_str()), Some("b"));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(PropertyValue::U32(7).as_u64(), Some(7));
        assert_eq!(PropertyValue::U64(u64::MAX).as_u32(), None);
        assert_eq!(PropertyValue::Time(10).as_u32(), Some(10));
        assert_eq!(PropertyValue::Bool(true).to_string(), "1");
        assert_eq!(PropertyValue::String("x".into()).as_u64(), None);
    }
}
