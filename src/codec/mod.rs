//! Codec library capability surface.
//!
//! The engine never parses archive formats itself. It drives a codec library
//! through the traits in this module:
//!
//! - [`Codec`] - the loaded library: format table, opening and creating archives
//! - [`CodecArchive`] - an opened archive: item table, typed property getters,
//!   extraction
//! - [`CodecWriter`] - an archive under construction: property setters, item
//!   registration, commit
//! - [`CodecLoader`] - loads a codec library, optionally from a path
//!
//! Implementations report failures as [`Error::Codec`](crate::Error::Codec)
//! carrying their own message; the engine passes it through unchanged.
//!
//! A ZIP implementation ships with the crate in [`crate::backend`].

use std::path::{Path, PathBuf};

use crate::Result;
use crate::property::{PropertyId, PropertyType};
use crate::stream::{InStream, OutStream};

/// Index of a format in a codec's format table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatId(pub u32);

/// An entry of a codec's format table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    /// Format id.
    pub id: FormatId,
    /// Format name (e.g. `zip`, `7z`).
    pub name: String,
    /// Space-separated list of file extensions.
    pub extensions: String,
    /// Whether archives of this format can be created or updated.
    pub updatable: bool,
}

impl FormatInfo {
    /// Iterates over the individual extensions.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.split_whitespace()
    }

    /// Returns true if `ext` is one of this format's extensions
    /// (case-insensitive, leading dot ignored).
    pub fn has_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.extensions().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// How the codec picks the archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatSelection {
    /// Choose by the archive filename's extension, falling back to signature
    /// detection.
    #[default]
    AutoDetect,
    /// Use exactly this format.
    Forced(FormatId),
    /// Let the codec detect the format from the data itself.
    ///
    /// Always used when the archive is read from an already-open handle,
    /// since there is no filename to go by.
    DeferToCodecSniffing,
}

/// Thread configuration for codec-internal parallelism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threads {
    /// Let the codec decide.
    #[default]
    Auto,
    /// Single-threaded operation.
    Single,
}

/// Parameters for [`Codec::open_archive`].
#[derive(Debug)]
pub struct OpenRequest<'a> {
    /// Stream holding the archive. Detached when the codec should open
    /// `filename` through it.
    pub stream: InStream<'a>,
    /// Archive filename, when opening from a path.
    pub filename: Option<PathBuf>,
    /// Password for encrypted headers.
    pub password: Option<String>,
    /// Format selection.
    pub format: FormatSelection,
    /// Whether the archive spans several volumes.
    pub multivolume: bool,
}

/// Parameters for [`Codec::create_archive`].
#[derive(Debug)]
pub struct CreateRequest<'a> {
    /// Stream items are read from. Detached (path-based) unless the caller
    /// supplied a single source handle.
    pub source: InStream<'a>,
    /// Stream the archive is written to.
    pub output: OutStream<'a>,
    /// Archive filename, when writing to a path.
    pub filename: Option<PathBuf>,
    /// Password to encrypt items with.
    pub password: Option<String>,
    /// Format selection.
    pub format: FormatSelection,
}

/// A loaded codec library.
pub trait Codec {
    /// Returns the format table.
    fn formats(&self) -> Vec<FormatInfo>;

    /// Looks up the format owning a file extension.
    fn format_for_extension(&self, ext: &str) -> Option<FormatId> {
        self.formats()
            .into_iter()
            .find(|f| f.has_extension(ext))
            .map(|f| f.id)
    }

    /// Opens an archive.
    fn open_archive<'a>(&self, request: OpenRequest<'a>) -> Result<Box<dyn CodecArchive + 'a>>;

    /// Starts building a new archive.
    fn create_archive<'a>(&self, request: CreateRequest<'a>)
    -> Result<Box<dyn CodecWriter + 'a>>;
}

/// An opened archive.
///
/// Property getters return `None` when the value is absent or cannot be
/// represented through that accessor.
pub trait CodecArchive {
    /// Number of items.
    fn item_count(&self) -> Result<u32>;

    /// Number of archive-level properties the codec declares.
    fn property_count(&self) -> u32;

    /// Id and type of the archive-level property at `index`.
    fn property_info(&self, index: u32) -> Option<(PropertyId, PropertyType)>;

    /// Number of item-level properties the codec declares.
    fn item_property_count(&self) -> u32;

    /// Id and type of the item-level property at `index`.
    fn item_property_info(&self, index: u32) -> Option<(PropertyId, PropertyType)>;

    /// String accessor for archive properties.
    fn string_property(&self, id: PropertyId) -> Option<String>;
    /// Boolean accessor for archive properties.
    fn bool_property(&self, id: PropertyId) -> Option<bool>;
    /// 32-bit accessor for archive properties.
    fn u32_property(&self, id: PropertyId) -> Option<u32>;
    /// 64-bit accessor for archive properties.
    fn u64_property(&self, id: PropertyId) -> Option<u64>;
    /// Time accessor for archive properties, in epoch seconds.
    fn time_property(&self, id: PropertyId) -> Option<u32>;

    /// String accessor for item properties.
    fn string_item_property(&self, item: u32, id: PropertyId) -> Option<String>;
    /// Boolean accessor for item properties.
    fn bool_item_property(&self, item: u32, id: PropertyId) -> Option<bool>;
    /// 32-bit accessor for item properties.
    fn u32_item_property(&self, item: u32, id: PropertyId) -> Option<u32>;
    /// 64-bit accessor for item properties.
    fn u64_item_property(&self, item: u32, id: PropertyId) -> Option<u64>;
    /// Time accessor for item properties, in epoch seconds.
    fn time_item_property(&self, item: u32, id: PropertyId) -> Option<u32>;

    /// Raw path of an item.
    fn item_path(&self, item: u32) -> Option<String> {
        self.string_item_property(item, PropertyId::PATH)
    }

    /// Directory flag of an item.
    fn item_is_dir(&self, item: u32) -> bool {
        self.bool_item_property(item, PropertyId::IS_DIR)
            .unwrap_or(false)
    }

    /// Configures codec-internal parallelism.
    fn set_threads(&mut self, threads: Threads) -> Result<()> {
        let _ = threads;
        Ok(())
    }

    /// Decompresses one item into `output`.
    fn extract(&mut self, output: &mut OutStream<'_>, password: Option<&str>, item: u32)
    -> Result<()>;
}

/// An archive under construction.
pub trait CodecWriter {
    /// Sets an integer archive property.
    fn set_int_property(&mut self, name: &str, value: i64) -> Result<()>;
    /// Sets a boolean archive property.
    fn set_bool_property(&mut self, name: &str, value: bool) -> Result<()>;
    /// Sets a string archive property.
    fn set_string_property(&mut self, name: &str, value: &str) -> Result<()>;

    /// Registers an item path to be added.
    fn add_item(&mut self, path: &str) -> Result<()>;

    /// Writes the archive with every registered item.
    fn update(&mut self) -> Result<()>;
}

/// Loads a codec library.
pub trait CodecLoader {
    /// Loads the library from `path`, or from its default location.
    fn load(&self, path: Option<&Path>) -> Result<Box<dyn Codec>>;
}

impl<F> CodecLoader for F
where
    F: Fn(Option<&Path>) -> Result<Box<dyn Codec>>,
{
    fn load(&self, path: Option<&Path>) -> Result<Box<dyn Codec>> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zip_format() -> FormatInfo {
        FormatInfo {
            id: FormatId(1),
            name: "zip".into(),
            extensions: "zip jar  docx".into(),
            updatable: true,
        }
    }

    #[test]
    fn test_extensions_split() {
        let format = zip_format();
        let exts: Vec<_> = format.extensions().collect();
        assert_eq!(exts, vec!["zip", "jar", "docx"]);
    }

    #[test]
    fn test_has_extension() {
        let format = zip_format();
        assert!(format.has_extension("ZIP"));
        assert!(format.has_extension(".jar"));
        assert!(!format.has_extension("7z"));
    }

    #[test]
    fn test_threads_default_to_auto() {
        assert_eq!(Threads::default(), Threads::Auto);
    }
}
