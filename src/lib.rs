//! # arcbridge
//!
//! An archive introspection, extraction and creation engine on top of a
//! pluggable codec library.
//!
//! The engine does not parse archive formats. It drives a codec library
//! through the traits in [`codec`], and adds what every front end needs on
//! top: a typed property model for the codec's self-describing property
//! tables, byte stream adapters for files and caller-provided handles,
//! filtered listings, single-item extraction with metadata propagation, and
//! archive creation from loosely-typed properties. A ZIP codec ships with the
//! crate, so it works out of the box.
//!
//! ## Quick Start
//!
//! ### Listing and Extracting
//!
//! ```rust,no_run
//! use arcbridge::{Destination, ExtractOptions, Library, ListOptions, OpenOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let mut library = Library::default();
//!     let mut archive = library.open_path("archive.zip", &OpenOptions::default())?;
//!
//!     println!("{} items", archive.count()?);
//!     for entry in archive.list(&ListOptions::new().include_properties(true))? {
//!         println!("{} {:?}", entry.path, entry.properties);
//!     }
//!
//!     archive.extract("docs/readme.txt", Destination::path("readme.txt"), &ExtractOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! ### Extracting Into a Handle
//!
//! ```rust,no_run
//! use arcbridge::{Destination, ExtractOptions, Library, OpenOptions, Result};
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let mut library = Library::default();
//!     let mut archive = library.open_path("archive.zip", &OpenOptions::default())?;
//!
//!     let mut buffer = Cursor::new(Vec::new());
//!     archive.extract("data.bin", Destination::handle(&mut buffer), &ExtractOptions::default())?;
//!     println!("{} bytes", buffer.get_ref().len());
//!     Ok(())
//! }
//! ```
//!
//! ### Creating an Archive
//!
//! ```rust,no_run
//! use arcbridge::{CreateOptions, Destination, Library, Result};
//!
//! fn main() -> Result<()> {
//!     let mut library = Library::default();
//!     let options = CreateOptions::new()
//!         .working_dir("site")
//!         .property("x", "9")
//!         .property("comment", "snapshot");
//!     library.create(Destination::path("site.zip"), &["index.html", "css/main.css"], &options)
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Primary operations (open, extract,
//! commit) fail strictly; secondary effects such as metadata propagation or
//! individual creation properties are logged through the `log` facade and
//! never fail the operation. See [`Error`] for the taxonomy.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `zip` | Yes | Bundled ZIP codec used by [`Library::default`] |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod backend;
pub mod codec;
pub mod error;
pub mod library;
pub mod property;
pub mod read;
pub mod stream;
pub mod timestamp;
pub mod write;

pub use codec::{FormatId, FormatInfo, FormatSelection, Threads};
pub use error::{Error, Result};
pub use library::Library;
pub use property::{PropertyId, PropertySet, PropertyType, PropertyValue};
pub use read::{
    Archive, Destination, ExtractOptions, ListEntry, ListOptions, OpenOptions, Source, TypeFilter,
};
pub use write::CreateOptions;
