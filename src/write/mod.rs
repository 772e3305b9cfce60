//! Archive creation API.
//!
//! Creation runs as one sequence:
//!
//! 1. Set up the input stream: attached to a source handle when one is
//!    given, otherwise path-based (items are read from the filesystem,
//!    relative to the optional working directory).
//! 2. Set up the output stream: a file the engine creates, or a handle.
//! 3. Initialize the codec's archive writer with the format (forced, or
//!    taken from the destination filename) and the optional password.
//! 4. Apply archive properties. A rejected property is logged and skipped.
//! 5. Register every item path.
//! 6. Commit with a single update.
//!
//! Failures in steps 1-3, 5 and 6 abort the creation and are reported with
//! the codec's message.
//!
//! # Example
//!
//! ```rust,no_run
//! use arcbridge::{Destination, Library};
//! use arcbridge::write::CreateOptions;
//!
//! let mut library = Library::default();
//! let options = CreateOptions::new()
//!     .working_dir("project")
//!     .property("x", "9");
//! library.create(
//!     Destination::path("project.zip"),
//!     &["README.md", "src/main.rs"],
//!     &options,
//! )?;
//! # Ok::<(), arcbridge::Error>(())
//! ```

mod options;
mod properties;

pub use options::{CreateOptions, properties_from_flat};
pub use properties::PropertyValueHint;

use std::path::Path;

use crate::Result;
use crate::codec::{Codec, CreateRequest, FormatSelection};
use crate::library::resolve_format;
use crate::read::Destination;
use crate::stream::{InStream, OutStream, ReadSeek};

/// Creates an archive. See the module documentation for the sequence.
pub(crate) fn create<'a, S: AsRef<str>>(
    codec: &dyn Codec,
    destination: Destination<'a>,
    source: Option<Box<dyn ReadSeek + 'a>>,
    items: &[S],
    options: &CreateOptions,
) -> Result<()> {
    let format = select_format(codec, &destination, options)?;

    let mut input = match source {
        Some(handle) => InStream::attached_boxed(handle),
        None => InStream::new(),
    };
    if let Some(dir) = &options.working_dir {
        input = input.with_base_dir(dir);
    }

    let mut output = OutStream::new();
    let filename = match destination {
        Destination::Path(path) => {
            output.attach_path(&path)?;
            Some(path)
        }
        Destination::Handle(handle) => {
            output.attach_boxed(handle)?;
            None
        }
    };

    match &filename {
        Some(p) => log::debug!("creating archive '{}' ({:?})", p.display(), format),
        None => log::debug!("creating archive into handle ({:?})", format),
    }

    let mut writer = codec.create_archive(CreateRequest {
        source: input,
        output,
        filename,
        password: options.password.clone(),
        format,
    })?;

    properties::apply_properties(writer.as_mut(), &options.properties);

    for item in items {
        writer.add_item(item.as_ref())?;
    }
    writer.update()
}

fn select_format(
    codec: &dyn Codec,
    destination: &Destination<'_>,
    options: &CreateOptions,
) -> Result<FormatSelection> {
    if let Some(ext) = &options.format {
        return Ok(FormatSelection::Forced(resolve_format(codec, ext)?));
    }
    let detected = match destination {
        Destination::Path(path) => extension_of(path).and_then(|e| codec.format_for_extension(e)),
        Destination::Handle(_) => None,
    };
    Ok(detected.map_or(FormatSelection::AutoDetect, FormatSelection::Forced))
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
