//! Metadata propagation for extracted files.
//!
//! After an item has been written to a real path, its modification time and
//! permissions are copied onto that path. Every step is best-effort: failures
//! are logged and never fail the extraction.

use std::path::Path;

use crate::codec::CodecArchive;
use crate::property::PropertyId;
use crate::stream::{OutStream, meta};

/// Applies an item's metadata to an extracted file.
///
/// The modification time is applied first. Permissions come from the POSIX
/// mode if the codec reports one, else from a mode embedded in the attribute
/// word, else only the read-only attribute bit is honored. Nothing is
/// applied while `output` is attached to a caller's handle.
pub(crate) fn apply_metadata(
    codec: &dyn CodecArchive,
    item: u32,
    output: &OutStream,
    path: &Path,
) {
    if let Some(mtime) = codec.time_item_property(item, PropertyId::MTIME) {
        if let Err(e) = output.set_mtime(path, mtime) {
            log::warn!(
                "Failed to set modification time on '{}': {}",
                path.display(),
                e
            );
        }
    }

    let attributes = codec.u32_item_property(item, PropertyId::ATTRIB);
    let mode = codec
        .u32_item_property(item, PropertyId::POSIX_ATTRIB)
        .filter(|&m| m != 0)
        .or_else(|| attributes.and_then(meta::mode_from_attributes));

    if let Some(mode) = mode {
        if let Err(e) = output.set_file_mode(path, mode) {
            log::warn!("Failed to set permissions on '{}': {}", path.display(), e);
        }
    } else if let Some(attributes) = attributes {
        if let Err(e) = output.set_attributes(path, attributes) {
            log::warn!("Failed to set attributes on '{}': {}", path.display(), e);
        }
    }
}
