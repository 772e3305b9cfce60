//! Extraction of a single item.

use super::metadata::apply_metadata;
use super::{Archive, Destination, ExtractOptions};
use crate::codec::{CodecArchive, Threads};
use crate::property::decode::normalize_path;
use crate::stream::OutStream;
use crate::{Error, Result};

impl Archive<'_> {
    /// Extracts the item at `path` into `destination`.
    ///
    /// The item is the first non-directory entry, in archive order, whose
    /// path equals `path` exactly (case-sensitive). If none does, the call
    /// fails with [`Error::EntryNotFound`] naming `path`.
    ///
    /// Decompression always runs single-threaded. When writing to a path,
    /// missing parent directories are created first, and after a successful
    /// transfer the item's modification time and permissions are applied on
    /// a best-effort basis. A failed transfer leaves any partial output in
    /// place.
    pub fn extract(
        &mut self,
        path: &str,
        destination: Destination<'_>,
        options: &ExtractOptions,
    ) -> Result<()> {
        let codec = self.codec_mut()?;
        let item = find_item(&*codec, path)?;

        let mut output = OutStream::new();
        let target = match destination {
            Destination::Path(target) => {
                if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                    output.mkdir(parent)?;
                }
                output.attach_path(&target)?;
                Some(target)
            }
            Destination::Handle(handle) => {
                output.attach_boxed(handle)?;
                None
            }
        };

        codec.set_threads(Threads::Single)?;
        log::debug!("extracting item #{} '{}'", item, path);
        let extracted = codec.extract(&mut output, options.password.as_deref(), item);
        let detached = output.detach();
        extracted?;
        detached?;

        if let Some(target) = target {
            if options.preserve_metadata {
                apply_metadata(&*codec, item, &output, &target);
            }
        }
        Ok(())
    }
}

/// Finds the first non-directory item whose normalized path equals `path`.
pub(crate) fn find_item(codec: &dyn CodecArchive, path: &str) -> Result<u32> {
    for index in 0..codec.item_count()? {
        if codec.item_is_dir(index) {
            continue;
        }
        if codec.item_path(index).map(normalize_path).as_deref() == Some(path) {
            return Ok(index);
        }
    }
    Err(Error::EntryNotFound {
        path: path.to_string(),
    })
}
