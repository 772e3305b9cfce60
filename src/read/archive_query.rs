//! Archive query methods.
//!
//! Archive properties, item count and filtered listings of an open archive.

use super::{Archive, ListOptions, Matcher};
use crate::Result;
use crate::property::decode::normalize_path;
use crate::property::{PropertyDecoder, PropertyId, PropertySet, PropertyValue};

/// One item of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Zero-based index in the archive's item table.
    pub index: u32,
    /// Item path with separators normalized.
    pub path: String,
    /// Decoded item properties, when requested.
    ///
    /// Always contains [`PropertyId::IS_DIR`], whether or not the codec
    /// declares it.
    pub properties: Option<PropertySet>,
}

impl Archive<'_> {
    /// Returns the archive-level properties.
    pub fn info(&self) -> Result<PropertySet> {
        Ok(PropertyDecoder::new(self.codec()?).archive_properties())
    }

    /// Returns the number of items.
    pub fn count(&self) -> Result<u32> {
        self.codec()?.item_count()
    }

    /// Lists items in archive order.
    ///
    /// The type filter runs before pattern matching. A malformed glob lists
    /// nothing.
    pub fn list(&self, options: &ListOptions) -> Result<Vec<ListEntry>> {
        let codec = self.codec()?;
        let matcher = Matcher::new(options.pattern.as_deref(), options.nocase, options.exact);
        let decoder = PropertyDecoder::new(codec);

        let mut entries = Vec::new();
        for index in 0..codec.item_count()? {
            let is_dir = codec.item_is_dir(index);
            if !options.type_filter.accepts(is_dir) {
                continue;
            }

            let path = match codec.item_path(index) {
                Some(p) => normalize_path(p),
                None => {
                    log::debug!("item #{} has no path", index);
                    String::new()
                }
            };
            if !matcher.matches(&path) {
                continue;
            }

            let properties = options.include_properties.then(|| {
                let mut set = decoder.item_properties(index);
                set.insert(PropertyId::IS_DIR, PropertyValue::Bool(is_dir));
                set
            });

            entries.push(ListEntry {
                index,
                path,
                properties,
            });
        }
        Ok(entries)
    }
}
