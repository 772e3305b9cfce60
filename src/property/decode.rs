//! Decoding of codec property tables into [`PropertyValue`]s.
//!
//! The codec declares its properties at runtime as (id, type tag) pairs. The
//! decoder walks that declaration and fetches each value through the accessor
//! matching the tag, and only that accessor:
//!
//! | Declared tag | Accessor | Result |
//! |--------------|----------|--------|
//! | string | string | [`PropertyValue::String`] |
//! | bool | bool | [`PropertyValue::Bool`] |
//! | 1/2/4-byte integer | 32-bit | [`PropertyValue::U32`] |
//! | 8-byte integer | 64-bit, then 32-bit | [`PropertyValue::U64`] |
//! | filetime | time | [`PropertyValue::Time`] |
//! | anything else | none | omitted |
//!
//! The 64-bit row is the one place where a second accessor is tried: some
//! formats declare sizes as 8-byte values but only answer through the 32-bit
//! accessor.

use super::{PropertyId, PropertySet, PropertyType, PropertyValue};
use crate::codec::CodecArchive;

#[derive(Debug, Clone, Copy)]
enum Scope {
    Archive,
    Item(u32),
}

/// Decodes archive-level and item-level property tables of an open codec
/// archive.
pub struct PropertyDecoder<'c> {
    codec: &'c dyn CodecArchive,
}

impl<'c> PropertyDecoder<'c> {
    /// Creates a decoder over an open codec archive.
    pub fn new(codec: &'c dyn CodecArchive) -> Self {
        Self { codec }
    }

    /// Decodes every declared archive-level property.
    ///
    /// If the codec does not declare the physical size, it is queried
    /// through the 64-bit accessor and appended when available.
    pub fn archive_properties(&self) -> PropertySet {
        let mut set = PropertySet::new();
        for index in 0..self.codec.property_count() {
            let Some((id, ty)) = self.codec.property_info(index) else {
                log::debug!("no info for archive property #{}", index);
                continue;
            };
            if let Some(value) = self.decode(Scope::Archive, id, ty) {
                set.insert(id, value);
            }
        }
        if !set.contains(PropertyId::PHY_SIZE) {
            if let Some(size) = self.codec.u64_property(PropertyId::PHY_SIZE) {
                set.insert(PropertyId::PHY_SIZE, PropertyValue::U64(size));
            }
        }
        set
    }

    /// Decodes every declared property of one item.
    pub fn item_properties(&self, item: u32) -> PropertySet {
        let mut set = PropertySet::new();
        for index in 0..self.codec.item_property_count() {
            let Some((id, ty)) = self.codec.item_property_info(index) else {
                log::debug!("no info for item property #{}", index);
                continue;
            };
            if let Some(value) = self.decode(Scope::Item(item), id, ty) {
                set.insert(id, value);
            }
        }
        set
    }

    /// Decodes one archive-level property given its declared type.
    pub fn archive_property(&self, id: PropertyId, ty: PropertyType) -> Option<PropertyValue> {
        self.decode(Scope::Archive, id, ty)
    }

    /// Decodes one item-level property given its declared type.
    pub fn item_property(
        &self,
        item: u32,
        id: PropertyId,
        ty: PropertyType,
    ) -> Option<PropertyValue> {
        self.decode(Scope::Item(item), id, ty)
    }

    fn decode(&self, scope: Scope, id: PropertyId, ty: PropertyType) -> Option<PropertyValue> {
        let value = match ty {
            PropertyType::String => self.string(scope, id).map(|s| {
                if id == PropertyId::PATH {
                    PropertyValue::String(normalize_path(s))
                } else {
                    PropertyValue::String(s)
                }
            }),
            PropertyType::Bool => self.bool(scope, id).map(PropertyValue::Bool),
            ty if ty.is_small_integer() => self.u32(scope, id).map(PropertyValue::U32),
            ty if ty.is_wide_integer() => self
                .u64(scope, id)
                .or_else(|| self.u32(scope, id).map(u64::from))
                .map(PropertyValue::U64),
            PropertyType::FileTime => self.time(scope, id).map(PropertyValue::Time),
            other => {
                log::debug!("skipping property {} of undecodable type {:?}", id, other);
                return None;
            }
        };
        if value.is_none() {
            log::debug!("{:?} property {} declared as {:?} has no value", scope, id, ty);
        }
        value
    }

    fn string(&self, scope: Scope, id: PropertyId) -> Option<String> {
        match scope {
            Scope::Archive => self.codec.string_property(id),
            Scope::Item(item) => self.codec.string_item_property(item, id),
        }
    }

    fn bool(&self, scope: Scope, id: PropertyId) -> Option<bool> {
        match scope {
            Scope::Archive => self.codec.bool_property(id),
            Scope::Item(item) => self.codec.bool_item_property(item, id),
        }
    }

    fn u32(&self, scope: Scope, id: PropertyId) -> Option<u32> {
        match scope {
            Scope::Archive => self.codec.u32_property(id),
            Scope::Item(item) => self.codec.u32_item_property(item, id),
        }
    }

    fn u64(&self, scope: Scope, id: PropertyId) -> Option<u64> {
        match scope {
            Scope::Archive => self.codec.u64_property(id),
            Scope::Item(item) => self.codec.u64_item_property(item, id),
        }
    }

    fn time(&self, scope: Scope, id: PropertyId) -> Option<u32> {
        match scope {
            Scope::Archive => self.codec.time_property(id),
            Scope::Item(item) => self.codec.time_item_property(item, id),
        }
    }
}

/// Normalizes an item path to forward slashes on platforms whose native
/// separator is a backslash. Elsewhere the path is returned unchanged.
pub fn normalize_path(path: String) -> String {
    if cfg!(windows) {
        path.replace('\\', "/")
    } else {
        path
    }
}
