//! Options for archive creation.

use std::path::PathBuf;

use crate::{Error, Result};

/// Options for creating an archive.
///
/// # Example
///
/// ```rust
/// use arcbridge::write::CreateOptions;
///
/// let options = CreateOptions::new()
///     .format("zip")
///     .working_dir("/data/project")
///     .property("x", "9")
///     .property("comment", "nightly build");
/// assert_eq!(options.properties.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Password to encrypt items with.
    pub password: Option<String>,
    /// File extension naming the format to create. When unset, the format is
    /// taken from the destination filename.
    pub format: Option<String>,
    /// Archive properties as (name, value) pairs. Value types are inferred;
    /// see [`PropertyValueHint`](super::PropertyValueHint).
    pub properties: Vec<(String, String)>,
    /// Directory relative item paths are read from. Items are still stored
    /// under the paths as given.
    pub working_dir: Option<PathBuf>,
}

impl CreateOptions {
    /// Creates creation options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Forces the format registered for `extension`.
    pub fn format(mut self, extension: impl Into<String>) -> Self {
        self.format = Some(extension.into());
        self
    }

    /// Adds an archive property.
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Adds archive properties from a flat `[name, value, name, value, ...]`
    /// list.
    ///
    /// Fails with [`Error::Validation`] if the list has an odd length.
    pub fn properties_flat<S: AsRef<str>>(mut self, list: &[S]) -> Result<Self> {
        self.properties.extend(properties_from_flat(list)?);
        Ok(self)
    }

    /// Sets the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Splits a flat `[name, value, ...]` list into pairs.
pub fn properties_from_flat<S: AsRef<str>>(list: &[S]) -> Result<Vec<(String, String)>> {
    if list.len() % 2 != 0 {
        return Err(Error::Validation(
            "property list must have an even number of elements".into(),
        ));
    }
    Ok(list
        .chunks_exact(2)
        .map(|pair| (pair[0].as_ref().to_string(), pair[1].as_ref().to_string()))
        .collect())
}
