//! Open, list and extract options.

pub use super::select::TypeFilter;

/// Options for opening an archive.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Password for archives with encrypted headers.
    pub password: Option<String>,
    /// File extension naming the format to force (e.g. `"zip"`).
    ///
    /// When unset the format is detected from the archive filename, or from
    /// the data itself when opening from a handle.
    pub format: Option<String>,
    /// Let the codec identify the format from the archive data, ignoring
    /// the filename. Cannot be combined with [`format`](Self::format).
    pub detect_type: bool,
    /// Open the archive as the first volume of a multi-volume set.
    pub multivolume: bool,
}

impl OpenOptions {
    /// Creates open options with default settings.
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

    /// Sets whether the format is identified from the archive data.
    pub fn detect_type(mut self, detect_type: bool) -> Self {
        self.detect_type = detect_type;
        self
    }

    /// Sets the multi-volume flag.
    pub fn multivolume(mut self, multivolume: bool) -> Self {
        self.multivolume = multivolume;
        self
    }
}

/// Options for listing archive items.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Optional pattern; when unset every item passing the type filter is listed.
    pub pattern: Option<String>,
    /// Restricts the listing to files or directories.
    pub type_filter: TypeFilter,
    /// Compare paths ignoring case.
    pub nocase: bool,
    /// Treat the pattern as a literal path instead of a glob.
    pub exact: bool,
    /// Attach the decoded property set of every listed item.
    pub include_properties: bool,
}

impl ListOptions {
    /// Creates list options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pattern.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the type filter.
    pub fn type_filter(mut self, filter: TypeFilter) -> Self {
        self.type_filter = filter;
        self
    }

    /// Sets case-insensitive matching.
    pub fn nocase(mut self, nocase: bool) -> Self {
        self.nocase = nocase;
        self
    }

    /// Sets exact (non-glob) matching.
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Sets whether item properties are included.
    pub fn include_properties(mut self, include: bool) -> Self {
        self.include_properties = include;
        self
    }
}

/// Options for extracting an item.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Password for encrypted items.
    pub password: Option<String>,
    /// Apply the item's modification time and permissions to an extracted
    /// file. Ignored when extracting into a handle.
    pub preserve_metadata: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            password: None,
            preserve_metadata: true,
        }
    }
}

impl ExtractOptions {
    /// Creates extraction options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets metadata preservation.
    pub fn preserve_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }
}
