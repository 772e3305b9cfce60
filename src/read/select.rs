//! Item selection for listings.
//!
//! Selection happens in two stages. The [`TypeFilter`] runs first and drops
//! directories or files; the [`Matcher`] then compares the item path against
//! an optional pattern:
//!
//! - **exact**: equal length and a full comparison
//! - **glob**: shell-style wildcards (`*`, `?`, `[...]`); `*` also matches `/`
//!
//! Both modes can ignore case. A malformed glob is not an error: it simply
//! matches nothing.
//!
//! ```rust
//! use arcbridge::read::Matcher;
//!
//! assert!(Matcher::glob("*.txt", false).matches("dir/file.txt"));
//! assert!(!Matcher::glob("*.txt", false).matches("dir/file.bin"));
//! assert!(Matcher::exact("A/B.txt", true).matches("a/b.txt"));
//! assert!(!Matcher::exact("A/B.txt", false).matches("a/b.txt"));
//! ```

use glob::{MatchOptions, Pattern};

/// Restricts a listing to one kind of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Files and directories.
    #[default]
    Any,
    /// Directories only.
    DirectoriesOnly,
    /// Files only.
    FilesOnly,
}

impl TypeFilter {
    /// Returns true if an item with the given directory flag passes.
    pub fn accepts(&self, is_dir: bool) -> bool {
        match self {
            Self::Any => true,
            Self::DirectoriesOnly => is_dir,
            Self::FilesOnly => !is_dir,
        }
    }
}

#[derive(Debug, Clone)]
enum Kind {
    All,
    Exact { pattern: String, nocase: bool },
    Glob { pattern: Option<Pattern>, options: MatchOptions },
}

/// A compiled item path matcher.
#[derive(Debug, Clone)]
pub struct Matcher {
    kind: Kind,
}

impl Matcher {
    /// A matcher accepting every path.
    pub fn all() -> Self {
        Self { kind: Kind::All }
    }

    /// Matches paths equal to `pattern`.
    pub fn exact(pattern: &str, nocase: bool) -> Self {
        Self {
            kind: Kind::Exact {
                pattern: pattern.to_string(),
                nocase,
            },
        }
    }

    /// Matches paths against a shell-style wildcard pattern.
    ///
    /// Runs of `*` act as a single `*`.
    pub fn glob(pattern: &str, nocase: bool) -> Self {
        let pattern = collapse_stars(pattern);
        let compiled = match Pattern::new(&pattern) {
            Ok(p) => Some(p),
            Err(e) => {
                log::debug!("pattern '{}' matches nothing: {}", pattern, e);
                None
            }
        };
        Self {
            kind: Kind::Glob {
                pattern: compiled,
                options: MatchOptions {
                    case_sensitive: !nocase,
                    require_literal_separator: false,
                    require_literal_leading_dot: false,
                },
            },
        }
    }

    /// Builds a matcher from listing flags. `None` accepts every path.
    pub fn new(pattern: Option<&str>, nocase: bool, exact: bool) -> Self {
        match pattern {
            None => Self::all(),
            Some(p) if exact => Self::exact(p, nocase),
            Some(p) => Self::glob(p, nocase),
        }
    }

    /// Tests a path.
    pub fn matches(&self, path: &str) -> bool {
        match &self.kind {
            Kind::All => true,
            Kind::Exact { pattern, nocase } => {
                if *nocase {
                    pattern.chars().count() == path.chars().count()
                        && fold(pattern).eq(fold(path))
                } else {
                    pattern == path
                }
            }
            Kind::Glob { pattern, options } => pattern
                .as_ref()
                .is_some_and(|p| p.matches_with(path, *options)),
        }
    }
}

/// Lowercases per character so both sides fold the same way.
fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

impl Default for Matcher {
    fn default() -> Self {
        Self::all()
    }
}
