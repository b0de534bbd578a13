//! Exclusion filtering by regular expression.
//!
//! A path is excluded when *any* configured pattern matches *anywhere* in
//! it: patterns are regular expressions searched for inside the path
//! ("contains"), not globs and not anchored full matches. `tmp` therefore
//! excludes `build/tmp/a.txt` as well as `tmpfile.txt`; use `^` / `$` to
//! anchor.
//!
//! Patterns are compiled once, before any traversal, so a malformed pattern
//! is reported up front instead of partway through a walk.

use std::path::Path;

use regex::Regex;

/// Errors raised while building an [`ExclusionFilter`].
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// A pattern is not a valid regular expression.
    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern as supplied
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },
}

/// Compiled list of exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<Regex>,
}

impl ExclusionFilter {
    /// Compile `patterns` in order.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPattern`] for the first pattern that
    /// fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| FilterError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Whether no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Source text of the compiled patterns.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    /// Whether `path` matches any pattern.
    ///
    /// Separators are normalized to `/` so the same pattern list behaves
    /// identically on every platform.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        let normalized = if cfg!(windows) {
            path_str.replace('\\', "/")
        } else {
            path_str.into_owned()
        };

        self.patterns.iter().any(|re| re.is_match(&normalized))
    }
}
