//! Path normalization for project keys.
//!
//! Claude Code stores each project's session transcripts under
//! `~/.claude/projects/<slug>/`, where the slug is the absolute project path
//! with every character that is not an ASCII letter or digit replaced by `-`:
//!
//! ```text
//! /Users/x/Documents/test_temp_01  ->  -Users-x-Documents-test-temp-01
//! /Users/x/Documents/test.temp.01  ->  -Users-x-Documents-test-temp-01
//! /Users/x/Documents/test-temp-01  ->  -Users-x-Documents-test-temp-01
//! ```
//!
//! [`PathNormalizer`] produces exactly that slug as a [`CanonicalKey`], so
//! local and remote session lists keyed by it line up with the directories
//! Claude Code writes. Naming variants that differ only in `_`, `.` or `-`
//! collide on purpose; paths that differ in where separators appear do not
//! (`testtemp01` stays distinct from `test_temp_01`).
//!
//! # Example
//!
//! ```
//! use sessionkey::normalize::PathNormalizer;
//!
//! let normalizer = PathNormalizer::with_home("/Users/x");
//! let a = normalizer.normalize("/Users/x/Documents/test_temp_01").unwrap();
//! let b = normalizer.normalize("~/Documents/test.temp.01").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "-Users-x-Documents-test-temp-01");
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::{InvalidPathReason, KeyError};

/// Character every non-alphanumeric input character is replaced with.
pub const KEY_SEPARATOR: char = '-';

/// Normalized form of a raw filesystem path.
///
/// Never empty, and contains only ASCII letters, ASCII digits and `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Accepts a string that is already in canonical form.
    ///
    /// Returns `None` if `s` is empty or contains any character a
    /// [`PathNormalizer`] could not have produced.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        is_canonical(s).then(|| Self(s.to_string()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns raw filesystem paths into [`CanonicalKey`]s.
///
/// The home directory used for `~` expansion is injected rather than read
/// from the environment, so normalization depends only on its inputs.
/// A normalizer is immutable and can be shared freely across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathNormalizer {
    /// Home directory with trailing separators removed. `Some("")` is the
    /// filesystem root.
    home: Option<String>,
}

impl PathNormalizer {
    /// Creates a normalizer that rejects home-relative paths.
    #[must_use]
    pub fn without_home() -> Self {
        Self { home: None }
    }

    /// Creates a normalizer that expands a leading `~` to `home`.
    ///
    /// A blank `home` behaves like [`PathNormalizer::without_home`].
    #[must_use]
    pub fn with_home(home: impl Into<String>) -> Self {
        let home = home.into();
        let trimmed = home.trim();
        if trimmed.is_empty() {
            return Self::without_home();
        }
        Self {
            home: Some(trimmed.trim_end_matches(is_path_separator).to_string()),
        }
    }

    /// Returns the home directory `~` expands to, if any.
    #[must_use]
    pub fn home(&self) -> Option<&str> {
        match self.home.as_deref() {
            Some("") => Some("/"),
            other => other,
        }
    }

    /// Normalizes `raw` into a [`CanonicalKey`].
    ///
    /// Surrounding whitespace and trailing `/` or `\` separators are ignored.
    /// `~` and `~/...` expand to the configured home; `~user` is left alone.
    /// Every remaining character that is not an ASCII letter or digit becomes
    /// `-`, one per UTF-16 code unit. Case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidPath`] if `raw` is blank, contains a NUL
    /// character, or needs `~` expansion without a configured home.
    pub fn normalize(&self, raw: &str) -> Result<CanonicalKey, KeyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KeyError::invalid_path(raw, InvalidPathReason::Empty));
        }
        if trimmed.contains('\0') {
            return Err(KeyError::invalid_path(raw, InvalidPathReason::NulByte));
        }

        let expanded: Cow<'_, str> = match strip_home_prefix(trimmed) {
            Some(rest) => {
                let home = self
                    .home
                    .as_deref()
                    .ok_or_else(|| KeyError::invalid_path(raw, InvalidPathReason::UnresolvedHome))?;
                Cow::Owned(format!("{home}{rest}"))
            }
            None => Cow::Borrowed(trimmed),
        };

        let stripped = expanded.trim_end_matches(is_path_separator);
        if stripped.is_empty() {
            // Only separators left: the filesystem root.
            return Ok(CanonicalKey(KEY_SEPARATOR.to_string()));
        }

        let mut key = String::with_capacity(stripped.len());
        for c in stripped.chars() {
            push_canonical(&mut key, c);
        }
        Ok(CanonicalKey(key))
    }
}

/// Normalizes `path` with an optional home directory for `~` expansion.
///
/// Shorthand for building a [`PathNormalizer`] and calling
/// [`PathNormalizer::normalize`].
///
/// # Errors
///
/// See [`PathNormalizer::normalize`].
pub fn normalize_path_for_key(path: &str, home: Option<&str>) -> Result<CanonicalKey, KeyError> {
    let normalizer = match home {
        Some(home) => PathNormalizer::with_home(home),
        None => PathNormalizer::without_home(),
    };
    normalizer.normalize(path)
}

/// Returns true if `s` could have been produced by [`PathNormalizer`].
#[must_use]
pub fn is_canonical(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == KEY_SEPARATOR)
}

/// Returns the remainder after a leading `~`, for `~`, `~/...` and `~\...`.
fn strip_home_prefix(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('~')?;
    if rest.is_empty() || rest.starts_with(is_path_separator) {
        Some(rest)
    } else {
        None
    }
}

fn is_path_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Appends `c`, or one separator per UTF-16 code unit of `c`.
///
/// Claude Code replaces per UTF-16 unit, so characters outside the Basic
/// Multilingual Plane (most emoji) become two separators.
fn push_canonical(key: &mut String, c: char) {
    if c.is_ascii_alphanumeric() {
        key.push(c);
    } else {
        for _ in 0..c.len_utf16() {
            key.push(KEY_SEPARATOR);
        }
    }
}
