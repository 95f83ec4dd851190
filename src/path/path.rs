//! Dotted path parsing and validation.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// PathError represents a rejected path string.
///
/// A malformed path aborts only the call that supplied it; stored state is
/// never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path {path:?} contains characters outside ASCII letters, digits, '-', '_' and '.'")]
    InvalidCharacter { path: String },

    #[error("path {path:?} must not start or end with '.'")]
    InvalidBoundary { path: String },

    #[error("path {path:?} contains an empty segment")]
    InvalidSegment { path: String },
}

/// Path is a validated dot-separated address into a configuration document.
///
/// The empty path denotes the document root. Each segment is one or more of
/// ASCII letters, digits, dash, and underscore; no leading, trailing, or
/// doubled dots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    raw: String,
}

impl Path {
    /// Creates the root path.
    pub fn root() -> Self {
        Path { raw: String::new() }
    }

    /// Parses and validates a path string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, PathError> {
        let raw = raw.into();
        validate(&raw)?;
        Ok(Path { raw })
    }

    /// Returns true if this is the root path.
    pub fn is_root(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of segments (zero for the root path).
    pub fn len(&self) -> usize {
        self.segments().count()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Returns an iterator over the path's segments. Empty for the root.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.raw.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Returns the raw path string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Validates a raw path string without constructing a [`Path`].
///
/// The empty string is always valid and denotes the root.
pub fn validate(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Ok(());
    }
    let allowed =
        |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == SEPARATOR;
    if !path.chars().all(allowed) {
        return Err(PathError::InvalidCharacter {
            path: path.to_string(),
        });
    }
    if path.starts_with(SEPARATOR) || path.ends_with(SEPARATOR) {
        return Err(PathError::InvalidBoundary {
            path: path.to_string(),
        });
    }
    if path.contains("..") {
        return Err(PathError::InvalidSegment {
            path: path.to_string(),
        });
    }
    Ok(())
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_valid() {
        let path = Path::parse("").unwrap();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.segments().count(), 0);
    }

    #[test]
    fn test_simple_paths_are_valid() {
        assert!(Path::parse("A").is_ok());
        assert!(Path::parse("A.B-2_c").is_ok());
        assert!(Path::parse("db.replica-set.members_0").is_ok());
    }

    #[test]
    fn test_segments() {
        let path = Path::parse("A.B-2_c").unwrap();
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, vec!["A", "B-2_c"]);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_leading_dot_rejected() {
        assert_eq!(
            Path::parse(".A"),
            Err(PathError::InvalidBoundary { path: ".A".into() })
        );
    }

    #[test]
    fn test_trailing_dot_rejected() {
        assert_eq!(
            Path::parse("A."),
            Err(PathError::InvalidBoundary { path: "A.".into() })
        );
    }

    #[test]
    fn test_consecutive_dots_rejected() {
        assert_eq!(
            Path::parse("A..B"),
            Err(PathError::InvalidSegment { path: "A..B".into() })
        );
    }

    #[test]
    fn test_bad_characters_rejected() {
        assert_eq!(
            Path::parse("A B"),
            Err(PathError::InvalidCharacter { path: "A B".into() })
        );
        assert!(matches!(
            Path::parse("a/b"),
            Err(PathError::InvalidCharacter { .. })
        ));
        assert!(matches!(
            Path::parse("héllo"),
            Err(PathError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_lone_dot_is_a_boundary_error() {
        // "." both starts and ends with the separator.
        assert_eq!(
            Path::parse("."),
            Err(PathError::InvalidBoundary { path: ".".into() })
        );
    }

    #[test]
    fn test_display_and_from_str() {
        let path: Path = "A.B".parse().unwrap();
        assert_eq!(format!("{}", path), "A.B");
        assert_eq!(path.as_str(), "A.B");
    }
}
