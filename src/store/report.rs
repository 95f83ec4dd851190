//! Validation report types.

use crate::value::Kind;
use std::fmt;

/// Created records what appeared since the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    /// The whole backing file is new; it did not exist when the store was
    /// opened. Overrides any incremental path list.
    Document,
    /// Dotted paths of keys that were absent from the snapshot.
    Paths(Vec<String>),
}

impl Default for Created {
    fn default() -> Self {
        Created::Paths(Vec::new())
    }
}

impl Created {
    /// Returns true if the entire document is new.
    pub fn is_document(&self) -> bool {
        matches!(self, Created::Document)
    }

    /// Returns the newly created paths, empty when the whole document is new.
    pub fn paths(&self) -> &[String] {
        match self {
            Created::Document => &[],
            Created::Paths(paths) => paths,
        }
    }

    /// Returns true if nothing was created.
    pub fn is_empty(&self) -> bool {
        matches!(self, Created::Paths(paths) if paths.is_empty())
    }
}

/// TypeMismatch records a stored value whose kind differs from its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// Dotted path of the mismatched key.
    pub path: String,
    /// Kind of the registered default value.
    pub expected: Kind,
    /// Kind of the value currently stored.
    pub actual: Kind,
}

impl TypeMismatch {
    pub fn new(path: impl Into<String>, expected: Kind, actual: Kind) -> Self {
        TypeMismatch {
            path: path.into(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: type mismatch: expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

/// ValidationReport is the result of diffing the live document against the
/// load-time snapshot and the accumulated defaults.
///
/// Recomputed on demand by every validation call; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys (or the whole document) that appeared since load.
    pub created: Created,
    /// Stored values whose kind differs from the registered default.
    pub wrong_types: Vec<TypeMismatch>,
    /// Dotted paths present in the document but absent from the defaults.
    pub unused_values: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        ValidationReport::default()
    }

    /// Records a path that was absent from the snapshot. Ignored once the
    /// report has been promoted to whole-document-new.
    pub fn record_created(&mut self, path: impl Into<String>) {
        if let Created::Paths(paths) = &mut self.created {
            paths.push(path.into());
        }
    }

    /// Returns true if the document matches its snapshot and defaults
    /// exactly: nothing created, no mismatches, no unused values.
    pub fn is_clean(&self) -> bool {
        self.created.is_empty() && self.wrong_types.is_empty() && self.unused_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_clean() {
        let report = ValidationReport::new();
        assert!(report.is_clean());
        assert!(report.created.is_empty());
        assert!(!report.created.is_document());
    }

    #[test]
    fn test_record_created() {
        let mut report = ValidationReport::new();
        report.record_created("DB.host");
        assert_eq!(report.created.paths(), ["DB.host"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_document_created_overrides_paths() {
        let mut report = ValidationReport::new();
        report.record_created("DB");
        report.created = Created::Document;
        report.record_created("ignored");
        assert!(report.created.is_document());
        assert!(report.created.paths().is_empty());
        assert!(!report.created.is_empty());
    }

    #[test]
    fn test_type_mismatch_display() {
        let mismatch = TypeMismatch::new("DB.port", Kind::Number, Kind::String);
        assert_eq!(
            format!("{}", mismatch),
            "DB.port: type mismatch: expected number, got string"
        );
    }
}
