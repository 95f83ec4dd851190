//! The section store: one on-disk JSON document, path-addressed access,
//! defaults registration, and the three-way validation walk.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::merge;
use crate::path::{Path, PathError};
use crate::value::{Kind, Map, Value};

use super::report::{Created, TypeMismatch, ValidationReport};

/// Default backing file, relative to the current working directory.
pub const DEFAULT_FILE: &str = "config.json";

/// StoreError represents a failed store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("cannot write a non-mapping value at the document root, got {actual}")]
    RootNotMapping { actual: Kind },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// SectionStore owns one on-disk JSON document and its three parallel trees:
/// the live document, an immutable snapshot captured at open, and the
/// accumulated defaults registered so far.
///
/// Every mutating call writes the document back synchronously; the design
/// assumes single-process, single-writer ownership of the backing file.
#[derive(Debug)]
pub struct SectionStore {
    file: PathBuf,
    document: Map,
    snapshot: Map,
    defaults: Map,
    created: bool,
    load_error: Option<String>,
}

impl SectionStore {
    /// Opens the store backed by the given file, loading the document if the
    /// file exists.
    ///
    /// A missing file yields an empty document and marks the store as newly
    /// created. Unparsable JSON (or a non-mapping root) is captured as a
    /// load error rather than failing the call; the store then operates on
    /// an empty document. Other read failures propagate.
    pub fn open(file: impl Into<PathBuf>) -> io::Result<SectionStore> {
        let file = file.into();
        let mut document = Map::new();
        let mut created = false;
        let mut load_error = None;

        match fs::read_to_string(&file) {
            Ok(text) => match crate::value::from_json(&text) {
                Ok(Value::Map(map)) => document = map,
                Ok(other) => {
                    warn!(file = %file.display(), kind = %other.kind(), "document root is not a mapping");
                    load_error = Some(format!(
                        "document root must be a mapping, got {}",
                        other.kind()
                    ));
                }
                Err(err) => {
                    warn!(file = %file.display(), %err, "failed to parse document");
                    load_error = Some(err.to_string());
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => created = true,
            Err(err) => return Err(err),
        }

        let snapshot = document.clone();
        debug!(file = %file.display(), created, "opened section store");
        Ok(SectionStore {
            file,
            document,
            snapshot,
            defaults: Map::new(),
            created,
            load_error,
        })
    }

    /// Returns the backing file path.
    pub fn file(&self) -> &std::path::Path {
        &self.file
    }

    /// Returns the live document.
    pub fn document(&self) -> &Map {
        &self.document
    }

    /// Returns the document as read from disk when the store was opened.
    pub fn snapshot(&self) -> &Map {
        &self.snapshot
    }

    /// Returns the defaults accumulated across section registrations.
    pub fn defaults(&self) -> &Map {
        &self.defaults
    }

    /// Returns true if the backing file did not exist when the store was
    /// opened.
    pub fn was_created(&self) -> bool {
        self.created
    }

    /// Returns the captured parse failure from open, if any.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Walks the document along `path`, creating missing mappings and
    /// replacing any non-mapping value encountered en route with an empty
    /// mapping, and returns the mapping at the final segment.
    ///
    /// The returned handle borrows the live document, so caller mutations
    /// are visible at the root. The root path returns the document itself.
    /// Nothing is persisted.
    pub fn get_or_create(&mut self, path: &str) -> Result<&mut Map, StoreError> {
        let parsed = Path::parse(path)?;
        Ok(descend(&mut self.document, &parsed))
    }

    /// Writes `value` at `path` and persists the document.
    ///
    /// The path's segments are rebuilt as a chain of nested single-key
    /// mappings with `value` innermost, and the chain's top-level keys are
    /// shallow-assigned onto the document root; for the root path this
    /// assigns `value`'s own top-level keys (a non-mapping value at the
    /// root is an error). Returns a clone of the mapping now at `path`.
    pub fn update(&mut self, path: &str, value: Value) -> Result<Map, StoreError> {
        let parsed = Path::parse(path)?;
        self.update_at(&parsed, value)
    }

    fn update_at(&mut self, path: &Path, value: Value) -> Result<Map, StoreError> {
        // Path creation side effect only; the chain below overwrites it.
        descend(&mut self.document, path);

        let chain_map = match nest(path, value) {
            Value::Map(map) => map,
            other => {
                return Err(StoreError::RootNotMapping {
                    actual: other.kind(),
                })
            }
        };
        for (key, val) in chain_map.fields {
            self.document.set(key, val);
        }

        self.persist()?;
        Ok(descend(&mut self.document, path).clone())
    }

    /// Registers `defaults` for the section at `path` and returns the
    /// section's effective value, shaped like `defaults`.
    ///
    /// Defaults accumulate across calls: registering a sibling section never
    /// overwrites a previous registration, and re-registering the same path
    /// deep-merges over the earlier defaults. Stored values win over
    /// defaults field by field; keys missing from storage are filled in
    /// from `defaults` and the merged result is persisted at `path`.
    pub fn config_section(&mut self, path: &str, defaults: &Map) -> Result<Map, StoreError> {
        let parsed = Path::parse(path)?;
        let existing = descend(&mut self.document, &parsed).clone();

        if let Value::Map(chain) = nest(&parsed, Value::Map(defaults.clone())) {
            merge::merge_into(&mut self.defaults, &chain);
        }

        // The stored section already matches the defaults exactly; skip the
        // merge and the write.
        if existing == *defaults {
            return Ok(existing);
        }

        let merged = merge::merged(defaults, &existing);
        self.update_at(&parsed, Value::Map(merged))
    }

    /// Diffs the live document against the load-time snapshot and the
    /// accumulated defaults.
    ///
    /// Keys absent from the snapshot are reported as created (or the whole
    /// report is marked document-new if the backing file did not exist at
    /// open). Keys absent from the defaults are reported as unused and,
    /// with `clear_unused`, deleted from the document, which is then
    /// persisted. Keys whose kind differs from their default are reported
    /// as type mismatches.
    pub fn validate(&mut self, clear_unused: bool) -> Result<ValidationReport, StoreError> {
        let mut report = ValidationReport::new();
        let SectionStore {
            document,
            snapshot,
            defaults,
            ..
        } = self;
        walk_section(
            document,
            Some(&*snapshot),
            Some(&*defaults),
            "",
            clear_unused,
            &mut report,
        );

        if self.created {
            report.created = Created::Document;
        }
        if clear_unused {
            self.persist()?;
        }
        Ok(report)
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.file.clone(),
                    source,
                })?;
            }
        }
        let text = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.file, text).map_err(|source| StoreError::Write {
            path: self.file.clone(),
            source,
        })?;
        debug!(file = %self.file.display(), "wrote document");
        Ok(())
    }
}

/// Walks `root` along `path`, creating mappings (and clobbering non-mapping
/// values) as needed, and returns the mapping at the final segment.
fn descend<'a>(root: &'a mut Map, path: &Path) -> &'a mut Map {
    let mut current = root;
    for segment in path.segments() {
        let slot = current
            .fields
            .entry(segment.to_string())
            .or_insert_with(|| Value::Map(Map::new()));
        if !slot.is_map() {
            *slot = Value::Map(Map::new());
        }
        match slot {
            Value::Map(next) => current = next,
            _ => unreachable!("slot was replaced with a mapping above"),
        }
    }
    current
}

/// Rebuilds `path` as a chain of nested single-key mappings with `value`
/// innermost. For the root path the value itself is returned.
fn nest(path: &Path, value: Value) -> Value {
    path.segments().rev().fold(value, |inner, segment| {
        let mut outer = Map::new();
        outer.set(segment, inner);
        Value::Map(outer)
    })
}

/// Lock-step recursive walk of the current document, the snapshot, and the
/// defaults tree. Root-level keys are reported bare; nested keys as dotted
/// paths.
fn walk_section(
    current: &mut Map,
    snapshot: Option<&Map>,
    defaults: Option<&Map>,
    prefix: &str,
    clear_unused: bool,
    report: &mut ValidationReport,
) {
    for key in current.keys() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if !snapshot.map_or(false, |s| s.has(&key)) {
            report.record_created(path.as_str());
        }

        let Some(default_value) = defaults.and_then(|d| d.get(&key)) else {
            if clear_unused {
                warn!(path = %path, "pruning unused value");
                current.delete(&key);
            }
            report.unused_values.push(path);
            continue;
        };

        let Some(current_value) = current.get(&key) else {
            continue;
        };
        let expected = default_value.kind();
        let actual = current_value.kind();
        if expected != actual {
            report
                .wrong_types
                .push(TypeMismatch::new(path.clone(), expected, actual));
        }

        if let Some(default_child) = default_value.as_map() {
            if let Some(Value::Map(child)) = current.get_mut(&key) {
                let snapshot_child = snapshot.and_then(|s| s.get(&key)).and_then(Value::as_map);
                walk_section(
                    child,
                    snapshot_child,
                    Some(default_child),
                    &path,
                    clear_unused,
                    report,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nest_root_is_identity() {
        let path = Path::root();
        let value = Value::Int(5);
        assert_eq!(nest(&path, value), Value::Int(5));
    }

    #[test]
    fn test_nest_builds_single_key_chain() {
        let path = Path::parse("A.B.C").unwrap();
        let nested = nest(&path, Value::Int(5));
        let expected = crate::value::from_json(r#"{"A": {"B": {"C": 5}}}"#).unwrap();
        assert_eq!(nested, expected);
    }

    #[test]
    fn test_descend_clobbers_scalars() {
        let mut root = match crate::value::from_json(r#"{"A": 5}"#).unwrap() {
            Value::Map(m) => m,
            _ => unreachable!(),
        };
        let path = Path::parse("A.B").unwrap();
        let leaf = descend(&mut root, &path);
        assert!(leaf.is_empty());
        let expected = crate::value::from_json(r#"{"A": {"B": {}}}"#).unwrap();
        assert_eq!(Value::Map(root), expected);
    }
}
