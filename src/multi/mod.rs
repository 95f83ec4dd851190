//! Multi module - Fans defaults out across one section store per top-level
//! key.
//!
//! Pure composition over the section store contract: each top-level key of
//! the supplied defaults becomes one `<key>.json` file in the target
//! directory, and the merged per-key results are reassembled into a single
//! composite mapping.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::store::{SectionStore, StoreError, ValidationReport};
use crate::value::{Kind, Map, Value};

/// Default folder holding the per-key files, relative to the current
/// working directory.
pub const DEFAULT_DIR: &str = "conf";

/// MultiError represents a failed fan-out construction or operation.
#[derive(Debug, Error)]
pub enum MultiError {
    #[error("multi-store defaults must be a mapping, got {actual}")]
    ConfigType { actual: Kind },

    #[error("defaults for section {key:?} must be a mapping, got {actual}")]
    SectionType { key: String, actual: Kind },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// MultiStore owns one [`SectionStore`] per top-level defaults key.
///
/// Construction registers every section immediately, so each backing file
/// is created (or reconciled with its stored overrides) up front.
#[derive(Debug)]
pub struct MultiStore {
    dir: PathBuf,
    stores: BTreeMap<String, SectionStore>,
    config: Map,
}

impl MultiStore {
    /// Creates a fan-out over [`DEFAULT_DIR`].
    pub fn new(defaults: Value) -> Result<MultiStore, MultiError> {
        MultiStore::with_dir(defaults, DEFAULT_DIR)
    }

    /// Creates a fan-out writing `<dir>/<key>.json` per top-level key of
    /// `defaults`.
    ///
    /// `defaults` must be a mapping, and so must each of its top-level
    /// values; anything else fails construction immediately.
    pub fn with_dir(defaults: Value, dir: impl Into<PathBuf>) -> Result<MultiStore, MultiError> {
        let dir = dir.into();
        let sections = match defaults {
            Value::Map(map) => map,
            other => {
                return Err(MultiError::ConfigType {
                    actual: other.kind(),
                })
            }
        };

        let mut stores = BTreeMap::new();
        let mut config = Map::new();
        for (key, section) in sections.iter() {
            let section = match section {
                Value::Map(map) => map,
                other => {
                    return Err(MultiError::SectionType {
                        key: key.clone(),
                        actual: other.kind(),
                    })
                }
            };

            let mut store = SectionStore::open(dir.join(format!("{key}.json")))?;
            let merged = store.config_section("", section)?;
            config.set(key.clone(), Value::Map(merged));
            stores.insert(key.clone(), store);
        }

        debug!(dir = %dir.display(), sections = stores.len(), "opened multi store");
        Ok(MultiStore {
            dir,
            stores,
            config,
        })
    }

    /// Returns the folder holding the per-key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the composite of all merged sections, keyed like the
    /// defaults that built this store.
    pub fn config(&self) -> &Map {
        &self.config
    }

    /// Returns the section keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.stores.keys()
    }

    /// Returns the member store for `key`.
    pub fn store(&self, key: &str) -> Option<&SectionStore> {
        self.stores.get(key)
    }

    /// Returns the member store for `key`, mutably.
    pub fn store_mut(&mut self, key: &str) -> Option<&mut SectionStore> {
        self.stores.get_mut(key)
    }

    /// Runs the three-way validation on every member store and returns the
    /// per-key reports.
    pub fn validate(
        &mut self,
        clear_unused: bool,
    ) -> Result<BTreeMap<String, ValidationReport>, MultiError> {
        let mut reports = BTreeMap::new();
        for (key, store) in self.stores.iter_mut() {
            reports.insert(key.clone(), store.validate(clear_unused)?);
        }
        Ok(reports)
    }
}
