//! Merge module - Recursive deep merge over configuration mappings.
//!
//! Later sources win over the target field by field. Nested mappings merge
//! recursively; scalars and lists are replaced wholesale.


use crate::value::{Map, Value};

/// Deep-merges `source` into `target`.
///
/// For each key owned by `source`: if the source value is a mapping, it is
/// recursively merged into the mapping at that key in `target` (created, or
/// replacing a non-mapping value, if needed); any other source value is
/// cloned in wholesale, overwriting whatever was there before. Lists are
/// atomic and never merged element-wise.
pub fn merge_into(target: &mut Map, source: &Map) {
    for (key, source_value) in source.iter() {
        match source_value {
            Value::Map(source_map) => {
                let slot = target
                    .fields
                    .entry(key.clone())
                    .or_insert_with(|| Value::Map(Map::new()));
                if let Value::Map(target_map) = slot {
                    merge_into(target_map, source_map);
                } else {
                    // A scalar or list at this key gives way to the mapping.
                    let mut fresh = Map::new();
                    merge_into(&mut fresh, source_map);
                    *slot = Value::Map(fresh);
                }
            }
            other => {
                target.set(key.clone(), other.clone());
            }
        }
    }
}

/// Folds any number of sources into `target`, left to right.
///
/// With no sources this is a no-op and `target` is left unchanged.
pub fn merge_all<'a>(target: &mut Map, sources: impl IntoIterator<Item = &'a Map>) {
    for source in sources {
        merge_into(target, source);
    }
}

/// Returns a new mapping built by merging `overlay` into a clone of `base`.
///
/// This is the defaults-overridden-by-stored-values shape: every key of
/// `overlay` wins, every key only in `base` is filled in.
pub fn merged(base: &Map, overlay: &Map) -> Map {
    let mut result = base.clone();
    merge_into(&mut result, overlay);
    result
}
