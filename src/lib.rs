//! # Config Sections
//!
//! Path-addressed JSON configuration persistence.
//!
//! A [`SectionStore`] owns one on-disk JSON document, merges caller-supplied
//! defaults into named, dot-path-addressed sections (stored values win over
//! defaults field by field), writes the merged result back, and diffs the
//! live document against the load-time snapshot and the accumulated
//! defaults to classify every key as newly created, type-mismatched, or
//! unused.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of JSON documents with type-aware operations
//! - [`merge`] - Recursive deep merge over configuration mappings
//! - [`path`] - Dotted-path mini-language for addressing sections
//! - [`store`] - The section store: document lifecycle, registration, and three-way validation
//! - [`multi`] - Fan-out of defaults across one store per top-level key

pub mod merge;
pub mod multi;
pub mod path;
pub mod store;
pub mod value;

pub use multi::{MultiError, MultiStore};
pub use path::{Path, PathError};
pub use store::{Created, SectionStore, StoreError, TypeMismatch, ValidationReport};
pub use value::{Kind, Map, Value};
