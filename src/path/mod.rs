//! Path module - The dotted-path mini-language addressing document sections.
//!
//! Paths are validated before every path-addressed read or write.

mod path;

pub use path::*;
