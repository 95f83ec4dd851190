//! Store module - The section store owning one on-disk document.
//!
//! Maintains three parallel trees (live document, snapshot taken at load,
//! accumulated defaults), exposes path-addressed access, and runs the
//! three-way validation diff.

mod report;
mod store;


pub use report::*;
pub use store::*;
