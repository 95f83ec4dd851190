//! Value module - In-memory representation of JSON configuration documents.
//!
//! This module provides type-aware operations on values.

mod value;

pub use value::*;
