//! File I/O for instance data and module definitions.
//!
//! This module loads data documents from disk or stdin (optionally
//! gzip-compressed) and compiles module definition files into a schema
//! context.

pub mod loader;
