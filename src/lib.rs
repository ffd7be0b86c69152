//! Schema-aware parsing and flattening of YANG instance data.
//!
//! A [`schema::SchemaContext`] describes the modules; [`document::parse`]
//! turns an XML or JSON buffer into a [`document::DataTree`] checked against
//! it; [`export`] flattens a tree into `(path, value)` pairs and [`query`]
//! selects nodes by path. Diagnostics go to a caller-supplied
//! [`log::LogSink`].

pub mod config;
pub mod document;
pub mod export;
pub mod file;
pub mod log;
pub mod query;
pub mod schema;
