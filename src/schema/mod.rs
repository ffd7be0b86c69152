//! Schema model: modules, schema nodes and features.
//!
//! A `SchemaContext` is compiled once from module definitions and then only
//! read. Data trees hold a shared reference to it and every data node points
//! at the schema node that determines its kind.

pub mod context;
pub mod def;
pub mod error;
pub mod feature;
pub mod node;

pub use context::{Module, SchemaContext};
pub use def::{ModuleDef, NodeDef, SchemaDef};
pub use error::SchemaError;
pub use feature::{feature_name, Feature};
pub use node::{LeafType, ModuleId, NodeKind, SchemaId, SchemaNode};
