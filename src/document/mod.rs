//! Instance data: parsing, the data tree and node handles.

pub mod error;
mod json;
pub mod node;
pub mod options;
pub mod parser;
pub mod set;
pub mod tree;
mod xml;

pub use error::ParseError;
pub use node::{DataNode, NodeId};
pub use options::{DataFormat, ParseOptions};
pub use parser::parse;
pub use set::ResultSet;
pub use tree::{DataTree, Traverse};
