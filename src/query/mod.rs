//! Path queries over a data tree.
//!
//! # Supported Syntax
//!
//! - `/name` or `/module:name` - Child step (from the roots for the first step)
//! - `/*` - All children
//! - `//name` - Descendants at any depth
//! - `[key='value']` - Child leaf equality, repeatable for multi-key lists
//! - `[.='value']` - The node's own value (leaf-list entries)
//! - `[n]` - The n-th match of the step, counting from 1
//!
//! Values may be single- or double-quoted.
//!
//! # Examples
//!
//! ```
//! // /ietf-interfaces:interfaces/interface[name='eth0']/mtu
//! // //interface[2]
//! // /sys:system/dns[.='10.0.0.1']
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{Axis, NodeTest, Predicate, QueryPath, Step};
pub use error::QueryError;
pub use evaluator::Evaluator;
pub use parser::Parser;

use crate::document::{DataTree, ResultSet};

/// Parses `query` and evaluates it against `tree`.
pub fn find_path<'a>(tree: &'a DataTree<'a>, query: &str) -> Result<ResultSet<'a>, QueryError> {
    let path = Parser::parse(query)?;
    Ok(Evaluator::new(tree).evaluate(&path))
}
