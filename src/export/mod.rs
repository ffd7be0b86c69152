//! Flattening a data tree into `(path, value)` pairs.
//!
//! Every leaf and leaf-list instance below the starting node yields one pair:
//! its instance path and its canonical value. Pairs come out in document
//! order (pre-order, children in order) and are produced lazily, so a caller
//! can stop early or write them straight to an output.
//!
//! # Example
//!
//! ```
//! use yangtree::document::{parse, DataFormat, ParseOptions};
//! use yangtree::export::export_tree;
//! use yangtree::schema::SchemaContext;
//!
//! let ctx = SchemaContext::from_yaml_str(r#"
//! modules:
//!   - name: sys
//!     namespace: urn:sys
//!     nodes:
//!       - name: system
//!         kind: container
//!         children:
//!           - { name: hostname, kind: leaf }
//!           - { name: dns, kind: leaf-list }
//! "#).unwrap();
//!
//! let json = r#"{"sys:system": {"hostname": "r1", "dns": ["10.0.0.1", "10.0.0.2"]}}"#;
//! let tree = parse(&ctx, json, DataFormat::Json, ParseOptions::DATA, None).unwrap();
//!
//! let pairs: Vec<(String, String)> = export_tree(&tree).collect();
//! assert_eq!(pairs[0], ("/sys:system/hostname".to_string(), "r1".to_string()));
//! assert_eq!(pairs.len(), 3);
//! ```

use crate::document::{DataNode, DataTree, NodeId};
use std::io::{self, Write};
use std::iter::FusedIterator;

/// Lazy pre-order iterator over the `(path, value)` pairs of a subtree.
///
/// A node whose path cannot be built (its schema node is missing) is left
/// out, but its children are still visited. A child id that points outside
/// the tree ends the iteration.
pub struct PathValues<'a> {
    tree: &'a DataTree<'a>,
    stack: Vec<NodeId>,
}

/// Pairs for `node` and everything below it.
pub fn export<'a>(node: DataNode<'a>) -> PathValues<'a> {
    PathValues {
        tree: node.tree(),
        stack: vec![node.id()],
    }
}

/// Pairs for every root of `tree`, root by root.
pub fn export_tree<'a>(tree: &'a DataTree<'a>) -> PathValues<'a> {
    PathValues {
        tree,
        stack: tree.root_ids().iter().rev().copied().collect(),
    }
}

impl<'a> Iterator for PathValues<'a> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(data) = self.tree.data(id) else {
                self.stack.clear();
                return None;
            };
            self.stack.extend(data.children.iter().rev().copied());

            let Some(node) = self.tree.node(id) else {
                continue;
            };
            if !node.is_scalar() {
                continue;
            }
            if let (Some(path), Some(value)) = (node.path(), node.value()) {
                return Some((path, value.to_string()));
            }
        }
        None
    }
}

impl FusedIterator for PathValues<'_> {}

/// Writes each pair as a `path<separator>value` line and returns the number
/// of lines written.
pub fn write_path_values<W, I>(writer: &mut W, pairs: I, separator: &str) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (String, String)>,
{
    let mut count = 0;
    for (path, value) in pairs {
        writeln!(writer, "{}{}{}", path, separator, value)?;
        count += 1;
    }
    Ok(count)
}
