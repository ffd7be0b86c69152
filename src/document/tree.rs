//! Arena-backed data tree.
//!
//! A `DataTree` owns every node parsed from one buffer. Top-level nodes are
//! its roots, linked to each other as siblings. The tree borrows the
//! `SchemaContext` it was parsed against, so the context always outlives it.
//!
//! # Example
//!
//! ```
//! use yangtree::document::{parse, DataFormat, ParseOptions};
//! use yangtree::schema::SchemaContext;
//!
//! let ctx = SchemaContext::from_yaml_str(r#"
//! modules:
//!   - name: m
//!     namespace: urn:m
//!     nodes:
//!       - { name: a, kind: leaf }
//!       - { name: b, kind: leaf }
//! "#).unwrap();
//!
//! let tree = parse(&ctx, r#"{"m:a": "1", "m:b": "2"}"#, DataFormat::Json, ParseOptions::DATA, None)
//!     .unwrap();
//!
//! let first = tree.first_root().unwrap();
//! assert_eq!(first.name(), "a");
//! assert_eq!(first.next_sibling().unwrap().name(), "b");
//! assert_eq!(tree.roots().count(), 2);
//! ```

use super::node::{DataNode, NodeData, NodeId};
use super::set::ResultSet;
use crate::query::{self, QueryError};
use crate::schema::{SchemaContext, SchemaId};
use std::iter::FusedIterator;

/// A parsed instance-data tree.
#[derive(Debug, Clone)]
pub struct DataTree<'ctx> {
    ctx: &'ctx SchemaContext,
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl<'ctx> DataTree<'ctx> {
    pub(crate) fn new(ctx: &'ctx SchemaContext) -> Self {
        Self {
            ctx,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// The schema context the tree was parsed against.
    pub fn context(&self) -> &'ctx SchemaContext {
        self.ctx
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first top-level node. The others follow it as siblings.
    pub fn first_root(&self) -> Option<DataNode<'_>> {
        self.node(*self.roots.first()?)
    }

    /// All top-level nodes in document order.
    pub fn roots(&self) -> impl Iterator<Item = DataNode<'_>> + '_ {
        self.roots.iter().filter_map(move |&id| self.node(id))
    }

    /// Resolves a node id.
    ///
    /// Returns `None` for ids outside the arena and for nodes whose schema
    /// node is missing from the context.
    pub fn node(&self, id: NodeId) -> Option<DataNode<'_>> {
        let data = self.nodes.get(id.0)?;
        let schema = self.ctx.node(data.schema)?;
        Some(DataNode::new(self, id, data, schema))
    }

    /// Pre-order walk over every node, root by root.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse::new(self, self.roots.iter().rev().copied().collect())
    }

    /// Evaluates a path query against the tree.
    ///
    /// See the `query` module for the syntax.
    pub fn find_path(&self, query: &str) -> Result<ResultSet<'_>, QueryError> {
        query::find_path(self, query)
    }

    pub(crate) fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    pub(crate) fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    pub(crate) fn child_ids(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(id) => self
                .nodes
                .get(id.0)
                .map(|d| d.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        }
    }

    /// Appends a node as the last child of `parent` (or as the last root).
    pub(crate) fn push(
        &mut self,
        schema: SchemaId,
        parent: Option<NodeId>,
        value: Option<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let prev_sibling = self.child_ids(parent).last().copied();

        self.nodes.push(NodeData {
            schema,
            parent,
            children: Vec::new(),
            prev_sibling,
            next_sibling: None,
            value,
        });

        if let Some(prev) = prev_sibling {
            self.nodes[prev.0].next_sibling = Some(id);
        }
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }

        id
    }

    /// Links an id that points nowhere under `parent`.
    #[cfg(test)]
    pub(crate) fn push_dangling_child(&mut self, parent: NodeId) {
        self.nodes[parent.0].children.push(NodeId(usize::MAX));
    }
}

/// Depth-first, pre-order iterator over data nodes.
///
/// Ids that do not resolve are skipped together with their subtrees.
pub struct Traverse<'a> {
    tree: &'a DataTree<'a>,
    stack: Vec<NodeId>,
}

impl<'a> Traverse<'a> {
    /// `stack` holds the starting ids with the first one to visit on top.
    pub(crate) fn new(tree: &'a DataTree<'a>, stack: Vec<NodeId>) -> Self {
        Self { tree, stack }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = DataNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.node(id) {
                // Reverse so the first child is popped next
                if let Some(data) = self.tree.data(id) {
                    self.stack.extend(data.children.iter().rev().copied());
                }
                return Some(node);
            }
        }
        None
    }
}

impl FusedIterator for Traverse<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SchemaContext {
        SchemaContext::from_yaml_str(
            r#"
modules:
  - name: t
    namespace: urn:t
    nodes:
      - name: top
        kind: container
        children:
          - { name: a, kind: leaf }
          - { name: b, kind: leaf }
      - { name: other, kind: leaf }
"#,
        )
        .unwrap()
    }

    fn schema_id(ctx: &SchemaContext, path: &[&str]) -> SchemaId {
        let module = ctx.find_module("t").unwrap();
        let mut node = ctx.find_top(module.id(), path[0]).unwrap();
        for name in &path[1..] {
            node = ctx.find_child(node, name).unwrap();
        }
        node.id()
    }

    #[test]
    fn test_push_links_siblings() {
        let ctx = context();
        let mut tree = DataTree::new(&ctx);
        let top = tree.push(schema_id(&ctx, &["top"]), None, None);
        let a = tree.push(schema_id(&ctx, &["top", "a"]), Some(top), Some("1".into()));
        let b = tree.push(schema_id(&ctx, &["top", "b"]), Some(top), Some("2".into()));
        let other = tree.push(schema_id(&ctx, &["other"]), None, Some("x".into()));

        assert_eq!(tree.len(), 4);
        let a_node = tree.node(a).unwrap();
        assert_eq!(a_node.next_sibling().map(|n| n.id()), Some(b));
        assert_eq!(a_node.prev_sibling(), None);
        assert_eq!(a_node.parent().map(|n| n.id()), Some(top));

        let root = tree.first_root().unwrap();
        assert_eq!(root.next_sibling().map(|n| n.id()), Some(other));
        assert_eq!(root.children().count(), 2);
    }

    #[test]
    fn test_traverse_is_preorder() {
        let ctx = context();
        let mut tree = DataTree::new(&ctx);
        let top = tree.push(schema_id(&ctx, &["top"]), None, None);
        tree.push(schema_id(&ctx, &["top", "a"]), Some(top), Some("1".into()));
        tree.push(schema_id(&ctx, &["top", "b"]), Some(top), Some("2".into()));
        tree.push(schema_id(&ctx, &["other"]), None, Some("x".into()));

        let names: Vec<&str> = tree.traverse().map(|n| n.name()).collect();
        assert_eq!(names, vec!["top", "a", "b", "other"]);

        let subtree: Vec<&str> = tree.first_root().unwrap().traverse().map(|n| n.name()).collect();
        assert_eq!(subtree, vec!["top", "a", "b"]);
    }

    #[test]
    fn test_unresolvable_ids() {
        let ctx = context();
        let mut tree = DataTree::new(&ctx);
        let top = tree.push(schema_id(&ctx, &["top"]), None, None);
        tree.push_dangling_child(top);

        assert!(tree.node(NodeId(42)).is_none());
        assert_eq!(tree.traverse().count(), 1);
    }
}
