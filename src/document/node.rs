//! Data node representation.
//!
//! Nodes live in the arena of their `DataTree` and are addressed by `NodeId`.
//! A `DataNode` is a cheap, copyable handle pairing a node record with the
//! schema node that fixes its kind. Parent links are plain ids and never own
//! anything; the tree owns every node and releases them all when dropped.
//!
//! # Example
//!
//! ```
//! use yangtree::document::{parse, DataFormat, ParseOptions};
//! use yangtree::schema::{NodeKind, SchemaContext};
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
//! "#).unwrap();
//!
//! let xml = r#"<system xmlns="urn:sys"><hostname>r1</hostname></system>"#;
//! let tree = parse(&ctx, xml, DataFormat::Xml, ParseOptions::DATA, None).unwrap();
//!
//! let system = tree.first_root().unwrap();
//! assert_eq!(system.kind(), NodeKind::Container);
//!
//! let hostname = system.first_child().unwrap();
//! assert_eq!(hostname.value(), Some("r1"));
//! assert_eq!(hostname.path().as_deref(), Some("/sys:system/hostname"));
//! assert_eq!(hostname.parent(), Some(system));
//! ```

use super::tree::{DataTree, Traverse};
use crate::schema::{Module, NodeKind, SchemaId, SchemaNode};
use std::fmt;

/// Index of a node inside its `DataTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Arena record of one data node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData {
    pub(crate) schema: SchemaId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    /// Canonical value text, present for leaf and leaf-list nodes only.
    pub(crate) value: Option<String>,
}

/// Borrowed handle to a node of a `DataTree`.
///
/// Handles compare equal when they point at the same node of the same tree.
#[derive(Clone, Copy)]
pub struct DataNode<'a> {
    tree: &'a DataTree<'a>,
    id: NodeId,
    data: &'a NodeData,
    schema: &'a SchemaNode,
}

impl<'a> DataNode<'a> {
    pub(crate) fn new(
        tree: &'a DataTree<'a>,
        id: NodeId,
        data: &'a NodeData,
        schema: &'a SchemaNode,
    ) -> Self {
        Self {
            tree,
            id,
            data,
            schema,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree that owns this node.
    pub fn tree(&self) -> &'a DataTree<'a> {
        self.tree
    }

    pub fn schema(&self) -> &'a SchemaNode {
        self.schema
    }

    pub fn name(&self) -> &'a str {
        self.schema.name()
    }

    pub fn kind(&self) -> NodeKind {
        self.schema.kind()
    }

    /// Returns true for leaf and leaf-list instances.
    pub fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    pub fn module(&self) -> Option<&'a Module> {
        self.tree.context().module(self.schema.module())
    }

    /// Value text of a leaf or leaf-list instance; `None` for other kinds.
    pub fn value(&self) -> Option<&'a str> {
        let data: &'a NodeData = self.data;
        data.value.as_deref()
    }

    pub fn parent(&self) -> Option<DataNode<'a>> {
        self.tree.node(self.data.parent?)
    }

    pub fn first_child(&self) -> Option<DataNode<'a>> {
        self.tree.node(*self.data.children.first()?)
    }

    pub fn next_sibling(&self) -> Option<DataNode<'a>> {
        self.tree.node(self.data.next_sibling?)
    }

    pub fn prev_sibling(&self) -> Option<DataNode<'a>> {
        self.tree.node(self.data.prev_sibling?)
    }

    /// Iterates over the children in document order.
    pub fn children(&self) -> impl Iterator<Item = DataNode<'a>> + 'a {
        let tree = self.tree;
        let data: &'a NodeData = self.data;
        data.children.iter().filter_map(move |&id| tree.node(id))
    }

    /// Iterates over this node and the siblings that follow it.
    pub fn siblings(&self) -> impl Iterator<Item = DataNode<'a>> + 'a {
        std::iter::successors(Some(*self), |node| node.next_sibling())
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<DataNode<'a>> {
        self.children().find(|c| c.name() == name)
    }

    /// Pre-order walk of the subtree rooted at this node, this node first.
    pub fn traverse(&self) -> Traverse<'a> {
        Traverse::new(self.tree, vec![self.id])
    }

    /// Instance path from the root to this node.
    ///
    /// The first segment and any segment whose module differs from its
    /// parent's carry a `module:` prefix. List instances carry their key
    /// values (`[name='eth0']`), leaf-list instances their own value
    /// (`[.='x']`).
    ///
    /// Returns `None` when an ancestor or a module cannot be resolved.
    pub fn path(&self) -> Option<String> {
        let mut segments = Vec::new();
        let mut node = *self;
        loop {
            let parent = match node.data.parent {
                Some(id) => Some(self.tree.node(id)?),
                None => None,
            };
            segments.push(node.segment(parent.as_ref())?);
            match parent {
                Some(p) => node = p,
                None => break,
            }
        }
        segments.reverse();
        Some(segments.concat())
    }

    /// Path of the schema node, without instance predicates.
    pub fn schema_path(&self) -> Option<String> {
        self.tree.context().schema_path(self.schema.id())
    }

    fn segment(&self, parent: Option<&DataNode<'a>>) -> Option<String> {
        let mut segment = String::from("/");
        let qualify = parent.map_or(true, |p| p.schema.module() != self.schema.module());
        if qualify {
            segment.push_str(self.module()?.name());
            segment.push(':');
        }
        segment.push_str(self.name());

        match self.kind() {
            NodeKind::List => {
                for key in self.schema.keys() {
                    if let Some(value) = self.child(key).and_then(|k| k.value()) {
                        segment.push_str(&predicate(key, value));
                    }
                }
            }
            NodeKind::LeafList => {
                if let Some(value) = self.value() {
                    segment.push_str(&predicate(".", value));
                }
            }
            NodeKind::Container | NodeKind::Leaf => {}
        }

        Some(segment)
    }
}

/// Formats `[name='value']`. A value holding `'` is written in double
/// quotes; one holding both quote kinds keeps single quotes and doubles each
/// `'`, which the query parser reads back as one.
fn predicate(name: &str, value: &str) -> String {
    match (value.contains('\''), value.contains('"')) {
        (false, _) => format!("[{}='{}']", name, value),
        (true, false) => format!("[{}=\"{}\"]", name, value),
        (true, true) => format!("[{}='{}']", name, value.replace('\'', "''")),
    }
}

impl PartialEq for DataNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for DataNode<'_> {}

impl fmt::Debug for DataNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataNode")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("value", &self.value())
            .finish()
    }
}
