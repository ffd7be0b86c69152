//! Ordered sets of matched nodes.
//!
//! A `ResultSet` is what a query hands back: node handles in match order and
//! their count. It borrows the nodes; the tree that produced them still owns
//! them.

use super::node::DataNode;

/// Query result: an ordered, fixed-length sequence of node handles.
///
/// # Example
///
/// ```
/// use yangtree::document::{parse, DataFormat, ParseOptions};
/// use yangtree::schema::SchemaContext;
///
/// let ctx = SchemaContext::from_yaml_str(r#"
/// modules:
///   - name: m
///     namespace: urn:m
///     nodes:
///       - { name: tag, kind: leaf-list }
/// "#).unwrap();
/// let tree = parse(&ctx, r#"{"m:tag": ["a", "b", "c"]}"#, DataFormat::Json, ParseOptions::DATA, None)
///     .unwrap();
///
/// let set = tree.find_path("/m:tag").unwrap();
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.get(2).and_then(|n| n.value()), Some("c"));
/// assert!(set.get(3).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet<'a> {
    nodes: Vec<DataNode<'a>>,
}

impl<'a> ResultSet<'a> {
    pub fn new(nodes: Vec<DataNode<'a>>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`, or `None` unless `index < len()`.
    ///
    /// `index == len()` is out of range like any larger index.
    pub fn get(&self, index: usize) -> Option<DataNode<'a>> {
        if index < self.nodes.len() {
            Some(self.nodes[index])
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = DataNode<'a>> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[DataNode<'a>] {
        &self.nodes
    }
}

impl<'a> FromIterator<DataNode<'a>> for ResultSet<'a> {
    fn from_iter<I: IntoIterator<Item = DataNode<'a>>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for ResultSet<'a> {
    type Item = DataNode<'a>;
    type IntoIter = std::vec::IntoIter<DataNode<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s ResultSet<'a> {
    type Item = DataNode<'a>;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, DataNode<'a>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse, DataFormat, ParseOptions};
    use crate::schema::SchemaContext;

    fn context() -> SchemaContext {
        SchemaContext::from_yaml_str(
            r#"
modules:
  - name: m
    namespace: urn:m
    nodes:
      - { name: a, kind: leaf }
      - { name: b, kind: leaf }
      - { name: c, kind: leaf }
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_get_rejects_count_and_beyond() {
        let ctx = context();
        let tree = parse(
            &ctx,
            r#"{"m:a": "1", "m:b": "2", "m:c": "3"}"#,
            DataFormat::Json,
            ParseOptions::DATA,
            None,
        )
        .unwrap();
        let set: ResultSet<'_> = tree.roots().collect();
        assert_eq!(set.len(), 3);

        assert_eq!(set.get(0).map(|n| n.name()), Some("a"));
        assert_eq!(set.get(2).map(|n| n.name()), Some("c"));
        assert!(set.get(3).is_none());
        assert!(set.get(100).is_none());
        assert!(set.get(usize::MAX).is_none());
    }

    #[test]
    fn test_empty_set() {
        let set = ResultSet::default();
        assert!(set.is_empty());
        assert!(set.get(0).is_none());
    }

    #[test]
    fn test_iteration_keeps_order() {
        let ctx = context();
        let tree = parse(
            &ctx,
            r#"{"m:c": "3", "m:a": "1"}"#,
            DataFormat::Json,
            ParseOptions::DATA,
            None,
        )
        .unwrap();
        let set = ResultSet::new(tree.roots().collect());

        let names: Vec<&str> = (&set).into_iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["c", "a"]);
        assert_eq!(set.iter().count(), 2);
        assert_eq!(set.as_slice().len(), 2);
    }
}
