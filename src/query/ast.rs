//! Syntax tree of path queries.

/// How a step selects candidates relative to the current nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/name`: direct children (the roots for the first step).
    Child,
    /// `//name`: descendants at any depth (every node for the first step).
    Descendant,
}

/// Which node names a step accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// `name` or `module:name`
    Name { module: Option<String>, name: String },
    /// `*`
    Wildcard,
}

/// A bracketed filter on the nodes a step selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[key='value']`: a child leaf with that value.
    KeyEquals { key: String, value: String },
    /// `[.='value']`: the node's own value.
    ValueEquals(String),
    /// `[n]`: the n-th candidate, counting from 1.
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

/// A complete query: one or more steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPath {
    pub steps: Vec<Step>,
}

impl QueryPath {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}
