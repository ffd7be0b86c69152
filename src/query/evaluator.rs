use super::ast::{Axis, NodeTest, Predicate, QueryPath, Step};
use crate::document::{DataNode, DataTree, NodeId, ResultSet};
use indexmap::IndexMap;

pub struct Evaluator<'a> {
    tree: &'a DataTree<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(tree: &'a DataTree<'a>) -> Self {
        Evaluator { tree }
    }

    /// Evaluates a parsed query and returns the matching nodes in document
    /// order of discovery, each node at most once.
    pub fn evaluate(&self, path: &QueryPath) -> ResultSet<'a> {
        let Some((first, rest)) = path.steps.split_first() else {
            return ResultSet::default();
        };

        let mut current = self.apply_predicates(self.first_candidates(first), &first.predicates);
        for step in rest {
            let mut next: IndexMap<NodeId, DataNode<'a>> = IndexMap::new();
            for node in &current {
                let candidates = self.candidates(*node, step);
                for matched in self.apply_predicates(candidates, &step.predicates) {
                    next.entry(matched.id()).or_insert(matched);
                }
            }
            current = next.into_values().collect();
        }

        current.into_iter().collect()
    }

    /// Candidates of the first step, which has no context node.
    fn first_candidates(&self, step: &Step) -> Vec<DataNode<'a>> {
        let tree = self.tree;
        match step.axis {
            Axis::Child => tree.roots().filter(|n| matches_test(n, &step.test)).collect(),
            Axis::Descendant => tree
                .traverse()
                .filter(|n| matches_test(n, &step.test))
                .collect(),
        }
    }

    fn candidates(&self, node: DataNode<'a>, step: &Step) -> Vec<DataNode<'a>> {
        match step.axis {
            Axis::Child => node
                .children()
                .filter(|n| matches_test(n, &step.test))
                .collect(),
            Axis::Descendant => node
                .traverse()
                .skip(1)
                .filter(|n| matches_test(n, &step.test))
                .collect(),
        }
    }

    /// Applies predicates left to right; positions count what the previous
    /// predicates kept.
    fn apply_predicates(
        &self,
        mut nodes: Vec<DataNode<'a>>,
        predicates: &[Predicate],
    ) -> Vec<DataNode<'a>> {
        for predicate in predicates {
            nodes = match predicate {
                Predicate::Position(n) => n
                    .checked_sub(1)
                    .and_then(|i| nodes.get(i).copied())
                    .into_iter()
                    .collect(),
                Predicate::ValueEquals(value) => nodes
                    .into_iter()
                    .filter(|n| n.value() == Some(value.as_str()))
                    .collect(),
                Predicate::KeyEquals { key, value } => nodes
                    .into_iter()
                    .filter(|n| n.child(key).and_then(|c| c.value()) == Some(value.as_str()))
                    .collect(),
            };
        }
        nodes
    }
}

fn matches_test(node: &DataNode<'_>, test: &NodeTest) -> bool {
    match test {
        NodeTest::Wildcard => true,
        NodeTest::Name { module, name } => {
            node.name() == name
                && module
                    .as_deref()
                    .map_or(true, |m| node.module().map(|module| module.name()) == Some(m))
        }
    }
}
