//! Parsing serialized instance data into a `DataTree`.
//!
//! The whole buffer is parsed in one call and checked against the schema as
//! it goes. Either a complete tree comes back or nothing does: on any error
//! the partially built tree is dropped, the cause is sent to the log sink at
//! `Error` level and `parse` returns `None`.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use yangtree::document::{parse, DataFormat, ParseOptions};
//! use yangtree::log::LogLevel;
//! use yangtree::schema::SchemaContext;
//!
//! let ctx = SchemaContext::from_yaml_str(r#"
//! modules:
//!   - name: m
//!     namespace: urn:m
//!     nodes:
//!       - { name: mtu, kind: leaf, type: uint16 }
//! "#).unwrap();
//!
//! let errors = RefCell::new(Vec::new());
//! let sink = |level: LogLevel, msg: &str, _: Option<&str>| {
//!     if level == LogLevel::Error {
//!         errors.borrow_mut().push(msg.to_string());
//!     }
//! };
//!
//! let tree = parse(&ctx, r#"<mtu xmlns="urn:m">1500</mtu>"#, DataFormat::Xml, ParseOptions::DATA, Some(&sink));
//! assert!(tree.is_some());
//!
//! let tree = parse(&ctx, r#"<mtu xmlns="urn:m">99999</mtu>"#, DataFormat::Xml, ParseOptions::DATA, Some(&sink));
//! assert!(tree.is_none());
//! assert_eq!(errors.borrow().len(), 1);
//! ```

use super::error::ParseError;
use super::json::parse_json;
use super::node::NodeId;
use super::options::{DataFormat, ParseOptions};
use super::tree::DataTree;
use super::xml::parse_xml;
use crate::log::{LogBridge, LogSink};
use crate::schema::{Module, NodeKind, SchemaContext, SchemaNode};

/// Parses `buffer` against `ctx`.
///
/// Returns the tree on success; its first root is `tree.first_root()` and any
/// further top-level nodes are that root's siblings. Returns `None` when the
/// buffer is malformed, does not match the schema, or holds no data nodes.
/// Diagnostics go to `sink`, synchronously and on the calling thread.
pub fn parse<'ctx>(
    ctx: &'ctx SchemaContext,
    buffer: &str,
    format: DataFormat,
    options: ParseOptions,
    sink: Option<&dyn LogSink>,
) -> Option<DataTree<'ctx>> {
    let log = LogBridge::new(sink);

    match try_parse(ctx, buffer, format, options, log) {
        Ok(tree) if tree.is_empty() => {
            log.verbose("No data nodes in input", None);
            None
        }
        Ok(tree) => {
            log.debug(
                &format!("Parsed {} data nodes from {} input", tree.len(), format),
                None,
            );
            Some(tree)
        }
        Err(err) => {
            log.error(&err.to_string(), err.path());
            None
        }
    }
}

pub(crate) fn try_parse<'ctx>(
    ctx: &'ctx SchemaContext,
    buffer: &str,
    format: DataFormat,
    options: ParseOptions,
    log: LogBridge<'_>,
) -> Result<DataTree<'ctx>, ParseError> {
    let mut builder = TreeBuilder::new(ctx, options, log);
    match format {
        DataFormat::Xml => parse_xml(&mut builder, buffer)?,
        DataFormat::Json => parse_json(&mut builder, buffer)?,
    }
    Ok(builder.finish())
}

/// Schema-checked construction of a tree, shared by the XML and JSON readers.
pub(crate) struct TreeBuilder<'ctx, 'l> {
    ctx: &'ctx SchemaContext,
    tree: DataTree<'ctx>,
    options: ParseOptions,
    log: LogBridge<'l>,
}

impl<'ctx, 'l> TreeBuilder<'ctx, 'l> {
    pub(crate) fn new(ctx: &'ctx SchemaContext, options: ParseOptions, log: LogBridge<'l>) -> Self {
        Self {
            ctx,
            tree: DataTree::new(ctx),
            options,
            log,
        }
    }

    pub(crate) fn context(&self) -> &'ctx SchemaContext {
        self.ctx
    }

    pub(crate) fn finish(self) -> DataTree<'ctx> {
        self.tree
    }

    /// Looks up a top-level node. `Ok(None)` means skip it.
    pub(crate) fn resolve_top(
        &self,
        module: &Module,
        name: &str,
    ) -> Result<Option<&'ctx SchemaNode>, ParseError> {
        let found = self
            .ctx
            .find_top(module.id(), name)
            .filter(|s| self.ctx.is_enabled(s));
        match found {
            Some(schema) => Ok(Some(schema)),
            None => self.unknown(format!("/{}:{}", module.name(), name)),
        }
    }

    /// Looks up a child of `parent`. `Ok(None)` means skip it.
    pub(crate) fn resolve_child(
        &self,
        parent_schema: &'ctx SchemaNode,
        parent: NodeId,
        name: &str,
    ) -> Result<Option<&'ctx SchemaNode>, ParseError> {
        let found = self
            .ctx
            .find_child(parent_schema, name)
            .filter(|s| self.ctx.is_enabled(s));
        match found {
            Some(schema) => Ok(Some(schema)),
            None => self.unknown(format!("{}/{}", self.node_path(Some(parent)), name)),
        }
    }

    /// Reports an element that is not in the schema (or whose module differs
    /// from its parent's).
    pub(crate) fn unknown(&self, path: String) -> Result<Option<&'ctx SchemaNode>, ParseError> {
        if self.options.contains(ParseOptions::STRICT) {
            return Err(ParseError::UnknownElement { path });
        }
        self.log.warning("Unknown element skipped", Some(&path));
        Ok(None)
    }

    /// Reports a top-level node whose module is not loaded. `error` is
    /// returned in strict mode; otherwise the subtree is skipped.
    pub(crate) fn unknown_module(&self, error: ParseError, path: &str) -> Result<(), ParseError> {
        if self.options.contains(ParseOptions::STRICT) {
            return Err(error);
        }
        self.log
            .warning(&format!("{}, subtree skipped", error), Some(path));
        Ok(())
    }

    /// Adds a container or list instance.
    pub(crate) fn open(
        &mut self,
        schema: &'ctx SchemaNode,
        parent: Option<NodeId>,
    ) -> Result<NodeId, ParseError> {
        self.check_config(schema, parent)?;
        if schema.kind() == NodeKind::Container && self.has_instance(schema, parent, None) {
            return Err(ParseError::Duplicate {
                path: self.child_path(parent, schema),
            });
        }
        Ok(self.tree.push(schema.id(), parent, None))
    }

    /// Checks a finished container or list instance.
    pub(crate) fn close(&mut self, id: NodeId) -> Result<(), ParseError> {
        let Some(node) = self.tree.node(id) else {
            return Ok(());
        };
        if node.kind() != NodeKind::List {
            return Ok(());
        }

        let schema = node.schema();
        let path = node.path().unwrap_or_else(|| node.name().to_string());
        let mut keys = Vec::with_capacity(schema.keys().len());
        for key in schema.keys() {
            match node.child(key).and_then(|k| k.value()) {
                Some(value) => keys.push(value),
                None => {
                    return Err(ParseError::MissingKey {
                        path,
                        key: key.clone(),
                    })
                }
            }
        }

        if !keys.is_empty() {
            let duplicate = node
                .tree()
                .child_ids(node.parent().map(|p| p.id()))
                .iter()
                .filter(|&&sibling| sibling != id)
                .filter_map(|&sibling| node.tree().node(sibling))
                .filter(|sibling| sibling.schema().id() == schema.id())
                .any(|sibling| {
                    schema
                        .keys()
                        .iter()
                        .zip(&keys)
                        .all(|(key, value)| sibling.child(key).and_then(|k| k.value()) == Some(*value))
                });
            if duplicate {
                return Err(ParseError::Duplicate { path });
            }
        }

        self.log.debug("List instance complete", Some(&path));
        Ok(())
    }

    /// Adds a leaf or leaf-list instance with its value text.
    pub(crate) fn leaf(
        &mut self,
        schema: &'ctx SchemaNode,
        parent: Option<NodeId>,
        text: &str,
    ) -> Result<NodeId, ParseError> {
        self.check_config(schema, parent)?;

        let value = match schema.leaf_type() {
            Some(ty) if !self.options.contains(ParseOptions::TRUSTED) => ty
                .canonicalize(text)
                .map_err(|message| ParseError::InvalidValue {
                    path: self.child_path(parent, schema),
                    message,
                })?,
            _ => text.to_string(),
        };

        let duplicate = match schema.kind() {
            NodeKind::Leaf => self.has_instance(schema, parent, None),
            NodeKind::LeafList if self.options.config_only() => {
                self.has_instance(schema, parent, Some(&value))
            }
            _ => false,
        };
        if duplicate {
            return Err(ParseError::Duplicate {
                path: self.child_path(parent, schema),
            });
        }

        Ok(self.tree.push(schema.id(), parent, Some(value)))
    }

    fn check_config(&self, schema: &SchemaNode, parent: Option<NodeId>) -> Result<(), ParseError> {
        if self.options.config_only() && !schema.is_config() {
            return Err(ParseError::StateData {
                path: self.child_path(parent, schema),
            });
        }
        Ok(())
    }

    /// True if `parent` already has an instance of `schema` (with `value`,
    /// when given).
    fn has_instance(&self, schema: &SchemaNode, parent: Option<NodeId>, value: Option<&str>) -> bool {
        self.tree
            .child_ids(parent)
            .iter()
            .filter_map(|&id| self.tree.data(id))
            .any(|d| d.schema == schema.id() && (value.is_none() || d.value.as_deref() == value))
    }

    /// Data path of an existing node, for diagnostics.
    pub(crate) fn node_path(&self, id: Option<NodeId>) -> String {
        id.and_then(|id| self.tree.node(id))
            .and_then(|n| n.path())
            .unwrap_or_default()
    }

    /// Data path a new child of `parent` would get, for diagnostics.
    pub(crate) fn child_path(&self, parent: Option<NodeId>, schema: &SchemaNode) -> String {
        match parent {
            Some(_) => format!("{}/{}", self.node_path(parent), schema.name()),
            None => {
                let module = self
                    .ctx
                    .module(schema.module())
                    .map(|m| m.name())
                    .unwrap_or_default();
                format!("/{}:{}", module, schema.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const SCHEMA: &str = r#"
modules:
  - name: ietf-interfaces
    namespace: urn:ietf:params:xml:ns:yang:ietf-interfaces
    prefix: if
    features:
      - name: arbitrary-names
    nodes:
      - name: interfaces
        kind: container
        children:
          - name: interface
            kind: list
            keys: [name]
            children:
              - { name: name, kind: leaf }
              - { name: enabled, kind: leaf, type: boolean }
              - { name: mtu, kind: leaf, type: uint16 }
              - { name: alias, kind: leaf, if_feature: arbitrary-names }
              - { name: oper-status, kind: leaf, type: enumeration, enums: [up, down], config: false }
"#;

    fn ctx() -> SchemaContext {
        SchemaContext::from_yaml_str(SCHEMA).unwrap()
    }

    fn xml(body: &str) -> String {
        format!(
            r#"<interfaces xmlns="urn:ietf:params:xml:ns:yang:ietf-interfaces">{}</interfaces>"#,
            body
        )
    }

    fn err(buffer: &str, options: ParseOptions) -> ParseError {
        let ctx = ctx();
        try_parse(&ctx, buffer, DataFormat::Xml, options, LogBridge::disabled()).unwrap_err()
    }

    #[test]
    fn test_missing_key() {
        let e = err(&xml("<interface><mtu>1500</mtu></interface>"), ParseOptions::DATA);
        assert!(matches!(e, ParseError::MissingKey { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_duplicate_list_entry() {
        let e = err(
            &xml("<interface><name>eth0</name></interface><interface><name>eth0</name></interface>"),
            ParseOptions::DATA,
        );
        assert_eq!(
            e,
            ParseError::Duplicate {
                path: "/ietf-interfaces:interfaces/interface[name='eth0']".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_leaf() {
        let e = err(
            &xml("<interface><name>eth0</name><mtu>1</mtu><mtu>2</mtu></interface>"),
            ParseOptions::DATA,
        );
        assert!(matches!(e, ParseError::Duplicate { .. }));
    }

    #[test]
    fn test_invalid_value_carries_path() {
        let e = err(
            &xml("<interface><name>eth0</name><enabled>maybe</enabled></interface>"),
            ParseOptions::DATA,
        );
        assert_eq!(
            e.path(),
            Some("/ietf-interfaces:interfaces/interface[name='eth0']/enabled")
        );
    }

    #[test]
    fn test_state_rejected_in_config_modes() {
        let body = xml("<interface><name>eth0</name><oper-status>up</oper-status></interface>");
        for options in [ParseOptions::CONFIG, ParseOptions::GET_CONFIG, ParseOptions::EDIT] {
            assert!(matches!(err(&body, options), ParseError::StateData { .. }));
        }

        let ctx = ctx();
        let tree = try_parse(&ctx, &body, DataFormat::Xml, ParseOptions::GET, LogBridge::disabled());
        assert!(tree.is_ok());
    }

    #[test]
    fn test_trusted_skips_type_checks() {
        let ctx = ctx();
        let body = xml("<interface><name>eth0</name><mtu>huge</mtu></interface>");
        let tree =
            try_parse(&ctx, &body, DataFormat::Xml, ParseOptions::TRUSTED, LogBridge::disabled())
                .unwrap();
        let mtu = tree.traverse().find(|n| n.name() == "mtu").unwrap();
        assert_eq!(mtu.value(), Some("huge"));
    }

    #[test]
    fn test_disabled_feature_is_unknown() {
        let body = xml("<interface><name>eth0</name><alias>uplink</alias></interface>");
        assert!(matches!(
            err(&body, ParseOptions::STRICT),
            ParseError::UnknownElement { .. }
        ));

        let ctx = ctx();
        let tree =
            try_parse(&ctx, &body, DataFormat::Xml, ParseOptions::DATA, LogBridge::disabled())
                .unwrap();
        assert!(tree.traverse().all(|n| n.name() != "alias"));
    }

    #[test]
    fn test_parse_logs_error_and_returns_none() {
        use crate::log::LogLevel;
        use std::cell::RefCell;

        let ctx = ctx();
        let events = RefCell::new(Vec::new());
        let sink = |level: LogLevel, msg: &str, path: Option<&str>| {
            events
                .borrow_mut()
                .push((level, msg.to_string(), path.map(str::to_string)));
        };

        let tree = parse(
            &ctx,
            "<interfaces xmlns=\"urn:ietf:params:xml:ns:yang:ietf-interfaces\">",
            DataFormat::Xml,
            ParseOptions::DATA,
            Some(&sink),
        );
        assert!(tree.is_none());
        assert!(events.borrow().iter().any(|(level, _, _)| *level == LogLevel::Error));
    }

    #[test]
    fn test_empty_input_is_absent() {
        let ctx = ctx();
        assert!(parse(&ctx, "", DataFormat::Xml, ParseOptions::DATA, None).is_none());
        assert!(parse(&ctx, "{}", DataFormat::Json, ParseOptions::DATA, None).is_none());
    }
}
