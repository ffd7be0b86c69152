//! The compiled, read-only schema that data trees are parsed against.

use super::def::{ModuleDef, NodeDef, SchemaDef};
use super::error::SchemaError;
use super::feature::{feature_name, Feature};
use super::node::{LeafType, ModuleId, NodeKind, SchemaId, SchemaNode};
use std::collections::HashSet;

/// A loaded module.
#[derive(Debug, Clone)]
pub struct Module {
    id: ModuleId,
    name: String,
    namespace: String,
    prefix: Option<String>,
    features: Vec<Feature>,
    top_level: Vec<SchemaId>,
}

impl Module {
    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Declared features, or `None` when the module declares none.
    pub fn features(&self) -> Option<&[Feature]> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.as_slice())
        }
    }

    /// Name of the feature at `index`; `None` past the end of the list.
    pub fn feature_name(&self, index: usize) -> Option<&str> {
        feature_name(self.features(), index)
    }

    pub fn is_feature_enabled(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name && f.enabled)
    }

    pub fn top_level(&self) -> &[SchemaId] {
        &self.top_level
    }
}

/// A set of modules and the arena of their schema nodes.
///
/// Immutable once built. Data trees borrow it for their whole lifetime.
///
/// # Example
///
/// ```
/// use yangtree::schema::SchemaContext;
///
/// let ctx = SchemaContext::from_yaml_str(r#"
/// modules:
///   - name: example
///     namespace: urn:example
///     nodes:
///       - { name: hostname, kind: leaf }
/// "#).unwrap();
///
/// let module = ctx.find_module("example").unwrap();
/// assert!(ctx.find_top(module.id(), "hostname").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    modules: Vec<Module>,
    nodes: Vec<SchemaNode>,
}

impl SchemaContext {
    /// Compiles module definitions into a context.
    pub fn new(defs: Vec<ModuleDef>) -> Result<Self, SchemaError> {
        let mut ctx = SchemaContext::default();
        let mut names = HashSet::new();
        let mut namespaces = HashSet::new();

        for def in &defs {
            if !names.insert(def.name.as_str()) {
                return Err(SchemaError::DuplicateModule {
                    name: def.name.clone(),
                });
            }
            if !namespaces.insert(def.namespace.as_str()) {
                return Err(SchemaError::DuplicateNamespace {
                    namespace: def.namespace.clone(),
                    module: def.name.clone(),
                });
            }
            ctx.add_module(def)?;
        }

        Ok(ctx)
    }

    /// Parses and compiles a YAML definition document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        let def: SchemaDef = serde_yaml::from_str(yaml).map_err(|e| SchemaError::Syntax {
            message: e.to_string(),
        })?;
        Self::new(def.modules)
    }

    fn add_module(&mut self, def: &ModuleDef) -> Result<(), SchemaError> {
        let id = ModuleId(self.modules.len());
        let base = format!("/{}:", def.name);

        check_unique(def, &def.nodes, "")?;
        let mut top_level = Vec::with_capacity(def.nodes.len());
        for node in &def.nodes {
            top_level.push(self.add_node(def, id, node, None, true, &base)?);
        }

        self.modules.push(Module {
            id,
            name: def.name.clone(),
            namespace: def.namespace.clone(),
            prefix: def.prefix.clone(),
            features: def.features.clone(),
            top_level,
        });
        Ok(())
    }

    fn add_node(
        &mut self,
        module_def: &ModuleDef,
        module: ModuleId,
        def: &NodeDef,
        parent: Option<SchemaId>,
        parent_config: bool,
        parent_path: &str,
    ) -> Result<SchemaId, SchemaError> {
        let path = if parent.is_none() {
            format!("{}{}", parent_path, def.name)
        } else {
            format!("{}/{}", parent_path, def.name)
        };

        let leaf_type = if def.kind.is_scalar() {
            let type_name = def.type_name.as_deref().unwrap_or("string");
            let ty = LeafType::from_name(type_name, &def.enums).ok_or_else(|| {
                SchemaError::UnknownType {
                    path: path.clone(),
                    type_name: type_name.to_string(),
                }
            })?;
            Some(ty)
        } else {
            None
        };

        if let Some(feature) = &def.if_feature {
            if !module_def.features.iter().any(|f| &f.name == feature) {
                return Err(SchemaError::UnknownFeature {
                    path,
                    feature: feature.clone(),
                });
            }
        }

        if def.kind == NodeKind::List {
            for key in &def.keys {
                let is_leaf = def
                    .children
                    .iter()
                    .any(|c| &c.name == key && c.kind == NodeKind::Leaf);
                if !is_leaf {
                    return Err(SchemaError::MissingKey {
                        path,
                        key: key.clone(),
                    });
                }
            }
        }

        check_unique(module_def, &def.children, &path)?;

        let config = parent_config && def.config.unwrap_or(true);
        let id = SchemaId(self.nodes.len());
        self.nodes.push(SchemaNode {
            id,
            name: def.name.clone(),
            kind: def.kind,
            module,
            parent,
            children: Vec::new(),
            config,
            keys: if def.kind == NodeKind::List {
                def.keys.clone()
            } else {
                Vec::new()
            },
            leaf_type,
            if_feature: def.if_feature.clone(),
        });

        let mut children = Vec::with_capacity(def.children.len());
        for child in &def.children {
            children.push(self.add_node(module_def, module, child, Some(id), config, &path)?);
        }
        self.nodes[id.0].children = children;

        Ok(id)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.0)
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn module_by_namespace(&self, namespace: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.namespace == namespace)
    }

    pub fn node(&self, id: SchemaId) -> Option<&SchemaNode> {
        self.nodes.get(id.0)
    }

    /// Finds a top-level node of `module` by name.
    pub fn find_top(&self, module: ModuleId, name: &str) -> Option<&SchemaNode> {
        self.module(module)?
            .top_level
            .iter()
            .filter_map(|&id| self.node(id))
            .find(|n| n.name == name)
    }

    /// Finds a child of `parent` by name.
    pub fn find_child(&self, parent: &SchemaNode, name: &str) -> Option<&SchemaNode> {
        parent
            .children
            .iter()
            .filter_map(|&id| self.node(id))
            .find(|n| n.name == name)
    }

    /// Returns false when the node or one of its ancestors depends on a
    /// disabled feature.
    pub fn is_enabled(&self, node: &SchemaNode) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(feature) = &n.if_feature {
                let enabled = self
                    .module(n.module)
                    .map(|m| m.is_feature_enabled(feature))
                    .unwrap_or(false);
                if !enabled {
                    return false;
                }
            }
            current = n.parent.and_then(|p| self.node(p));
        }
        true
    }

    /// Total number of features across all modules.
    pub fn feature_count(&self) -> usize {
        self.modules.iter().map(|m| m.features.len()).sum()
    }

    /// Schema path of a node, e.g. `/example:top/item/id`.
    pub fn schema_path(&self, id: SchemaId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        loop {
            names.push(current.name.as_str());
            match current.parent {
                Some(parent) => current = self.node(parent)?,
                None => break,
            }
        }
        let module = self.module(current.module)?;
        names.reverse();
        Some(format!("/{}:{}", module.name, names.join("/")))
    }
}

fn check_unique(module: &ModuleDef, nodes: &[NodeDef], parent_path: &str) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(SchemaError::DuplicateNode {
                module: module.name.clone(),
                path: format!("{}/{}", parent_path, node.name),
            });
        }
    }
    Ok(())
}
