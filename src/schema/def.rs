//! Serializable module definitions, the input format of `SchemaContext`.
//!
//! A definition document is YAML:
//!
//! ```yaml
//! modules:
//!   - name: example
//!     namespace: urn:example
//!     prefix: ex
//!     features:
//!       - name: fancy
//!         enabled: true
//!     nodes:
//!       - name: top
//!         kind: container
//!         children:
//!           - name: item
//!             kind: list
//!             keys: [id]
//!             children:
//!               - { name: id, kind: leaf, type: uint32 }
//!               - { name: tag, kind: leaf-list, type: string }
//! ```

use super::feature::Feature;
use super::node::NodeKind;
use serde::{Deserialize, Serialize};

/// Top-level definition document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDef {
    #[serde(default)]
    pub modules: Vec<ModuleDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    pub kind: NodeKind,
    /// Built-in type name for leaf and leaf-list nodes, `string` when omitted.
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    /// Allowed names for `enumeration`.
    #[serde(default)]
    pub enums: Vec<String>,
    #[serde(default)]
    pub keys: Vec<String>,
    /// Inherited from the parent when omitted; top-level default is true.
    #[serde(default)]
    pub config: Option<bool>,
    #[serde(default)]
    pub if_feature: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}
