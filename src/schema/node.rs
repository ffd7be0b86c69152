//! Schema node kinds and leaf value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a schema node inside its `SchemaContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) usize);

/// Index of a module inside its `SchemaContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

/// The kind of a schema node. Fixed when the schema is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Container,
    List,
    Leaf,
    LeafList,
}

impl NodeKind {
    /// Returns true for kinds that carry a value (leaf and leaf-list).
    pub fn is_scalar(&self) -> bool {
        matches!(self, NodeKind::Leaf | NodeKind::LeafList)
    }

    /// Returns true for kinds that may appear more than once among siblings.
    pub fn is_multi_instance(&self) -> bool {
        matches!(self, NodeKind::List | NodeKind::LeafList)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Container => "container",
            NodeKind::List => "list",
            NodeKind::Leaf => "leaf",
            NodeKind::LeafList => "leaf-list",
        };
        write!(f, "{}", name)
    }
}

/// Built-in type of a leaf or leaf-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafType {
    String,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64,
    Enumeration(Vec<String>),
    Empty,
}

impl LeafType {
    /// Resolves a type name as written in a module definition.
    ///
    /// `enums` is only used for `enumeration`.
    pub fn from_name(name: &str, enums: &[String]) -> Option<Self> {
        let ty = match name {
            "string" => LeafType::String,
            "boolean" => LeafType::Boolean,
            "int8" => LeafType::Int8,
            "int16" => LeafType::Int16,
            "int32" => LeafType::Int32,
            "int64" => LeafType::Int64,
            "uint8" => LeafType::Uint8,
            "uint16" => LeafType::Uint16,
            "uint32" => LeafType::Uint32,
            "uint64" => LeafType::Uint64,
            "decimal64" => LeafType::Decimal64,
            "enumeration" => LeafType::Enumeration(enums.to_vec()),
            "empty" => LeafType::Empty,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeafType::String => "string",
            LeafType::Boolean => "boolean",
            LeafType::Int8 => "int8",
            LeafType::Int16 => "int16",
            LeafType::Int32 => "int32",
            LeafType::Int64 => "int64",
            LeafType::Uint8 => "uint8",
            LeafType::Uint16 => "uint16",
            LeafType::Uint32 => "uint32",
            LeafType::Uint64 => "uint64",
            LeafType::Decimal64 => "decimal64",
            LeafType::Enumeration(_) => "enumeration",
            LeafType::Empty => "empty",
        }
    }

    /// Checks `text` against the type and returns its canonical form.
    ///
    /// Integers lose leading `+` and zeros, everything else is kept as given.
    pub fn canonicalize(&self, text: &str) -> Result<String, String> {
        match self {
            LeafType::String => Ok(text.to_string()),
            LeafType::Boolean => match text {
                "true" | "false" => Ok(text.to_string()),
                _ => Err(format!("invalid boolean value '{}'", text)),
            },
            LeafType::Int8 => signed_in_range(text, i8::MIN as i64, i8::MAX as i64, self),
            LeafType::Int16 => signed_in_range(text, i16::MIN as i64, i16::MAX as i64, self),
            LeafType::Int32 => signed_in_range(text, i32::MIN as i64, i32::MAX as i64, self),
            LeafType::Int64 => signed_in_range(text, i64::MIN, i64::MAX, self),
            LeafType::Uint8 => unsigned_in_range(text, u8::MAX as u64, self),
            LeafType::Uint16 => unsigned_in_range(text, u16::MAX as u64, self),
            LeafType::Uint32 => unsigned_in_range(text, u32::MAX as u64, self),
            LeafType::Uint64 => unsigned_in_range(text, u64::MAX, self),
            LeafType::Decimal64 => {
                if is_decimal(text) {
                    Ok(text.to_string())
                } else {
                    Err(format!("invalid decimal64 value '{}'", text))
                }
            }
            LeafType::Enumeration(values) => {
                if values.iter().any(|v| v == text) {
                    Ok(text.to_string())
                } else {
                    Err(format!("invalid enumeration value '{}'", text))
                }
            }
            LeafType::Empty => {
                if text.is_empty() {
                    Ok(String::new())
                } else {
                    Err(format!("type empty does not take a value, got '{}'", text))
                }
            }
        }
    }
}

fn signed_in_range(text: &str, min: i64, max: i64, ty: &LeafType) -> Result<String, String> {
    match text.parse::<i64>() {
        Ok(v) if v >= min && v <= max => Ok(v.to_string()),
        Ok(_) => Err(format!("value '{}' out of range for {}", text, ty.name())),
        Err(_) => Err(format!("invalid {} value '{}'", ty.name(), text)),
    }
}

fn unsigned_in_range(text: &str, max: u64, ty: &LeafType) -> Result<String, String> {
    match text.parse::<u64>() {
        Ok(v) if v <= max => Ok(v.to_string()),
        Ok(_) => Err(format!("value '{}' out of range for {}", text, ty.name())),
        Err(_) => Err(format!("invalid {} value '{}'", ty.name(), text)),
    }
}

/// Checks the lexical form of a `decimal64` value only. Neither the 64-bit
/// range nor `fraction-digits` is enforced, since module definitions do not
/// carry `fraction-digits`.
fn is_decimal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.map_or(true, all_digits)
}

/// One node of a compiled schema.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub(crate) id: SchemaId,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) module: ModuleId,
    pub(crate) parent: Option<SchemaId>,
    pub(crate) children: Vec<SchemaId>,
    pub(crate) config: bool,
    pub(crate) keys: Vec<String>,
    pub(crate) leaf_type: Option<LeafType>,
    pub(crate) if_feature: Option<String>,
}

impl SchemaNode {
    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn module(&self) -> ModuleId {
        self.module
    }

    pub fn parent(&self) -> Option<SchemaId> {
        self.parent
    }

    pub fn children(&self) -> &[SchemaId] {
        &self.children
    }

    /// False for state (operational) data.
    pub fn is_config(&self) -> bool {
        self.config
    }

    /// Key leaf names of a list, in declaration order. Empty for other kinds.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Value type of a leaf or leaf-list.
    pub fn leaf_type(&self) -> Option<&LeafType> {
        self.leaf_type.as_ref()
    }

    pub fn if_feature(&self) -> Option<&str> {
        self.if_feature.as_deref()
    }
}
