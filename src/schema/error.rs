//! Errors raised while compiling module definitions.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The definition document could not be deserialized.
    Syntax { message: String },
    DuplicateModule { name: String },
    /// Two modules declare the same XML namespace.
    DuplicateNamespace { namespace: String, module: String },
    DuplicateNode { module: String, path: String },
    UnknownType { path: String, type_name: String },
    /// A list key names no child leaf.
    MissingKey { path: String, key: String },
    /// `if_feature` names a feature the module does not declare.
    UnknownFeature { path: String, feature: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Syntax { message } => {
                write!(f, "Invalid module definition: {}", message)
            }
            SchemaError::DuplicateModule { name } => {
                write!(f, "Module '{}' is defined more than once", name)
            }
            SchemaError::DuplicateNamespace { namespace, module } => write!(
                f,
                "Module '{}' reuses namespace '{}' of another module",
                module, namespace
            ),
            SchemaError::DuplicateNode { module, path } => {
                write!(f, "Duplicate node '{}' in module '{}'", path, module)
            }
            SchemaError::UnknownType { path, type_name } => {
                write!(f, "Unknown type '{}' for node '{}'", type_name, path)
            }
            SchemaError::MissingKey { path, key } => {
                write!(f, "List '{}' has no leaf child for key '{}'", path, key)
            }
            SchemaError::UnknownFeature { path, feature } => {
                write!(
                    f,
                    "Node '{}' depends on undeclared feature '{}'",
                    path, feature
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}
