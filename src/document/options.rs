//! Input format and parse-mode flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Serialization of the instance data handed to the parser.
///
/// The parser never guesses the format from the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Xml,
    Json,
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Xml => write!(f, "xml"),
            DataFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(DataFormat::Xml),
            "json" => Ok(DataFormat::Json),
            other => Err(format!("unknown data format '{}'", other)),
        }
    }
}

/// Bitset of parse-mode flags.
///
/// Flags combine with `|`. Bits without a named constant are kept as given.
///
/// # Example
///
/// ```
/// use yangtree::document::options::ParseOptions;
///
/// let opts = ParseOptions::CONFIG | ParseOptions::STRICT;
/// assert!(opts.contains(ParseOptions::STRICT));
/// assert!(opts.config_only());
/// assert!(!ParseOptions::GET.config_only());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParseOptions(u32);

impl ParseOptions {
    /// Configuration and state data.
    pub const DATA: ParseOptions = ParseOptions(0);
    /// Configuration data only; state nodes are an error.
    pub const CONFIG: ParseOptions = ParseOptions(0x01);
    /// Reply to a `<get>` operation: configuration and state data.
    pub const GET: ParseOptions = ParseOptions(0x02);
    /// Reply to a `<get-config>` operation: configuration data only.
    pub const GET_CONFIG: ParseOptions = ParseOptions(0x04);
    /// Content of an `<edit-config>` operation: configuration data only.
    pub const EDIT: ParseOptions = ParseOptions(0x08);
    /// Unknown elements are errors instead of being skipped.
    pub const STRICT: ParseOptions = ParseOptions(0x100);
    /// Leaf values are stored without type checks.
    pub const TRUSTED: ParseOptions = ParseOptions(0x200);

    const CONFIG_ONLY: u32 = Self::CONFIG.0 | Self::GET_CONFIG.0 | Self::EDIT.0;

    pub const fn from_bits(bits: u32) -> Self {
        ParseOptions(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: ParseOptions) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when state (`config false`) data must be rejected.
    pub const fn config_only(self) -> bool {
        self.0 & Self::CONFIG_ONLY != 0
    }
}

impl BitOr for ParseOptions {
    type Output = ParseOptions;

    fn bitor(self, rhs: ParseOptions) -> ParseOptions {
        ParseOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for ParseOptions {
    fn bitor_assign(&mut self, rhs: ParseOptions) {
        self.0 |= rhs.0;
    }
}
