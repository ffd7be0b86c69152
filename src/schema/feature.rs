//! Named optional features declared by a module.

use serde::{Deserialize, Serialize};

/// One `feature` statement of a module.
///
/// `enabled` decides whether nodes guarded by `if_feature` exist in data
/// trees; name lookups ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

impl Feature {
    pub fn new(name: &str, enabled: bool) -> Self {
        Self {
            name: name.to_string(),
            enabled,
        }
    }
}

/// Returns the name of the feature at `index`.
///
/// An absent list yields `None` for every index, including 0. A present list
/// yields `None` for any index at or past its length.
///
/// # Example
///
/// ```
/// use yangtree::schema::feature::{feature_name, Feature};
///
/// let features = vec![Feature::new("candidate", true), Feature::new("startup", false)];
/// assert_eq!(feature_name(Some(features.as_slice()), 1), Some("startup"));
/// assert_eq!(feature_name(Some(features.as_slice()), 2), None);
/// assert_eq!(feature_name(None, 0), None);
/// ```
pub fn feature_name(features: Option<&[Feature]>, index: usize) -> Option<&str> {
    features?.get(index).map(|f| f.name.as_str())
}
