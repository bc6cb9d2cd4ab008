//! Attribution: which extensions contributed to a configuration path.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::keys::EXTENSIONS_KEY;

/// Insertion-ordered, deduplicated set of extension names.
///
/// Stored on meta nodes as the `__extensions` array. Iteration follows first
/// contribution order, so diagnostics list contributors in the order they
/// were merged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribution(IndexSet<String>);

impl Attribution {
    /// An empty attribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// An attribution holding exactly one extension.
    pub fn single(name: &str) -> Self {
        let mut attribution = Self::new();
        attribution.insert(name);
        attribution
    }

    /// Read the `__extensions` list from a meta node.
    ///
    /// A missing node, a missing key, or a non-array value yields an empty
    /// attribution. Non-string entries are ignored.
    pub fn from_node(node: Option<&Value>) -> Self {
        node.and_then(|n| n.get(EXTENSIONS_KEY))
            .map(Self::from_value)
            .unwrap_or_default()
    }

    /// Parse an `__extensions` array value.
    pub fn from_value(value: &Value) -> Self {
        value
            .as_array()
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The JSON array form stored under `__extensions`.
    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().cloned().map(Value::String).collect())
    }

    /// Add a contributor. Returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.0.contains(name) {
            return false;
        }
        self.0.insert(name.to_owned())
    }

    /// Append every contributor of `other` not already present.
    pub fn union(&mut self, other: &Attribution) {
        for name in other.iter() {
            self.insert(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns `true` if any contributor appears in both sets.
    pub fn intersects(&self, other: &Attribution) -> bool {
        self.iter().any(|name| other.contains(name))
    }

    /// Contributors in first-contribution order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Contributors as an ordered vector, mainly for assertions.
    pub fn names(&self) -> Vec<&str> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every contributor of `self` is also in `other`.
    pub fn is_subset(&self, other: &Attribution) -> bool {
        self.iter().all(|name| other.contains(name))
    }
}

/// Equality is order-sensitive: two attributions are equal only if they
/// list the same contributors in the same order.
impl PartialEq for Attribution {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Eq for Attribution {}

impl<'a> FromIterator<&'a str> for Attribution {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut attribution = Self::new();
        for name in iter {
            attribution.insert(name);
        }
        attribution
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_suppresses_duplicates() {
        let mut attribution = Attribution::new();
        assert!(attribution.insert("a"));
        assert!(attribution.insert("b"));
        assert!(!attribution.insert("a"));
        assert_eq!(attribution.names(), vec!["a", "b"]);
    }

    #[test]
    fn union_keeps_first_contribution_order() {
        let mut left: Attribution = ["b", "a"].into_iter().collect();
        let right: Attribution = ["c", "a", "d"].into_iter().collect();
        left.union(&right);
        assert_eq!(left.names(), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn from_node_reads_extensions_array() {
        let node = json!({ "__extensions": ["a", 3, "b", "a"], "description": "x" });
        let attribution = Attribution::from_node(Some(&node));
        assert_eq!(attribution.names(), vec!["a", "b"]);
    }

    #[test]
    fn from_node_missing_is_empty() {
        assert!(Attribution::from_node(None).is_empty());
        assert!(Attribution::from_node(Some(&json!({}))).is_empty());
        assert!(Attribution::from_node(Some(&json!({ "__extensions": "a" }))).is_empty());
        assert!(Attribution::from_node(Some(&json!("leaf"))).is_empty());
    }

    #[test]
    fn to_value_round_trips_order() {
        let attribution: Attribution = ["z", "a"].into_iter().collect();
        assert_eq!(attribution.to_value(), json!(["z", "a"]));
        assert_eq!(Attribution::from_value(&attribution.to_value()), attribution);
    }

    #[test]
    fn intersects_and_subset() {
        let ab: Attribution = ["a", "b"].into_iter().collect();
        let bc: Attribution = ["b", "c"].into_iter().collect();
        let c = Attribution::single("c");
        assert!(ab.intersects(&bc));
        assert!(!ab.intersects(&c));
        assert!(!ab.intersects(&Attribution::new()));
        assert!(c.is_subset(&bc));
        assert!(!ab.is_subset(&bc));
    }

    #[test]
    fn equality_is_order_sensitive() {
        let ab: Attribution = ["a", "b"].into_iter().collect();
        let ba: Attribution = ["b", "a"].into_iter().collect();
        assert_ne!(ab, ba);
    }

    #[test]
    fn display_joins_names() {
        let attribution: Attribution = ["web", "react"].into_iter().collect();
        assert_eq!(attribution.to_string(), "web, react");
        assert_eq!(Attribution::new().to_string(), "");
    }
}
