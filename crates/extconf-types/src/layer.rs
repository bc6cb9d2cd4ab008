use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A configuration tree together with its meta tree.
///
/// Used both for a single extension's contribution and for the state
/// accumulated over every extension merged so far. Both trees are JSON
/// objects; key order is preserved and significant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default = "empty_tree")]
    pub config: Value,
    #[serde(default = "empty_tree")]
    pub meta: Value,
}

impl ConfigLayer {
    pub fn new(config: Value, meta: Value) -> Self {
        Self { config, meta }
    }

    /// The empty layer: the accumulated state before any extension is merged.
    pub fn empty() -> Self {
        Self::new(empty_tree(), empty_tree())
    }

    /// A layer that contributes configuration only.
    pub fn config_only(config: Value) -> Self {
        Self::new(config, empty_tree())
    }
}

impl Default for ConfigLayer {
    fn default() -> Self {
        Self::empty()
    }
}

fn empty_tree() -> Value {
    Value::Object(Map::new())
}
