//! Path extraction: flatten a tree into an ordered index of dotted paths.
//!
//! Each indexed path is tagged as a group (an internal node) or a value (a
//! leaf). Objects are inferred to be groups by recursion: an object key is
//! recorded as a group first, and reclassified as a value when nothing below
//! it was recorded. Explicit raw-marked objects skip the inference.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use extconf_types::{ConfigPath, META_KEY, RAW_KEY};

/// Structural classification of an indexed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// An internal namespace node.
    Group,
    /// A terminal value.
    Value,
}

impl PathKind {
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }

    /// Phrase used in conflict reports ("an object" / "a value").
    pub fn describe(self) -> &'static str {
        match self {
            Self::Group => "an object",
            Self::Value => "a value",
        }
    }
}

impl From<bool> for PathKind {
    fn from(is_group: bool) -> Self {
        if is_group {
            Self::Group
        } else {
            Self::Value
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => f.write_str("group"),
            Self::Value => f.write_str("value"),
        }
    }
}

/// Ordered index of the paths found in a configuration or meta tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathIndex {
    entries: IndexMap<ConfigPath, PathKind>,
    is_value: bool,
}

impl PathIndex {
    /// Index `tree`.
    ///
    /// Group paths are always recorded. Leaf paths are recorded only when
    /// `include_values` is set (configuration trees); meta trees are indexed
    /// without them, so leaf meta descriptors show up through the fallback
    /// reclassification instead. `__raw` and `__meta` keys are never indexed,
    /// and the top-level `settings` key is not recorded itself.
    pub fn extract(tree: &Value, include_values: bool) -> Self {
        let mut index = Self::default();
        if let Some(map) = tree.as_object() {
            index.scan(map, None, include_values);
        }
        index.is_value = index.entries.is_empty();
        index
    }

    fn scan(&mut self, map: &Map<String, Value>, parent: Option<&ConfigPath>, include_values: bool) {
        for (key, value) in map {
            if key == RAW_KEY || key == META_KEY {
                continue;
            }
            let path = match parent {
                Some(parent) => parent.child(key),
                None => ConfigPath::root(key),
            };

            match value {
                Value::Object(children) if !children.contains_key(RAW_KEY) => {
                    let tracked = !path.is_settings_root();
                    if tracked {
                        self.entries.insert(path.clone(), PathKind::Group);
                    }
                    let before = self.entries.len();
                    self.scan(children, Some(&path), include_values);

                    // Nothing recorded below: it was leaf data shaped like an object.
                    if tracked && self.entries.len() == before {
                        self.entries.insert(path.clone(), PathKind::Value);
                        if include_values && !children.is_empty() {
                            warn!(path = %path, "object without indexable keys treated as a value");
                        } else if include_values {
                            debug!(path = %path, "empty object treated as a value");
                        } else {
                            trace!(path = %path, "meta node treated as a value");
                        }
                    }
                }
                _ if include_values => {
                    self.entries.insert(path, PathKind::Value);
                }
                _ => {}
            }
        }
    }

    /// Classification of `path`, if indexed.
    pub fn kind_of(&self, path: &ConfigPath) -> Option<PathKind> {
        self.entries.get(path).copied()
    }

    /// Classification of `path`, reading unindexed paths as values.
    pub fn kind(&self, path: &ConfigPath) -> PathKind {
        self.kind_of(path).unwrap_or(PathKind::Value)
    }

    /// Returns `true` only for indexed group paths.
    pub fn is_group(&self, path: &ConfigPath) -> bool {
        self.kind(path).is_group()
    }

    pub fn contains(&self, path: &ConfigPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Entries in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConfigPath, PathKind)> {
        self.entries.iter().map(|(path, kind)| (path, *kind))
    }

    /// Paths in traversal order.
    pub fn paths(&self) -> impl Iterator<Item = &ConfigPath> {
        self.entries.keys()
    }

    /// Paths of `self` that `other` also indexes, in `self`'s order.
    pub fn intersection<'a>(&'a self, other: &'a PathIndex) -> impl Iterator<Item = &'a ConfigPath> {
        self.paths().filter(move |path| other.contains(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the scanned tree produced no entries at all, i.e.
    /// it is itself a bare leaf (or empty).
    pub fn is_value(&self) -> bool {
        self.is_value
    }
}
