//! Override directives: sanctioned structural or ownership takeovers.

use std::fmt;

use serde_json::Value;

use crate::attribution::Attribution;
use crate::keys::{META_KEY, OVERRIDE_KEY};

/// An `override` declared in an extension's meta for some path.
///
/// Groups carry it on `__meta.override`, leaves directly on `.override`.
/// A directive states that the change is a known takeover of what the named
/// extension(s) declared before; it only helps when one of them is actually
/// among the prior contributors of the path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverrideDirective {
    /// `override: true`: authorizes any change regardless of history.
    Any,
    /// `override: "name"`.
    Extension(String),
    /// `override: ["a", "b"]`.
    Extensions(Vec<String>),
}

impl OverrideDirective {
    /// Read the directive for a meta node.
    ///
    /// `__meta.override` takes precedence over a direct `override`. A value
    /// that cannot express a directive (`false`, `null`, numbers, an empty
    /// string) counts as absent and falls through to the next location.
    pub fn from_meta_node(node: Option<&Value>) -> Option<Self> {
        let node = node?;
        node.get(META_KEY)
            .and_then(|meta| meta.get(OVERRIDE_KEY))
            .and_then(Self::from_value)
            .or_else(|| node.get(OVERRIDE_KEY).and_then(Self::from_value))
    }

    /// Interpret a raw `override` value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(Self::Any),
            Value::String(name) if !name.is_empty() => Some(Self::Extension(name.clone())),
            Value::Array(names) => Some(Self::Extensions(
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Returns `true` if the directive sanctions a change to a path whose
    /// prior contributors are `previous`.
    pub fn matches(&self, previous: &Attribution) -> bool {
        match self {
            Self::Any => true,
            Self::Extension(name) => previous.contains(name),
            Self::Extensions(names) => names.iter().any(|name| previous.contains(name)),
        }
    }

    /// The JSON form as it appears in meta.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Any => Value::Bool(true),
            Self::Extension(name) => Value::String(name.clone()),
            Self::Extensions(names) => {
                Value::Array(names.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl fmt::Display for OverrideDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("true"),
            Self::Extension(name) => f.write_str(name),
            Self::Extensions(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}
