use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::keys::SETTINGS_ROOT;

/// Dotted address of a node in a configuration or meta tree.
///
/// Paths are derived from tree keys by dotted concatenation
/// (`settings` → `settings.build` → `settings.build.output`) and are the unit
/// of comparison between an extension and the accumulated state.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigPath(String);

impl ConfigPath {
    /// A top-level path made of a single key.
    pub fn root(key: &str) -> Self {
        Self(key.to_owned())
    }

    /// The path of `key` nested below `self`.
    pub fn child(&self, key: &str) -> Self {
        Self(format!("{}.{key}", self.0))
    }

    /// The dotted string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The individual keys, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns `true` for the bare `settings` namespace root.
    pub fn is_settings_root(&self) -> bool {
        self.0 == SETTINGS_ROOT
    }
}

impl FromStr for ConfigPath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.split('.').any(str::is_empty) {
            return Err(TypeError::InvalidPath(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}

impl Borrow<str> for ConfigPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigPath({})", self.0)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
