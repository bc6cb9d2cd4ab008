use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use extconf_types::ConfigLayer;

use crate::error::{LoaderError, LoaderResult};

/// One extension as handed to the loader: a name and its `(config, meta)`
/// contribution.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionDefinition {
    pub name: String,
    pub layer: ConfigLayer,
}

/// On-disk shape of an extension file. `name` defaults to the file stem.
#[derive(Deserialize)]
struct DefinitionFile {
    name: Option<String>,
    #[serde(default = "empty_object")]
    config: Value,
    #[serde(default = "empty_object")]
    meta: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl ExtensionDefinition {
    pub fn new(name: impl Into<String>, config: Value, meta: Value) -> Self {
        Self {
            name: name.into(),
            layer: ConfigLayer::new(config, meta),
        }
    }

    /// Read an extension from a `.json` or `.toml` file.
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        let file: DefinitionFile = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text).map_err(|e| LoaderError::parse(path, e))?,
            Some("toml") => toml::from_str(&text).map_err(|e| LoaderError::parse(path, e))?,
            _ => return Err(LoaderError::UnsupportedFormat(path.to_path_buf())),
        };

        let name = match file.name {
            Some(name) => name,
            None => path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_owned)
                .ok_or_else(|| LoaderError::parse(path, "cannot derive an extension name"))?,
        };
        if !file.config.is_object() || !file.meta.is_object() {
            return Err(LoaderError::parse(path, "`config` and `meta` must be tables"));
        }

        Ok(Self::new(name, file.config, file.meta))
    }
}
