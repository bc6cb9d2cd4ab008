//! Attribution update: record which extensions contributed to which paths.

use serde_json::{Map, Value};
use tracing::debug;

use extconf_types::tree::update_path;
use extconf_types::{Attribution, EXTENSIONS_KEY};

use crate::engine::ExtensionIndices;

/// Produce the meta tree that results from attributing an extension's paths
/// to `name`.
///
/// Every configuration path gains `name` as a contributor, unless the state
/// indexed it with the other group/value classification; such a node (and
/// everything below it) is replaced by a fresh node attributed to `name`
/// alone. Paths new to the state config keep whatever meta earlier
/// extensions declared for them. Every meta path the extension declares is
/// then attributed too, after any reset, so a replaced parent never drops
/// them. Other fields on a node are left alone.
///
/// `state_meta` is not modified; conflict detection is assumed to have
/// passed already.
pub fn attribute(name: &str, state_meta: &Value, indices: &ExtensionIndices) -> Value {
    let mut meta = state_meta.clone();

    for (path, kind) in indices.extension_config.iter() {
        match indices.state_config.kind_of(path) {
            Some(was) if was != kind => update_path(&mut meta, path, |previous| {
                let discarded = Attribution::from_node(previous.as_ref());
                if !discarded.is_empty() {
                    debug!(path = %path, extension = name, %discarded, "structure changed, attribution reset");
                }
                fresh_node(name)
            }),
            _ => update_path(&mut meta, path, |previous| with_contributor(previous, name)),
        }
    }

    for path in indices.extension_meta.paths() {
        update_path(&mut meta, path, |previous| with_contributor(previous, name));
    }

    meta
}

fn with_contributor(previous: Option<Value>, name: &str) -> Value {
    let mut node = match previous {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let mut contributors = node
        .get(EXTENSIONS_KEY)
        .map(Attribution::from_value)
        .unwrap_or_default();
    contributors.insert(name);
    node.insert(EXTENSIONS_KEY.to_owned(), contributors.to_value());
    Value::Object(node)
}

fn fresh_node(name: &str) -> Value {
    let mut node = Map::new();
    node.insert(EXTENSIONS_KEY.to_owned(), Attribution::single(name).to_value());
    Value::Object(node)
}
