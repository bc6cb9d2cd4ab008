//! Path-oriented helpers over configuration and meta trees.
//!
//! Trees are JSON objects. Nested objects are groups unless they carry the
//! raw-value marker ([`RAW_KEY`]), which makes them opaque leaf values.

use serde_json::{Map, Value};

use crate::keys::RAW_KEY;
use crate::path::ConfigPath;

/// Look up the node at `path`.
///
/// Returns `None` if any step along the path is missing or is not an object.
pub fn get_path<'a>(tree: &'a Value, path: &ConfigPath) -> Option<&'a Value> {
    path.segments()
        .try_fold(tree, |node, key| node.as_object()?.get(key))
}

/// Replace the node at `path` with `update(previous)`.
///
/// Intermediate objects are created as needed; a non-object found along the
/// way is replaced by an empty object. The updated node keeps its position
/// among its siblings.
pub fn update_path<F>(tree: &mut Value, path: &ConfigPath, update: F)
where
    F: FnOnce(Option<Value>) -> Value,
{
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = tree;
    for key in parents {
        node = ensure_object(node)
            .entry((*key).to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let map = ensure_object(node);
    match map.get_mut(*last) {
        Some(slot) => {
            let previous = std::mem::take(slot);
            *slot = update(Some(previous));
        }
        None => {
            map.insert((*last).to_owned(), update(None));
        }
    }
}

/// Borrow `node` as an object, replacing any non-object with an empty one.
fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    match node {
        Value::Object(map) => map,
        other => {
            *other = Value::Object(Map::new());
            ensure_object(other)
        }
    }
}

/// Deep-merge `incoming` into `base`.
///
/// Objects merge key by key, recursively. Any other incoming value replaces
/// the base. Raw-marked objects on either side are leaves: they replace, and
/// are replaced, wholesale.
pub fn deep_merge(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map))
            if !base_map.contains_key(RAW_KEY) && !incoming_map.contains_key(RAW_KEY) =>
        {
            for (key, value) in incoming_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, incoming) => *base = incoming.clone(),
    }
}

/// Wrap a literal so that it is treated as a single leaf value.
pub fn raw(value: Value) -> Value {
    let mut map = Map::new();
    map.insert(RAW_KEY.to_owned(), value);
    Value::Object(map)
}

/// Returns `true` if `value` is a raw-marked object.
pub fn is_raw(value: &Value) -> bool {
    value.as_object().is_some_and(|map| map.contains_key(RAW_KEY))
}

/// The consumer view of a tree: every raw wrapper replaced by its payload.
pub fn strip_raw(tree: &Value) -> Value {
    match tree {
        Value::Object(map) => match map.get(RAW_KEY) {
            Some(payload) => payload.clone(),
            None => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), strip_raw(value)))
                    .collect(),
            ),
        },
        other => other.clone(),
    }
}

/// Remove every `key` entry from a tree, at any depth.
pub fn remove_key(tree: &Value, key: &str) -> Value {
    match tree {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, value)| (k.clone(), remove_key(value, key)))
                .collect(),
        ),
        other => other.clone(),
    }
}
