//! The public merge entry point.

use serde_json::Value;
use tracing::debug;

use extconf_types::ConfigLayer;

use crate::attribute::attribute;
use crate::conflict::{check_config_structure, check_meta_structure};
use crate::error::MergeResult;
use crate::index::PathIndex;

/// The four path indices one merge step works from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionIndices {
    /// The extension's configuration, values included.
    pub extension_config: PathIndex,
    /// The extension's meta, groups and meta nodes only.
    pub extension_meta: PathIndex,
    pub state_config: PathIndex,
    pub state_meta: PathIndex,
}

impl ExtensionIndices {
    pub fn build(extension: &ConfigLayer, state: &ConfigLayer) -> Self {
        Self {
            extension_config: PathIndex::extract(&extension.config, true),
            extension_meta: PathIndex::extract(&extension.meta, false),
            state_config: PathIndex::extract(&state.config, true),
            state_meta: PathIndex::extract(&state.meta, false),
        }
    }
}

/// Extract paths and run both structural checks for `extension` against
/// `state`, returning the indices for the attribution step.
///
/// Meta structure is checked before configuration structure; the first
/// violation is returned.
pub fn validate_extension(
    name: &str,
    extension: &ConfigLayer,
    state: &ConfigLayer,
) -> MergeResult<ExtensionIndices> {
    let indices = ExtensionIndices::build(extension, state);
    check_meta_structure(name, extension, state, &indices)?;
    check_config_structure(name, extension, state, &indices)?;
    Ok(indices)
}

/// Merge one extension into the accumulated state and return the new meta
/// tree.
///
/// Merging the configuration trees themselves, and the extension's literal
/// meta payload, is left to the caller. Neither input is modified; on error
/// the caller's state is exactly as it was.
pub fn merge_extension(name: &str, extension: &ConfigLayer, state: &ConfigLayer) -> MergeResult<Value> {
    let indices = validate_extension(name, extension, state)?;
    let meta = attribute(name, &state.meta, &indices);
    debug!(
        extension = name,
        config_paths = indices.extension_config.len(),
        meta_paths = indices.extension_meta.len(),
        "extension merged"
    );
    Ok(meta)
}
