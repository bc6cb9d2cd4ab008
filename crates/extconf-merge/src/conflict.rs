//! Structural conflict detection.
//!
//! Both checks walk the paths an extension shares with the accumulated state
//! and stop at the first violation, so a report names exactly one path.

use serde_json::Value;
use tracing::debug;

use extconf_types::tree::get_path;
use extconf_types::{Attribution, ConfigLayer, ConfigPath, OverrideDirective, META_KEY};

use crate::engine::ExtensionIndices;
use crate::error::{MergeError, MergeResult};

/// Ownership evidence gathered for one path shared by an extension and the state.
#[derive(Clone, Debug)]
pub(crate) struct OwnershipClaim {
    /// Contributors recorded in the accumulated state.
    pub previous: Attribution,
    /// Contributors the extension itself declares for the path.
    pub declared: Attribution,
    pub directive: Option<OverrideDirective>,
}

impl OwnershipClaim {
    pub fn read(extension_meta: &Value, state_meta: &Value, path: &ConfigPath) -> Self {
        let own = get_path(extension_meta, path);
        Self {
            previous: Attribution::from_node(get_path(state_meta, path)),
            declared: Attribution::from_node(own),
            directive: OverrideDirective::from_meta_node(own),
        }
    }

    /// A change by `name` is accepted when it is self-consistent (`name` or
    /// one of its declared contributors already owns the path) or when the
    /// override names a prior contributor.
    pub fn permits(&self, name: &str) -> bool {
        self.previous.contains(name)
            || self
                .directive
                .as_ref()
                .is_some_and(|directive| directive.matches(&self.previous))
            || self.declared.intersects(&self.previous)
    }

    fn into_meta_conflict(self, name: &str, path: &ConfigPath) -> MergeError {
        MergeError::MetaStructureConflict {
            path: path.clone(),
            extension: name.to_owned(),
            previous: self.previous,
            override_directive: self.directive,
        }
    }
}

/// Verify that redeclared meta does not take over paths owned by others.
///
/// A shared meta path is checked when it was not a group in the state's
/// configuration, or when the extension redeclares `__meta` on it.
pub fn check_meta_structure(
    name: &str,
    extension: &ConfigLayer,
    state: &ConfigLayer,
    indices: &ExtensionIndices,
) -> MergeResult<()> {
    for path in indices.extension_meta.intersection(&indices.state_meta) {
        let was_group = indices.state_config.is_group(path);
        if was_group && !redeclares_meta(&extension.meta, path) {
            continue;
        }

        let claim = OwnershipClaim::read(&extension.meta, &state.meta, path);
        if !claim.permits(name) {
            return Err(claim.into_meta_conflict(name, path));
        }
        if !claim.previous.contains(name) {
            debug!(path = %path, extension = name, previous = %claim.previous, "meta takeover sanctioned");
        }
    }
    Ok(())
}

/// Verify that no shared configuration path switches between group and
/// value without a satisfied override.
pub fn check_config_structure(
    name: &str,
    extension: &ConfigLayer,
    state: &ConfigLayer,
    indices: &ExtensionIndices,
) -> MergeResult<()> {
    for path in indices.extension_config.intersection(&indices.state_config) {
        let was = indices.state_config.kind(path);
        let now = indices.extension_config.kind(path);
        if was == now {
            continue;
        }

        let claim = OwnershipClaim::read(&extension.meta, &state.meta, path);
        if !claim.permits(name) {
            return Err(MergeError::ConfigStructureConflict {
                path: path.clone(),
                extension: name.to_owned(),
                was,
                now,
                previous: claim.previous,
                override_directive: claim.directive,
            });
        }
        debug!(path = %path, extension = name, %was, %now, "structure change sanctioned");
    }
    Ok(())
}

fn redeclares_meta(extension_meta: &Value, path: &ConfigPath) -> bool {
    get_path(extension_meta, path)
        .and_then(|node| node.get(META_KEY))
        .is_some_and(|descriptor| !matches!(descriptor, Value::Null | Value::Bool(false)))
}
