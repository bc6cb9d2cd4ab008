//! Extension loader for extconf.
//!
//! Owns the accumulated configuration state for the duration of a load: it
//! starts empty, folds every extension through the merge engine in order,
//! deep-merges their configuration and meta payloads, and hands the final
//! state to consumers. Any structural conflict aborts the whole load.

pub mod definition;
pub mod error;
pub mod loader;
pub mod manifest;

pub use definition::ExtensionDefinition;
pub use error::{LoaderError, LoaderResult};
pub use loader::{load_manifest, ExtensionLoader};
pub use manifest::LoadManifest;

// Re-export key types
pub use extconf_merge::{MergeError, PathIndex, PathKind};
pub use extconf_types::{Attribution, ConfigLayer, ConfigPath, OverrideDirective};
