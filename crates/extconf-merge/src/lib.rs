//! Merge engine for extconf.
//!
//! Folds one extension's `(config, meta)` pair into the accumulated state of
//! every extension merged before it. The engine is a pure function of its
//! inputs and runs in three steps:
//!
//! 1. **Path extraction** ([`PathIndex`]) flattens the extension's and the
//!    state's trees into ordered dotted paths tagged group or value.
//! 2. **Conflict detection** ([`check_meta_structure`],
//!    [`check_config_structure`]) rejects changes of shape or ownership that
//!    no satisfied override sanctions. The first violation aborts the merge.
//! 3. **Attribution** ([`attribute`]) records the extension as a contributor
//!    on every path it declares, resetting history where the shape changed.
//!
//! # Quick Start
//!
//! ```rust
//! use extconf_merge::merge_extension;
//! use extconf_types::ConfigLayer;
//! use serde_json::json;
//!
//! let state = ConfigLayer::empty();
//! let extension = ConfigLayer::config_only(json!({ "settings": { "build": { "output": "dist" } } }));
//! let meta = merge_extension("web", &extension, &state).unwrap();
//! assert_eq!(meta["settings"]["build"]["__extensions"], json!(["web"]));
//! ```

pub mod attribute;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod index;

#[cfg(test)]
mod properties;

pub use attribute::attribute;
pub use conflict::{check_config_structure, check_meta_structure};
pub use engine::{merge_extension, validate_extension, ExtensionIndices};
pub use error::{MergeError, MergeResult};
pub use index::{PathIndex, PathKind};
