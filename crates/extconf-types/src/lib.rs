//! Foundation types for extconf.
//!
//! This crate provides the data model shared by the merge engine, the loader
//! and the command-line front end. Every other extconf crate depends on
//! `extconf-types`.
//!
//! # Key Types
//!
//! - [`ConfigPath`]: Dotted address of a node in a configuration or meta tree
//! - [`ConfigLayer`]: A `(config, meta)` pair, for one extension or the accumulated state
//! - [`Attribution`]: Insertion-ordered set of extensions that contributed to a path
//! - [`OverrideDirective`]: Meta-declared authorization for a structural takeover
//!
//! Trees themselves are plain [`serde_json::Value`] objects; the [`tree`]
//! module holds the path-oriented helpers that operate on them.

pub mod attribution;
pub mod directive;
pub mod error;
pub mod keys;
pub mod layer;
pub mod path;
pub mod tree;

pub use attribution::Attribution;
pub use directive::OverrideDirective;
pub use error::TypeError;
pub use keys::{EXTENSIONS_KEY, META_KEY, OVERRIDE_KEY, RAW_KEY, SETTINGS_ROOT};
pub use layer::ConfigLayer;
pub use path::ConfigPath;
