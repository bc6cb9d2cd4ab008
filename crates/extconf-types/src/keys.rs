//! Reserved keys with structural meaning in configuration and meta trees.

/// Marks an object as an opaque leaf value rather than a group.
pub const RAW_KEY: &str = "__raw";

/// Group-level meta descriptor (may carry an `override`).
pub const META_KEY: &str = "__meta";

/// Attribution list on a meta node.
pub const EXTENSIONS_KEY: &str = "__extensions";

/// Override directive, on `__meta` for groups or directly on leaf meta.
pub const OVERRIDE_KEY: &str = "override";

/// Implicit namespace root; never indexed as a group itself.
pub const SETTINGS_ROOT: &str = "settings";
