//! Error types for the merge engine.

use extconf_types::{Attribution, ConfigPath, OverrideDirective};

use crate::index::PathKind;

/// Fatal structural conflicts raised while merging an extension.
///
/// Either variant aborts the whole configuration load; nothing of the
/// offending extension is applied. The display form is the full report shown
/// to the end user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Meta was redeclared on a path owned by other extensions without a
    /// satisfied override.
    #[error("{}", meta_report(.path, .extension, .previous, .override_directive))]
    MetaStructureConflict {
        path: ConfigPath,
        extension: String,
        previous: Attribution,
        override_directive: Option<OverrideDirective>,
    },

    /// A path switched between group and value without a satisfied override.
    #[error("{}", config_report(.path, .extension, .was, .now, .previous, .override_directive))]
    ConfigStructureConflict {
        path: ConfigPath,
        extension: String,
        was: PathKind,
        now: PathKind,
        previous: Attribution,
        override_directive: Option<OverrideDirective>,
    },
}

impl MergeError {
    /// The offending path.
    pub fn path(&self) -> &ConfigPath {
        match self {
            Self::MetaStructureConflict { path, .. } | Self::ConfigStructureConflict { path, .. } => path,
        }
    }

    /// The extension whose merge failed.
    pub fn extension(&self) -> &str {
        match self {
            Self::MetaStructureConflict { extension, .. }
            | Self::ConfigStructureConflict { extension, .. } => extension,
        }
    }

    /// Extensions previously attributed to the path.
    pub fn previous(&self) -> &Attribution {
        match self {
            Self::MetaStructureConflict { previous, .. }
            | Self::ConfigStructureConflict { previous, .. } => previous,
        }
    }

    /// Short machine-friendly name of the conflict kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MetaStructureConflict { .. } => "meta-structure",
            Self::ConfigStructureConflict { .. } => "config-structure",
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;

fn meta_report(
    path: &ConfigPath,
    extension: &str,
    previous: &Attribution,
    directive: &Option<OverrideDirective>,
) -> String {
    let mut report = format!(
        "meta structure of `{path}` was changed by `{extension}` without a matching override\n"
    );
    push_details(&mut report, extension, previous, directive.as_ref());
    report
}

fn config_report(
    path: &ConfigPath,
    extension: &str,
    was: &PathKind,
    now: &PathKind,
    previous: &Attribution,
    directive: &Option<OverrideDirective>,
) -> String {
    let mut report = format!(
        "configuration structure of `{path}` was changed by `{extension}` without an override in meta: \
         was {}, is now {}\n",
        was.describe(),
        now.describe()
    );
    push_details(&mut report, extension, previous, directive.as_ref());
    report
}

fn push_details(
    report: &mut String,
    extension: &str,
    previous: &Attribution,
    directive: Option<&OverrideDirective>,
) {
    if previous.is_empty() {
        report.push_str("no previous contributors are recorded for it\n");
    } else {
        report.push_str("previously contributed by:\n");
        for name in previous.iter() {
            report.push_str(&format!("  - {name}\n"));
        }
    }
    match directive {
        None => report.push_str(
            "no override was specified; it should probably name one of the extensions above\n",
        ),
        Some(directive) => report.push_str(&format!(
            "the override did not match any previous contributor, it was: {directive}\n"
        )),
    }
    report.push_str(&format!("contact the developer of `{extension}` for help"));
}
