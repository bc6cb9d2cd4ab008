use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{LoaderError, LoaderResult};

/// Describes which extension files to load, and in which order.
///
/// ```toml
/// extensions = ["base.json", "web.toml"]
/// extensions_dir = "extensions"
/// application = "app.json"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadManifest {
    /// Loaded first, in the order listed.
    pub extensions: Vec<PathBuf>,
    /// Every `.json` / `.toml` file directly inside, sorted by file name.
    pub extensions_dir: Option<PathBuf>,
    /// The application's own configuration, merged last.
    pub application: Option<PathBuf>,
    pub application_name: String,
}

impl Default for LoadManifest {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            extensions_dir: None,
            application: None,
            application_name: "application".to_owned(),
        }
    }
}

impl LoadManifest {
    /// Parse a TOML manifest. Relative paths are resolved against the
    /// manifest's own directory.
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        let manifest: LoadManifest = toml::from_str(&text).map_err(|e| LoaderError::parse(path, e))?;
        if manifest.application_name.is_empty() {
            return Err(LoaderError::Manifest("`application_name` must not be empty".into()));
        }
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(manifest.resolved_against(base))
    }

    fn resolved_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Self {
            extensions: self.extensions.into_iter().map(resolve).collect(),
            extensions_dir: self.extensions_dir.map(resolve),
            application: self.application.map(resolve),
            application_name: self.application_name,
        }
    }

    /// Extension files in load order: the explicit list, then the directory
    /// scan. A file listed both ways is loaded once, at its first position.
    pub fn extension_files(&self) -> LoaderResult<Vec<PathBuf>> {
        let mut files = self.extensions.clone();

        if let Some(dir) = &self.extensions_dir {
            let mut scanned = Vec::new();
            for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    LoaderError::io(dir, source)
                })?;
                if entry.file_type().is_file() && is_definition_file(entry.path()) {
                    scanned.push(entry.into_path());
                }
            }
            for path in scanned {
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }

        Ok(files)
    }
}

fn is_definition_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("json" | "toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest() {
        let m = LoadManifest::default();
        assert!(m.extensions.is_empty());
        assert!(m.extensions_dir.is_none());
        assert!(m.application.is_none());
        assert_eq!(m.application_name, "application");
    }

    #[test]
    fn relative_paths_resolve_against_manifest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extconf.toml");
        std::fs::write(
            &path,
            r#"
extensions = ["base.json", "/abs/web.json"]
application = "app.json"
application_name = "site"
"#,
        )
        .unwrap();

        let m = LoadManifest::from_path(&path).unwrap();
        assert_eq!(m.extensions, vec![dir.path().join("base.json"), PathBuf::from("/abs/web.json")]);
        assert_eq!(m.application, Some(dir.path().join("app.json")));
        assert_eq!(m.application_name, "site");
    }

    #[test]
    fn unknown_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extconf.toml");
        std::fs::write(&path, "extension = []").unwrap();
        assert!(matches!(LoadManifest::from_path(&path), Err(LoaderError::Parse { .. })));
    }

    #[test]
    fn empty_application_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extconf.toml");
        std::fs::write(&path, "application_name = \"\"").unwrap();
        assert!(matches!(LoadManifest::from_path(&path), Err(LoaderError::Manifest(_))));
    }

    #[test]
    fn directory_scan_is_sorted_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let ext_dir = dir.path().join("extensions");
        std::fs::create_dir(&ext_dir).unwrap();
        for name in ["b.toml", "a.json", "c.json", "notes.txt"] {
            std::fs::write(ext_dir.join(name), "").unwrap();
        }
        std::fs::create_dir(ext_dir.join("nested.json")).unwrap();

        let m = LoadManifest {
            extensions: vec![ext_dir.join("c.json")],
            extensions_dir: Some(ext_dir.clone()),
            ..LoadManifest::default()
        };
        assert_eq!(
            m.extension_files().unwrap(),
            vec![ext_dir.join("c.json"), ext_dir.join("a.json"), ext_dir.join("b.toml")]
        );
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let m = LoadManifest {
            extensions_dir: Some(dir.path().join("nowhere")),
            ..LoadManifest::default()
        };
        assert!(matches!(m.extension_files(), Err(LoaderError::Io { .. })));
    }
}
