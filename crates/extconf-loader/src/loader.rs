use serde_json::{Map, Value};
use tracing::{error, info};

use extconf_merge::merge_extension;
use extconf_types::tree::{deep_merge, get_path, remove_key, strip_raw};
use extconf_types::{Attribution, ConfigLayer, ConfigPath, EXTENSIONS_KEY, SETTINGS_ROOT};

use crate::definition::ExtensionDefinition;
use crate::error::{LoaderError, LoaderResult};
use crate::manifest::LoadManifest;

/// Folds extensions into an accumulated configuration, one at a time.
///
/// The first failed merge poisons the loader: the state stays as it was
/// before that extension, and every later call to [`load`](Self::load)
/// fails with [`LoaderError::Aborted`].
#[derive(Clone, Debug, Default)]
pub struct ExtensionLoader {
    state: ConfigLayer,
    loaded: Vec<String>,
    failed: Option<String>,
}

impl ExtensionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state instead of an empty one.
    pub fn with_initial(state: ConfigLayer) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Merge one extension into the state.
    pub fn load(&mut self, definition: &ExtensionDefinition) -> LoaderResult<()> {
        if let Some(failed) = &self.failed {
            return Err(LoaderError::Aborted {
                failed: failed.clone(),
            });
        }

        let name = definition.name.as_str();
        let layer = &definition.layer;
        let mut meta = match merge_extension(name, layer, &self.state) {
            Ok(meta) => meta,
            Err(e) => {
                error!(extension = name, path = %e.path(), kind = e.kind(), "extension rejected, loading aborted");
                self.failed = Some(name.to_owned());
                return Err(e.into());
            }
        };

        // Attribution is owned by the engine; declared `__extensions` only
        // feed the ownership checks.
        deep_merge(&mut meta, &remove_key(&layer.meta, EXTENSIONS_KEY));
        deep_merge(&mut self.state.config, &layer.config);
        self.state.meta = meta;
        self.loaded.push(name.to_owned());

        info!(extension = name, position = self.loaded.len(), "extension loaded");
        Ok(())
    }

    /// Load each definition in order, stopping at the first failure.
    pub fn load_all<'a, I>(&mut self, definitions: I) -> LoaderResult<()>
    where
        I: IntoIterator<Item = &'a ExtensionDefinition>,
    {
        for definition in definitions {
            self.load(definition)?;
        }
        Ok(())
    }

    /// Merge the application's own configuration as the final extension.
    pub fn load_application(&mut self, name: &str, layer: ConfigLayer) -> LoaderResult<()> {
        self.load(&ExtensionDefinition {
            name: name.to_owned(),
            layer,
        })
    }

    pub fn state(&self) -> &ConfigLayer {
        &self.state
    }

    /// Names of the extensions merged so far, in order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn is_aborted(&self) -> bool {
        self.failed.is_some()
    }

    /// Consume the loader and return the final state, unless loading was
    /// aborted.
    pub fn finish(self) -> LoaderResult<ConfigLayer> {
        match self.failed {
            Some(failed) => Err(LoaderError::Aborted { failed }),
            None => Ok(self.state),
        }
    }

    /// The `settings` subtree as consumers read it, with raw wrappers
    /// unwrapped.
    pub fn resolved_settings(&self) -> Value {
        self.state
            .config
            .get(SETTINGS_ROOT)
            .map(strip_raw)
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Extensions recorded as contributors of `path`.
    pub fn attribution(&self, path: &ConfigPath) -> Attribution {
        Attribution::from_node(get_path(&self.state.meta, path))
    }
}

/// Load every file a manifest names, application last.
pub fn load_manifest(manifest: &LoadManifest) -> LoaderResult<ExtensionLoader> {
    let mut loader = ExtensionLoader::new();
    for path in manifest.extension_files()? {
        loader.load(&ExtensionDefinition::from_path(&path)?)?;
    }
    if let Some(path) = &manifest.application {
        let application = ExtensionDefinition::from_path(path)?;
        loader.load_application(&manifest.application_name, application.layer)?;
    }
    Ok(loader)
}
