//! Loader for a `.grouper/` project directory
//!
//! ```text
//! .grouper/
//!   config.toml
//!   templates/
//!     packed.toml
//!     separate.toml
//!   builders/
//!     characters.toml
//!     ui.toml
//! ```
//!
//! Unlike a lenient definition scan, a malformed file here is fatal: a
//! half-loaded builder would make the next reconcile delete entries it
//! never got to declare.

use grouper_fs::{ConfigStore, NormalizedPath};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;

use crate::project::Project;
use crate::schema::{BatchDefinition, BuilderDefinition, TemplateCatalog, TemplateDefinition};
use crate::{Error, Result};

/// Directory holding the project configuration
pub const CONFIG_DIR: &str = ".grouper";
/// Batch definition file inside [`CONFIG_DIR`]
pub const BATCH_FILE: &str = "config.toml";
pub const BUILDERS_DIR: &str = "builders";
pub const TEMPLATES_DIR: &str = "templates";

/// Loads a whole project from disk.
#[derive(Debug, Default)]
pub struct ProjectLoader {
    store: ConfigStore,
}

impl ProjectLoader {
    pub fn new() -> Self {
        Self {
            store: ConfigStore::new(),
        }
    }

    /// Path of the `.grouper/` directory under `root`
    pub fn config_dir(root: &NormalizedPath) -> NormalizedPath {
        root.join(CONFIG_DIR)
    }

    /// Load batch, templates and builders.
    ///
    /// Builders are returned in the order the batch lists them. When the batch
    /// lists none, every builder file is loaded in file-name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch file is missing, a listed builder does not
    /// exist, or any definition fails to parse.
    pub fn load(&self, root: &NormalizedPath) -> Result<Project> {
        let batch = self.load_batch(root)?;
        let templates = self.load_templates(root)?;

        let builders = if batch.builders.is_empty() {
            self.load_definitions::<BuilderDefinition>(&Self::config_dir(root).join(BUILDERS_DIR))?
                .into_iter()
                .map(|(name, mut builder)| {
                    builder.name = name;
                    builder
                })
                .collect()
        } else {
            batch
                .builders
                .iter()
                .map(|name| self.load_builder(root, name))
                .collect::<Result<Vec<_>>>()?
        };

        tracing::debug!(
            root = %root,
            builders = builders.len(),
            templates = templates.len(),
            "loaded project"
        );

        Ok(Project {
            root: root.clone(),
            batch,
            builders,
            templates,
        })
    }

    /// Load `.grouper/config.toml`.
    pub fn load_batch(&self, root: &NormalizedPath) -> Result<BatchDefinition> {
        let path = Self::config_dir(root).join(BATCH_FILE);
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        }
        Ok(self.store.load(&path)?)
    }

    /// Load one builder by name from `.grouper/builders/{name}.toml`.
    pub fn load_builder(&self, root: &NormalizedPath, name: &str) -> Result<BuilderDefinition> {
        let path = Self::config_dir(root)
            .join(BUILDERS_DIR)
            .join(&format!("{}.toml", name));
        if !path.is_file() {
            return Err(Error::BuilderNotFound {
                name: name.to_string(),
                path: path.to_native(),
            });
        }
        let mut builder: BuilderDefinition = self.store.load(&path)?;
        builder.name = name.to_string();
        Ok(builder)
    }

    /// Load every template in `.grouper/templates/`.
    pub fn load_templates(&self, root: &NormalizedPath) -> Result<TemplateCatalog> {
        let dir = Self::config_dir(root).join(TEMPLATES_DIR);
        Ok(self
            .load_definitions::<TemplateDefinition>(&dir)?
            .into_iter()
            .map(|(name, mut template)| {
                template.name = name;
                template
            })
            .collect())
    }

    /// Load every `*.toml` file in `dir`, keyed by file stem.
    fn load_definitions<T: DeserializeOwned>(
        &self,
        dir: &NormalizedPath,
    ) -> Result<BTreeMap<String, T>> {
        let mut definitions = BTreeMap::new();

        if !dir.is_dir() {
            return Ok(definitions);
        }

        let entries = fs::read_dir(dir.to_native())
            .map_err(|e| Error::Fs(grouper_fs::Error::io(dir.to_native(), e)))?;

        for entry in entries.flatten() {
            let path = NormalizedPath::new(entry.path());
            if path.extension() != Some("toml") {
                continue;
            }
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let definition = self.store.load::<T>(&path)?;
            definitions.insert(stem.to_string(), definition);
        }

        Ok(definitions)
    }
}
