//! Registry persisted to a config file

use chrono::{DateTime, Utc};
use grouper_fs::{ConfigStore, NormalizedPath};
use grouper_meta::TemplateDefinition;
use serde::{Deserialize, Serialize};

use super::{EntryInfo, GroupId, GroupInfo, MemoryRegistry, Registry, RegistryState};
use crate::Result;
use crate::asset::AssetId;

/// On-disk form of a [`FileRegistry`]
#[derive(Debug, Serialize, Deserialize)]
struct RegistryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    state: RegistryState,
}

/// A [`MemoryRegistry`] that writes itself to disk on [`Registry::persist`].
///
/// The format follows the file extension (`.toml`, `.json`, `.yaml`).
/// Writes are atomic and skipped when nothing changed since the last save.
///
/// # Example
///
/// ```ignore
/// let mut registry = FileRegistry::load_or_create("project/.grouper/registry.toml")?;
/// engine_run(&mut registry)?;
/// registry.persist()?;
/// ```
#[derive(Debug)]
pub struct FileRegistry {
    path: NormalizedPath,
    store: ConfigStore,
    inner: MemoryRegistry,
    saved: Option<RegistryState>,
    updated_at: Option<DateTime<Utc>>,
}

impl FileRegistry {
    /// Load an existing registry file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has an unsupported extension
    /// or cannot be parsed.
    pub fn load(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        let store = ConfigStore::new();
        let document: RegistryDocument = store.load(&path)?;

        tracing::debug!(path = %path, "loaded registry");
        Ok(Self {
            path,
            store,
            inner: MemoryRegistry::from_state(document.state.clone()),
            saved: Some(document.state),
            updated_at: document.updated_at,
        })
    }

    /// Load the registry file, or start empty when it does not exist yet.
    pub fn load_or_create(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        if path.is_file() {
            return Self::load(path);
        }

        Ok(Self {
            path,
            store: ConfigStore::new(),
            inner: MemoryRegistry::new(),
            saved: None,
            updated_at: None,
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn inner(&self) -> &MemoryRegistry {
        &self.inner
    }

    /// When the file was last written, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn is_saved(&self) -> bool {
        self.saved.as_ref() == Some(self.inner.state())
    }
}

impl Registry for FileRegistry {
    fn find_group_by_name(&self, name: &str) -> Option<GroupId> {
        self.inner.find_group_by_name(name)
    }

    fn group(&self, id: &GroupId) -> Option<GroupInfo> {
        self.inner.group(id)
    }

    fn list_groups(&self) -> Vec<GroupInfo> {
        self.inner.list_groups()
    }

    fn create_group(&mut self, name: &str, schemas: &[String]) -> Result<GroupId> {
        self.inner.create_group(name, schemas)
    }

    fn apply_template(&mut self, group: &GroupId, template: &TemplateDefinition) -> Result<()> {
        self.inner.apply_template(group, template)
    }

    fn set_default_group(&mut self, group: &GroupId) -> Result<()> {
        self.inner.set_default_group(group)
    }

    fn remove_group(&mut self, group: &GroupId) -> Result<()> {
        self.inner.remove_group(group)
    }

    fn find_entry(&self, id: &AssetId) -> Option<EntryInfo> {
        self.inner.find_entry(id)
    }

    fn list_entries(&self) -> Vec<EntryInfo> {
        self.inner.list_entries()
    }

    fn create_or_move_entry(&mut self, id: &AssetId, group: &GroupId) -> Result<()> {
        self.inner.create_or_move_entry(id, group)
    }

    fn set_address(&mut self, id: &AssetId, address: &str) -> Result<()> {
        self.inner.set_address(id, address)
    }

    fn add_entry_label(&mut self, id: &AssetId, label: &str) -> Result<()> {
        self.inner.add_entry_label(id, label)
    }

    fn remove_entry_label(&mut self, id: &AssetId, label: &str) -> Result<()> {
        self.inner.remove_entry_label(id, label)
    }

    fn remove_entry(&mut self, id: &AssetId, from: &GroupId) -> Result<()> {
        self.inner.remove_entry(id, from)
    }

    fn labels(&self) -> Vec<String> {
        self.inner.labels()
    }

    fn add_label(&mut self, label: &str) -> Result<()> {
        self.inner.add_label(label)
    }

    fn remove_label(&mut self, label: &str) -> Result<()> {
        self.inner.remove_label(label)
    }

    fn mark_dirty(&mut self, group: &GroupId) -> Result<()> {
        self.inner.mark_dirty(group)
    }

    fn persist(&mut self) -> Result<()> {
        let dirty = self.inner.dirty_groups().len();
        self.inner.persist()?;

        if self.is_saved() {
            tracing::debug!(path = %self.path, "registry unchanged, skipping write");
            return Ok(());
        }

        let document = RegistryDocument {
            updated_at: Some(Utc::now()),
            state: self.inner.state().clone(),
        };
        self.store.save_if_changed(&self.path, &document)?;

        tracing::info!(path = %self.path, dirty_groups = dirty, "registry saved");
        self.updated_at = document.updated_at;
        self.saved = Some(document.state);
        Ok(())
    }

    fn remove_missing_group_references(&mut self) -> Result<usize> {
        self.inner.remove_missing_group_references()
    }
}
