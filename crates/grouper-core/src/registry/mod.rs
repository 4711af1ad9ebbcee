//! The mutable registry the engine converges
//!
//! The registry owns groups, entries (asset → group, address, labels) and
//! the label table. The engine only talks to it through [`Registry`]; it
//! keeps no registry state between runs.

mod file;
mod memory;

pub use file::FileRegistry;
pub use memory::{MemoryRegistry, RegistryState};

use grouper_meta::TemplateDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

use crate::Result;
use crate::asset::AssetId;

/// Handle of a registry group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Snapshot of a registry group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: GroupId,
    pub name: String,
    pub is_default: bool,
    pub schemas: Vec<String>,
    pub settings: BTreeMap<String, Value>,
}

/// Snapshot of a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    pub id: AssetId,
    pub group: GroupId,
    pub address: String,
    pub labels: BTreeSet<String>,
}

/// Mutable store of groups, entries and labels.
///
/// Reads return owned snapshots so callers can iterate while mutating.
pub trait Registry {
    fn find_group_by_name(&self, name: &str) -> Option<GroupId>;

    fn group(&self, id: &GroupId) -> Option<GroupInfo>;

    /// All groups in creation order.
    fn list_groups(&self) -> Vec<GroupInfo>;

    /// Create an empty group with the given schema types.
    fn create_group(&mut self, name: &str, schemas: &[String]) -> Result<GroupId>;

    /// Overwrite the group's settings with the template's; idempotent.
    fn apply_template(&mut self, group: &GroupId, template: &TemplateDefinition) -> Result<()>;

    /// Flag `group` as the registry default, clearing the flag elsewhere.
    fn set_default_group(&mut self, group: &GroupId) -> Result<()>;

    /// Remove a group together with its entries.
    fn remove_group(&mut self, group: &GroupId) -> Result<()>;

    fn find_entry(&self, id: &AssetId) -> Option<EntryInfo>;

    fn list_entries(&self) -> Vec<EntryInfo>;

    /// Create the entry in `group`, or move it there keeping address and labels.
    fn create_or_move_entry(&mut self, id: &AssetId, group: &GroupId) -> Result<()>;

    fn set_address(&mut self, id: &AssetId, address: &str) -> Result<()>;

    fn add_entry_label(&mut self, id: &AssetId, label: &str) -> Result<()>;

    fn remove_entry_label(&mut self, id: &AssetId, label: &str) -> Result<()>;

    /// Remove the entry from `from`.
    fn remove_entry(&mut self, id: &AssetId, from: &GroupId) -> Result<()>;

    /// The label table.
    fn labels(&self) -> Vec<String>;

    fn add_label(&mut self, label: &str) -> Result<()>;

    fn remove_label(&mut self, label: &str) -> Result<()>;

    fn mark_dirty(&mut self, group: &GroupId) -> Result<()>;

    fn persist(&mut self) -> Result<()>;

    /// Drop entries that point at groups which no longer exist.
    ///
    /// Returns the number of entries dropped.
    fn remove_missing_group_references(&mut self) -> Result<usize> {
        Ok(0)
    }
}
