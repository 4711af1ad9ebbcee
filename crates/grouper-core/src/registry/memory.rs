//! In-memory registry

use grouper_meta::TemplateDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use super::{EntryInfo, GroupId, GroupInfo, Registry};
use crate::asset::AssetId;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GroupRecord {
    id: GroupId,
    name: String,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    schemas: Vec<String>,
    #[serde(default)]
    settings: BTreeMap<String, Value>,
}

impl GroupRecord {
    fn info(&self) -> GroupInfo {
        GroupInfo {
            id: self.id,
            name: self.name.clone(),
            is_default: self.default,
            schemas: self.schemas.clone(),
            settings: self.settings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct EntryRecord {
    group: GroupId,
    #[serde(default)]
    address: String,
    #[serde(default)]
    labels: BTreeSet<String>,
}

/// The persistent part of a registry.
///
/// Field order keeps plain values ahead of tables so the TOML form stays
/// valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryState {
    #[serde(default)]
    labels: BTreeSet<String>,
    #[serde(default)]
    groups: Vec<GroupRecord>,
    #[serde(default)]
    entries: BTreeMap<AssetId, EntryRecord>,
}

/// A registry held in memory.
///
/// Tracks which groups were marked dirty since the last persist and how
/// often it was persisted, so tests can observe both.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    state: RegistryState,
    dirty: BTreeSet<GroupId>,
    persist_count: usize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: RegistryState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Groups marked dirty since the last persist.
    pub fn dirty_groups(&self) -> &BTreeSet<GroupId> {
        &self.dirty
    }

    pub fn persist_count(&self) -> usize {
        self.persist_count
    }

    pub fn entry_count(&self) -> usize {
        self.state.entries.len()
    }

    /// Entries currently in `group`.
    pub fn entries_in(&self, group: &GroupId) -> Vec<EntryInfo> {
        self.list_entries()
            .into_iter()
            .filter(|entry| &entry.group == group)
            .collect()
    }

    fn group_mut(&mut self, id: &GroupId) -> Result<&mut GroupRecord> {
        self.state
            .groups
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| Error::GroupNotFound(id.to_string()))
    }

    fn entry_mut(&mut self, id: &AssetId) -> Result<&mut EntryRecord> {
        self.state
            .entries
            .get_mut(id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))
    }

    fn has_group(&self, id: &GroupId) -> bool {
        self.state.groups.iter().any(|g| &g.id == id)
    }

    fn entry_info(id: &AssetId, record: &EntryRecord) -> EntryInfo {
        EntryInfo {
            id: id.clone(),
            group: record.group,
            address: record.address.clone(),
            labels: record.labels.clone(),
        }
    }
}

impl Registry for MemoryRegistry {
    fn find_group_by_name(&self, name: &str) -> Option<GroupId> {
        self.state
            .groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.id)
    }

    fn group(&self, id: &GroupId) -> Option<GroupInfo> {
        self.state
            .groups
            .iter()
            .find(|g| &g.id == id)
            .map(GroupRecord::info)
    }

    fn list_groups(&self) -> Vec<GroupInfo> {
        self.state.groups.iter().map(GroupRecord::info).collect()
    }

    fn create_group(&mut self, name: &str, schemas: &[String]) -> Result<GroupId> {
        if name.is_empty() {
            return Err(Error::mutation("create_group", "group name is empty"));
        }
        let id = GroupId::new();
        self.state.groups.push(GroupRecord {
            id,
            name: name.to_string(),
            default: false,
            schemas: schemas.to_vec(),
            settings: BTreeMap::new(),
        });
        tracing::debug!(group = name, %id, "created group");
        Ok(id)
    }

    fn apply_template(&mut self, group: &GroupId, template: &TemplateDefinition) -> Result<()> {
        let record = self.group_mut(group)?;
        record.settings = template.settings.clone();
        Ok(())
    }

    fn set_default_group(&mut self, group: &GroupId) -> Result<()> {
        if !self.has_group(group) {
            return Err(Error::GroupNotFound(group.to_string()));
        }
        for record in &mut self.state.groups {
            record.default = &record.id == group;
        }
        Ok(())
    }

    fn remove_group(&mut self, group: &GroupId) -> Result<()> {
        if !self.has_group(group) {
            return Err(Error::GroupNotFound(group.to_string()));
        }
        self.state.groups.retain(|g| &g.id != group);
        self.state.entries.retain(|_, entry| &entry.group != group);
        self.dirty.remove(group);
        tracing::debug!(%group, "removed group");
        Ok(())
    }

    fn find_entry(&self, id: &AssetId) -> Option<EntryInfo> {
        self.state
            .entries
            .get(id)
            .map(|record| Self::entry_info(id, record))
    }

    fn list_entries(&self) -> Vec<EntryInfo> {
        self.state
            .entries
            .iter()
            .map(|(id, record)| Self::entry_info(id, record))
            .collect()
    }

    fn create_or_move_entry(&mut self, id: &AssetId, group: &GroupId) -> Result<()> {
        if !self.has_group(group) {
            return Err(Error::GroupNotFound(group.to_string()));
        }
        self.state
            .entries
            .entry(id.clone())
            .and_modify(|entry| entry.group = *group)
            .or_insert_with(|| EntryRecord {
                group: *group,
                address: String::new(),
                labels: BTreeSet::new(),
            });
        Ok(())
    }

    fn set_address(&mut self, id: &AssetId, address: &str) -> Result<()> {
        self.entry_mut(id)?.address = address.to_string();
        Ok(())
    }

    fn add_entry_label(&mut self, id: &AssetId, label: &str) -> Result<()> {
        self.entry_mut(id)?.labels.insert(label.to_string());
        Ok(())
    }

    fn remove_entry_label(&mut self, id: &AssetId, label: &str) -> Result<()> {
        self.entry_mut(id)?.labels.remove(label);
        Ok(())
    }

    fn remove_entry(&mut self, id: &AssetId, from: &GroupId) -> Result<()> {
        match self.state.entries.get(id) {
            Some(entry) if &entry.group == from => {
                self.state.entries.remove(id);
                Ok(())
            }
            Some(_) => Err(Error::mutation(
                "remove_entry",
                format!("entry {} is not in group {}", id, from),
            )),
            None => Err(Error::EntryNotFound(id.to_string())),
        }
    }

    fn labels(&self) -> Vec<String> {
        self.state.labels.iter().cloned().collect()
    }

    fn add_label(&mut self, label: &str) -> Result<()> {
        if label.is_empty() {
            return Err(Error::mutation("add_label", "label is empty"));
        }
        self.state.labels.insert(label.to_string());
        Ok(())
    }

    fn remove_label(&mut self, label: &str) -> Result<()> {
        self.state.labels.remove(label);
        Ok(())
    }

    fn mark_dirty(&mut self, group: &GroupId) -> Result<()> {
        if !self.has_group(group) {
            return Err(Error::GroupNotFound(group.to_string()));
        }
        self.dirty.insert(*group);
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.dirty.clear();
        self.persist_count += 1;
        Ok(())
    }

    fn remove_missing_group_references(&mut self) -> Result<usize> {
        let known: BTreeSet<GroupId> = self.state.groups.iter().map(|g| g.id).collect();
        let before = self.state.entries.len();
        self.state
            .entries
            .retain(|_, entry| known.contains(&entry.group));
        let removed = before - self.state.entries.len();
        if removed > 0 {
            tracing::warn!(removed, "dropped entries referencing missing groups");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry_with_group(name: &str) -> (MemoryRegistry, GroupId) {
        let mut registry = MemoryRegistry::new();
        let id = registry.create_group(name, &["Bundled".to_string()]).unwrap();
        (registry, id)
    }

    #[test]
    fn test_move_keeps_address_and_labels() {
        let (mut registry, a) = registry_with_group("A");
        let b = registry.create_group("B", &[]).unwrap();
        let asset = AssetId::new("x");

        registry.create_or_move_entry(&asset, &a).unwrap();
        registry.set_address(&asset, "hero").unwrap();
        registry.add_entry_label(&asset, "chars").unwrap();
        registry.create_or_move_entry(&asset, &b).unwrap();

        let entry = registry.find_entry(&asset).unwrap();
        assert_eq!(entry.group, b);
        assert_eq!(entry.address, "hero");
        assert!(entry.labels.contains("chars"));
    }

    #[test]
    fn test_remove_group_drops_entries() {
        let (mut registry, a) = registry_with_group("A");
        registry.create_or_move_entry(&AssetId::new("x"), &a).unwrap();
        registry.remove_group(&a).unwrap();
        assert_eq!(registry.entry_count(), 0);
        assert!(registry.find_group_by_name("A").is_none());
    }

    #[test]
    fn test_set_default_group_is_exclusive() {
        let (mut registry, a) = registry_with_group("A");
        let b = registry.create_group("B", &[]).unwrap();
        registry.set_default_group(&a).unwrap();
        registry.set_default_group(&b).unwrap();
        let defaults: Vec<_> = registry
            .list_groups()
            .into_iter()
            .filter(|g| g.is_default)
            .map(|g| g.name)
            .collect();
        assert_eq!(defaults, vec!["B"]);
    }

    #[test]
    fn test_remove_entry_from_wrong_group_fails() {
        let (mut registry, a) = registry_with_group("A");
        let b = registry.create_group("B", &[]).unwrap();
        let asset = AssetId::new("x");
        registry.create_or_move_entry(&asset, &a).unwrap();
        assert!(registry.remove_entry(&asset, &b).is_err());
        registry.remove_entry(&asset, &a).unwrap();
        assert!(registry.find_entry(&asset).is_none());
    }

    #[test]
    fn test_missing_group_references_are_pruned() {
        let (registry, a) = registry_with_group("A");
        let mut state = registry.state().clone();
        state.entries.insert(
            AssetId::new("orphan"),
            EntryRecord {
                group: GroupId::new(),
                address: String::new(),
                labels: BTreeSet::new(),
            },
        );
        state.entries.insert(
            AssetId::new("kept"),
            EntryRecord {
                group: a,
                address: String::new(),
                labels: BTreeSet::new(),
            },
        );

        let mut registry = MemoryRegistry::from_state(state);
        assert_eq!(registry.remove_missing_group_references().unwrap(), 1);
        assert!(registry.find_entry(&AssetId::new("kept")).is_some());
    }

    #[test]
    fn test_persist_clears_dirty() {
        let (mut registry, a) = registry_with_group("A");
        registry.mark_dirty(&a).unwrap();
        assert!(registry.dirty_groups().contains(&a));
        registry.persist().unwrap();
        assert!(registry.dirty_groups().is_empty());
        assert_eq!(registry.persist_count(), 1);
    }

    #[test]
    fn test_state_survives_toml() {
        let (mut registry, a) = registry_with_group("A");
        let template = TemplateDefinition::new("packed").with_setting("compression", "lz4");
        registry.apply_template(&a, &template).unwrap();
        registry.add_label("chars").unwrap();
        let asset = AssetId::new("x");
        registry.create_or_move_entry(&asset, &a).unwrap();
        registry.add_entry_label(&asset, "chars").unwrap();

        let text = toml::to_string_pretty(registry.state()).unwrap();
        let parsed: RegistryState = toml::from_str(&text).unwrap();
        assert_eq!(&parsed, registry.state());
    }
}
