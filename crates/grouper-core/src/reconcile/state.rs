//! Desired state accumulated during one run

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::asset::AssetId;
use crate::registry::GroupId;

static NO_LABELS: BTreeSet<String> = BTreeSet::new();

/// What the registry should look like once the run finalizes.
///
/// Built by the apply phase of every builder in the run, consumed by
/// finalize and then dropped.
#[derive(Debug, Clone, Default)]
pub struct DesiredState {
    groups: BTreeMap<String, GroupId>,
    group_of: HashMap<AssetId, GroupId>,
    labels_of: HashMap<AssetId, BTreeSet<String>>,
    labels_seen: BTreeSet<String>,
    items_seen: HashSet<AssetId>,
    touched: BTreeSet<GroupId>,
}

impl DesiredState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of a group already used in this run.
    pub fn group(&self, name: &str) -> Option<GroupId> {
        self.groups.get(name).copied()
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn register_group(&mut self, name: &str, id: GroupId) {
        self.groups.insert(name.to_string(), id);
        self.touched.insert(id);
    }

    /// Record that `id` belongs in `group`; a later call wins.
    pub fn record_item(&mut self, id: &AssetId, group: GroupId) {
        self.items_seen.insert(id.clone());
        self.group_of.insert(id.clone(), group);
    }

    pub fn record_label(&mut self, id: &AssetId, label: &str) {
        self.labels_seen.insert(label.to_string());
        self.labels_of
            .entry(id.clone())
            .or_default()
            .insert(label.to_string());
    }

    pub fn touch(&mut self, group: GroupId) {
        self.touched.insert(group);
    }

    pub fn is_seen(&self, id: &AssetId) -> bool {
        self.items_seen.contains(id)
    }

    pub fn group_of(&self, id: &AssetId) -> Option<GroupId> {
        self.group_of.get(id).copied()
    }

    /// Labels `id` should carry; empty when none were recorded.
    pub fn labels_of(&self, id: &AssetId) -> &BTreeSet<String> {
        self.labels_of.get(id).unwrap_or(&NO_LABELS)
    }

    pub fn is_label_seen(&self, label: &str) -> bool {
        self.labels_seen.contains(label)
    }

    pub fn touched(&self) -> impl Iterator<Item = &GroupId> {
        self.touched.iter()
    }

    pub fn item_count(&self) -> usize {
        self.items_seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_group_wins() {
        let mut state = DesiredState::new();
        let a = GroupId::new();
        let b = GroupId::new();
        let id = AssetId::new("x");

        state.record_item(&id, a);
        state.record_item(&id, b);
        assert_eq!(state.group_of(&id), Some(b));
        assert_eq!(state.item_count(), 1);
    }

    #[test]
    fn test_labels_accumulate() {
        let mut state = DesiredState::new();
        let id = AssetId::new("x");
        state.record_label(&id, "a");
        state.record_label(&id, "b");
        state.record_label(&id, "a");
        assert_eq!(state.labels_of(&id).len(), 2);
        assert!(state.labels_of(&AssetId::new("y")).is_empty());
        assert!(state.is_label_seen("b"));
    }
}
