//! Read-only drift detection
//!
//! Compares what a batch would produce with what the registry holds, without
//! mutating anything.

use grouper_meta::BatchDefinition;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::finalize::is_kept;
use crate::asset::AssetId;
use crate::classify::ClassifyReport;
use crate::pattern::PathPattern;
use crate::registry::Registry;

/// Status of the registry compared to the desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Registry matches the desired state
    Healthy,
    /// Some items or groups are not registered yet
    Missing,
    /// Some entries, labels or groups would be removed by the next run
    Stale,
    /// Some entries have the wrong group, address or labels
    Drifted,
}

impl CheckStatus {
    fn severity(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Missing => 1,
            Self::Stale => 2,
            Self::Drifted => 3,
        }
    }

    /// The worse of two statuses.
    pub fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

/// A single difference between desired and actual state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// Asset the difference concerns, if any
    pub id: Option<AssetId>,
    /// Group the item belongs or should belong to
    pub group: String,
    /// Asset path, label or group name
    pub subject: String,
    /// Human-readable description of the difference
    pub description: String,
}

impl DriftItem {
    fn new(
        id: Option<AssetId>,
        group: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            group: group.into(),
            subject: subject.into(),
            description: description.into(),
        }
    }
}

/// Report from a drift check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub drifted: Vec<DriftItem>,
    pub missing: Vec<DriftItem>,
    pub stale: Vec<DriftItem>,
    pub messages: Vec<String>,
}

impl CheckReport {
    pub fn healthy() -> Self {
        Self {
            status: CheckStatus::Healthy,
            drifted: Vec::new(),
            missing: Vec::new(),
            stale: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn with_missing(missing: Vec<DriftItem>) -> Self {
        Self {
            status: CheckStatus::Missing,
            missing,
            ..Self::healthy()
        }
    }

    pub fn with_drifted(drifted: Vec<DriftItem>) -> Self {
        Self {
            status: CheckStatus::Drifted,
            drifted,
            ..Self::healthy()
        }
    }

    pub fn with_stale(stale: Vec<DriftItem>) -> Self {
        Self {
            status: CheckStatus::Stale,
            stale,
            ..Self::healthy()
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }

    /// Merge two check reports, combining their issues
    ///
    /// The resulting status is the worst of the two:
    /// Drifted > Stale > Missing > Healthy
    pub fn merge(mut self, other: CheckReport) -> Self {
        self.drifted.extend(other.drifted);
        self.missing.extend(other.missing);
        self.stale.extend(other.stale);
        self.messages.extend(other.messages);
        self.status = self.status.worst(other.status);
        self
    }
}

/// The desired entry for one asset after folding all rules
struct Planned<'a> {
    path: &'a str,
    group: &'a str,
    address: &'a str,
    labels: BTreeSet<&'a str>,
}

/// Compare a classification plan with the registry.
///
/// `plan` must list rules in application order so the last rule matching an
/// asset decides its group and address.
pub fn check_registry<R: Registry + ?Sized>(
    plan: &ClassifyReport,
    registry: &R,
    batch: &BatchDefinition,
    keep: &[PathPattern],
) -> CheckReport {
    let mut planned: BTreeMap<&AssetId, Planned<'_>> = BTreeMap::new();
    for entry in &plan.entries {
        let slot = planned.entry(&entry.id).or_insert_with(|| Planned {
            path: &entry.path,
            group: &entry.group,
            address: &entry.address,
            labels: BTreeSet::new(),
        });
        slot.group = entry.group.as_str();
        slot.address = entry.address.as_str();
        slot.labels.extend(entry.labels.iter().map(String::as_str));
    }

    let group_names: BTreeMap<_, _> = registry
        .list_groups()
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();

    let mut report = CheckReport::healthy();

    let default_group = batch.default_group();
    let expected_groups = plan.groups.iter().map(String::as_str).chain(default_group);
    for name in expected_groups {
        if registry.find_group_by_name(name).is_none() {
            report = report.merge(CheckReport::with_missing(vec![DriftItem::new(
                None,
                name,
                name,
                "group does not exist",
            )]));
        }
    }

    for (id, want) in &planned {
        let Some(entry) = registry.find_entry(id) else {
            report = report.merge(CheckReport::with_missing(vec![DriftItem::new(
                Some((*id).clone()),
                want.group,
                want.path,
                "asset is not registered",
            )]));
            continue;
        };

        let mut drift = Vec::new();
        let actual_group = group_names.get(&entry.group).map(String::as_str).unwrap_or("");
        if actual_group != want.group {
            drift.push(format!("in group '{}', expected '{}'", actual_group, want.group));
        }
        if entry.address != want.address {
            drift.push(format!(
                "address '{}', expected '{}'",
                entry.address, want.address
            ));
        }
        let actual_labels: BTreeSet<&str> = entry.labels.iter().map(String::as_str).collect();
        if actual_labels != want.labels {
            drift.push(format!(
                "labels [{}], expected [{}]",
                actual_labels.into_iter().collect::<Vec<_>>().join(","),
                want.labels.iter().copied().collect::<Vec<_>>().join(",")
            ));
        }

        if !drift.is_empty() {
            report = report.merge(CheckReport::with_drifted(vec![DriftItem::new(
                Some((*id).clone()),
                want.group,
                want.path,
                drift.join("; "),
            )]));
        }
    }

    for entry in registry.list_entries() {
        if !planned.contains_key(&entry.id) {
            let group = group_names.get(&entry.group).cloned().unwrap_or_default();
            report = report.merge(CheckReport::with_stale(vec![DriftItem::new(
                Some(entry.id.clone()),
                group,
                entry.id.to_string(),
                "entry is not selected by any rule",
            )]));
        }
    }

    let wanted_labels: BTreeSet<&str> = planned
        .values()
        .flat_map(|p| p.labels.iter().copied())
        .collect();
    for label in registry.labels() {
        if !wanted_labels.contains(label.as_str()) {
            report = report.merge(CheckReport::with_stale(vec![DriftItem::new(
                None,
                "",
                label,
                "label is not used by any rule",
            )]));
        }
    }

    if batch.remove_unused_groups {
        for group in registry.list_groups() {
            if group.is_default || plan.groups.contains(&group.name) || is_kept(&group.name, keep) {
                continue;
            }
            report = report.merge(CheckReport::with_stale(vec![DriftItem::new(
                None,
                group.name.clone(),
                group.name,
                "group is not targeted by any rule",
            )]));
        }
    }

    report.messages.push(format!(
        "{} planned entries, {} drifted, {} missing, {} stale",
        planned.len(),
        report.drifted.len(),
        report.missing.len(),
        report.stale.len()
    ));
    report
}
