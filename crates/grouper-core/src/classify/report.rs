//! Dry-run classification report

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::asset::AssetId;

/// One asset as a rule would register it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    pub builder: String,
    pub group: String,
    pub id: AssetId,
    pub path: String,
    /// Address the entry would get
    pub address: String,
    /// Distinct labels in first-seen order
    pub labels: Vec<String>,
}

/// What a build would do, without doing it.
///
/// Entries are listed rule by rule in application order, each rule's assets
/// sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyReport {
    pub entries: Vec<ClassifiedEntry>,
    /// Group names targeted by active rules, matched or not
    pub groups: BTreeSet<String>,
    /// `builder/group` of rules skipped because their symbol is undefined
    pub skipped_rules: Vec<String>,
}

impl ClassifyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries produced by rules targeting `group`.
    pub fn in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ClassifiedEntry> {
        self.entries.iter().filter(move |e| e.group == group)
    }

    /// Append another report, keeping rule order.
    pub fn merge(mut self, other: ClassifyReport) -> Self {
        self.entries.extend(other.entries);
        self.groups.extend(other.groups);
        self.skipped_rules.extend(other.skipped_rules);
        self
    }

    /// Log every entry at info level followed by a summary.
    pub fn log(&self) {
        for entry in &self.entries {
            tracing::info!(
                builder = %entry.builder,
                group = %entry.group,
                address = %entry.address,
                labels = %entry.labels.join(","),
                "{}",
                entry.path
            );
        }
        for rule in &self.skipped_rules {
            tracing::warn!(rule = %rule, "rule skipped, symbol not defined");
        }
        tracing::info!(
            matches = self.entries.len(),
            skipped = self.skipped_rules.len(),
            "classification finished"
        );
    }
}
