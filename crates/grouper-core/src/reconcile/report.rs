//! Summary of the changes a run made

use serde::{Deserialize, Serialize};

/// Counts of registry mutations performed by a run.
///
/// Template re-application and persisting are not counted; a run over an
/// already converged registry reports no changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub groups_created: usize,
    pub groups_removed: usize,
    pub entries_created: usize,
    pub entries_moved: usize,
    pub entries_removed: usize,
    pub addresses_updated: usize,
    pub entry_labels_added: usize,
    pub entry_labels_removed: usize,
    pub labels_added: usize,
    pub labels_removed: usize,
    /// Human-readable log of structural changes
    pub actions: Vec<String>,
}

impl ReconcileReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of mutations.
    pub fn changes(&self) -> usize {
        self.groups_created
            + self.groups_removed
            + self.entries_created
            + self.entries_moved
            + self.entries_removed
            + self.addresses_updated
            + self.entry_labels_added
            + self.entry_labels_removed
            + self.labels_added
            + self.labels_removed
    }

    pub fn is_noop(&self) -> bool {
        self.changes() == 0
    }

    pub(crate) fn record(&mut self, action: String) {
        tracing::debug!("{}", action);
        self.actions.push(action);
    }

    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation,
            groups_created = self.groups_created,
            groups_removed = self.groups_removed,
            entries_created = self.entries_created,
            entries_moved = self.entries_moved,
            entries_removed = self.entries_removed,
            addresses_updated = self.addresses_updated,
            labels_added = self.labels_added,
            labels_removed = self.labels_removed,
            "reconcile summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_noop() {
        assert!(ReconcileReport::new().is_noop());
    }

    #[test]
    fn test_changes_sum_counters() {
        let report = ReconcileReport {
            entries_created: 2,
            labels_removed: 1,
            ..ReconcileReport::default()
        };
        assert_eq!(report.changes(), 3);
        assert!(!report.is_noop());
    }
}
