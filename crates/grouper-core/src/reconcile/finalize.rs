//! Batch-level group policy and the finalize phase

use grouper_meta::BatchDefinition;

use super::{DesiredState, Reconciler};
use crate::corpus::Corpus;
use crate::pattern::PathPattern;
use crate::registry::{GroupId, Registry};
use crate::{Error, Result};

/// Compile the batch's keep-groups patterns.
pub fn compile_keep_patterns(batch: &BatchDefinition) -> Result<Vec<PathPattern>> {
    batch
        .keep_groups
        .iter()
        .map(|p| PathPattern::compile(p, "keep_groups"))
        .collect()
}

/// True when `name` matches one of the keep-groups patterns.
pub(crate) fn is_kept(name: &str, keep: &[PathPattern]) -> bool {
    keep.iter().any(|pattern| pattern.is_match(name))
}

impl<C: Corpus + ?Sized, R: Registry + ?Sized> Reconciler<'_, C, R> {
    /// Make sure the batch's default group exists, carries the default
    /// template and is flagged as the registry default.
    ///
    /// Returns `None` when the batch disables the default group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DefaultTemplateMissing`] before touching the
    /// registry when no usable default template is configured.
    pub fn ensure_default_group(&mut self, batch: &BatchDefinition) -> Result<Option<GroupId>> {
        let Some(name) = batch.default_group() else {
            return Ok(None);
        };
        let template = self
            .templates
            .resolve(batch.default_template())
            .ok_or_else(|| Error::DefaultTemplateMissing {
                group: name.to_string(),
            })?;

        let id = match self.registry.find_group_by_name(name) {
            Some(id) => id,
            None => {
                let id = self.registry.create_group(name, &template.schemas)?;
                self.report.groups_created += 1;
                self.report.record(format!("Created default group {}", name));
                id
            }
        };
        self.registry.apply_template(&id, template)?;
        self.registry.set_default_group(&id)?;
        Ok(Some(id))
    }

    /// Remove every group that is not the default, was not used in this run
    /// and matches no keep pattern. Returns the number of groups removed.
    pub fn remove_unused_groups(
        &mut self,
        state: &DesiredState,
        keep: &[PathPattern],
    ) -> Result<usize> {
        let unused: Vec<_> = self
            .registry
            .list_groups()
            .into_iter()
            .filter(|group| !group.is_default)
            .filter(|group| !state.contains_group(&group.name))
            .filter(|group| !is_kept(&group.name, keep))
            .collect();

        let entries = self.registry.list_entries();
        for group in &unused {
            // Removing a group drops its entries with it
            let dropped = entries.iter().filter(|e| e.group == group.id).count();
            self.registry.remove_group(&group.id)?;
            self.report.groups_removed += 1;
            self.report.entries_removed += dropped;
            self.report.record(format!("Removed unused group {}", group.name));
        }
        Ok(unused.len())
    }

    /// Remove everything the run did not ask for, mark touched groups dirty
    /// and persist.
    ///
    /// With an empty state this removes every entry and every label; groups
    /// are left in place, empty.
    pub fn finalize(&mut self, state: &mut DesiredState) -> Result<()> {
        self.progress.display("Finalize", "removing stale entries", 1.0);

        let (stale, kept): (Vec<_>, Vec<_>) = self
            .registry
            .list_entries()
            .into_iter()
            .partition(|entry| !state.is_seen(&entry.id));

        for entry in &stale {
            self.registry.remove_entry(&entry.id, &entry.group)?;
            state.touch(entry.group);
            self.report.entries_removed += 1;
            tracing::debug!(id = %entry.id, "removed stale entry");
        }

        for entry in &kept {
            let extra: Vec<String> = entry
                .labels
                .difference(state.labels_of(&entry.id))
                .cloned()
                .collect();
            if extra.is_empty() {
                continue;
            }
            for label in &extra {
                self.registry.remove_entry_label(&entry.id, label)?;
                self.report.entry_labels_removed += 1;
            }
            state.touch(entry.group);
        }

        for label in self.registry.labels() {
            if !state.is_label_seen(&label) {
                self.registry.remove_label(&label)?;
                self.report.labels_removed += 1;
                self.report.record(format!("Removed label {}", label));
            }
        }
        self.labels = None;

        let touched: Vec<GroupId> = state.touched().copied().collect();
        for group in &touched {
            if self.registry.group(group).is_some() {
                self.registry.mark_dirty(group)?;
            }
        }

        self.registry.persist()?;
        tracing::info!(
            removed = stale.len(),
            dirty_groups = touched.len(),
            "finalized registry"
        );
        Ok(())
    }
}
