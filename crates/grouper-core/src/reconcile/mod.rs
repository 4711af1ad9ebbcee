//! Converging the registry to the desired state
//!
//! A [`Reconciler`] lives for one run. Its phases, called by the engine in
//! this order:
//!
//! 1. [`Reconciler::ensure_default_group`] (batch runs only)
//! 2. [`Reconciler::apply`] once per builder, sharing one [`DesiredState`]
//! 3. [`Reconciler::remove_unused_groups`] (batch runs only)
//! 4. [`Reconciler::finalize`]

mod check;
mod finalize;
mod report;
mod state;

pub use check::{CheckReport, CheckStatus, DriftItem, check_registry};
pub use finalize::compile_keep_patterns;
pub use report::ReconcileReport;
pub use state::DesiredState;

use grouper_meta::TemplateCatalog;
use std::collections::{BTreeSet, HashMap};

use crate::address::AddressResolver;
use crate::classify::{ClassifiedAsset, Classifier, CompiledBuilder, CompiledGroup};
use crate::corpus::Corpus;
use crate::progress::{NoProgress, Progress};
use crate::registry::{GroupId, Registry};
use crate::symbols::{NoSymbols, SymbolPredicate, is_rule_enabled};
use crate::{Error, Result};

/// Applies classification results to a registry.
pub struct Reconciler<'a, C: Corpus + ?Sized, R: Registry + ?Sized> {
    corpus: &'a C,
    registry: &'a mut R,
    templates: &'a TemplateCatalog,
    symbols: &'a dyn SymbolPredicate,
    progress: &'a dyn Progress,
    workers: Option<usize>,
    /// Template and builder of the first rule that claimed each group name
    claims: HashMap<String, (Option<String>, String)>,
    /// Cached label table
    labels: Option<BTreeSet<String>>,
    report: ReconcileReport,
}

impl<'a, C: Corpus + ?Sized, R: Registry + ?Sized> Reconciler<'a, C, R> {
    pub fn new(corpus: &'a C, registry: &'a mut R, templates: &'a TemplateCatalog) -> Self {
        Self {
            corpus,
            registry,
            templates,
            symbols: &NoSymbols,
            progress: &NoProgress,
            workers: None,
            claims: HashMap::new(),
            labels: None,
            report: ReconcileReport::new(),
        }
    }

    pub fn with_symbols(mut self, symbols: &'a dyn SymbolPredicate) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    pub fn report(&self) -> &ReconcileReport {
        &self.report
    }

    pub fn into_report(self) -> ReconcileReport {
        self.report
    }

    fn classifier(&self) -> Classifier<'a, C> {
        let classifier = Classifier::new(self.corpus);
        match self.workers {
            Some(workers) => classifier.with_workers(workers),
            None => classifier,
        }
    }

    /// Apply every active rule of `builder` to the registry.
    ///
    /// Items matched by several rules end up in the group of the last one;
    /// their labels accumulate.
    ///
    /// # Errors
    ///
    /// Stops at the first failing rule. Nothing is finalized, so entries of
    /// earlier rules stay as applied.
    pub fn apply(&mut self, builder: &CompiledBuilder<'_>, state: &mut DesiredState) -> Result<()> {
        for group in builder.groups() {
            if !is_rule_enabled(group.definition, self.symbols) {
                tracing::warn!(
                    builder = builder.name(),
                    group = group.name(),
                    symbol = group.definition.symbol(),
                    "rule skipped, symbol not defined"
                );
                continue;
            }

            if let Err(e) = self.apply_rule(builder, group, state) {
                tracing::error!(
                    builder = builder.name(),
                    group = group.name(),
                    error = %e,
                    "rule failed"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    fn apply_rule(
        &mut self,
        builder: &CompiledBuilder<'_>,
        group: &CompiledGroup<'_>,
        state: &mut DesiredState,
    ) -> Result<()> {
        let group_id = self.group_for(builder.name(), group, state)?;
        let matches = self.classifier().find_matches(builder, group)?;

        let title = format!("{} / {}", builder.name(), group.name());
        let total = matches.len().max(1) as f32;
        let mut resolver = AddressResolver::new(self.corpus);

        for (index, asset) in matches.iter().enumerate() {
            self.progress
                .display(&title, &asset.path, (index + 1) as f32 / total);
            let address = resolver.resolve(&asset.path, group.definition.address)?;
            self.apply_item(asset, group_id, &address, state)?;
        }

        tracing::info!(
            builder = builder.name(),
            group = group.name(),
            entries = matches.len(),
            "applied rule"
        );
        Ok(())
    }

    /// The registry group for a rule, creating it the first time the name
    /// is seen in this run.
    fn group_for(
        &mut self,
        builder: &str,
        group: &CompiledGroup<'_>,
        state: &mut DesiredState,
    ) -> Result<GroupId> {
        let name = group.name();
        let template_name = group.definition.template();

        if let Some(id) = state.group(name) {
            if let Some((claimed, first_builder)) = self.claims.get(name)
                && claimed.as_deref() != template_name
            {
                return Err(Error::AmbiguousTemplate {
                    group: name.to_string(),
                    builders: vec![first_builder.clone(), builder.to_string()],
                });
            }
            return Ok(id);
        }

        let template =
            self.templates
                .resolve(template_name)
                .ok_or_else(|| Error::MissingTemplate {
                    group: name.to_string(),
                    builder: builder.to_string(),
                })?;

        let id = match self.registry.find_group_by_name(name) {
            Some(id) => id,
            None => {
                let id = self.registry.create_group(name, &template.schemas)?;
                self.report.groups_created += 1;
                self.report.record(format!("Created group {}", name));
                id
            }
        };
        self.registry.apply_template(&id, template)?;

        state.register_group(name, id);
        self.claims.insert(
            name.to_string(),
            (template_name.map(str::to_string), builder.to_string()),
        );
        Ok(id)
    }

    fn apply_item(
        &mut self,
        asset: &ClassifiedAsset,
        group: GroupId,
        address: &str,
        state: &mut DesiredState,
    ) -> Result<()> {
        match self.registry.find_entry(&asset.id) {
            Some(entry) if entry.group == group => {}
            Some(previous) => {
                self.registry.create_or_move_entry(&asset.id, &group)?;
                state.touch(previous.group);
                self.report.entries_moved += 1;
                tracing::debug!(path = %asset.path, "moved entry");
            }
            None => {
                self.registry.create_or_move_entry(&asset.id, &group)?;
                self.report.entries_created += 1;
                tracing::debug!(path = %asset.path, "created entry");
            }
        }
        state.record_item(&asset.id, group);

        let entry = self
            .registry
            .find_entry(&asset.id)
            .ok_or_else(|| Error::EntryNotFound(asset.id.to_string()))?;

        if entry.address != address {
            self.registry.set_address(&asset.id, address)?;
            self.report.addresses_updated += 1;
        }

        let mut entry_labels = entry.labels;
        for label in asset.labels() {
            self.ensure_label(&label)?;
            if entry_labels.insert(label.clone()) {
                self.registry.add_entry_label(&asset.id, &label)?;
                self.report.entry_labels_added += 1;
            }
            state.record_label(&asset.id, &label);
        }
        Ok(())
    }

    /// Add `label` to the label table unless it is already there.
    fn ensure_label(&mut self, label: &str) -> Result<()> {
        let registry = &*self.registry;
        let known = self
            .labels
            .get_or_insert_with(|| registry.labels().into_iter().collect());
        if known.contains(label) {
            return Ok(());
        }

        self.registry.add_label(label)?;
        known.insert(label.to_string());
        self.report.labels_added += 1;
        self.report.record(format!("Added label {}", label));
        Ok(())
    }
}
