//! The reconciliation engine
//!
//! [`Engine`] owns a corpus and a registry and runs whole operations over a
//! [`Project`]. Every mutating run moves through the same phases:
//!
//! ```text
//! Verify -> Classify -> Apply -> Finalize
//! ```
//!
//! Classification is read-only and streams rule by rule into Apply, so a
//! run reports its phase as verify, apply or finalize. Verify and pattern
//! compilation happen before the first registry mutation, so configuration
//! errors never leave a half-applied registry. Any error aborts the run
//! without finalizing.

use grouper_meta::{BuilderDefinition, Project};
use std::fmt;
use std::sync::Arc;

use crate::classify::{Classifier, ClassifyReport, CompiledBuilder};
use crate::corpus::Corpus;
use crate::progress::{NoProgress, Progress, RunGuard};
use crate::reconcile::{
    CheckReport, DesiredState, ReconcileReport, Reconciler, check_registry, compile_keep_patterns,
};
use crate::registry::Registry;
use crate::symbols::{DefineSymbols, SymbolPredicate};
use crate::verify::GroupVerifier;
use crate::{Error, Result};

/// Phase of a run, reported when a run aborts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Verify,
    Apply,
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verify => "verify",
            Self::Apply => "apply",
            Self::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Runs classification and reconciliation against one corpus and registry.
///
/// # Example
///
/// ```ignore
/// let project = ProjectLoader::new().load(&root)?;
/// let registry = FileRegistry::load_or_create(root.join(".grouper/registry.toml"))?;
/// let mut engine = Engine::new(FsCorpus::new(root.clone()), registry);
/// let report = engine.reconcile(&project)?;
/// ```
pub struct Engine<C: Corpus, R: Registry> {
    corpus: C,
    registry: R,
    progress: Arc<dyn Progress>,
    symbols: Option<Arc<dyn SymbolPredicate>>,
    workers: Option<usize>,
}

impl<C: Corpus, R: Registry> Engine<C, R> {
    pub fn new(corpus: C, registry: R) -> Self {
        Self {
            corpus,
            registry,
            progress: Arc::new(NoProgress),
            symbols: None,
            workers: None,
        }
    }

    pub fn with_progress(mut self, progress: impl Progress + 'static) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    /// Override the project's batch symbols.
    pub fn with_symbols(mut self, symbols: impl SymbolPredicate + 'static) -> Self {
        self.symbols = Some(Arc::new(symbols));
        self
    }

    /// Fix the number of scan worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    pub fn corpus_mut(&mut self) -> &mut C {
        &mut self.corpus
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn into_parts(self) -> (C, R) {
        (self.corpus, self.registry)
    }

    fn batch_symbols(&self, project: &Project) -> Arc<dyn SymbolPredicate> {
        match &self.symbols {
            Some(symbols) => Arc::clone(symbols),
            None => Arc::new(project.batch.symbols.iter().cloned().collect::<DefineSymbols>()),
        }
    }

    fn classifier(&self) -> Classifier<'_, C> {
        let classifier = Classifier::new(&self.corpus);
        match self.workers {
            Some(workers) => classifier.with_workers(workers),
            None => classifier,
        }
    }

    /// Verify and compile `builders`; no registry access.
    fn prepare<'p>(
        project: &Project,
        builders: &[&'p BuilderDefinition],
    ) -> Result<Vec<CompiledBuilder<'p>>> {
        let mut verifier = GroupVerifier::new();
        for &builder in builders {
            verifier.join(builder);
        }
        verifier.verify(&project.templates).into_result()?;

        builders
            .iter()
            .map(|&builder| CompiledBuilder::compile(builder))
            .collect()
    }

    fn find_builder<'p>(project: &'p Project, name: &str) -> Result<&'p BuilderDefinition> {
        project
            .builder(name)
            .ok_or_else(|| Error::BuilderNotFound(name.to_string()))
    }

    /// Dry-run one builder.
    pub fn classify(&self, project: &Project, builder: &str) -> Result<ClassifyReport> {
        let _guard = RunGuard::new(Arc::clone(&self.progress), "classify");
        let builder = Self::find_builder(project, builder)?;
        let report = self.classify_builders(project, &[builder])?;
        report.log();
        Ok(report)
    }

    /// Dry-run every builder of the batch.
    pub fn classify_batch(&self, project: &Project) -> Result<ClassifyReport> {
        let _guard = RunGuard::new(Arc::clone(&self.progress), "classify_batch");
        let builders: Vec<_> = project.builders.iter().collect();
        let report = self.classify_builders(project, &builders)?;
        report.log();
        Ok(report)
    }

    fn classify_builders(
        &self,
        project: &Project,
        builders: &[&BuilderDefinition],
    ) -> Result<ClassifyReport> {
        let compiled = Self::prepare(project, builders)?;
        let symbols = self.batch_symbols(project);
        let classifier = self.classifier();

        compiled
            .iter()
            .try_fold(ClassifyReport::new(), |report, builder| -> Result<_> {
                Ok(report.merge(classifier.report(builder, symbols.as_ref())?))
            })
    }

    /// Apply a single builder and finalize.
    ///
    /// Finalize is registry-wide: entries that only other builders select
    /// are removed too.
    pub fn build(&mut self, project: &Project, builder: &str) -> Result<ReconcileReport> {
        let _guard = RunGuard::new(Arc::clone(&self.progress), "build");
        let builder = Self::find_builder(project, builder)?;
        self.run("build", project, &[builder], false)
    }

    /// Apply every builder of the batch, collect unused groups and finalize.
    ///
    /// # Errors
    ///
    /// Configuration errors (invalid definitions, ambiguous or missing
    /// templates, bad patterns) are returned before the registry is touched.
    /// Scan and mutation errors abort the run without finalizing.
    pub fn reconcile(&mut self, project: &Project) -> Result<ReconcileReport> {
        let _guard = RunGuard::new(Arc::clone(&self.progress), "reconcile");
        let builders: Vec<_> = project.builders.iter().collect();
        self.run("reconcile", project, &builders, true)
    }

    fn run(
        &mut self,
        operation: &str,
        project: &Project,
        builders: &[&BuilderDefinition],
        batch: bool,
    ) -> Result<ReconcileReport> {
        let mut phase = Phase::Verify;
        let result = self.run_phases(project, builders, batch, &mut phase);
        match &result {
            Ok(report) => report.log_summary(operation),
            Err(e) => tracing::error!(operation, %phase, error = %e, "run aborted"),
        }
        result
    }

    fn run_phases(
        &mut self,
        project: &Project,
        builders: &[&BuilderDefinition],
        batch: bool,
        phase: &mut Phase,
    ) -> Result<ReconcileReport> {
        if batch {
            if let Some(group) = project.batch.default_group()
                && project
                    .templates
                    .resolve(project.batch.default_template())
                    .is_none()
            {
                return Err(Error::DefaultTemplateMissing {
                    group: group.to_string(),
                });
            }
            project.validate()?;
        }
        let compiled = Self::prepare(project, builders)?;
        let keep = compile_keep_patterns(&project.batch)?;
        let symbols = self.batch_symbols(project);

        *phase = Phase::Apply;
        self.registry.remove_missing_group_references()?;

        let mut reconciler = Reconciler::new(&self.corpus, &mut self.registry, &project.templates)
            .with_symbols(symbols.as_ref())
            .with_progress(self.progress.as_ref())
            .with_workers(self.workers);
        let mut state = DesiredState::new();

        if batch {
            reconciler.ensure_default_group(&project.batch)?;
        }
        for builder in &compiled {
            reconciler.apply(builder, &mut state)?;
        }

        *phase = Phase::Finalize;
        if batch && project.batch.remove_unused_groups {
            reconciler.remove_unused_groups(&state, &keep)?;
        }
        reconciler.finalize(&mut state)?;

        Ok(reconciler.into_report())
    }

    /// Remove every entry and label; groups stay, empty.
    pub fn reset(&mut self) -> Result<ReconcileReport> {
        let _guard = RunGuard::new(Arc::clone(&self.progress), "reset");
        let templates = Default::default();
        let mut reconciler = Reconciler::new(&self.corpus, &mut self.registry, &templates)
            .with_progress(self.progress.as_ref());
        reconciler.finalize(&mut DesiredState::new())?;

        let report = reconciler.into_report();
        report.log_summary("reset");
        Ok(report)
    }

    /// Reset, then remove every group the batch would not keep.
    pub fn reset_batch(&mut self, project: &Project) -> Result<ReconcileReport> {
        let _guard = RunGuard::new(Arc::clone(&self.progress), "reset_batch");
        let keep = compile_keep_patterns(&project.batch)?;

        let mut reconciler = Reconciler::new(&self.corpus, &mut self.registry, &project.templates)
            .with_progress(self.progress.as_ref());
        let mut state = DesiredState::new();
        if project.batch.remove_unused_groups {
            reconciler.remove_unused_groups(&state, &keep)?;
        }
        reconciler.finalize(&mut state)?;

        let report = reconciler.into_report();
        report.log_summary("reset_batch");
        Ok(report)
    }

    /// Compare the registry with what [`Engine::reconcile`] would produce.
    pub fn check(&self, project: &Project) -> Result<CheckReport> {
        let _guard = RunGuard::new(Arc::clone(&self.progress), "check");
        let builders: Vec<_> = project.builders.iter().collect();
        let plan = self.classify_builders(project, &builders)?;
        let keep = compile_keep_patterns(&project.batch)?;

        let report = check_registry(&plan, &self.registry, &project.batch, &keep);
        for item in report.drifted.iter().chain(&report.missing).chain(&report.stale) {
            tracing::warn!(group = %item.group, subject = %item.subject, "{}", item.description);
        }
        tracing::info!(status = ?report.status, "check finished");
        Ok(report)
    }
}
