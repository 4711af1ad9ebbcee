//! Rule evaluation against the corpus
//!
//! For one rule of one builder the classifier:
//!
//! 1. resolves the rule's search folders to corpus roots
//! 2. queries the corpus with the rule's filter
//! 3. drops editor-only paths and folders
//! 4. keeps paths matching the rule pattern
//! 5. applies the builder's ignore and include filters
//! 6. substitutes the rule label and its additional labels
//!
//! Steps 3-6 run across worker threads over the materialized candidate
//! list; output keeps corpus order.

mod report;

pub use report::{ClassifiedEntry, ClassifyReport};

use grouper_fs::NormalizedPath;
use grouper_meta::{BuilderDefinition, GroupDefinition};
use std::num::NonZeroUsize;
use std::thread;

use crate::address::AddressResolver;
use crate::asset::{AssetId, AssetRef};
use crate::corpus::Corpus;
use crate::pattern::PathPattern;
use crate::symbols::{SymbolPredicate, is_rule_enabled};
use crate::{Error, Result};

/// Assets under a folder with this name are editor-only and never grouped
pub const EDITOR_FOLDER: &str = "Editor";

/// Below this many candidates filtering stays on the calling thread
const PARALLEL_THRESHOLD: usize = 512;

/// Split a label string into its labels.
///
/// Labels are separated by `,`; empty segments are dropped and segments are
/// not trimmed.
pub fn split_labels(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').filter(|segment| !segment.is_empty())
}

/// Whether any folder on `path` is an editor-only folder.
///
/// The file name itself does not count, so `Assets/Editor` as a file is
/// still a candidate.
pub fn is_editor_only(path: &str) -> bool {
    path.split('/').rev().skip(1).any(|segment| segment == EDITOR_FOLDER)
}

/// One classified asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedAsset {
    pub id: AssetId,
    pub path: String,
    /// Substituted rule label; may hold several labels
    pub label: String,
    /// Substituted labels of every matching additional label
    pub additional_labels: Vec<String>,
}

impl ClassifiedAsset {
    /// Every label of the asset, split and deduplicated in first-seen order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        let all = std::iter::once(self.label.as_str())
            .chain(self.additional_labels.iter().map(String::as_str));
        for raw in all {
            for label in split_labels(raw) {
                if !labels.iter().any(|l| l == label) {
                    labels.push(label.to_string());
                }
            }
        }
        labels
    }
}

/// A group definition with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledGroup<'a> {
    pub definition: &'a GroupDefinition,
    pattern: PathPattern,
    additional: Vec<(PathPattern, &'a str)>,
}

impl<'a> CompiledGroup<'a> {
    fn compile(definition: &'a GroupDefinition, builder: &str) -> Result<Self> {
        let context = format!("group '{}' of builder '{}'", definition.name, builder);
        let pattern = PathPattern::compile(definition.pattern(), &context)?;
        let additional = definition
            .additional_labels
            .iter()
            .map(|extra| {
                PathPattern::compile(&extra.pattern, &format!("additional label of {}", context))
                    .map(|pattern| (pattern, extra.label.as_str()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            definition,
            pattern,
            additional,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The rule label for `path`.
    pub fn label_for(&self, path: &str) -> String {
        self.pattern.substitute(path, &self.definition.label)
    }

    /// Substituted labels of every additional label matching `path`.
    pub fn additional_labels_for(&self, path: &str) -> Vec<String> {
        self.additional
            .iter()
            .filter(|(pattern, label)| !label.is_empty() && pattern.is_match(path))
            .map(|(pattern, label)| pattern.substitute(path, label))
            .collect()
    }
}

/// A builder definition with every pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledBuilder<'a> {
    pub definition: &'a BuilderDefinition,
    ignore: Vec<PathPattern>,
    include: Vec<PathPattern>,
    groups: Vec<CompiledGroup<'a>>,
}

impl<'a> CompiledBuilder<'a> {
    /// Compile all patterns of `definition`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for the first regex that does not
    /// compile.
    pub fn compile(definition: &'a BuilderDefinition) -> Result<Self> {
        let filter = |patterns: &[String], kind: &str| {
            let context = format!("{} of builder '{}'", kind, definition.name);
            patterns
                .iter()
                .map(|p| {
                    if definition.case_insensitive {
                        PathPattern::compile_case_insensitive(p, &context)
                    } else {
                        PathPattern::compile(p, &context)
                    }
                })
                .collect::<Result<Vec<_>>>()
        };

        Ok(Self {
            definition,
            ignore: filter(&definition.ignore_patterns, "ignore pattern")?,
            include: filter(&definition.include_patterns, "include pattern")?,
            groups: definition
                .groups
                .iter()
                .map(|g| CompiledGroup::compile(g, &definition.name))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn groups(&self) -> &[CompiledGroup<'a>] {
        &self.groups
    }

    /// Ignore first, then include when an include list exists.
    pub fn passes_filters(&self, path: &str) -> bool {
        if self.ignore.iter().any(|p| p.is_match(path)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.is_match(path))
    }
}

/// Evaluates rules against a corpus.
pub struct Classifier<'a, C: Corpus + ?Sized> {
    corpus: &'a C,
    workers: usize,
}

impl<'a, C: Corpus + ?Sized> Classifier<'a, C> {
    pub fn new(corpus: &'a C) -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self { corpus, workers }
    }

    /// Use exactly `workers` threads for filtering; `0` is treated as `1`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Every asset `group` selects, in corpus order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SearchScopeNotFound`] when a search folder is not a
    /// directory and [`Error::Scan`] when the corpus query fails.
    pub fn find_matches(
        &self,
        builder: &CompiledBuilder<'_>,
        group: &CompiledGroup<'_>,
    ) -> Result<Vec<ClassifiedAsset>> {
        let roots = group
            .definition
            .search_in_folders
            .iter()
            .map(|folder| {
                let root = NormalizedPath::new(folder);
                if self.corpus.is_directory(root.as_str()) {
                    Ok(root)
                } else {
                    Err(Error::SearchScopeNotFound {
                        folder: folder.clone(),
                        group: group.name().to_string(),
                        builder: builder.name().to_string(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let candidates = self
            .corpus
            .search(&group.definition.filter, &roots)
            .map_err(|e| Error::Scan {
                rule: group.name().to_string(),
                builder: builder.name().to_string(),
                message: e.to_string(),
            })?;

        let matches = filter_parallel(&candidates, self.workers, |asset| {
            self.classify_one(builder, group, asset)
        });

        tracing::debug!(
            builder = builder.name(),
            group = group.name(),
            candidates = candidates.len(),
            matches = matches.len(),
            "classified rule"
        );
        Ok(matches)
    }

    /// Classify every active rule of `builder` without touching a registry.
    ///
    /// Addresses are resolved in scan order with a fresh numbering table per
    /// rule, exactly as a build would; each rule's entries are then sorted
    /// by path.
    pub fn report(
        &self,
        builder: &CompiledBuilder<'_>,
        symbols: &dyn SymbolPredicate,
    ) -> Result<ClassifyReport> {
        let mut report = ClassifyReport::new();

        for group in builder.groups() {
            if !is_rule_enabled(group.definition, symbols) {
                report
                    .skipped_rules
                    .push(format!("{}/{}", builder.name(), group.name()));
                continue;
            }
            report.groups.insert(group.name().to_string());

            let mut resolver = AddressResolver::new(self.corpus);
            let mut entries = Vec::new();
            for asset in self.find_matches(builder, group)? {
                let address = resolver.resolve(&asset.path, group.definition.address)?;
                entries.push(ClassifiedEntry {
                    builder: builder.name().to_string(),
                    group: group.name().to_string(),
                    labels: asset.labels(),
                    id: asset.id,
                    path: asset.path,
                    address,
                });
            }
            entries.sort_by(|a, b| a.path.cmp(&b.path));
            report.entries.extend(entries);
        }

        Ok(report)
    }

    fn classify_one(
        &self,
        builder: &CompiledBuilder<'_>,
        group: &CompiledGroup<'_>,
        asset: &AssetRef,
    ) -> Option<ClassifiedAsset> {
        let path = asset.path.as_str();
        if is_editor_only(path) || self.corpus.is_directory(path) {
            return None;
        }
        if !group.pattern.is_match(path) || !builder.passes_filters(path) {
            return None;
        }

        Some(ClassifiedAsset {
            id: asset.id.clone(),
            path: asset.path.clone(),
            label: group.label_for(path),
            additional_labels: group.additional_labels_for(path),
        })
    }
}

/// Map `items` through `f` on up to `workers` scoped threads, keeping order.
fn filter_parallel<T, R, F>(items: &[T], workers: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Option<R> + Sync,
{
    if workers <= 1 || items.len() < PARALLEL_THRESHOLD {
        return items.iter().filter_map(&f).collect();
    }

    let chunk_size = items.len().div_ceil(workers);
    let f = &f;
    thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().filter_map(f).collect::<Vec<_>>()))
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(part) => part,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
