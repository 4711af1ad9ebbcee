//! A fully loaded project: batch, builders in order, template catalog

use grouper_fs::NormalizedPath;

use crate::schema::{BatchDefinition, BuilderDefinition, TemplateCatalog};
use crate::validation::{self, IssueLevel, ValidationIssue};
use crate::{Error, Result};

/// Everything one reconciliation run needs from configuration.
#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Project root the `.grouper/` directory lives in (empty for in-memory projects)
    pub root: NormalizedPath,
    pub batch: BatchDefinition,
    /// Builders in application order
    pub builders: Vec<BuilderDefinition>,
    pub templates: TemplateCatalog,
}

impl Project {
    /// Assemble a project in memory.
    pub fn new(
        batch: BatchDefinition,
        builders: Vec<BuilderDefinition>,
        templates: TemplateCatalog,
    ) -> Self {
        Self {
            root: NormalizedPath::default(),
            batch,
            builders,
            templates,
        }
    }

    pub fn builder(&self, name: &str) -> Option<&BuilderDefinition> {
        self.builders.iter().find(|b| b.name == name)
    }

    /// Run static validation and collect every issue.
    pub fn issues(&self) -> Vec<ValidationIssue> {
        validation::validate_project(self)
    }

    /// Fail when static validation reports any error-level issue.
    ///
    /// Warnings and notices are logged and otherwise ignored.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        for issue in self.issues() {
            match issue.level {
                IssueLevel::Error => {
                    tracing::error!("{}", issue);
                    errors.push(issue.to_string());
                }
                IssueLevel::Warning => tracing::warn!("{}", issue),
                IssueLevel::Info => tracing::info!("{}", issue),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Invalid { issues: errors })
        }
    }
}
