//! Static validation of definitions
//!
//! Catches configuration mistakes that can be seen without touching the
//! corpus or the registry: empty group names, regexes that do not compile,
//! a default group without a usable template, and template references that
//! do not resolve.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::project::Project;
use crate::schema::{BatchDefinition, BuilderDefinition, TemplateCatalog};

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A problem found in the definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub message: String,
    /// Builder the issue belongs to, if any
    pub builder: Option<String>,
    /// Group the issue belongs to, if any
    pub group: Option<String>,
}

impl ValidationIssue {
    fn new(level: IssueLevel, message: String) -> Self {
        Self {
            level,
            message,
            builder: None,
            group: None,
        }
    }

    fn in_builder(mut self, builder: &str) -> Self {
        self.builder = Some(builder.to_string());
        self
    }

    fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level)?;
        match (&self.builder, &self.group) {
            (Some(b), Some(g)) => write!(f, " [{}][{}]", b, g)?,
            (Some(b), None) => write!(f, " [{}]", b)?,
            (None, Some(g)) => write!(f, " [{}]", g)?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

fn check_regex(pattern: &str, what: &str) -> Option<ValidationIssue> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(pattern).err().map(|e| {
        ValidationIssue::new(
            IssueLevel::Error,
            format!("invalid {} '{}': {}", what, pattern, e),
        )
    })
}

/// Validate one builder against a template catalog.
pub fn validate_builder(
    builder: &BuilderDefinition,
    templates: &TemplateCatalog,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if builder.groups.is_empty() {
        issues.push(
            ValidationIssue::new(IssueLevel::Info, "builder defines no groups".to_string())
                .in_builder(&builder.name),
        );
    }

    for pattern in &builder.ignore_patterns {
        issues.extend(check_regex(pattern, "ignore pattern").map(|i| i.in_builder(&builder.name)));
    }
    for pattern in &builder.include_patterns {
        issues.extend(check_regex(pattern, "include pattern").map(|i| i.in_builder(&builder.name)));
    }

    for group in &builder.groups {
        if group.name.trim().is_empty() {
            issues.push(
                ValidationIssue::new(IssueLevel::Error, "group name is empty".to_string())
                    .in_builder(&builder.name),
            );
        }

        issues.extend(
            check_regex(group.pattern(), "group pattern")
                .map(|i| i.in_builder(&builder.name).in_group(&group.name)),
        );

        for additional in &group.additional_labels {
            issues.extend(
                check_regex(&additional.pattern, "additional label pattern")
                    .map(|i| i.in_builder(&builder.name).in_group(&group.name)),
            );
        }

        // Missing templates are reported as errors by the verifier
        if let Some(name) = group.template()
            && !templates.contains(name)
        {
            issues.push(
                ValidationIssue::new(IssueLevel::Warning, format!("unknown template '{}'", name))
                    .in_builder(&builder.name)
                    .in_group(&group.name),
            );
        }
    }

    issues
}

/// Validate the batch definition.
pub fn validate_batch(
    batch: &BatchDefinition,
    templates: &TemplateCatalog,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(group) = batch.default_group() {
        match batch.default_template() {
            None => issues.push(
                ValidationIssue::new(
                    IssueLevel::Error,
                    "default group template must be set".to_string(),
                )
                .in_group(group),
            ),
            Some(name) if !templates.contains(name) => issues.push(
                ValidationIssue::new(
                    IssueLevel::Error,
                    format!("unknown default template '{}'", name),
                )
                .in_group(group),
            ),
            Some(_) => {}
        }
    }

    for pattern in &batch.keep_groups {
        issues.extend(check_regex(pattern, "keep-groups pattern"));
    }

    issues
}

/// Validate the batch and every builder of a project.
pub fn validate_project(project: &Project) -> Vec<ValidationIssue> {
    let mut issues = validate_batch(&project.batch, &project.templates);
    for builder in &project.builders {
        issues.extend(validate_builder(builder, &project.templates));
    }
    issues
}
