//! Cross-builder consistency checks
//!
//! Several rules, possibly in different builders, may target the same group
//! name. They must all agree on one template that exists in the catalog.
//! Verification is read-only and runs before any registry mutation.

use grouper_meta::{BuilderDefinition, GroupDefinition, TemplateCatalog};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{Error, Result};

/// A consistency problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VerifyIssue {
    /// A rule has no name
    EmptyName { builder: String },
    /// A rule has no template or names an unknown one
    MissingTemplate {
        group: String,
        builder: String,
        template: Option<String>,
    },
    /// Rules sharing a group name name different templates
    AmbiguousTemplate {
        group: String,
        builder: String,
        template: Option<String>,
    },
}

impl fmt::Display for VerifyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName { builder } => write!(f, "[{}] rule has an empty group name", builder),
            Self::MissingTemplate {
                group,
                builder,
                template: Some(name),
            } => write!(f, "[{}][{}] unknown template '{}'", builder, group, name),
            Self::MissingTemplate { group, builder, .. } => {
                write!(f, "[{}][{}] no template set", builder, group)
            }
            Self::AmbiguousTemplate {
                group,
                builder,
                template,
            } => write!(
                f,
                "[{}][{}] ambiguous template '{}'",
                builder,
                group,
                template.as_deref().unwrap_or("")
            ),
        }
    }
}

/// Outcome of [`GroupVerifier::verify`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub issues: Vec<VerifyIssue>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// `Ok` when no issues were found, otherwise [`Error::Verification`].
    pub fn into_result(self) -> Result<()> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(Error::Verification {
                issues: self.issues,
            })
        }
    }
}

/// Collects rules from several builders and checks them together.
#[derive(Debug, Default)]
pub struct GroupVerifier<'a> {
    /// Rules by group name, in join order
    groups: BTreeMap<&'a str, Vec<(&'a GroupDefinition, &'a str)>>,
    unnamed: Vec<&'a str>,
}

impl<'a> GroupVerifier<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every rule of `builder`.
    pub fn join(&mut self, builder: &'a BuilderDefinition) -> &mut Self {
        for group in &builder.groups {
            if group.name.is_empty() {
                self.unnamed.push(&builder.name);
            } else {
                self.groups
                    .entry(group.name.as_str())
                    .or_default()
                    .push((group, builder.name.as_str()));
            }
        }
        self
    }

    /// Check the joined rules against `templates`; each issue is logged.
    pub fn verify(&self, templates: &TemplateCatalog) -> VerifyReport {
        let mut issues: Vec<VerifyIssue> = self
            .unnamed
            .iter()
            .map(|builder| VerifyIssue::EmptyName {
                builder: builder.to_string(),
            })
            .collect();

        for (name, rules) in &self.groups {
            for (group, builder) in rules {
                if templates.resolve(group.template()).is_none() {
                    issues.push(VerifyIssue::MissingTemplate {
                        group: name.to_string(),
                        builder: builder.to_string(),
                        template: group.template().map(str::to_string),
                    });
                }
            }

            let distinct: BTreeSet<Option<&str>> =
                rules.iter().map(|(group, _)| group.template()).collect();
            if distinct.len() > 1 {
                for (group, builder) in rules {
                    issues.push(VerifyIssue::AmbiguousTemplate {
                        group: name.to_string(),
                        builder: builder.to_string(),
                        template: group.template().map(str::to_string),
                    });
                }
            }
        }

        for issue in &issues {
            tracing::error!("{}", issue);
        }

        VerifyReport { issues }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouper_meta::TemplateDefinition;
    use pretty_assertions::assert_eq;

    fn group(name: &str, template: Option<&str>) -> GroupDefinition {
        GroupDefinition {
            template: template.map(str::to_string),
            ..GroupDefinition::new(name)
        }
    }

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::new()
            .with(TemplateDefinition::new("packed"))
            .with(TemplateDefinition::new("separate"))
    }

    #[test]
    fn test_same_template_across_builders_passes() {
        let a = BuilderDefinition::new("a").with_group(group("G", Some("packed")));
        let b = BuilderDefinition::new("b").with_group(group("G", Some("packed")));

        let mut verifier = GroupVerifier::new();
        verifier.join(&a).join(&b);
        assert!(verifier.verify(&catalog()).is_ok());
    }

    #[test]
    fn test_conflicting_templates_report_every_pair() {
        let a = BuilderDefinition::new("a").with_group(group("G", Some("packed")));
        let b = BuilderDefinition::new("b").with_group(group("G", Some("separate")));

        let mut verifier = GroupVerifier::new();
        verifier.join(&a).join(&b);
        let report = verifier.verify(&catalog());

        let builders: Vec<_> = report
            .issues
            .iter()
            .map(|issue| match issue {
                VerifyIssue::AmbiguousTemplate { builder, .. } => builder.as_str(),
                other => panic!("unexpected issue {:?}", other),
            })
            .collect();
        assert_eq!(builders, vec!["a", "b"]);
        assert!(matches!(report.into_result(), Err(Error::Verification { .. })));
    }

    #[test]
    fn test_missing_and_unknown_templates() {
        let a = BuilderDefinition::new("a")
            .with_group(group("G", None))
            .with_group(group("H", Some("nope")))
            .with_group(group("", Some("packed")));

        let mut verifier = GroupVerifier::new();
        verifier.join(&a);
        let report = verifier.verify(&catalog());

        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.issues[0], VerifyIssue::EmptyName { builder: "a".into() });
        assert!(report.issues[2].to_string().contains("unknown template 'nope'"));
    }
}
