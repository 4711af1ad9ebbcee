//! Packaging template schema - loaded from .grouper/templates/*.toml
//!
//! A template is the packaging policy a group points to. Its `schemas` are
//! the schema types a new group is created with and its `settings` are
//! re-applied to the group on every build. The template name is the file
//! stem.
//!
//! # Example TOML
//!
//! ```toml
//! description = "Pack the whole group into one bundle"
//! schemas = ["BundledAssetGroupSchema", "ContentUpdateGroupSchema"]
//!
//! [settings]
//! bundle_mode = "pack-together"
//! compression = "lz4"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A named packaging policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Template name, taken from the file stem (not serialized)
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Schema types a group is created with
    #[serde(default)]
    pub schemas: Vec<String>,
    /// Settings applied to the group
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

impl TemplateDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

/// All templates known to a project, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, TemplateDefinition>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template, replacing any template with the same name.
    pub fn insert(&mut self, template: TemplateDefinition) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn with(mut self, template: TemplateDefinition) -> Self {
        self.insert(template);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TemplateDefinition> {
        self.templates.get(name)
    }

    /// Resolve an optional reference; empty and unknown names resolve to `None`.
    pub fn resolve(&self, name: Option<&str>) -> Option<&TemplateDefinition> {
        name.filter(|n| !n.is_empty()).and_then(|n| self.get(n))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.templates.values()
    }
}

impl FromIterator<TemplateDefinition> for TemplateCatalog {
    fn from_iter<I: IntoIterator<Item = TemplateDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for template in iter {
            catalog.insert(template);
        }
        catalog
    }
}
