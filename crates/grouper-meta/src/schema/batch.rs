//! Batch definition schema - loaded from .grouper/config.toml
//!
//! The batch sequences builders into one reconciliation run and carries the
//! registry-wide policy: the default group and unused-group removal.
//!
//! # Example TOML
//!
//! ```toml
//! default_group = "DefaultGroup"
//! default_template = "packed"
//! builders = ["characters", "ui"]
//! remove_unused_groups = true
//! keep_groups = ["^Built In Data$"]
//! symbols = ["ENABLE_CHARACTERS"]
//! ```

use serde::{Deserialize, Serialize};

fn default_group_name() -> String {
    "DefaultGroup".to_string()
}

fn default_true() -> bool {
    true
}

/// Batch-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDefinition {
    /// Name of the registry default group; empty disables it
    #[serde(default = "default_group_name")]
    pub default_group: String,
    /// Template applied to the default group
    #[serde(default)]
    pub default_template: Option<String>,
    /// Builder names in application order; empty means every builder file
    #[serde(default)]
    pub builders: Vec<String>,
    /// Remove groups no rule targets after a build
    #[serde(default = "default_true")]
    pub remove_unused_groups: bool,
    /// Group names matching any of these regexes survive unused-group removal
    #[serde(default)]
    pub keep_groups: Vec<String>,
    /// Active build symbols
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Default for BatchDefinition {
    fn default() -> Self {
        Self {
            default_group: default_group_name(),
            default_template: None,
            builders: Vec::new(),
            remove_unused_groups: default_true(),
            keep_groups: Vec::new(),
            symbols: Vec::new(),
        }
    }
}

impl BatchDefinition {
    /// The default group name when one is configured.
    pub fn default_group(&self) -> Option<&str> {
        Some(self.default_group.as_str()).filter(|name| !name.is_empty())
    }

    /// The default template name when one is set and non-empty.
    pub fn default_template(&self) -> Option<&str> {
        self.default_template.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_uses_defaults() {
        let batch: BatchDefinition = toml::from_str("").unwrap();
        assert_eq!(batch, BatchDefinition::default());
        assert_eq!(batch.default_group(), Some("DefaultGroup"));
        assert!(batch.remove_unused_groups);
    }

    #[test]
    fn test_empty_default_group_disables_it() {
        let batch: BatchDefinition = toml::from_str(r#"default_group = """#).unwrap();
        assert_eq!(batch.default_group(), None);
    }
}
