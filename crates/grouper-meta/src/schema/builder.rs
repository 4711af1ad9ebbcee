//! Builder definition schema - loaded from .grouper/builders/*.toml
//!
//! A builder is an ordered collection of group definitions sharing a set of
//! global path filters. The builder name is the file stem.
//!
//! # Example TOML
//!
//! ```toml
//! case_insensitive = true
//! ignore_patterns = ["\\.psd$"]
//! include_patterns = ["^Assets/Game/"]
//!
//! [[group]]
//! name = "Textures"
//! template = "packed"
//! filter = "t:png"
//! ```

use serde::{Deserialize, Serialize};

use super::group::GroupDefinition;

/// An ordered collection of group definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuilderDefinition {
    /// Builder name, taken from the file stem (not serialized)
    #[serde(skip)]
    pub name: String,
    /// Global include/ignore patterns match case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,
    /// Paths matching any of these are excluded
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// When non-empty, only paths matching one of these are kept
    #[serde(default)]
    pub include_patterns: Vec<String>,
    /// Rules in declaration order
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupDefinition>,
}

impl BuilderDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: GroupDefinition) -> Self {
        self.groups.push(group);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_groups_in_order() {
        let toml = r#"
ignore_patterns = ["\\.psd$"]

[[group]]
name = "First"

[[group]]
name = "Second"
label = "b"
"#;
        let builder: BuilderDefinition = toml::from_str(toml).unwrap();
        assert!(builder.name.is_empty());
        assert!(!builder.case_insensitive);
        assert_eq!(builder.ignore_patterns, vec!["\\.psd$"]);
        let names: Vec<_> = builder.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
