//! Group definition schema
//!
//! A group definition is one classification rule: which assets it selects,
//! which group they land in, how they are labelled and how their address is
//! derived.
//!
//! # Example TOML
//!
//! ```toml
//! [[group]]
//! name = "Characters"
//! template = "packed"
//! filter = "t:prefab"
//! search_in_folders = ["Assets/Characters"]
//! pattern = "^Assets/Characters/(\\w+)/.*$"
//! label = "char_$1"
//! address = "file-name-no-ext"
//! symbol = "ENABLE_CHARACTERS"
//!
//! [[group.additional_labels]]
//! label = "boss"
//! pattern = "^.*/Bosses/.*$"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How the address of an entry is derived from its asset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressMode {
    /// The full asset path
    #[default]
    FullPath,
    /// Last path segment
    FileName,
    /// Last path segment without extension
    FileNameNoExt,
    /// `{folder key}/{file name}`
    FolderKeyAndFileName,
    /// `{folder key}/{file name without extension}`
    FolderKeyAndFileNameNoExt,
    /// Sequential number in first-seen order within one build pass
    Dynamic,
    /// The constant `_`
    Blank,
}

impl AddressMode {
    pub const ALL: [AddressMode; 7] = [
        Self::FullPath,
        Self::FileName,
        Self::FileNameNoExt,
        Self::FolderKeyAndFileName,
        Self::FolderKeyAndFileNameNoExt,
        Self::Dynamic,
        Self::Blank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullPath => "full-path",
            Self::FileName => "file-name",
            Self::FileNameNoExt => "file-name-no-ext",
            Self::FolderKeyAndFileName => "folder-key-and-file-name",
            Self::FolderKeyAndFileNameNoExt => "folder-key-and-file-name-no-ext",
            Self::Dynamic => "dynamic",
            Self::Blank => "blank",
        }
    }
}

impl FromStr for AddressMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::InvalidAddressMode {
                mode: s.to_string(),
            })
    }
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extra label applied to assets whose path matches `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdditionalLabel {
    /// Label template; may hold several labels separated by `,`
    #[serde(default)]
    pub label: String,
    /// Regular expression; its captures can be used in `label`
    #[serde(default)]
    pub pattern: String,
}

impl AdditionalLabel {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// One classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Target group name
    pub name: String,
    /// Label template; may hold several labels separated by `,`
    #[serde(default)]
    pub label: String,
    /// Name of the packaging template applied to the group
    #[serde(default)]
    pub template: Option<String>,
    /// Required build symbol; the rule is skipped when it is not defined
    #[serde(default)]
    pub symbol: Option<String>,
    /// Corpus query, passed through to the corpus untouched
    #[serde(default)]
    pub filter: String,
    /// Path regex; its captures can be used in `label`
    #[serde(default)]
    pub pattern: Option<String>,
    /// Folders to search; empty searches the whole corpus
    #[serde(default)]
    pub search_in_folders: Vec<String>,
    #[serde(default)]
    pub address: AddressMode,
    #[serde(default)]
    pub additional_labels: Vec<AdditionalLabel>,
}

impl GroupDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The path pattern, or `""` when unset.
    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or("")
    }

    /// The required symbol, or `""` when unset.
    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or("")
    }

    /// The template name when one is set and non-empty.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }
}
