//! Error types for grouper-core

use crate::verify::VerifyIssue;

/// Result type for grouper-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure class of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad definitions; raised before any registry mutation
    Configuration,
    /// The corpus could not be queried
    Scan,
    /// A registry operation failed mid-run
    Mutation,
    /// Underlying filesystem failure
    Io,
}

/// Errors that can occur in grouper-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A regular expression failed to compile
    #[error("Invalid pattern '{pattern}' in {context}: {source}")]
    InvalidPattern {
        pattern: String,
        context: String,
        #[source]
        source: regex::Error,
    },

    /// A rule's template reference does not resolve
    #[error("Group '{group}' in builder '{builder}' has no resolvable template")]
    MissingTemplate { group: String, builder: String },

    /// Rules sharing a group name disagree on its template
    #[error("Group '{group}' is declared with different templates in: {}", builders.join(", "))]
    AmbiguousTemplate { group: String, builders: Vec<String> },

    /// Pre-flight verification reported problems
    #[error(
        "Verification failed with {} issue(s): {}",
        issues.len(),
        issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Verification { issues: Vec<VerifyIssue> },

    /// The batch names a default group without a usable template
    #[error("Default group '{group}' requires a template")]
    DefaultTemplateMissing { group: String },

    /// A folder-key address was requested for a path without one
    #[error("No folder key available for '{path}'")]
    FolderKeyUnavailable { path: String },

    /// The requested builder is not part of the project
    #[error("Builder not found: {0}")]
    BuilderNotFound(String),

    /// A search folder does not exist in the corpus
    #[error(
        "Search folder '{folder}' of group '{group}' in builder '{builder}' is not a directory"
    )]
    SearchScopeNotFound {
        folder: String,
        group: String,
        builder: String,
    },

    /// The corpus query failed
    #[error("Scan failed for rule '{rule}' in builder '{builder}': {message}")]
    Scan {
        rule: String,
        builder: String,
        message: String,
    },

    /// A registry operation failed
    #[error("Registry {operation} failed: {message}")]
    Mutation { operation: String, message: String },

    /// Group handle unknown to the registry
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// No registry entry for the asset
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Filesystem error from grouper-fs
    #[error(transparent)]
    Fs(#[from] grouper_fs::Error),

    /// Definition error from grouper-meta
    #[error(transparent)]
    Meta(#[from] grouper_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn mutation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mutation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPattern { .. }
            | Self::MissingTemplate { .. }
            | Self::AmbiguousTemplate { .. }
            | Self::Verification { .. }
            | Self::DefaultTemplateMissing { .. }
            | Self::FolderKeyUnavailable { .. }
            | Self::BuilderNotFound(_) => ErrorCategory::Configuration,
            Self::Meta(grouper_meta::Error::Fs(_)) => ErrorCategory::Io,
            Self::Meta(_) => ErrorCategory::Configuration,
            Self::SearchScopeNotFound { .. } | Self::Scan { .. } => ErrorCategory::Scan,
            Self::Mutation { .. } | Self::GroupNotFound(_) | Self::EntryNotFound(_) => {
                ErrorCategory::Mutation
            }
            Self::Fs(_) | Self::Io(_) => ErrorCategory::Io,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}
