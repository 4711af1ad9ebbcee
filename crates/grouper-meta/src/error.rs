//! Error types for grouper-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] grouper_fs::Error),

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Builder '{name}' not found at {path}")]
    BuilderNotFound { name: String, path: PathBuf },

    #[error("Invalid address mode: {mode}")]
    InvalidAddressMode { mode: String },

    #[error("Invalid configuration ({} issue(s)): {}", issues.len(), issues.join("; "))]
    Invalid { issues: Vec<String> },
}
