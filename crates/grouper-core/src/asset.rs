//! Asset identity

use grouper_fs::NormalizedPath;
use grouper_fs::checksum::short_digest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex digits kept from the path digest
const ID_LEN: usize = 32;

/// Opaque, stable identifier of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id of an asset from its project-relative path.
    ///
    /// The same path always yields the same id, so ids survive restarts.
    pub fn from_path(path: &NormalizedPath) -> Self {
        Self(short_digest(path.as_str(), ID_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An item of the corpus: identity plus its project-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: AssetId,
    pub path: String,
}

impl AssetRef {
    pub fn new(id: AssetId, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Build a reference whose id is derived from the path.
    pub fn from_path(path: &NormalizedPath) -> Self {
        Self {
            id: AssetId::from_path(path),
            path: path.as_str().to_string(),
        }
    }
}
