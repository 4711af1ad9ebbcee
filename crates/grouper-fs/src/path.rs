//! Normalized asset paths
//!
//! Asset paths are compared as plain strings by the classifier, so every
//! path entering the system is cleaned into a single canonical spelling.

use std::path::{Path, PathBuf};

/// A path normalized to forward slashes with redundant separators removed.
///
/// `Assets\\Chars//Hero/./a.png` and `Assets/Chars/Hero/a.png` produce the
/// same value. Leading `/` is preserved, trailing `/` is dropped and `..`
/// segments are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NormalizedPath {
    inner: String,
}

fn clean(raw: &str) -> String {
    let replaced = raw.replace('\\', "/");
    let absolute = replaced.starts_with('/');
    let joined = replaced
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: clean(&path.as_ref().to_string_lossy()),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment)),
        }
    }

    /// Get the parent directory, if any.
    pub fn parent(&self) -> Option<Self> {
        if self.inner == "/" {
            return None;
        }
        match self.inner.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the last path segment.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the last path segment without its extension.
    ///
    /// Dotfiles such as `.gitkeep` have no extension and keep their full name.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[idx + 1..]),
            _ => None,
        }
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|segment| !segment.is_empty())
    }

    /// Return this path relative to `dir`, or `None` if it lies outside it.
    ///
    /// The path must be strictly below `dir`; `dir` itself yields `None`.
    pub fn strip_dir(&self, dir: &NormalizedPath) -> Option<&str> {
        if dir.inner.is_empty() {
            return (!self.inner.is_empty()).then_some(self.inner.as_str());
        }
        if dir.inner == "/" {
            return self.inner.strip_prefix('/').filter(|rest| !rest.is_empty());
        }
        self.inner
            .strip_prefix(dir.inner.as_str())?
            .strip_prefix('/')
            .filter(|rest| !rest.is_empty())
    }

    /// True when this path equals `dir` or lies below it.
    pub fn is_within(&self, dir: &NormalizedPath) -> bool {
        self == dir || self.strip_dir(dir).is_some()
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
