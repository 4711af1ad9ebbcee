//! Filesystem-backed corpus

use grouper_fs::NormalizedPath;
use std::collections::BTreeSet;
use std::fs;
use std::io;

use super::{AssetQuery, Corpus};
use crate::Result;
use crate::asset::{AssetId, AssetRef};

/// Sidecar files that never count as assets
const META_EXTENSION: &str = "meta";

/// The files and folders below a project root.
///
/// Paths handed out and accepted are relative to the root. Hidden entries
/// (leading `.`), backup entries (trailing `~`) and `.meta` sidecars are
/// skipped. Directory listings are sorted, so search order is path order.
#[derive(Debug, Clone)]
pub struct FsCorpus {
    root: NormalizedPath,
}

impl FsCorpus {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn absolute(&self, relative: &str) -> NormalizedPath {
        self.root.join(relative)
    }

    fn is_skipped(name: &str) -> bool {
        name.starts_with('.') || name.ends_with('~')
    }

    /// Sort one directory listing, dropping skipped names.
    ///
    /// An unreadable entry fails the listing. Leaving it out would make a
    /// reconcile treat the asset as deleted.
    fn children<I>(dir: &NormalizedPath, listing: I) -> Result<Vec<(String, bool)>>
    where
        I: IntoIterator<Item = io::Result<(String, io::Result<bool>)>>,
    {
        let mut children = Vec::new();
        for entry in listing {
            let (name, is_dir) = entry.map_err(|e| grouper_fs::Error::io(dir.to_native(), e))?;
            if Self::is_skipped(&name) {
                continue;
            }
            let is_dir =
                is_dir.map_err(|e| grouper_fs::Error::io(dir.join(&name).to_native(), e))?;
            children.push((name, is_dir));
        }
        children.sort();
        Ok(children)
    }

    /// Collect every entry below `relative` in path order.
    fn walk(&self, relative: &NormalizedPath, out: &mut Vec<(NormalizedPath, bool)>) -> Result<()> {
        let dir = self.absolute(relative.as_str());
        let entries = fs::read_dir(dir.to_native())
            .map_err(|e| grouper_fs::Error::io(dir.to_native(), e))?;

        let listing = entries.map(|entry| {
            entry.map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                (name, entry.file_type().map(|t| t.is_dir()))
            })
        });
        let children = Self::children(&dir, listing)?;

        for (name, is_dir) in children {
            let child = relative.join(&name);
            if is_dir {
                out.push((child.clone(), true));
                self.walk(&child, out)?;
            } else if child.extension() != Some(META_EXTENSION) {
                out.push((child, false));
            }
        }

        Ok(())
    }
}

impl Corpus for FsCorpus {
    fn search(&self, query: &str, roots: &[NormalizedPath]) -> Result<Vec<AssetRef>> {
        let query = AssetQuery::parse(query);
        let whole = [NormalizedPath::default()];
        let roots = if roots.is_empty() { &whole[..] } else { roots };

        let mut seen = BTreeSet::new();
        let mut found = Vec::new();
        for root in roots {
            let mut entries = Vec::new();
            self.walk(root, &mut entries)?;
            for (path, is_dir) in entries {
                if query.matches(&path, is_dir) && seen.insert(path.clone()) {
                    found.push(AssetRef::from_path(&path));
                }
            }
        }

        tracing::debug!(root = %self.root, results = found.len(), "corpus search");
        Ok(found)
    }

    fn resolve_path(&self, id: &AssetId) -> Option<String> {
        let mut entries = Vec::new();
        self.walk(&NormalizedPath::default(), &mut entries).ok()?;
        entries
            .into_iter()
            .map(|(path, _)| path)
            .find(|path| &AssetId::from_path(path) == id)
            .map(|path| path.as_str().to_string())
    }

    fn is_directory(&self, path: &str) -> bool {
        self.absolute(path).is_dir()
    }

    fn folder_key(&self, path: &str) -> Option<String> {
        self.is_directory(path)
            .then(|| AssetId::from_path(&NormalizedPath::new(path)).to_string())
    }
}
