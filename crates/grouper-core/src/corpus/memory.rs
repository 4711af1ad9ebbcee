//! In-memory corpus

use grouper_fs::NormalizedPath;
use std::collections::HashMap;

use super::{AssetQuery, Corpus};
use crate::Result;
use crate::asset::{AssetId, AssetRef};

#[derive(Debug, Clone)]
struct Node {
    id: AssetId,
    path: NormalizedPath,
    is_dir: bool,
}

/// A corpus held in memory.
///
/// Search results follow insertion order. Adding a file registers its
/// parent folders as well.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    nodes: Vec<Node>,
    index: HashMap<NormalizedPath, usize>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from a list of file paths.
    pub fn with_files<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Self::new();
        for path in paths {
            corpus.add_file(path.as_ref());
        }
        corpus
    }

    /// Register a file and its parent folders; returns the file's id.
    pub fn add_file(&mut self, path: &str) -> AssetId {
        let path = NormalizedPath::new(path);
        if let Some(parent) = path.parent() {
            self.add_folder(parent.as_str());
        }
        self.insert(path, false)
    }

    /// Register a folder and its parents; returns the folder's id.
    pub fn add_folder(&mut self, path: &str) -> AssetId {
        let path = NormalizedPath::new(path);
        if let Some(parent) = path.parent() {
            self.add_folder(parent.as_str());
        }
        self.insert(path, true)
    }

    /// Remove an item; folders keep their contents.
    pub fn remove(&mut self, path: &str) -> bool {
        let path = NormalizedPath::new(path);
        let Some(position) = self.index.remove(&path) else {
            return false;
        };
        self.nodes.remove(position);
        for (i, node) in self.nodes.iter().enumerate().skip(position) {
            self.index.insert(node.path.clone(), i);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, path: NormalizedPath, is_dir: bool) -> AssetId {
        if let Some(&position) = self.index.get(&path) {
            return self.nodes[position].id.clone();
        }
        let id = AssetId::from_path(&path);
        self.index.insert(path.clone(), self.nodes.len());
        self.nodes.push(Node {
            id: id.clone(),
            path,
            is_dir,
        });
        id
    }

    fn node(&self, path: &str) -> Option<&Node> {
        self.index
            .get(&NormalizedPath::new(path))
            .map(|&position| &self.nodes[position])
    }
}

impl Corpus for MemoryCorpus {
    fn search(&self, query: &str, roots: &[NormalizedPath]) -> Result<Vec<AssetRef>> {
        let query = AssetQuery::parse(query);
        Ok(self
            .nodes
            .iter()
            .filter(|node| {
                roots.is_empty() || roots.iter().any(|r| node.path.strip_dir(r).is_some())
            })
            .filter(|node| query.matches(&node.path, node.is_dir))
            .map(|node| AssetRef::new(node.id.clone(), node.path.as_str()))
            .collect())
    }

    fn resolve_path(&self, id: &AssetId) -> Option<String> {
        self.nodes
            .iter()
            .find(|node| &node.id == id)
            .map(|node| node.path.as_str().to_string())
    }

    fn is_directory(&self, path: &str) -> bool {
        self.node(path).is_some_and(|node| node.is_dir)
    }

    fn folder_key(&self, path: &str) -> Option<String> {
        self.node(path)
            .filter(|node| node.is_dir)
            .map(|node| node.id.to_string())
    }
}
