//! Address derivation
//!
//! Every entry in the registry carries an address string derived from the
//! asset path under one [`AddressMode`].

use grouper_fs::NormalizedPath;
use grouper_meta::AddressMode;
use std::collections::HashMap;

use crate::corpus::Corpus;
use crate::{Error, Result};

/// Address used by [`AddressMode::Blank`]
pub const BLANK_ADDRESS: &str = "_";

/// Sequential numbers handed out in first-seen order.
///
/// Numbers are dense from 0 and a path seen twice keeps its first number.
#[derive(Debug, Clone, Default)]
pub struct DynamicNumbering {
    numbers: HashMap<String, usize>,
}

impl DynamicNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_for(&mut self, path: &str) -> usize {
        let next = self.numbers.len();
        *self.numbers.entry(path.to_string()).or_insert(next)
    }

    pub fn get(&self, path: &str) -> Option<usize> {
        self.numbers.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Resolves addresses for one rule pass.
///
/// Create a new resolver for every rule pass; the dynamic numbering table
/// lives and dies with it.
pub struct AddressResolver<'a, C: Corpus + ?Sized> {
    corpus: &'a C,
    numbering: DynamicNumbering,
}

impl<'a, C: Corpus + ?Sized> AddressResolver<'a, C> {
    pub fn new(corpus: &'a C) -> Self {
        Self {
            corpus,
            numbering: DynamicNumbering::new(),
        }
    }

    pub fn numbering(&self) -> &DynamicNumbering {
        &self.numbering
    }

    /// Derive the address of `path` under `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderKeyUnavailable`] when a folder-key mode is used
    /// for a path without a parent folder or whose folder has no key.
    pub fn resolve(&mut self, path: &str, mode: AddressMode) -> Result<String> {
        let normalized = NormalizedPath::new(path);

        let address = match mode {
            AddressMode::FullPath => path.to_string(),
            AddressMode::FileName => normalized.file_name().unwrap_or(path).to_string(),
            AddressMode::FileNameNoExt => normalized.file_stem().unwrap_or(path).to_string(),
            AddressMode::FolderKeyAndFileName => {
                let key = self.folder_key(&normalized)?;
                format!("{}/{}", key, normalized.file_name().unwrap_or(path))
            }
            AddressMode::FolderKeyAndFileNameNoExt => {
                let key = self.folder_key(&normalized)?;
                format!("{}/{}", key, normalized.file_stem().unwrap_or(path))
            }
            AddressMode::Dynamic => self.numbering.number_for(path).to_string(),
            AddressMode::Blank => BLANK_ADDRESS.to_string(),
        };

        Ok(address)
    }

    fn folder_key(&self, path: &NormalizedPath) -> Result<String> {
        path.parent()
            .and_then(|parent| self.corpus.folder_key(parent.as_str()))
            .ok_or_else(|| Error::FolderKeyUnavailable {
                path: path.to_string(),
            })
    }
}
