//! The searchable item corpus
//!
//! The engine never walks storage itself; it asks a [`Corpus`] for
//! candidates and filters them. Two implementations ship with the crate:
//!
//! - [`MemoryCorpus`]: items registered in code, for tests and tools
//! - [`FsCorpus`]: the files under a project root

mod fs;
mod memory;
mod query;

pub use fs::FsCorpus;
pub use memory::MemoryCorpus;
pub use query::AssetQuery;

use grouper_fs::NormalizedPath;

use crate::Result;
use crate::asset::{AssetId, AssetRef};

/// Read-only view of the items a build classifies.
///
/// Shared across the worker threads of a scan, hence `Sync`.
pub trait Corpus: Sync {
    /// Find items matching `query` below any of `roots`.
    ///
    /// An empty `roots` slice searches the whole corpus. Results come back in
    /// a stable order.
    fn search(&self, query: &str, roots: &[NormalizedPath]) -> Result<Vec<AssetRef>>;

    /// Path of the item with `id`, if it exists.
    fn resolve_path(&self, id: &AssetId) -> Option<String>;

    fn is_directory(&self, path: &str) -> bool;

    /// Stable key of the folder at `path`, if it is a known folder.
    fn folder_key(&self, path: &str) -> Option<String>;
}
