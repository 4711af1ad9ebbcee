//! Classification and reconciliation engine for the asset grouper
//!
//! Given a corpus of assets and an ordered set of rule definitions, this
//! crate computes which group every asset belongs to, which labels it
//! carries and what its address is, and then converges a registry to that
//! desired state: it creates what is missing, updates what differs and
//! removes what is no longer wanted.
//!
//! # Architecture
//!
//! ```text
//!                   Engine
//!                     |
//!     +--------+------+------+----------+
//!     |        |             |          |
//!  verify   classify     reconcile   check
//!              |             |
//!         pattern/address  Registry trait
//!              |
//!         Corpus trait
//! ```
//!
//! `grouper-core` sits above `grouper-fs` (paths, config files) and
//! `grouper-meta` (definition schema and loader).
//!
//! # Example
//!
//! ```ignore
//! use grouper_core::{Engine, FsCorpus, FileRegistry};
//! use grouper_meta::ProjectLoader;
//!
//! let project = ProjectLoader::new().load(&root)?;
//! let registry = FileRegistry::load_or_create(root.join(".grouper/registry.toml"))?;
//! let mut engine = Engine::new(FsCorpus::new(root.clone()), registry);
//! engine.reconcile(&project)?;
//! ```

pub mod address;
pub mod asset;
pub mod classify;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod logging;
pub mod pattern;
pub mod progress;
pub mod reconcile;
pub mod registry;
pub mod symbols;
pub mod verify;

pub use address::{AddressResolver, DynamicNumbering};
pub use asset::{AssetId, AssetRef};
pub use classify::{
    ClassifiedAsset, ClassifiedEntry, Classifier, ClassifyReport, CompiledBuilder, split_labels,
};
pub use corpus::{Corpus, FsCorpus, MemoryCorpus};
pub use engine::{Engine, Phase};
pub use error::{Error, ErrorCategory, Result};
pub use pattern::PathPattern;
pub use progress::{NoProgress, Progress, RunGuard};
pub use reconcile::{CheckReport, CheckStatus, DesiredState, DriftItem, ReconcileReport, Reconciler};
pub use registry::{EntryInfo, FileRegistry, GroupId, GroupInfo, MemoryRegistry, Registry};
pub use symbols::{DefineSymbols, NoSymbols, SymbolPredicate};
pub use verify::{GroupVerifier, VerifyIssue, VerifyReport};
