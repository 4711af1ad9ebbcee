//! Definitions for the asset grouper.
//!
//! This crate owns the declarative side of the system: groups (classification
//! rules), builders (ordered rule-set collections), the batch that sequences
//! builders, and the packaging templates groups refer to. Definitions are
//! loaded from a `.grouper/` project directory:
//!
//! ```text
//! .grouper/
//!   config.toml          # batch definition
//!   templates/*.toml     # one packaging template per file
//!   builders/*.toml      # one builder per file
//! ```

pub mod error;
pub mod loader;
pub mod project;
pub mod schema;
pub mod validation;

pub use error::{Error, Result};
pub use loader::ProjectLoader;
pub use project::Project;
pub use schema::{
    AdditionalLabel, AddressMode, BatchDefinition, BuilderDefinition, GroupDefinition,
    TemplateCatalog, TemplateDefinition,
};
pub use validation::{IssueLevel, ValidationIssue};
