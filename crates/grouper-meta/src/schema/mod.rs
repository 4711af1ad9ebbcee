//! Schema definitions for groups, builders, the batch and templates
//!
//! - `.grouper/config.toml` - [`BatchDefinition`]
//! - `.grouper/builders/*.toml` - [`BuilderDefinition`]
//! - `.grouper/templates/*.toml` - [`TemplateDefinition`]

pub mod batch;
pub mod builder;
pub mod group;
pub mod template;

pub use batch::BatchDefinition;
pub use builder::BuilderDefinition;
pub use group::{AdditionalLabel, AddressMode, GroupDefinition};
pub use template::{TemplateCatalog, TemplateDefinition};
