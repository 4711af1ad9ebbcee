//! Shared test utilities for the asset-grouper workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`defs`]: fluent builders for rule, builder, template and batch definitions
//! - [`project`]: [`project::TestProject`], a temporary project directory

pub mod defs;
pub mod project;

pub use defs::{RuleBuilder, batch, rule, template};
pub use project::TestProject;
