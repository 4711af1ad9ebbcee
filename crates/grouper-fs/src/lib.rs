//! Filesystem layer for the asset grouper
//!
//! Provides forward-slash asset paths, atomic writes and a
//! format-agnostic configuration store shared by the upper crates.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use path::NormalizedPath;
