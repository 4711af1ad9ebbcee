//! The corpus query language
//!
//! Whitespace-separated terms:
//!
//! - `t:<ext>` keeps files with that extension (`t:folder` keeps folders);
//!   several `t:` terms are alternatives
//! - any other term must appear in the file name, ignoring case
//!
//! The empty query matches everything, folders included.

use grouper_fs::NormalizedPath;

const TYPE_PREFIX: &str = "t:";
const FOLDER_TYPE: &str = "folder";

/// A parsed corpus query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    types: Vec<String>,
    terms: Vec<String>,
}

impl AssetQuery {
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for token in query.split_whitespace() {
            match token.get(..TYPE_PREFIX.len()) {
                Some(prefix) if prefix.eq_ignore_ascii_case(TYPE_PREFIX) => {
                    let kind = token[TYPE_PREFIX.len()..].trim_start_matches('.');
                    if !kind.is_empty() {
                        parsed.types.push(kind.to_lowercase());
                    }
                }
                _ => parsed.terms.push(token.to_lowercase()),
            }
        }
        parsed
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.terms.is_empty()
    }

    pub fn matches(&self, path: &NormalizedPath, is_dir: bool) -> bool {
        if !self.types.is_empty() {
            let kind = if is_dir {
                Some(FOLDER_TYPE.to_string())
            } else {
                path.extension().map(str::to_lowercase)
            };
            let Some(kind) = kind else {
                return false;
            };
            if !self.types.contains(&kind) {
                return false;
            }
        }

        let name = path.file_name().unwrap_or_default().to_lowercase();
        self.terms.iter().all(|term| name.contains(term.as_str()))
    }
}
