//! Regex path predicates and label substitution
//!
//! Patterns are searched, not anchored: `Characters/` matches anywhere in
//! `Assets/Characters/hero.prefab`. An empty pattern matches every path.
//!
//! Substitution templates use `$1`, `${1}` or `${name}` to reference
//! captures and `$&` for the whole match. `$` followed by digits is always a
//! numbered group, so `$1_icon` expands group 1 followed by `_icon`.

use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

/// A pattern compiled once and evaluated many times.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Option<Regex>,
}

impl PathPattern {
    /// Compile `pattern`; `context` names where it came from for error messages.
    pub fn compile(pattern: &str, context: &str) -> Result<Self> {
        Self::build(pattern, context, false)
    }

    /// Compile `pattern` so that it ignores letter case.
    pub fn compile_case_insensitive(pattern: &str, context: &str) -> Result<Self> {
        Self::build(pattern, context, true)
    }

    fn build(pattern: &str, context: &str, case_insensitive: bool) -> Result<Self> {
        let regex = if pattern.is_empty() {
            None
        } else {
            let compiled = RegexBuilder::new(pattern)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|source| Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    context: context.to_string(),
                    source,
                })?;
            Some(compiled)
        };

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.as_ref().is_none_or(|regex| regex.is_match(path))
    }

    /// Replace the first match in `path` with the expanded `template`.
    ///
    /// Returns `template` unchanged when the pattern or the template is empty.
    /// When the pattern does not match, `path` is returned unchanged.
    pub fn substitute(&self, path: &str, template: &str) -> String {
        match &self.regex {
            Some(regex) if !template.is_empty() => {
                let replacement = normalize_template(template);
                regex.replace(path, replacement.as_str()).into_owned()
            }
            _ => template.to_string(),
        }
    }
}

/// True iff `pattern` is empty or found somewhere in `path`.
pub fn matches(path: &str, pattern: &str) -> Result<bool> {
    Ok(PathPattern::compile(pattern, "pattern")?.is_match(path))
}

/// One-shot form of [`PathPattern::substitute`].
pub fn substitute(path: &str, pattern: &str, template: &str) -> Result<String> {
    Ok(PathPattern::compile(pattern, "pattern")?.substitute(path, template))
}

/// Rewrite `$<digits>` as `${<digits>}` and `$&` as `${0}`.
///
/// The regex crate reads `$1_icon` as a group named `1_icon`; label
/// templates mean group 1 followed by `_icon`.
fn normalize_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(d) if d.is_ascii_digit() => {
                out.push_str("${");
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    out.push(d);
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push('$'),
        }
    }

    out
}
