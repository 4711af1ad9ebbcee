//! Build-symbol predicates that switch rules on and off

use grouper_meta::GroupDefinition;
use std::collections::BTreeSet;

/// Answers whether a build symbol is currently defined.
pub trait SymbolPredicate: Send + Sync {
    fn is_defined(&self, symbol: &str) -> bool;
}

impl<F> SymbolPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_defined(&self, symbol: &str) -> bool {
        self(symbol)
    }
}

/// Defines no symbol; only rules without a symbol are active.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymbols;

impl SymbolPredicate for NoSymbols {
    fn is_defined(&self, _symbol: &str) -> bool {
        false
    }
}

/// A fixed set of defined symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineSymbols {
    symbols: BTreeSet<String>,
}

impl DefineSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `;` or `,` separated define list such as `"DEBUG;ENABLE_UI"`.
    pub fn parse(defines: &str) -> Self {
        defines
            .split([';', ','])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn insert(&mut self, symbol: impl Into<String>) {
        self.symbols.insert(symbol.into());
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DefineSymbols {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl SymbolPredicate for DefineSymbols {
    fn is_defined(&self, symbol: &str) -> bool {
        self.contains(symbol)
    }
}

/// A rule is active when it names no symbol or its symbol is defined.
pub fn is_rule_enabled(group: &GroupDefinition, symbols: &dyn SymbolPredicate) -> bool {
    let symbol = group.symbol();
    symbol.is_empty() || symbols.is_defined(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define_list() {
        let symbols = DefineSymbols::parse("DEBUG; ENABLE_UI,,RELEASE");
        let all: Vec<_> = symbols.iter().collect();
        assert_eq!(all, vec!["DEBUG", "ENABLE_UI", "RELEASE"]);
    }

    #[test]
    fn test_rule_enabled_by_symbol() {
        let mut group = GroupDefinition::new("G");
        let none = DefineSymbols::new();
        assert!(is_rule_enabled(&group, &none));

        group.symbol = Some("ENABLE_G".into());
        assert!(!is_rule_enabled(&group, &none));
        assert!(is_rule_enabled(&group, &DefineSymbols::from_iter(["ENABLE_G"])));
        assert!(is_rule_enabled(&group, &|s: &str| s.starts_with("ENABLE")));
    }
}
