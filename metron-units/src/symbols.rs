//! Symbol tables
//!
//! A symbol table resolves unit symbols and prefix symbols while parsing,
//! and finds symbols for units while rendering.

use std::collections::HashMap;
use crate::{Unit, UnitConverter};

/// A scale prefix such as "k" (×1000) or "µ" (×10⁻⁶)
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    symbol: String,
    name: String,
    converter: UnitConverter,
}

impl Prefix {
    pub fn new(symbol: &str, name: &str, converter: UnitConverter) -> Self {
        Prefix { symbol: symbol.to_string(), name: name.to_string(), converter }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converter from the prefixed unit to the bare unit
    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }
}

/// Lookups the parser and renderer need
///
/// Implementors provide the four table accessors; the reverse lookups
/// have linear-scan defaults over the borrowed entries.
pub trait SymbolTable {
    /// Unit registered under exactly this symbol
    fn unit(&self, symbol: &str) -> Option<Unit>;

    /// Prefix registered under exactly this symbol
    fn prefix(&self, symbol: &str) -> Option<Prefix>;

    /// Registered `(symbol, unit)` pairs in registration order
    fn labels(&self) -> Box<dyn Iterator<Item = (&str, &Unit)> + '_>;

    /// Registered prefixes in registration order
    fn prefixes(&self) -> Box<dyn Iterator<Item = &Prefix> + '_>;

    /// Symbol used when rendering a prefix
    fn symbol_of(&self, prefix: &Prefix) -> String {
        prefix.symbol().to_string()
    }

    /// First symbol registered for a unit equal to `unit`
    fn label_of(&self, unit: &Unit) -> Option<String> {
        self.labels().find(|(_, u)| *u == unit).map(|(s, _)| s.to_string())
    }

    /// First prefix whose converter equals `converter`
    fn prefix_for(&self, converter: &UnitConverter) -> Option<Prefix> {
        self.prefixes().find(|p| p.converter() == converter).cloned()
    }

    /// Expression text for a unit; parsing it back yields an equal unit
    fn render(&self, unit: &Unit) -> String {
        crate::render::render_unit(self, unit)
    }
}

/// In-memory symbol table
///
/// Later registrations under an existing symbol replace the earlier entry
/// but keep its position in the registration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    labels: Vec<(String, Unit)>,
    label_index: HashMap<String, usize>,
    prefixes: Vec<Prefix>,
    prefix_index: HashMap<String, usize>,
}

impl SymbolMap {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under a symbol
    pub fn register(&mut self, symbol: &str, unit: Unit) {
        match self.label_index.get(symbol) {
            Some(&i) => self.labels[i].1 = unit,
            None => {
                self.label_index.insert(symbol.to_string(), self.labels.len());
                self.labels.push((symbol.to_string(), unit));
            }
        }
    }

    /// Register a prefix under its own symbol
    pub fn register_prefix(&mut self, prefix: Prefix) {
        match self.prefix_index.get(prefix.symbol()) {
            Some(&i) => self.prefixes[i] = prefix,
            None => {
                self.prefix_index.insert(prefix.symbol().to_string(), self.prefixes.len());
                self.prefixes.push(prefix);
            }
        }
    }

    /// Builder form of [`SymbolMap::register`]
    pub fn with_unit(mut self, symbol: &str, unit: Unit) -> Self {
        self.register(symbol, unit);
        self
    }

    /// Builder form of [`SymbolMap::register_prefix`]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.register_prefix(prefix);
        self
    }

    /// All unit symbols in registration order
    pub fn symbols(&self) -> Vec<&str> {
        self.labels.iter().map(|(s, _)| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl SymbolTable for SymbolMap {
    fn unit(&self, symbol: &str) -> Option<Unit> {
        self.label_index.get(symbol).map(|&i| self.labels[i].1.clone())
    }

    fn prefix(&self, symbol: &str) -> Option<Prefix> {
        self.prefix_index.get(symbol).map(|&i| self.prefixes[i].clone())
    }

    fn labels(&self) -> Box<dyn Iterator<Item = (&str, &Unit)> + '_> {
        Box::new(self.labels.iter().map(|(s, u)| (s.as_str(), u)))
    }

    fn prefixes(&self) -> Box<dyn Iterator<Item = &Prefix> + '_> {
        Box::new(self.prefixes.iter())
    }
}
