//! The symbol table: every name a pattern can use.
//!
//! Names are case-insensitive and stored lower-cased. A fresh table holds the
//! four base stitches, eight decreases, the 72 two-leg cables, and the
//! `current_row` counter.

use std::collections::BTreeMap;
use std::fmt;

use knit_core::PullDirection;
use serde::Serialize;

use crate::cable::{CableDefinition, MAX_CABLE_LEG};
use crate::error::{KnitSpeakError, Result};
use crate::stitch::{StitchDefinition, StitchLean};

/// Name of the row counter variable.
pub const CURRENT_ROW: &str = "current_row";

/// A value bound to a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "definition", rename_all = "lowercase")]
pub enum Symbol {
    Variable(i64),
    Stitch(StitchDefinition),
    Cable(CableDefinition),
}

impl Symbol {
    pub fn kind(&self) -> &'static str {
        match self {
            Symbol::Variable(_) => "variable",
            Symbol::Stitch(_) => "stitch",
            Symbol::Cable(_) => "cable",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Variable(v) => write!(f, "{v}"),
            Symbol::Stitch(def) => write!(f, "{def}"),
            Symbol::Cable(cable) => write!(f, "{cable}"),
        }
    }
}

impl From<StitchDefinition> for Symbol {
    fn from(def: StitchDefinition) -> Self {
        Symbol::Stitch(def)
    }
}

impl From<CableDefinition> for Symbol {
    fn from(cable: CableDefinition) -> Self {
        Symbol::Cable(cable)
    }
}

/// Stitch, cable, and variable definitions for one compilation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding every built-in symbol.
    pub fn new() -> Self {
        let mut table = Self {
            symbols: BTreeMap::new(),
        };
        table.insert("k", StitchDefinition::knit());
        table.insert("p", StitchDefinition::purl());
        table.insert("yo", StitchDefinition::yarn_over());
        table.insert("slip", StitchDefinition::slip());
        table.add_decreases();
        table.add_cables();
        table.insert(CURRENT_ROW, Symbol::Variable(0));
        table
    }

    fn add_decreases(&mut self) {
        let decreases: [(&str, &str, &[i32]); 4] = [
            ("k2tog", "p2tog", &[1, 0]),
            ("k3tog", "p3tog", &[2, 1, 0]),
            ("skpo", "sppo", &[-1, 0]),
            ("sk2po", "sp2po", &[-1, -2, 0]),
        ];
        for (knit, purl, offsets) in decreases {
            self.insert(knit, StitchDefinition::decrease(PullDirection::KNIT, offsets.to_vec()));
            self.insert(purl, StitchDefinition::decrease(PullDirection::PURL, offsets.to_vec()));
        }
    }

    fn add_cables(&mut self) {
        let pulls = [PullDirection::KNIT, PullDirection::PURL];
        for lean in [StitchLean::Left, StitchLean::Right] {
            for left in 1..=MAX_CABLE_LEG {
                for right in 1..=MAX_CABLE_LEG {
                    for left_pull in pulls {
                        for right_pull in pulls {
                            if let Ok(cable) =
                                CableDefinition::new(left, right, left_pull, right_pull, lean)
                            {
                                self.insert(&cable.name(), cable);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Whether `name` is bound, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(&name.to_lowercase())
    }

    /// Look up `name`, ignoring case.
    pub fn get(&self, name: &str) -> Result<&Symbol> {
        self.symbols
            .get(&name.to_lowercase())
            .ok_or_else(|| KnitSpeakError::UnknownSymbol(name.to_string()))
    }

    /// Bind `name`, returning the symbol it replaces.
    pub fn insert(&mut self, name: &str, symbol: impl Into<Symbol>) -> Option<Symbol> {
        self.symbols.insert(name.to_lowercase(), symbol.into())
    }

    /// Look up a stitch.
    pub fn stitch(&self, name: &str) -> Result<&StitchDefinition> {
        match self.get(name)? {
            Symbol::Stitch(def) => Ok(def),
            other => Err(not_a(name, other, "stitch")),
        }
    }

    /// Look up a cable.
    pub fn cable(&self, name: &str) -> Result<&CableDefinition> {
        match self.get(name)? {
            Symbol::Cable(cable) => Ok(cable),
            other => Err(not_a(name, other, "cable")),
        }
    }

    /// The row counter, or 0 when it has been rebound to something else.
    pub fn current_row(&self) -> i64 {
        match self.symbols.get(CURRENT_ROW) {
            Some(Symbol::Variable(row)) => *row,
            _ => 0,
        }
    }

    pub fn set_current_row(&mut self, row: i64) {
        self.insert(CURRENT_ROW, Symbol::Variable(row));
    }

    /// All symbols, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(name, sym)| (name.as_str(), sym))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn not_a(name: &str, found: &Symbol, expected: &'static str) -> KnitSpeakError {
    KnitSpeakError::NotAStitch {
        name: name.to_string(),
        found: found.kind(),
        expected,
    }
}
