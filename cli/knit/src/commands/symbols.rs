//! `knit symbols`: list the session symbol table.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::{bail, Result};
use knit_speak::{Symbol, SymbolTable};

use super::Export;

const KINDS: [&str; 3] = ["stitch", "cable", "variable"];

/// Render the symbol table, optionally filtered to one kind of symbol.
pub fn render(table: &SymbolTable, kind: Option<&str>, export: Export) -> Result<String> {
    if let Some(kind) = kind {
        if !KINDS.contains(&kind) {
            bail!("unknown symbol kind: '{kind}' (expected stitch, cable or variable)");
        }
    }
    let selected: BTreeMap<&str, &Symbol> = table
        .iter()
        .filter(|(_, sym)| kind.map_or(true, |k| sym.kind() == k))
        .collect();

    if export == Export::Json {
        return Ok(serde_json::to_string_pretty(&selected)?);
    }

    let mut out = String::new();
    writeln!(out, "Symbols ({}):", selected.len())?;
    for (name, sym) in &selected {
        writeln!(out, "  {name:<12} {:<9} {sym}", sym.kind())?;
    }
    Ok(out)
}

pub fn run(table: &SymbolTable, kind: Option<&str>, export: Option<&str>) -> Result<()> {
    print!("{}", render(table, kind, Export::parse(export)?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_everything_by_default() {
        let out = render(&SymbolTable::new(), None, Export::Text).unwrap();
        assert!(out.starts_with("Symbols (85):"));
        assert!(out.contains("k2tog"));
        assert!(out.contains("current_row"));
    }

    #[test]
    fn filters_by_kind() {
        let table = SymbolTable::new();
        let out = render(&table, Some("variable"), Export::Text).unwrap();
        assert!(out.starts_with("Symbols (1):"));

        let json = render(&table, Some("cable"), Export::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 72);
        assert_eq!(map["lc1|1"]["kind"], "cable");
        assert_eq!(map["lc1|1"]["definition"]["cable_lean"], "Left");
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(render(&SymbolTable::new(), Some("bobble"), Export::Text).is_err());
    }
}
