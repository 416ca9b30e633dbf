//! `knit lookup`: show one symbol in detail.

use std::fmt::Write;

use anyhow::Result;
use knit_speak::{Symbol, SymbolTable};
use serde_json::json;

use super::Export;

pub fn render(table: &SymbolTable, name: &str, export: Export) -> Result<String> {
    let symbol = table.get(name)?;
    let key = name.to_lowercase();

    if export == Export::Json {
        let value = json!({ "name": key, "symbol": symbol });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut out = String::new();
    writeln!(out, "=== {key} ({}) ===", symbol.kind())?;
    match symbol {
        Symbol::Variable(value) => {
            writeln!(out, "  Value: {value}")?;
        }
        Symbol::Stitch(def) => {
            writeln!(out, "  Pull:     {}", def.pull_direction)?;
            writeln!(out, "  Parents:  {:?}", def.offset_to_parent_loops())?;
            writeln!(out, "  Children: {}", def.child_loops())?;
            writeln!(out, "  Depth:    {}", def.cabling_depth)?;
            if def.is_decrease() {
                writeln!(out, "  Lean:     {}", def.lean())?;
            }
        }
        Symbol::Cable(cable) => {
            writeln!(
                out,
                "  Left leg:  {} loop(s), {}",
                cable.left_crossing_loops(),
                cable.left_crossing_pull_direction()
            )?;
            writeln!(
                out,
                "  Right leg: {} loop(s), {}",
                cable.right_crossing_loops(),
                cable.right_crossing_pull_direction()
            )?;
            writeln!(out, "  Lean:      {}", cable.cable_lean())?;
            writeln!(out, "  Mirror:    {}", cable.mirrored().name())?;
            writeln!(out, "  Loops, left to right:")?;
            for (i, def) in cable.stitch_definitions().iter().enumerate() {
                writeln!(out, "    {i}: {def}")?;
            }
        }
    }
    Ok(out)
}

pub fn run(table: &SymbolTable, name: &str, export: Option<&str>) -> Result<()> {
    print!("{}", render(table, name, Export::parse(export)?)?);
    Ok(())
}
