//! `knit courses`: partition a serialized graph into courses.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use knit_core::KnitGraph;

use super::{load_graph, Export};

pub fn render(graph: &KnitGraph, export: Export) -> Result<String> {
    let courses = graph.get_courses();
    if export == Export::Json {
        return Ok(serde_json::to_string_pretty(&courses)?);
    }

    let mut out = String::new();
    writeln!(out, "Courses ({}):", courses.len())?;
    for (index, loops) in courses.iter() {
        let ids: Vec<String> = loops.iter().map(ToString::to_string).collect();
        writeln!(out, "  {index:>4}: {}", ids.join(" "))?;
    }
    Ok(out)
}

pub fn run(input: &Path, export: Option<&str>) -> Result<()> {
    let export = Export::parse(export)?;
    let graph = load_graph(input)?;
    print!("{}", render(&graph, export)?);
    Ok(())
}
