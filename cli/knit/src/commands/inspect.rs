//! `knit inspect`: summary statistics for a serialized graph.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use knit_core::{CrossingDepth, KnitGraph, PullDirection};

use super::load_graph;

pub fn render(graph: &KnitGraph) -> Result<String> {
    let courses = graph.get_courses();
    let first_course = courses.course(0).unwrap_or_default();

    let yarn_overs = graph
        .loops()
        .filter(|lp| !lp.has_parent_loops() && !first_course.contains(&lp.id))
        .count();
    let decreases = graph
        .loops()
        .filter(|lp| lp.parent_loops().len() > 1)
        .count();
    let twisted = graph.loops().filter(|lp| lp.is_twisted()).count();
    let crossing = graph
        .edges()
        .filter(|e| e.attrs.depth != CrossingDepth::Flat)
        .count();
    let purls = graph
        .edges()
        .filter(|e| e.attrs.pull_direction == PullDirection::PURL)
        .count();

    let mut out = String::new();
    writeln!(out, "--- Knit Graph ---")?;
    writeln!(out, "  Loops:      {}", graph.loop_count())?;
    writeln!(out, "  Stitches:   {}", graph.edge_count())?;
    writeln!(out, "  Courses:    {}", courses.len())?;
    writeln!(out, "  Yarn-overs: {yarn_overs}")?;
    writeln!(out, "  Decreases:  {decreases}")?;
    writeln!(out, "  Twisted:    {twisted}")?;
    writeln!(out, "  Crossing:   {crossing}")?;
    writeln!(
        out,
        "  Knit/purl:  {}/{}",
        graph.edge_count() - purls,
        purls
    )?;
    writeln!(out, "--- Yarns ---")?;
    for yarn in graph.yarns() {
        let span = match (yarn.loop_ids().first(), yarn.last_loop_id()) {
            (Some(first), Some(last)) => format!("{first}..={last}"),
            _ => "empty".to_string(),
        };
        writeln!(out, "  {:<12} {:>5} loops  {span}", yarn.yarn_id(), yarn.len())?;
    }
    Ok(out)
}

pub fn run(input: &Path) -> Result<()> {
    let graph = load_graph(input)?;
    print!("{}", render(&graph)?);
    Ok(())
}
