//! CLI command implementations.

pub mod courses;
pub mod inspect;
pub mod lookup;
pub mod symbols;

use std::path::Path;

use anyhow::{bail, Context, Result};
use knit_core::KnitGraph;

/// Output format selected with `--export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Export {
    Text,
    Json,
}

impl Export {
    pub fn parse(s: Option<&str>) -> Result<Self> {
        match s.unwrap_or("text") {
            "text" => Ok(Export::Text),
            "json" => Ok(Export::Json),
            other => bail!("unknown export format: '{other}' (expected text or json)"),
        }
    }
}

/// Read a serialized knit graph, re-checking every graph invariant.
pub fn load_graph(path: &Path) -> Result<KnitGraph> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
