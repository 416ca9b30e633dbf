//! `knit.toml` parsing and session configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use knit_core::{CrossingDepth, PullDirection};
use knit_speak::{CableDefinition, StitchDefinition, StitchLean, SymbolTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MANIFEST_FILE: &str = "knit.toml";

/// The top-level structure of a `knit.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnitManifest {
    /// Session variables.
    #[serde(default)]
    pub session: SessionConfig,
    /// Extra or overriding stitch definitions, keyed by mnemonic.
    #[serde(default)]
    pub stitches: BTreeMap<String, StitchEntry>,
    /// Extra or overriding cable definitions, keyed by mnemonic.
    #[serde(default)]
    pub cables: BTreeMap<String, CableEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Starting value of `current_row`.
    #[serde(default)]
    pub current_row: Option<i64>,
}

/// A stitch definition in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StitchEntry {
    #[serde(default = "knit_pull")]
    pub pull_direction: PullDirection,
    /// Parent offsets, bottom of the stack first.
    #[serde(default = "single_parent")]
    pub offsets: Vec<i32>,
    #[serde(default = "one_child")]
    pub child_loops: usize,
    #[serde(default)]
    pub depth: CrossingDepth,
}

/// A cable definition in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CableEntry {
    pub left: usize,
    pub right: usize,
    #[serde(default = "knit_pull")]
    pub left_pull: PullDirection,
    #[serde(default = "knit_pull")]
    pub right_pull: PullDirection,
    pub lean: StitchLean,
}

fn knit_pull() -> PullDirection {
    PullDirection::KNIT
}

fn single_parent() -> Vec<i32> {
    vec![0]
}

fn one_child() -> usize {
    1
}

impl KnitManifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Search upward from `start_dir` for a `knit.toml` file, parse and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let manifest = Self::load(&candidate)?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing knit.toml")
    }

    /// Register every custom stitch and cable in `table`, replacing built-ins
    /// of the same name, then apply session variables.
    pub fn apply_to(&self, table: &mut SymbolTable) -> Result<()> {
        for (name, entry) in &self.stitches {
            let def = StitchDefinition::new(
                entry.pull_direction,
                entry.depth,
                entry.child_loops,
                entry.offsets.clone(),
            )
            .with_context(|| format!("stitch '{name}' in {MANIFEST_FILE}"))?;
            if table.insert(name, def).is_some() {
                debug!(name = %name, "manifest stitch replaces built-in");
            }
        }
        for (name, entry) in &self.cables {
            let cable = CableDefinition::new(
                entry.left,
                entry.right,
                entry.left_pull,
                entry.right_pull,
                entry.lean,
            )
            .with_context(|| format!("cable '{name}' in {MANIFEST_FILE}"))?;
            if table.insert(name, cable).is_some() {
                debug!(name = %name, "manifest cable replaces built-in");
            }
        }
        if let Some(row) = self.session.current_row {
            table.set_current_row(row);
        }
        debug!(
            stitches = self.stitches.len(),
            cables = self.cables.len(),
            "applied manifest"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[session]
current_row = 3

[stitches.k2tog-tbl]
pull_direction = "FrontToBack"
offsets = [1, 0]

[stitches.purl-slip]
child_loops = 0

[cables."lc2|1"]
left = 2
right = 1
right_pull = "BackToFront"
lean = "Left"

[cables.wide-twist]
left = 1
right = 1
lean = "Right"
"#;

    #[test]
    fn parse_full_manifest() {
        let m = KnitManifest::from_str(FULL).unwrap();
        assert_eq!(m.session.current_row, Some(3));
        assert_eq!(m.stitches.len(), 2);
        assert_eq!(m.stitches["k2tog-tbl"].offsets, vec![1, 0]);
        assert_eq!(m.stitches["k2tog-tbl"].child_loops, 1);
        assert_eq!(m.stitches["purl-slip"].offsets, vec![0]);
        assert_eq!(m.cables["lc2|1"].left_pull, PullDirection::KNIT);
        assert_eq!(m.cables["lc2|1"].right_pull, PullDirection::PURL);
    }

    #[test]
    fn parse_empty_manifest() {
        let m = KnitManifest::from_str("").unwrap();
        assert!(m.session.current_row.is_none());
        assert!(m.stitches.is_empty());
        assert!(m.cables.is_empty());
    }

    #[test]
    fn apply_registers_and_overrides() {
        let m = KnitManifest::from_str(FULL).unwrap();
        let mut table = SymbolTable::new();
        m.apply_to(&mut table).unwrap();

        assert_eq!(table.len(), 85 + 3);
        assert_eq!(table.current_row(), 3);
        assert!(table.stitch("K2TOG-TBL").unwrap().is_decrease());
        assert_eq!(table.stitch("purl-slip").unwrap().child_loops(), 0);
        // the manifest's lc2|1 purls its right leg, unlike the built-in
        let lc = table.cable("lc2|1").unwrap();
        assert_eq!(lc.right_crossing_pull_direction(), PullDirection::PURL);
        assert_eq!(table.cable("wide-twist").unwrap().name(), "rc1|1");
    }

    #[test]
    fn invalid_entries_are_rejected() {
        let m = KnitManifest::from_str(
            r#"
[cables.huge]
left = 4
right = 1
lean = "Left"
"#,
        )
        .unwrap();
        let err = m.apply_to(&mut SymbolTable::new()).unwrap_err();
        assert!(format!("{err:#}").contains("cable 'huge'"));

        let m = KnitManifest::from_str(
            r#"
[stitches.double]
child_loops = 2
"#,
        )
        .unwrap();
        assert!(m.apply_to(&mut SymbolTable::new()).is_err());

        assert!(KnitManifest::from_str("[stitches.bad]\ndepth = 3\n").is_err());
    }

    #[test]
    fn find_and_load_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[session]\ncurrent_row = 9\n").unwrap();
        let nested = dir.path().join("patterns/lace");
        std::fs::create_dir_all(&nested).unwrap();

        let (m, found) = KnitManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(found, dir.path());
        assert_eq!(m.session.current_row, Some(9));
    }

    #[test]
    fn find_and_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[session\n").unwrap();
        let err = KnitManifest::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
