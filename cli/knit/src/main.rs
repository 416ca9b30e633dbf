//! Knit CLI: inspect knit graphs and the stitch symbol table.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use knit_speak::SymbolTable;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use manifest::KnitManifest;

#[derive(Parser)]
#[command(name = "knit", version, about = "Knit graph and stitch symbol tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a knit.toml (default: searched upward from the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List the symbol table
    Symbols {
        /// Only list one kind (stitch, cable, variable)
        #[arg(long)]
        kind: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
    /// Show one symbol in detail
    Lookup {
        /// Symbol name (case-insensitive)
        name: String,
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
    /// Partition a serialized knit graph into courses
    Courses {
        /// Graph JSON file
        #[arg(long)]
        input: PathBuf,
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
    /// Summarize a serialized knit graph
    Inspect {
        /// Graph JSON file
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "knit={0},knit_core={0},knit_speak={0}",
            cli.log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Symbols { kind, export } => {
            let table = session_table(cli.config.as_deref(), &cwd)?;
            commands::symbols::run(&table, kind.as_deref(), export.as_deref())
        }
        Commands::Lookup { name, export } => {
            let table = session_table(cli.config.as_deref(), &cwd)?;
            commands::lookup::run(&table, &name, export.as_deref())
        }
        Commands::Courses { input, export } => commands::courses::run(&input, export.as_deref()),
        Commands::Inspect { input } => commands::inspect::run(&input),
    }
}

/// Load the manifest from `--config`, or search upward from `cwd`. Returns
/// `None` when no manifest is found.
fn load_manifest(config: Option<&Path>, cwd: &Path) -> anyhow::Result<Option<KnitManifest>> {
    match config {
        Some(path) => KnitManifest::load(path).map(Some),
        None => Ok(KnitManifest::find_and_load(cwd)?.map(|(manifest, dir)| {
            tracing::debug!(dir = %dir.display(), "found manifest");
            manifest
        })),
    }
}

/// The built-in symbol table with any manifest definitions applied.
fn session_table(config: Option<&Path>, cwd: &Path) -> anyhow::Result<SymbolTable> {
    let mut table = SymbolTable::new();
    if let Some(manifest) = load_manifest(config, cwd)? {
        manifest.apply_to(&mut table)?;
    }
    Ok(table)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::commands::Export;
    use knit_core::{KnitGraph, Yarn};
    use knit_speak::{CarriageDirection, CourseExpander};

    /// 3 wide, 3 high, with a cable crossing on the middle course.
    fn swatch() -> KnitGraph {
        let table = SymbolTable::new();
        let mut graph = KnitGraph::new();
        graph.add_yarn(Yarn::new("yarn")).unwrap();
        let mut course: Vec<_> = (0..3)
            .map(|_| graph.add_loop_to_yarn("yarn", false).unwrap())
            .collect();
        let rows: [&[&str]; 2] = [&["k", "rc1|1"], &["p", "yo", "k2tog"]];
        let mut direction = CarriageDirection::RightToLeft;
        for row in rows {
            let mut expander = CourseExpander::new(&mut graph, "yarn", &course, direction);
            for name in row {
                expander.work(&table, name).unwrap();
            }
            course = expander.finish().unwrap();
            direction = direction.opposite();
        }
        graph
    }

    fn write_graph(dir: &Path, graph: &KnitGraph) -> PathBuf {
        let path = dir.join("graph.json");
        std::fs::write(&path, serde_json::to_string_pretty(graph).unwrap()).unwrap();
        path
    }

    #[test]
    fn courses_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_graph(dir.path(), &swatch());

        let graph = commands::load_graph(&path).unwrap();
        let text = commands::courses::render(&graph, Export::Text).unwrap();
        assert!(text.starts_with("Courses (3):"));
        assert!(text.contains("   0: 0 1 2"));
        assert!(text.contains("   1: 3 4 5"));

        let json = commands::courses::render(&graph, Export::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["course_to_loops"][2].as_array().unwrap().len(), 3);

        commands::courses::run(&path, Some("json")).unwrap();
    }

    #[test]
    fn inspect_counts_stitch_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_graph(dir.path(), &swatch());
        let graph = commands::load_graph(&path).unwrap();

        let text = commands::inspect::render(&graph).unwrap();
        assert!(text.contains("Loops:      9"));
        assert!(text.contains("Courses:    3"));
        assert!(text.contains("Yarn-overs: 1"));
        assert!(text.contains("Decreases:  1"));
        assert!(text.contains("Crossing:   2"));
        assert!(text.contains("Knit/purl:  5/1"));
        assert!(text.contains("0..=8"));
    }

    #[test]
    fn broken_graph_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        // the edge runs from a later loop to an earlier one
        std::fs::write(
            &path,
            r#"{
                "yarns": ["yarn"],
                "loops": [{"id": 0, "yarn": "yarn"}, {"id": 1, "yarn": "yarn"}],
                "edges": [{"parent": 1, "child": 0, "pull_direction": "FrontToBack", "depth": 0, "parent_offset": 0}]
            }"#,
        )
        .unwrap();

        let err = commands::load_graph(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("parsing"));
        assert!(message.contains("must be created before"), "{message}");
        assert!(commands::inspect::run(&path).is_err());
        assert!(commands::inspect::run(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn log_level_is_restricted() {
        let cli = Cli::try_parse_from(["knit", "symbols", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        let cli = Cli::try_parse_from(["knit", "symbols"]).unwrap();
        assert_eq!(cli.log_level, "warn");
        assert!(Cli::try_parse_from(["knit", "symbols", "--log-level", "verbose"]).is_err());
    }

    #[test]
    fn session_table_uses_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("custom.toml");
        std::fs::write(
            &config,
            "[session]\ncurrent_row = 4\n\n[stitches.kfb]\noffsets = [0]\n",
        )
        .unwrap();

        let table = session_table(Some(&config), dir.path()).unwrap();
        assert_eq!(table.current_row(), 4);
        assert!(table.contains("KFB"));

        let out = commands::lookup::render(&table, "current_row", Export::Text).unwrap();
        assert!(out.contains("Value: 4"));
    }

    #[test]
    fn session_table_finds_manifest_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("knit.toml"),
            "[cables.twist]\nleft = 1\nright = 1\nlean = \"Left\"\n",
        )
        .unwrap();
        let nested = dir.path().join("rows");
        std::fs::create_dir_all(&nested).unwrap();

        let table = session_table(None, &nested).unwrap();
        assert_eq!(table.len(), 86);
        assert_eq!(table.cable("twist").unwrap().name(), "lc1|1");

        let missing = session_table(Some(&dir.path().join("nope.toml")), dir.path());
        assert!(missing.is_err());
    }
}
