//! Techtree CLI — research graph builder and query tool.
//!
//! Usage:
//!   techtree build <records.json> [--lookup <file>] [--out <file>]
//!   techtree closure <records.json> <key> [--lookup <file>]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use techtree::{build, closure, extract_records, sum_costs, Graph, GraphPayload, Lookup};

#[derive(Parser)]
#[command(
    name = "techtree",
    version,
    about = "Research-tree dependency graph engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw records and write the built graph as JSON
    Build {
        /// Path to the raw research tree JSON
        records: PathBuf,
        /// Localization lookup JSON (key -> display text)
        #[arg(long)]
        lookup: Option<PathBuf>,
        /// Output path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the transitive prerequisites and total cost of a node
    Closure {
        /// Path to the raw research tree JSON
        records: PathBuf,
        /// Key of the target node
        key: String,
        /// Localization lookup JSON (key -> display text)
        #[arg(long)]
        lookup: Option<PathBuf>,
    },
}

fn load_json(path: &Path) -> Result<serde_json::Value, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

fn load_lookup(path: Option<&PathBuf>) -> Result<Option<Lookup>, String> {
    let Some(path) = path else { return Ok(None) };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let lookup: Lookup = serde_json::from_str(&raw)
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
    Ok(Some(lookup))
}

/// Load, normalize and build. Returns the normalized record count with the
/// graph so `build` output can report statistics.
fn build_graph(records: &Path, lookup: Option<&PathBuf>) -> Result<(usize, Graph), String> {
    let data = load_json(records)?;
    let nodes = extract_records(&data).map_err(|e| e.to_string())?;
    let lookup = load_lookup(lookup)?;
    let count = nodes.len();
    Ok((count, build(nodes, lookup.as_ref())))
}

fn cmd_build(records: &Path, lookup: Option<&PathBuf>, out: Option<&PathBuf>) -> i32 {
    let (count, graph) = match build_graph(records, lookup) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let payload = GraphPayload::new(count, graph);
    let json = match payload.to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Error: cannot write {}: {}", path.display(), e);
                return 1;
            }
            println!(
                "Wrote {} nodes ({} roots) to {}",
                payload.stats.nodes,
                payload.stats.roots,
                path.display()
            );
        }
        None => println!("{}", json),
    }
    0
}

fn cmd_closure(records: &Path, key: &str, lookup: Option<&PathBuf>) -> i32 {
    let (_, graph) = match build_graph(records, lookup) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let result = closure(&graph, key);
    if result.is_empty() {
        eprintln!("Error: node '{}' not found", key);
        return 1;
    }
    for k in &result.order {
        let label = graph
            .get(k)
            .map(|n| n.display_name())
            .unwrap_or_else(|| k.clone());
        println!("{}  {}", k, label);
    }
    let totals = sum_costs(&graph, &result.order);
    if !totals.is_empty() {
        println!();
        println!("Total cost:");
        for (resource, amount) in totals {
            println!("  {:<24} {}", resource, amount);
        }
    }
    0
}

fn main() {
    // Diagnostics go to stderr; stdout stays parseable JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Build {
            records,
            lookup,
            out,
        } => cmd_build(&records, lookup.as_ref(), out.as_ref()),
        Commands::Closure {
            records,
            key,
            lookup,
        } => cmd_closure(&records, &key, lookup.as_ref()),
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_build_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_file(
            &dir,
            "records.json",
            r#"{
                "Research": {
                    "categories": {
                        "ResearchTree": [{
                            "category": "cat/base",
                            "nodes": {
                                "ResearchNode": [
                                    { "research_name": "research/name/hq" },
                                    {
                                        "research_name": "research/name/wall",
                                        "requirements": {
                                            "ResearchNodeRequirement": [
                                                { "research_name": "research/name/hq" }
                                            ]
                                        }
                                    }
                                ]
                            }
                        }]
                    }
                }
            }"#,
        );
        let out = dir.path().join("graph.json");

        let code = cmd_build(&records, None, Some(&out));
        assert_eq!(code, 0);

        let payload: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(payload["stats"]["nodes"], 2);
        assert_eq!(payload["stats"]["roots"], 1);
        assert_eq!(
            payload["nodes"]["research/name/hq"]["unlocks"][0],
            "research/name/wall"
        );
    }

    #[test]
    fn test_build_rejects_malformed_top_level() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_file(&dir, "records.json", "\"not a record set\"");
        assert_eq!(cmd_build(&records, None, None), 1);
    }

    #[test]
    fn test_closure_reports_missing_node() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_file(
            &dir,
            "records.json",
            r#"{ "ResearchTree": [{ "nodes": { "ResearchNode": [
                { "research_name": "research/name/hq" }
            ]}}]}"#,
        );
        assert_eq!(cmd_closure(&records, "research/name/ghost", None), 1);
        assert_eq!(cmd_closure(&records, "research/name/hq", None), 0);
    }
}
