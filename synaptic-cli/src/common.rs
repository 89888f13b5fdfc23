use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use synaptic::graph::Graph;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize as JSON")
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to serialize as YAML"),
    }
}

/// Write to `path`, or stdout when no path is given.
pub fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content).with_context(|| format!("Failed to write {path}")),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

pub fn read_text(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
}

/// Graphs are stored as JSON; YAML is accepted too.
pub fn read_graph(path: &str) -> Result<Graph> {
    let content = read_text(path)?;
    let mut graph: Graph = if path.ends_with(".yaml") || path.ends_with(".yml") {
        serde_yaml::from_str(&content).with_context(|| format!("Invalid graph YAML in {path}"))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("Invalid graph JSON in {path}"))?
    };
    graph.recompute_metadata();
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synaptic_test_utils::{GraphBuilder, TempDir};

    #[test]
    fn test_graph_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let graph = GraphBuilder::new("Cells")
            .root("root", "Cell")
            .child("root", "n", "Nucleus")
            .build();

        let json_path = dir.path().join("graph.json");
        let json_path = json_path.to_string_lossy().to_string();
        write_output(Some(&json_path), &render(&graph, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(read_graph(&json_path).unwrap(), graph);

        let yaml_path = dir.path().join("graph.yaml");
        let yaml_path = yaml_path.to_string_lossy().to_string();
        write_output(Some(&yaml_path), &render(&graph, OutputFormat::Yaml).unwrap()).unwrap();
        assert_eq!(read_graph(&yaml_path).unwrap(), graph);
    }

    #[test]
    fn test_read_graph_recomputes_stale_metadata() {
        let dir = TempDir::new().unwrap();
        let mut graph = GraphBuilder::new("Cells")
            .root("root", "Cell")
            .child("root", "n", "Nucleus")
            .describe("n", "Holds the genetic material")
            .build();
        graph.metadata.total_nodes = 99;
        graph.metadata.max_depth = 7;

        let path = dir
            .write("stale.json", &render(&graph, OutputFormat::Json).unwrap())
            .unwrap();
        let loaded = read_graph(&path.to_string_lossy()).unwrap();
        assert_eq!(loaded.metadata.total_nodes, 2);
        assert_eq!(loaded.metadata.max_depth, 1);
        assert_eq!(
            loaded.get_node_by_id("n").unwrap().description,
            "Holds the genetic material"
        );
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_graph("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
