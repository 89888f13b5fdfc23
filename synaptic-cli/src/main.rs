mod commands;
mod common;

use anyhow::Result;
use clap::{Parser, Subcommand};
use synaptic::layout::MapType;
use synaptic_genai::LlmProvider;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::common::OutputFormat;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a concept graph from a text document
    Extract {
        #[clap(short, long)]
        input: String,
        #[clap(short, long, value_enum)]
        provider: Option<LlmProvider>,
        #[clap(short, long)]
        model: Option<String>,
        /// Split long documents and merge per-chunk graphs
        #[clap(long)]
        chunked: bool,
        #[clap(long)]
        max_nodes: Option<usize>,
        #[clap(long)]
        max_depth: Option<u32>,
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Lay out a graph file for rendering
    Layout {
        #[clap(short, long)]
        graph: String,
        /// Defaults to the graph's own template
        #[clap(short, long)]
        map_type: Option<MapType>,
        #[clap(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Recommend a template for a document
    Recommend {
        #[clap(short, long)]
        input: String,
        /// Previously extracted graph, for structural signals
        #[clap(short, long)]
        graph: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(args.log_level.as_deref());

    match args.command {
        Commands::Extract {
            input,
            provider,
            model,
            chunked,
            max_nodes,
            max_depth,
            output,
        } => {
            commands::extract(commands::ExtractArgs {
                input,
                provider,
                model,
                chunked,
                max_nodes,
                max_depth,
                output,
            })
            .await?;
        }
        Commands::Layout {
            graph,
            map_type,
            format,
            output,
        } => {
            commands::layout(&graph, map_type, format, output.as_deref())?;
        }
        Commands::Recommend { input, graph } => {
            commands::recommend(&input, graph.as_deref())?;
        }
    }

    Ok(())
}

/// Crates whose events follow `--log-level`; everything else stays at warn.
const LOG_TARGETS: [&str; 3] = ["synaptic", "synaptic_genai", "synaptic_cli"];

fn parse_level(log_level: Option<&str>) -> Level {
    log_level
        .and_then(|level| level.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// `RUST_LOG` wins when set; otherwise synaptic's own crates log at the
/// requested level and dependencies (rig, hyper) only surface warnings.
fn log_filter(log_level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(filter_directives(parse_level(log_level)))
}

fn filter_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    std::iter::once("warn".to_string())
        .chain(LOG_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn setup_logging(log_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
