use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use synaptic::graph::Graph;
use synaptic::layout::{LayoutEngine, MapType};
use synaptic::template::{self, TemplateRecommendation};
use synaptic_genai::{
    ChunkOptions, ExtractionConfig, GraphExtractor, LlmProvider, ProviderSettings,
    RigCompletionProvider,
};
use tracing::{info, warn};

use crate::common::{read_graph, read_text, render, write_output, OutputFormat};

pub struct ExtractArgs {
    pub input: String,
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
    pub chunked: bool,
    pub max_nodes: Option<usize>,
    pub max_depth: Option<u32>,
    pub output: Option<String>,
}

pub async fn extract(args: ExtractArgs) -> Result<()> {
    let text = read_text(&args.input)?;
    let settings = ProviderSettings::from_env();
    let provider = RigCompletionProvider::from_settings(&settings, args.provider, args.model)?;
    info!(
        "Extracting {} with {} ({})",
        args.input,
        provider.provider().display_name(),
        provider.model()
    );

    let mut config = ExtractionConfig::default();
    if let Some(max_nodes) = args.max_nodes {
        config.max_nodes = max_nodes;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }

    let extractor = GraphExtractor::new(Arc::new(provider)).with_config(config);
    let cancel = extractor.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; stopping before the next chunk");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let graph = run_extraction(&extractor, &text, args.chunked).await?;
    info!("{}", graph.stats());
    write_output(args.output.as_deref(), &render(&graph, OutputFormat::Json)?)
}

pub async fn run_extraction(extractor: &GraphExtractor, text: &str, chunked: bool) -> Result<Graph> {
    let graph = if chunked {
        extractor
            .extract_chunked(text, &ChunkOptions::default(), |progress| {
                info!("[{}/{}] {}", progress.current, progress.total, progress.message);
            })
            .await
            .context("Chunked extraction failed")?
    } else {
        extractor.extract(text).await.context("Extraction failed")?
    };
    Ok(graph)
}

pub fn layout(
    path: &str,
    map_type: Option<MapType>,
    format: OutputFormat,
    output: Option<&str>,
) -> Result<()> {
    let graph = read_graph(path)?;
    let rendered = layout_to_string(&graph, map_type, format)
        .with_context(|| format!("Failed to lay out {path}"))?;
    write_output(output, &rendered)
}

pub fn layout_to_string(
    graph: &Graph,
    map_type: Option<MapType>,
    format: OutputFormat,
) -> Result<String> {
    if let Err(problems) = graph.verify_graph_integrity() {
        for problem in &problems {
            warn!("{}", problem);
        }
    }
    let positioned = LayoutEngine::default().layout(graph, map_type)?;
    info!(
        "Laid out {} as {} ({} nodes, {} edges)",
        graph.title,
        positioned.map_type,
        positioned.nodes.len(),
        positioned.edges.len()
    );
    render(&positioned, format)
}

pub fn recommend(input: &str, graph: Option<&str>) -> Result<()> {
    let text = read_text(input)?;
    let graph = graph.map(read_graph).transpose()?;
    let recommendation = recommendation_for(&text, graph.as_ref());
    write_output(None, &render(&recommendation, OutputFormat::Json)?)
}

pub fn recommendation_for(text: &str, graph: Option<&Graph>) -> TemplateRecommendation {
    match graph {
        Some(graph) => template::recommend(text, &graph.nodes, &graph.edges),
        None => template::recommend(text, &[], &[]),
    }
}
