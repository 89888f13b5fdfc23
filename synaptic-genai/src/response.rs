//! Parsing and validating the provider's JSON payload.
//!
//! The payload is deserialized into loose `Raw*` structs first, then checked
//! element by element so failures can name the offending index.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use synaptic::errors::{GraphError, GraphResult};
use synaptic::graph::{is_reserved_id, Category, Edge, Graph, Node, RESERVED_ID_PREFIX};

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*\n?(.*?)\s*```").expect("static regex"));

pub const DEFAULT_RELATIONSHIP: &str = "contains";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawGraph {
    pub title: Option<Value>,
    pub nodes: Option<Value>,
    pub edges: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNode {
    pub id: Option<Value>,
    pub label: Option<Value>,
    pub level: Option<Value>,
    pub description: Option<Value>,
    pub category: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawEdge {
    pub id: Option<Value>,
    pub from: Option<Value>,
    pub to: Option<Value>,
    #[serde(alias = "label")]
    pub relationship: Option<Value>,
}

/// Remove a surrounding Markdown code fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    }
}

/// Strings pass through; numbers (a common LLM habit for ids) are stringified.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn level_of(value: Option<&Value>) -> u32 {
    let level = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    level.map(|l| l.min(u32::MAX as u64) as u32).unwrap_or(0)
}

fn parse_json(body: &str) -> GraphResult<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(value),
        Err(first) => {
            // Tolerate prose around the object
            let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
                return Err(GraphError::MalformedGraph(format!("invalid JSON: {first}")));
            };
            if end <= start {
                return Err(GraphError::MalformedGraph(format!("invalid JSON: {first}")));
            }
            serde_json::from_str(&body[start..=end])
                .map_err(|err| GraphError::MalformedGraph(format!("invalid JSON: {err}")))
        }
    }
}

fn validate_node(index: usize, value: Value) -> GraphResult<Node> {
    let raw: RawNode = serde_json::from_value(value).map_err(|err| GraphError::InvalidNode {
        index,
        reason: format!("not an object: {err}"),
    })?;

    let id = text_of(raw.id.as_ref()).ok_or_else(|| GraphError::InvalidNode {
        index,
        reason: "missing `id`".to_string(),
    })?;
    if is_reserved_id(&id) {
        return Err(GraphError::InvalidNode {
            index,
            reason: format!("id {id:?} uses the reserved prefix {RESERVED_ID_PREFIX}"),
        });
    }
    let label = text_of(raw.label.as_ref()).ok_or_else(|| GraphError::InvalidNode {
        index,
        reason: "missing `label`".to_string(),
    })?;

    let category = text_of(raw.category.as_ref())
        .map(|c| Category::from_str_lossy(&c))
        .unwrap_or_default();

    Ok(Node::new(id, label, level_of(raw.level.as_ref()))
        .with_description(text_of(raw.description.as_ref()).unwrap_or_default())
        .with_category(category))
}

fn validate_edge(index: usize, value: Value) -> GraphResult<Edge> {
    let raw: RawEdge = serde_json::from_value(value).map_err(|err| GraphError::InvalidEdge {
        index,
        reason: format!("not an object: {err}"),
    })?;

    let from = text_of(raw.from.as_ref()).ok_or_else(|| GraphError::InvalidEdge {
        index,
        reason: "missing `from`".to_string(),
    })?;
    let to = text_of(raw.to.as_ref()).ok_or_else(|| GraphError::InvalidEdge {
        index,
        reason: "missing `to`".to_string(),
    })?;

    let id = text_of(raw.id.as_ref()).unwrap_or_else(|| format!("edge_{index}"));
    if is_reserved_id(&id) {
        return Err(GraphError::InvalidEdge {
            index,
            reason: format!("id {id:?} uses the reserved prefix {RESERVED_ID_PREFIX}"),
        });
    }

    Ok(Edge::new(
        id,
        from,
        to,
        text_of(raw.relationship.as_ref()).unwrap_or_else(|| DEFAULT_RELATIONSHIP.to_string()),
    ))
}

/// Parse a provider response into a validated graph.
///
/// Unknown edge endpoints are not rejected here; callers report them as
/// diagnostics.
pub fn parse_graph(raw: &str, fallback_title: &str) -> GraphResult<Graph> {
    let value = parse_json(strip_code_fences(raw))?;
    if !value.is_object() {
        return Err(GraphError::MalformedGraph(
            "response is not a JSON object".to_string(),
        ));
    }
    let payload: RawGraph = serde_json::from_value(value)
        .map_err(|err| GraphError::MalformedGraph(err.to_string()))?;

    let Some(Value::Array(raw_nodes)) = payload.nodes else {
        return Err(GraphError::MalformedGraph(
            "`nodes` is missing or not an array".to_string(),
        ));
    };
    let Some(Value::Array(raw_edges)) = payload.edges else {
        return Err(GraphError::MalformedGraph(
            "`edges` is missing or not an array".to_string(),
        ));
    };

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for (index, value) in raw_nodes.into_iter().enumerate() {
        let node = validate_node(index, value)?;
        if !seen.insert(node.id.clone()) {
            return Err(GraphError::InvalidNode {
                index,
                reason: format!("duplicate id {:?}", node.id),
            });
        }
        nodes.push(node);
    }

    let edges = raw_edges
        .into_iter()
        .enumerate()
        .map(|(index, value)| validate_edge(index, value))
        .collect::<GraphResult<Vec<_>>>()?;

    let title = text_of(payload.title.as_ref())
        .or_else(|| nodes.iter().find(|n| n.is_root()).map(|n| n.label.clone()))
        .unwrap_or_else(|| fallback_title.to_string());

    Ok(Graph::new(title, nodes, edges))
}
