//! Template recommendation from document content and graph shape.
//!
//! Each profile accumulates points from keyword hits in the source text,
//! relationship-phrase hits in edge labels and a structural signal. The best
//! scoring profile wins; ties go to the earlier profile, so `Hierarchical` (which
//! always carries a base score) is the fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::graph::{Edge, Node, TemplateType};

const KEYWORD_POINTS: u32 = 8;
const KEYWORD_CAP: u32 = 40;
const RELATIONSHIP_POINTS: u32 = 5;
const RELATIONSHIP_CAP: u32 = 25;
const HIERARCHICAL_BASE: u32 = 20;
const CROSS_LINK_DENSITY_THRESHOLD: f64 = 0.15;
const CROSS_LINK_BONUS: u32 = 30;
const SMALL_GRAPH_NODES: usize = 15;
const SMALL_GRAPH_BONUS: u32 = 15;
const DATE_BONUS: u32 = 25;
const MANY_DATES_BONUS: u32 = 15;
const COMPARISON_BONUS: u32 = 20;

struct Profile {
    template: TemplateType,
    keywords: Vec<(String, Regex)>,
    relationships: Vec<String>,
}

impl Profile {
    fn new(template: TemplateType, keywords: &[&str], relationships: &[&str]) -> Self {
        let keywords = keywords
            .iter()
            .filter_map(|kw| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw)))
                    .ok()
                    .map(|re| (kw.to_string(), re))
            })
            .collect();
        Self {
            template,
            keywords,
            relationships: relationships.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn keyword_hits(&self, text: &str) -> Vec<&str> {
        self.keywords
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(kw, _)| kw.as_str())
            .collect()
    }

    fn relationship_hits(&self, edges: &[Edge]) -> usize {
        edges
            .iter()
            .filter(|e| {
                let rel = e.relationship.to_lowercase();
                self.relationships.iter().any(|phrase| rel.contains(phrase.as_str()))
            })
            .count()
    }
}

static PROFILES: Lazy<Vec<Profile>> = Lazy::new(|| {
    vec![
        Profile::new(
            TemplateType::Hierarchical,
            &[
                "types of",
                "categories",
                "classification",
                "consists of",
                "components",
                "hierarchy",
                "parts of",
                "overview",
                "structure",
                "subtypes",
            ],
            &["contains", "includes", "is a", "part of", "consists of", "type of"],
        ),
        Profile::new(
            TemplateType::Concept,
            &[
                "relationship",
                "interact",
                "influence",
                "network",
                "ecosystem",
                "interdependent",
                "feedback",
                "connected",
                "affects",
                "system",
            ],
            &[
                "influences",
                "causes",
                "affects",
                "relates to",
                "depends on",
                "enables",
                "contributes to",
                "regulates",
            ],
        ),
        Profile::new(
            TemplateType::Flowchart,
            &[
                "step",
                "process",
                "procedure",
                "workflow",
                "stage",
                "first",
                "then",
                "next",
                "finally",
                "algorithm",
            ],
            &["leads to", "then", "followed by", "results in", "triggers", "next"],
        ),
        Profile::new(
            TemplateType::Timeline,
            &[
                "history",
                "timeline",
                "century",
                "era",
                "period",
                "chronology",
                "dynasty",
                "revolution",
                "decade",
                "evolution",
            ],
            &["preceded", "followed", "led to", "before", "after", "succeeded"],
        ),
        Profile::new(
            TemplateType::Matrix,
            &[
                "compare",
                "comparison",
                "versus",
                "vs",
                "differences",
                "similarities",
                "contrast",
                "advantages",
                "disadvantages",
                "pros and cons",
            ],
            &[
                "contrasts with",
                "differs from",
                "similar to",
                "compared to",
                "versus",
                "unlike",
            ],
        ),
    ]
});

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecommendation {
    pub template: TemplateType,
    /// Winning score / 100, clamped to 1.0
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateScore {
    pub template: TemplateType,
    pub score: u32,
    pub signals: Vec<String>,
}

/// Fraction of edges whose endpoints differ in level by more than one.
pub fn cross_link_density(nodes: &[Node], edges: &[Edge]) -> f64 {
    if edges.is_empty() {
        return 0.0;
    }
    let levels: std::collections::HashMap<&str, u32> =
        nodes.iter().map(|n| (n.id.as_str(), n.level)).collect();
    let cross = edges
        .iter()
        .filter(|e| match (levels.get(e.from.as_str()), levels.get(e.to.as_str())) {
            (Some(a), Some(b)) => a.abs_diff(*b) > 1,
            _ => false,
        })
        .count();
    cross as f64 / edges.len() as f64
}

/// Score every profile, in profile order.
pub fn score_templates(text: &str, nodes: &[Node], edges: &[Edge]) -> Vec<TemplateScore> {
    let density = cross_link_density(nodes, edges);
    let date_count = dates::count_distinct_dates(text);

    PROFILES
        .iter()
        .map(|profile| {
            let mut signals = Vec::new();
            let mut score = 0;

            let keywords = profile.keyword_hits(text);
            if !keywords.is_empty() {
                score += (keywords.len() as u32 * KEYWORD_POINTS).min(KEYWORD_CAP);
                signals.push(format!("keywords: {}", keywords.join(", ")));
            }

            let relationships = profile.relationship_hits(edges);
            if relationships > 0 {
                score += (relationships as u32 * RELATIONSHIP_POINTS).min(RELATIONSHIP_CAP);
                signals.push(format!("{} matching relationships", relationships));
            }

            match profile.template {
                TemplateType::Hierarchical => {
                    score += HIERARCHICAL_BASE;
                    signals.push("default structure".to_string());
                }
                TemplateType::Concept if density > CROSS_LINK_DENSITY_THRESHOLD => {
                    score += CROSS_LINK_BONUS;
                    signals.push(format!("{:.0}% cross-links", density * 100.0));
                }
                TemplateType::Flowchart if !nodes.is_empty() && nodes.len() < SMALL_GRAPH_NODES => {
                    score += SMALL_GRAPH_BONUS;
                    signals.push(format!("compact graph ({} nodes)", nodes.len()));
                }
                TemplateType::Timeline if date_count > 0 => {
                    score += DATE_BONUS;
                    if date_count >= 3 {
                        score += MANY_DATES_BONUS;
                    }
                    signals.push(format!("{} date references", date_count));
                }
                TemplateType::Matrix if keywords.len() >= 2 => {
                    score += COMPARISON_BONUS;
                    signals.push("comparison vocabulary".to_string());
                }
                _ => {}
            }

            TemplateScore {
                template: profile.template,
                score,
                signals,
            }
        })
        .collect()
}

/// Recommend the best template for `text` and its extracted graph.
pub fn recommend(text: &str, nodes: &[Node], edges: &[Edge]) -> TemplateRecommendation {
    let scores = score_templates(text, nodes, edges);

    let best = scores
        .iter()
        .fold(None::<&TemplateScore>, |best, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        });

    match best {
        Some(best) if best.score > 0 => TemplateRecommendation {
            template: best.template,
            confidence: (best.score as f64 / 100.0).min(1.0),
            reason: format!(
                "{} scored {} ({})",
                best.template,
                best.score,
                best.signals.join("; ")
            ),
        },
        _ => TemplateRecommendation {
            template: TemplateType::Hierarchical,
            confidence: HIERARCHICAL_BASE as f64 / 100.0,
            reason: "No distinguishing signals; using hierarchical".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(count: usize) -> Vec<Node> {
        let mut nodes = vec![Node::new("root", "Root", 0)];
        for i in 1..count {
            nodes.push(Node::new(format!("n{i}"), format!("Node {i}"), 1));
        }
        nodes
    }

    #[test]
    fn test_plain_text_falls_back_to_hierarchical() {
        let text = "Mitochondria produce energy for cells.";
        let rec = recommend(text, &nodes(20), &[]);
        assert_eq!(rec.template, TemplateType::Hierarchical);
        assert!((rec.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_is_hierarchical() {
        let rec = recommend("", &[], &[]);
        assert_eq!(rec.template, TemplateType::Hierarchical);
    }

    #[test]
    fn test_timeline_wins_on_history_with_dates() {
        let text = "The history of the industrial revolution: in 1760 steam power, \
                    by 1830 railways, and in 1879 electric light changed the era.";
        let rec = recommend(text, &nodes(20), &[]);
        assert_eq!(rec.template, TemplateType::Timeline);
        assert!(rec.reason.contains("date references"));
    }

    #[test]
    fn test_concept_wins_on_cross_links() {
        let nodes = vec![
            Node::new("r", "R", 0),
            Node::new("a", "A", 1),
            Node::new("b", "B", 1),
            Node::new("a1", "A1", 2),
            Node::new("a2", "A2", 3),
        ];
        let edges = vec![
            Edge::new("e1", "r", "a", "has"),
            Edge::new("e2", "r", "b", "has"),
            Edge::new("e3", "a", "a1", "has"),
            Edge::new("e4", "b", "a2", "influences"),
            Edge::new("e5", "r", "a2", "affects"),
        ];
        assert!((cross_link_density(&nodes, &edges) - 0.4).abs() < 1e-9);
        let text = "Predators influence prey populations across the ecosystem network.";
        let mut many = nodes.clone();
        for i in 0..20 {
            many.push(Node::new(format!("x{i}"), "X", 1));
        }
        let rec = recommend(text, &many, &edges);
        assert_eq!(rec.template, TemplateType::Concept);
    }

    #[test]
    fn test_matrix_on_comparison_vocabulary() {
        let text = "Compare mitosis versus meiosis: the differences and similarities.";
        let rec = recommend(text, &nodes(20), &[]);
        assert_eq!(rec.template, TemplateType::Matrix);
        assert!(rec.confidence <= 1.0);
    }

    #[test]
    fn test_flowchart_bonus_for_small_graphs() {
        let scores = score_templates("", &nodes(5), &[]);
        let flow = scores
            .iter()
            .find(|s| s.template == TemplateType::Flowchart)
            .unwrap();
        assert_eq!(flow.score, SMALL_GRAPH_BONUS);
        // still below the hierarchical base without other signals
        assert_eq!(recommend("", &nodes(5), &[]).template, TemplateType::Hierarchical);
    }

    #[test]
    fn test_keyword_contribution_is_capped() {
        let text = "history timeline century era period chronology dynasty revolution decade evolution";
        let scores = score_templates(text, &nodes(20), &[]);
        let timeline = scores
            .iter()
            .find(|s| s.template == TemplateType::Timeline)
            .unwrap();
        assert_eq!(timeline.score, KEYWORD_CAP);
    }
}
