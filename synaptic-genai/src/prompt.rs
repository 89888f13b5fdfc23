use synaptic::graph::Category;

pub const SYSTEM_PREAMBLE: &str = "You are a knowledge-mapping assistant that turns documents into \
concept graphs. Respond ONLY with valid JSON.";

/// Build the extraction prompt for `text`.
pub fn build_prompt(text: &str, max_nodes: usize, max_depth: u32) -> String {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    let mut prompt = String::new();

    prompt.push_str("Extract a hierarchical concept map from the document below.\n\n");
    prompt.push_str("IMPORTANT: Your response must be a single JSON object with this shape:\n");
    prompt.push_str(
        r#"{"title": string, "nodes": [{"id": string, "label": string, "level": number, "description": string, "category": string}], "edges": [{"id": string, "from": string, "to": string, "relationship": string}]}"#,
    );
    prompt.push_str("\n\nGuidelines:\n");
    prompt.push_str(&format!("- Use at most {} nodes\n", max_nodes));
    prompt.push_str(&format!(
        "- Exactly one root node at level 0 naming the main topic; levels run from 0 to {}\n",
        max_depth
    ));
    prompt.push_str("- Every non-root node is connected from a node one level above it\n");
    prompt.push_str(
        "- Add a few cross-links between related ideas in different branches, skipping levels where useful\n",
    );
    prompt.push_str("- Node ids are short, unique, lowercase with underscores\n");
    prompt.push_str("- Labels are 1-6 words; descriptions are one or two sentences from the text\n");
    prompt.push_str(&format!("- category is one of: {}\n", categories.join(", ")));
    prompt.push_str("- relationship is a short verb phrase read as \"from relationship to\"\n");
    prompt.push_str("- Ensure all edges reference valid node ids\n\n");

    prompt.push_str("Document:\n");
    prompt.push_str(text);
    prompt.push_str("\n\nGenerate the concept map as JSON.");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt("Cells divide by mitosis.", 12, 3);
        assert!(prompt.contains("at most 12 nodes"));
        assert!(prompt.contains("levels run from 0 to 3"));
        assert!(prompt.contains("principle"));
        assert!(prompt.contains("Cells divide by mitosis."));
        assert!(prompt.contains("JSON"));
    }
}
