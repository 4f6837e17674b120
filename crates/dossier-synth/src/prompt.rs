//! The fixed instruction template sent with every context block.
//!
//! The model is steered by this text alone; [`crate::response::parse_dossier`]
//! enforces the same shape on the way back.

const PREAMBLE: &str = "You are analyzing a source repository to produce technical portfolio metadata.";

const SCHEMA: &str = r#"{
  "title": "Concise project name (2-4 words)",
  "tagline": "One sentence: what does this project do?",
  "category": "one of: ai | blockchain | automation | security | enterprise | robotics",
  "status": "one of: Production | Experimental | Archived | Live",

  "problem": "2-3 paragraphs on the technical or strategic problem solved and the gap in existing solutions.",

  "solution": "2-3 paragraphs on how the code solves it: architecture, key algorithms, design decisions. Name specific files and functions.",

  "challenges": [
    "Technical challenge grounded in an actual code pattern",
    "Another challenge with context from the implementation"
  ],

  "stats": [
    {"label": "System Modules", "value": "count"},
    {"label": "Complexity", "value": "high | med | low"},
    {"label": "Core Logic Files", "value": "number"}
  ],

  "metrics": [
    {"label": "Engineering metric", "value": "quantified value", "context": "Why it matters in this architecture"}
  ],

  "lessons": [
    "Architectural insight taken from the code",
    "Implementation pattern used effectively"
  ],

  "personalNotes": "2-3 sentences from the lead engineer's point of view: what was surprising, what was hardest.",

  "techStack": [
    {"name": "Technology", "why": "Its role in THIS project, citing files where it is used"}
  ],

  "aiContext": "Exhaustive technical brief for AI retrieval: module-by-module build order, text data-flow diagrams of the critical paths, a signature map of key types and functions, internal logic not visible from a summary, and file references for core logic.",

  "futureWork": ["Specific improvement", "Enhancement"]
}"#;

const RULES: &str = "Rules:
- Use the FULL repository contents above. Reference specific files, functions and patterns.
- Be specific and technical. Quote real identifiers and signatures.
- Every key above is required. `category` and `status` must be one of the listed values exactly.
- `aiContext` must be a complete technical brief of the whole system flow.
- Return ONLY valid JSON. No markdown fences, no commentary.";

/// Build the instruction text for one synthesis request.
pub fn build_prompt(context: &str, repo_url: &str) -> String {
    format!(
        "{PREAMBLE}\n\nFULL REPOSITORY CONTENTS:\n{context}\n\nRepository URL: {repo_url}\n\n\
         Generate a detailed technical dossier as a single JSON object with exactly this shape:\n\n\
         {SCHEMA}\n\n{RULES}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context_and_url() {
        let prompt = build_prompt("\n--- FILE: a.py ---\nprint(1)", "https://example.com/org/repo");
        assert!(prompt.contains("--- FILE: a.py ---\nprint(1)"));
        assert!(prompt.contains("Repository URL: https://example.com/org/repo"));
    }

    #[test]
    fn test_prompt_names_every_schema_key() {
        let prompt = build_prompt("", "u");
        for key in [
            "title",
            "tagline",
            "category",
            "status",
            "problem",
            "solution",
            "challenges",
            "stats",
            "metrics",
            "lessons",
            "personalNotes",
            "techStack",
            "aiContext",
            "futureWork",
        ] {
            assert!(prompt.contains(&format!("\"{key}\"")), "missing {key}");
        }
    }
}
