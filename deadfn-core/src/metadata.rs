//! Per-function metadata extracted from the call-graph dump text.

use regex::Regex;
use std::sync::OnceLock;

/// Reference-count hint for one function, parsed from its header line.
///
/// Recomputed per query from the dump text, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionMetadata {
    pub name: String,
    /// `#uses=N` from the node header; 0 when the node or hint is absent.
    pub uses_hint: u32,
}

fn uses_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)#uses=(\d+)").expect("Hardcoded regex pattern is valid"))
}

/// Extract the `#uses=` hint for `target` from its header line.
///
/// The header match is line-anchored and case-sensitive on the name.
pub fn extract_function_metadata(graph_text: &str, target: &str) -> FunctionMetadata {
    let mut metadata = FunctionMetadata {
        name: target.to_string(),
        uses_hint: 0,
    };

    let pattern = format!(
        r"(?m)^Call graph node for function:\s*'{}'[^\n]*",
        regex::escape(target)
    );
    let Ok(header) = Regex::new(&pattern) else {
        return metadata;
    };

    if let Some(node_line) = header.find(graph_text) {
        if let Some(caps) = uses_regex().captures(node_line.as_str()) {
            metadata.uses_hint = caps[1].parse().unwrap_or(0);
        }
    }

    metadata
}
