//! Call graph parsing from LLVM `print-callgraph` textual dumps.
//!
//! Builds a directed graph where:
//! - Nodes are functions that had a header line in the dump
//! - Edges represent calls (A -> B means A calls B)
//!
//! The parser is a single forward pass over lines. A header line sets the
//! "current node"; indented call lines attach edges to it until the next
//! header. Lines matching neither pattern are skipped, so malformed input
//! degrades coverage but never fails the parse.
//!
//! # Performance Characteristics
//!
//! - Parse: O(|lines|) single pass, pre-compiled regexes via `OnceLock`
//! - Adjacency lookup: O(log n) per neighbor set (`BTreeMap`-backed sets
//!   keep iteration deterministic and pre-sorted)

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Pseudo-node emitted by LLVM for externally-visible call edges.
///
/// It is kept out of function listings; a dump may still reference it.
pub const NULL_NODE: &str = "<null>";

/// Header line: `Call graph node for function: '<name>'  ... #uses=N`.
fn node_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^Call graph node for function:\s*'([^']+)'")
            .expect("Hardcoded regex pattern is valid")
    })
}

/// Call line: `  CS<0x...> calls function '<name>'`.
///
/// The keyword is case-insensitive; the function name is case-sensitive.
fn call_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:CS<[^>]*>\s+)?(?i:calls function)\s+'([^']+)'")
            .expect("Hardcoded regex pattern is valid")
    })
}

/// A call graph parsed from a textual dump.
///
/// The reverse map is authoritative for "who calls me" - it covers every
/// name that ever appeared as a callee, header or not. The forward map is
/// complete (including empty entries) only for names that had a header line.
/// Immutable once parsed.
#[derive(Debug, Default)]
pub struct CallGraph {
    /// Functions that had a header line in the dump.
    nodes: BTreeSet<String>,
    /// caller -> callees
    forward: HashMap<String, BTreeSet<String>>,
    /// callee -> callers
    reverse: HashMap<String, BTreeSet<String>>,
    /// Distinct (caller, callee) pairs recorded.
    edge_count: usize,
}

impl CallGraph {
    /// Parse a call graph from dump text.
    ///
    /// Empty input yields an empty graph, not an error. A line that starts
    /// like a node header but carries no quoted name (LLVM's
    /// `<<null function>>` node) resets the current node so its call lines
    /// are dropped instead of attaching to the previous function.
    pub fn parse(text: &str) -> Self {
        let mut graph = Self::default();
        let mut current: Option<String> = None;

        for line in text.lines() {
            if let Some(caps) = node_header_regex().captures(line) {
                let name = caps[1].to_string();
                graph.forward.entry(name.clone()).or_default();
                graph.nodes.insert(name.clone());
                current = Some(name);
                continue;
            }
            if line.starts_with("Call graph node") {
                // Header-shaped line without a usable name.
                current = None;
                continue;
            }
            if let Some(caller) = &current {
                if let Some(caps) = call_line_regex().captures(line) {
                    let callee = caps[1].to_string();
                    graph.add_edge(caller.clone(), callee);
                }
            }
            // Anything else: ParseSkip.
        }

        graph
    }

    /// Record a caller -> callee edge in both adjacency maps.
    fn add_edge(&mut self, caller: String, callee: String) {
        let inserted = self
            .forward
            .entry(caller.clone())
            .or_default()
            .insert(callee.clone());
        self.reverse.entry(callee).or_default().insert(caller);
        if inserted {
            self.edge_count += 1;
        }
    }

    /// Number of header'd nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// True when the dump contained no usable header lines.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `name` had its own header line.
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    /// All header'd function names, sorted, with the `<null>` pseudo-node
    /// dropped.
    pub fn node_names(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.as_str() != NULL_NODE)
            .cloned()
            .collect()
    }

    /// Callee set of `name`, if `name` had a header line or recorded edges.
    pub fn callees_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.forward.get(name)
    }

    /// Caller set of `name`, if anything calls it.
    pub fn callers_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.reverse.get(name)
    }

    /// Direct callees of `name`, sorted.
    pub fn direct_callees(&self, name: &str) -> Vec<String> {
        self.callees_of(name)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Direct callers of `name`, sorted.
    pub fn direct_callers(&self, name: &str) -> Vec<String> {
        self.callers_of(name)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
Call graph node for function: 'main'<<0x1>>  #uses=1
  CS<0x10> calls function 'helper'
  CS<0x11> calls function 'logger'

Call graph node for function: 'helper'<<0x2>>  #uses=2
  CS<0x12> calls function 'logger'

Call graph node for function: 'orphan'<<0x3>>  #uses=0
";

    #[test]
    fn test_parse_nodes_and_edges() {
        let g = CallGraph::parse(DUMP);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.direct_callees("main"), vec!["helper", "logger"]);
        assert_eq!(g.direct_callers("logger"), vec!["helper", "main"]);
    }

    #[test]
    fn test_header_without_calls_has_empty_forward_entry() {
        let g = CallGraph::parse(DUMP);
        assert!(g.has_node("orphan"));
        assert!(g.callees_of("orphan").unwrap().is_empty());
    }

    #[test]
    fn test_callee_without_header_is_valid_endpoint() {
        let g = CallGraph::parse(DUMP);
        // 'logger' never had a header line but is a legal edge endpoint.
        assert!(!g.has_node("logger"));
        assert!(!g.direct_callers("logger").is_empty());
        assert!(g.direct_callees("logger").is_empty());
    }

    #[test]
    fn test_edge_symmetry_invariant() {
        let g = CallGraph::parse(DUMP);
        for caller in &g.nodes {
            if let Some(callees) = g.callees_of(caller) {
                for callee in callees {
                    assert!(
                        g.callers_of(callee).is_some_and(|c| c.contains(caller)),
                        "edge ({caller},{callee}) missing from reverse map"
                    );
                }
            }
        }
        for (callee, callers) in &g.reverse {
            for caller in callers {
                assert!(
                    g.callees_of(caller).is_some_and(|c| c.contains(callee)),
                    "edge ({caller},{callee}) missing from forward map"
                );
            }
        }
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "\
garbage line
Call graph node for function: 'a'
  totally unrelated
  CS<0x1> calls function 'b'
more garbage
";
        let g = CallGraph::parse(text);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.direct_callees("a"), vec!["b"]);
    }

    #[test]
    fn test_null_node_header_resets_current() {
        let text = "\
Call graph node for function: 'a'
  CS<0x1> calls function 'b'
Call graph node <<null function>><<0x0>>  #uses=0
  CS<0x2> calls function 'c'
";
        let g = CallGraph::parse(text);
        // 'c' must not be misattributed to 'a'.
        assert_eq!(g.direct_callees("a"), vec!["b"]);
        assert!(g.direct_callers("c").is_empty());
    }

    #[test]
    fn test_call_keyword_case_insensitive_name_case_sensitive() {
        let text = "\
Call graph node for function: 'a'
  CS<0x1> CALLS FUNCTION 'Mixed'
";
        let g = CallGraph::parse(text);
        assert_eq!(g.direct_callees("a"), vec!["Mixed"]);
        assert!(g.direct_callers("mixed").is_empty());
    }

    #[test]
    fn test_header_must_be_line_anchored() {
        let text = "  Call graph node for function: 'indented'\n";
        let g = CallGraph::parse(text);
        assert!(g.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let g = CallGraph::parse("");
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.node_names().is_empty());
    }

    #[test]
    fn test_null_pseudo_node_dropped_from_listing() {
        let text = "Call graph node for function: '<null>'\nCall graph node for function: 'real'\n";
        let g = CallGraph::parse(text);
        assert_eq!(g.node_names(), vec!["real"]);
    }
}
