//! The analysis pipeline: parse -> solve -> scan -> decide.
//!
//! An [`AnalysisSession`] is built once from the call-graph dump and the
//! source text, is immutable thereafter, and is discarded by dropping it.
//! The parsed graph and the source are shared-immutable, so independent
//! target analyses are embarrassingly parallel; all per-target scratch
//! state (evidence, warnings) stays local to the query.

use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::decide::{self, Verdict, DEFAULT_SUSPICIOUS_THRESHOLD};
use crate::graph::CallGraph;
use crate::locate::{self, RemovalResult};
use crate::metadata::extract_function_metadata;
use crate::scan::{
    builtin_registration_rules, scan_pointer_usage, PointerEvidence, RegistrationRule,
    DEFAULT_SNIPPET_CAP,
};
use crate::solve::{self, DEFAULT_MAX_CALLEE_DEPTH};

/// Tunables threaded through the pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Hop bound for the callee-side traversal.
    pub max_callee_depth: usize,
    /// Cap on captured pointer-evidence snippets.
    pub snippet_cap: usize,
    /// Bare-name count above which a soft warning is emitted.
    pub suspicious_threshold: usize,
    /// Registration-call shapes consulted by the scanner.
    pub registration_rules: Vec<RegistrationRule>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_callee_depth: DEFAULT_MAX_CALLEE_DEPTH,
            snippet_cap: DEFAULT_SNIPPET_CAP,
            suspicious_threshold: DEFAULT_SUSPICIOUS_THRESHOLD,
            registration_rules: builtin_registration_rules(),
        }
    }
}

/// The complete static verdict about one target function.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerdictRecord {
    pub target: String,
    pub verdict: Verdict,
    pub direct_callers: Vec<String>,
    pub transitive_callers: Vec<String>,
    pub direct_callees: Vec<String>,
    pub transitive_callees: Vec<String>,
    pub uses_hint: u32,
    pub warnings: Vec<String>,
    pub evidence: PointerEvidence,
}

/// One analysis session over an immutable (call graph, source) pair.
#[derive(Debug)]
pub struct AnalysisSession {
    graph: CallGraph,
    graph_text: String,
    source: String,
    options: AnalysisOptions,
    graph_digest: String,
    source_digest: String,
}

impl AnalysisSession {
    /// Build a session with default options.
    pub fn new(graph_text: &str, source_text: &str) -> Self {
        Self::with_options(graph_text, source_text, AnalysisOptions::default())
    }

    /// Build a session; parses the graph once and digests both inputs.
    pub fn with_options(graph_text: &str, source_text: &str, options: AnalysisOptions) -> Self {
        let graph = CallGraph::parse(graph_text);
        let graph_digest = content_digest(graph_text.as_bytes());
        let source_digest = content_digest(source_text.as_bytes());

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            source_bytes = source_text.len(),
            graph_digest = %graph_digest,
            source_digest = %source_digest,
            "analysis session built"
        );

        Self {
            graph,
            graph_text: graph_text.to_string(),
            source: source_text.to_string(),
            options,
            graph_digest,
            source_digest,
        }
    }

    /// The parsed call graph.
    pub fn graph(&self) -> &CallGraph {
        &self.graph
    }

    /// The source text under analysis.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// SHA-256 of the graph dump, for change detection by callers.
    pub fn graph_digest(&self) -> &str {
        &self.graph_digest
    }

    /// SHA-256 of the source text.
    pub fn source_digest(&self) -> &str {
        &self.source_digest
    }

    /// Sorted listing of all functions named in the dump.
    pub fn functions(&self) -> Vec<String> {
        self.graph.node_names()
    }

    /// Run the full pipeline for one target.
    pub fn analyze(&self, target: &str) -> VerdictRecord {
        let target = target.trim();

        let direct_callers = self.graph.direct_callers(target);
        let transitive_callers = solve::transitive_callers(&self.graph, target);
        let direct_callees = self.graph.direct_callees(target);
        let transitive_callees =
            solve::transitive_callees(&self.graph, target, self.options.max_callee_depth);
        let has_caller = !direct_callers.is_empty() || !transitive_callers.is_empty();

        let metadata = extract_function_metadata(&self.graph_text, target);
        let evidence = scan_pointer_usage(
            &self.source,
            target,
            &self.options.registration_rules,
            self.options.snippet_cap,
        );

        let (verdict, mut warnings) = decide::decide(
            has_caller,
            metadata.uses_hint,
            &evidence,
            self.options.suspicious_threshold,
        );

        if !has_caller && !direct_callees.is_empty() {
            warnings.push(format!(
                "no callers, but {} function(s) are called directly; the whole branch may be dead",
                direct_callees.len()
            ));
        }

        info!(
            target = %target,
            verdict = %verdict,
            direct_callers = direct_callers.len(),
            transitive_callers = transitive_callers.len(),
            uses_hint = metadata.uses_hint,
            "target analyzed"
        );

        VerdictRecord {
            target: target.to_string(),
            verdict,
            direct_callers,
            transitive_callers,
            direct_callees,
            transitive_callees,
            uses_hint: metadata.uses_hint,
            warnings,
            evidence,
        }
    }

    /// Analyze many targets in parallel over the shared-immutable session.
    pub fn analyze_all(&self, targets: &[String]) -> Vec<VerdictRecord> {
        targets.par_iter().map(|t| self.analyze(t)).collect()
    }

    /// Excise the target's definition, returning a new source buffer.
    pub fn remove(&self, target: &str) -> RemovalResult {
        locate::remove_function(&self.source, target)
    }

    /// Bounded evidence snippet of the target's definition.
    pub fn snippet(&self, target: &str, max_chars: usize) -> Option<String> {
        locate::function_snippet(&self.source, target, max_chars)
    }
}

fn content_digest(bytes: &[u8]) -> String {
    let mut sha = Sha256::new();
    sha.update(bytes);
    format!("{:x}", sha.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = "\
Call graph node for function: 'main'<<0x1>>  #uses=1
  CS<0x10> calls function 'used'
Call graph node for function: 'used'<<0x2>>  #uses=2
Call graph node for function: 'dead'<<0x3>>  #uses=0
  CS<0x11> calls function 'used'
";

    const SOURCE: &str = "\
void used(void) { }

void dead(void) {
  used();
}

int main(void) {
  used();
  return 0;
}
";

    #[test]
    fn test_dead_function_is_safe() {
        let session = AnalysisSession::new(GRAPH, SOURCE);
        let record = session.analyze("dead");
        assert_eq!(record.verdict, Verdict::SafeToRemove);
        assert!(record.direct_callers.is_empty());
        assert_eq!(record.direct_callees, vec!["used"]);
        // Informational note about the dead branch.
        assert_eq!(record.warnings.len(), 1);
    }

    #[test]
    fn test_used_function_is_dependent() {
        let session = AnalysisSession::new(GRAPH, SOURCE);
        let record = session.analyze("used");
        assert_eq!(record.verdict, Verdict::Dependent);
        assert_eq!(record.direct_callers, vec!["dead", "main"]);
    }

    #[test]
    fn test_target_is_trimmed() {
        let session = AnalysisSession::new(GRAPH, SOURCE);
        assert_eq!(session.analyze("  dead  ").target, "dead");
    }

    #[test]
    fn test_analyze_all_matches_sequential() {
        let session = AnalysisSession::new(GRAPH, SOURCE);
        let targets: Vec<String> = session.functions();
        let parallel = session.analyze_all(&targets);
        for (target, record) in targets.iter().zip(&parallel) {
            assert_eq!(record, &session.analyze(target));
        }
    }

    #[test]
    fn test_digests_are_stable() {
        let a = AnalysisSession::new(GRAPH, SOURCE);
        let b = AnalysisSession::new(GRAPH, SOURCE);
        assert_eq!(a.graph_digest(), b.graph_digest());
        assert_eq!(a.source_digest(), b.source_digest());
        assert_ne!(a.graph_digest(), a.source_digest());
    }

    #[test]
    fn test_empty_inputs_zero_result() {
        let session = AnalysisSession::new("", "");
        assert!(session.functions().is_empty());
        let record = session.analyze("anything");
        assert_eq!(record.verdict, Verdict::SafeToRemove);
        assert!(record.warnings.is_empty());
        assert!(record.evidence.is_empty());
    }

    #[test]
    fn test_remove_through_session() {
        let session = AnalysisSession::new(GRAPH, SOURCE);
        let result = session.remove("dead");
        assert!(result.found);
        assert!(!result.new_text.contains("void dead"));
        // The session source is untouched.
        assert!(session.source().contains("void dead"));
    }
}
