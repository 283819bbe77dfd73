//! Bidirectional reachability over a parsed call graph.
//!
//! Both traversals are iterative work-list walks with a visited-set guard,
//! so mutual recursion (cycles) is safe and no recursion depth limit
//! applies. The callee side is additionally bounded by hop count to cap
//! pathological fan-out.
//!
//! # Performance Characteristics
//!
//! - Callers: O(|nodes| + |edges|), each node expanded at most once
//! - Callees: O(max_depth * branching), branches cut at the depth bound
//! - Results are returned in byte-wise lexicographic order

use crate::graph::CallGraph;
use std::collections::HashSet;

/// Default hop bound for the callee-side traversal.
pub const DEFAULT_MAX_CALLEE_DEPTH: usize = 10;

/// All functions that call `target`, directly or indirectly.
///
/// The target itself is excluded even when it sits on a cycle; on
/// A -> B -> A, `transitive_callers(A)` contains B exactly once.
pub fn transitive_callers(graph: &CallGraph, target: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut work: Vec<&str> = graph
        .callers_of(target)
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();

    while let Some(who) = work.pop() {
        if who == target || !seen.insert(who) {
            continue;
        }
        if let Some(ancestors) = graph.callers_of(who) {
            for anc in ancestors {
                if anc != target && !seen.contains(anc.as_str()) {
                    work.push(anc);
                }
            }
        }
    }

    sorted(seen)
}

/// All functions that `target` calls, directly or indirectly, bounded by
/// `max_depth` hops.
///
/// Hitting the depth bound stops expansion of that branch without error.
/// With `max_depth == 1` the result equals the direct callee set.
pub fn transitive_callees(graph: &CallGraph, target: &str, max_depth: usize) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut work: Vec<(&str, usize)> = graph
        .callees_of(target)
        .into_iter()
        .flatten()
        .map(|callee| (callee.as_str(), 1))
        .collect();

    while let Some((who, depth)) = work.pop() {
        if who == target || depth > max_depth || !seen.insert(who) {
            continue;
        }
        if let Some(callees) = graph.callees_of(who) {
            for callee in callees {
                if !seen.contains(callee.as_str()) {
                    work.push((callee, depth + 1));
                }
            }
        }
    }

    sorted(seen)
}

fn sorted(seen: HashSet<&str>) -> Vec<String> {
    let mut out: Vec<String> = seen.into_iter().map(str::to_owned).collect();
    out.sort();
    out
}
