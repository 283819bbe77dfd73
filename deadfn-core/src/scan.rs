//! Heuristic pointer-usage pattern scanning.
//!
//! Best-effort and explicitly unsound: this module flags *textual
//! evidence* of indirect reference (address-of, registration-style calls,
//! bare-name occurrences) without proving anything. It never decides by
//! itself; [`crate::decide`] weighs the evidence against the graph facts.
//!
//! Registration patterns are compiled once per session and reused for
//! every target (the regex crate has no look-around, so the "bare name
//! not followed by `(`" check is an explicit forward scan).

use regex::Regex;
use serde::Serialize;

/// Default cap on captured context snippets per query.
pub const DEFAULT_SNIPPET_CAP: usize = 5;

/// Per-query evidence of indirect usage. Transient, never shared across
/// concurrent target evaluations.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PointerEvidence {
    /// A word-bounded `&name` occurrence exists.
    pub address_taken: bool,
    /// Labels of registration-call shapes where the name appeared as an
    /// argument.
    pub registrations: Vec<String>,
    /// Word-bounded occurrences of the name not followed by `(`.
    pub suspicious_count: usize,
    /// Bounded context snippets around matches, capped in total.
    pub snippets: Vec<String>,
}

impl PointerEvidence {
    /// True when no evidence kind fired at all.
    pub fn is_empty(&self) -> bool {
        !self.address_taken && self.registrations.is_empty() && self.suspicious_count == 0
    }
}

/// A compiled registration-call shape.
///
/// Group 1 of the regex must capture the registered function name.
#[derive(Debug, Clone)]
pub struct RegistrationRule {
    pub label: String,
    regex: Regex,
}

impl RegistrationRule {
    /// Compile a registration rule; fails on an invalid pattern.
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.into(),
            regex: Regex::new(pattern)?,
        })
    }
}

/// The fixed built-in registration shapes (SQLite UDF registration, where
/// the function name is the sixth argument).
pub fn builtin_registration_rules() -> Vec<RegistrationRule> {
    const ARGS5: &str = r"[^,]+,\s*[^,]+,\s*[^,]+,\s*[^,]+,\s*[^,]+,\s*(\w+)";
    vec![
        RegistrationRule {
            label: "sqlite3_create_function".to_string(),
            regex: Regex::new(&format!(r"(?i)sqlite3_create_function[^(]*\({}", ARGS5))
                .expect("Hardcoded regex pattern is valid"),
        },
        RegistrationRule {
            label: "sqlite3_create_function_v2".to_string(),
            regex: Regex::new(&format!(r"(?i)sqlite3_create_function_v2[^(]*\({}", ARGS5))
                .expect("Hardcoded regex pattern is valid"),
        },
    ]
}

/// Scan `source` for indirect-usage evidence about `target`.
///
/// Collects three independent evidence kinds; each match captures a
/// bounded context snippet until `snippet_cap` is reached.
pub fn scan_pointer_usage(
    source: &str,
    target: &str,
    rules: &[RegistrationRule],
    snippet_cap: usize,
) -> PointerEvidence {
    let mut evidence = PointerEvidence::default();
    if source.is_empty() || target.is_empty() {
        return evidence;
    }

    let escaped = regex::escape(target);

    // (i) address-of: &name
    if let Ok(addr_re) = Regex::new(&format!(r"&\s*{}\b", escaped)) {
        for m in addr_re.find_iter(source) {
            evidence.address_taken = true;
            push_snippet(&mut evidence.snippets, source, m.start(), m.end(), 100, snippet_cap);
        }
    }

    // (ii) registration-call shapes with name as a later argument
    for rule in rules {
        for caps in rule.regex.captures_iter(source) {
            if caps.get(1).map(|g| g.as_str()) != Some(target) {
                continue;
            }
            if !evidence.registrations.contains(&rule.label) {
                evidence.registrations.push(rule.label.clone());
            }
            if let Some(m) = caps.get(0) {
                push_snippet(&mut evidence.snippets, source, m.start(), m.end(), 150, snippet_cap);
            }
        }
    }

    // (iii) bare name not followed (after whitespace) by '('
    if let Ok(name_re) = Regex::new(&format!(r"\b{}\b", escaped)) {
        let bytes = source.as_bytes();
        for m in name_re.find_iter(source) {
            let mut j = m.end();
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < bytes.len() && bytes[j] != b'(' {
                evidence.suspicious_count += 1;
                push_snippet(&mut evidence.snippets, source, m.start(), m.end(), 80, snippet_cap);
            }
        }
    }

    evidence
}

/// Capture a flattened context window around `[start, end)`.
fn push_snippet(
    snippets: &mut Vec<String>,
    source: &str,
    start: usize,
    end: usize,
    pad: usize,
    cap: usize,
) {
    if snippets.len() >= cap {
        return;
    }
    let from = floor_char_boundary(source, start.saturating_sub(pad));
    let to = floor_char_boundary(source, (end + pad).min(source.len()));
    snippets.push(source[from..to].replace('\n', " "));
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
