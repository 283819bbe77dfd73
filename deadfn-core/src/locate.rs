//! Locating and excising function definitions in raw C-like source text.
//!
//! The locator is a hand-written lexical scan, not a C parser: it only
//! needs enough awareness (strings, chars, comments) to find definition
//! boundaries. It works in three steps:
//!
//! 1. Candidate discovery via a line-anchored regex: word-bounded name,
//!    non-nested parameter list, then only qualifiers/whitespace before
//!    the opening brace. A `;` between `)` and `{` kills the candidate,
//!    so prototypes are skipped naturally.
//! 2. Signature back-scan absorbing return-type/qualifier continuation
//!    lines above the candidate.
//! 3. Brace matching with an explicit finite-state machine over five
//!    mutually exclusive lexical modes.
//!
//! All failures are reported as structured [`LocateFailure`] values;
//! nothing here panics or aborts. Removal is copy-on-write: the input
//! text is never mutated.

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Half-open byte range of one complete function definition
/// (qualifiers, signature, body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a degenerate empty span.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The spanned slice of `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Why a definition span could not be produced.
///
/// Reported, never thrown as unrecoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateFailure {
    /// The name does not occur anywhere that looks like a declaration
    /// or definition.
    #[error("function '{name}' not found in source")]
    NotFound { name: String },

    /// Only a prototype (declaration ending in `;`) exists.
    #[error("only a prototype of '{name}' was found")]
    PrototypeOnly { name: String },

    /// Brace depth never returned to zero; reports the final depth.
    #[error("unbalanced braces for '{name}' (final depth {depth})")]
    Unbalanced { name: String, depth: i64 },
}

/// Result of a removal operation.
///
/// On failure `new_text` is the input unchanged and `reason` explains why.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RemovalResult {
    pub found: bool,
    pub new_text: String,
    pub chars_removed: usize,
    pub reason: String,
}

/// The five mutually exclusive lexical modes of the brace scanner.
///
/// Mode entry and depth changes happen only in `Normal`; a backslash in
/// string/char mode escapes the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexMode {
    Normal,
    Str,
    Char,
    LineComment,
    BlockComment,
}

/// Candidate regex for one function name.
///
/// `^[^\n;{}]*?` keeps the match on a single statement-free line prefix,
/// `\([^()]*\)` is the non-nested parameter list, and `[\w\s]*` admits
/// only qualifiers/whitespace/newlines between `)` and `{`.
fn definition_regex(name: &str) -> Option<Regex> {
    let pattern = format!(
        r"(?m)^[^\n;{{}}]*?\b{}\s*\(([^()]*)\)[\w\s]*\{{",
        regex::escape(name)
    );
    Regex::new(&pattern).ok()
}

fn declaration_regex(name: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok()
}

/// Find the exact span of the definition of `name` in `source`.
///
/// The span covers the signature (including absorbed return-type lines)
/// through the matching closing brace. Adjacent newlines are *not*
/// included; [`remove_function`] widens the cut by one newline per side.
pub fn locate_function(source: &str, name: &str) -> Result<SourceSpan, LocateFailure> {
    if source.is_empty() || name.is_empty() {
        return Err(LocateFailure::NotFound {
            name: name.to_string(),
        });
    }

    let Some(def_re) = definition_regex(name) else {
        return Err(LocateFailure::NotFound {
            name: name.to_string(),
        });
    };

    let Some(m) = def_re.find(source) else {
        let declared = declaration_regex(name).is_some_and(|re| re.is_match(source));
        return Err(if declared {
            LocateFailure::PrototypeOnly {
                name: name.to_string(),
            }
        } else {
            LocateFailure::NotFound {
                name: name.to_string(),
            }
        });
    };

    let brace_idx = m.end() - 1;
    let start = back_scan_signature(source, m.start());
    let end = match_braces(source, brace_idx).map_err(|depth| LocateFailure::Unbalanced {
        name: name.to_string(),
        depth,
    })?;

    Ok(SourceSpan { start, end })
}

/// Walk backward line by line from the candidate start, absorbing
/// return-type/qualifier continuation lines.
///
/// Stops at a blank line, a comment-only line, a preprocessor line, or a
/// line ending in `;`, `}`, or `{`.
fn back_scan_signature(text: &str, candidate_start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut start = candidate_start;

    while start > 0 {
        let newline = start - 1;
        if bytes[newline] != b'\n' {
            break;
        }
        let prev_start = text[..newline].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let prev_line = text[prev_start..newline].trim();

        if prev_line.is_empty()
            || prev_line.starts_with("//")
            || prev_line.starts_with("/*")
            || prev_line.starts_with('*')
            || prev_line.starts_with('#')
        {
            break;
        }
        if prev_line.ends_with(';') || prev_line.ends_with('}') || prev_line.ends_with('{') {
            break;
        }

        start = prev_start;
    }

    start
}

/// Scan forward from the opening brace at `open_idx` and return the index
/// one past the matching closing brace.
///
/// Returns the final depth as the error when the scan runs off the end of
/// the text.
fn match_braces(text: &str, open_idx: usize) -> Result<usize, i64> {
    let bytes = text.as_bytes();
    let n = bytes.len();
    let mut depth: i64 = 0;
    let mut mode = LexMode::Normal;
    let mut escape_next = false;
    let mut i = open_idx;

    while i < n {
        let ch = bytes[i];
        let next = if i + 1 < n { bytes[i + 1] } else { 0 };

        if escape_next {
            escape_next = false;
            i += 1;
            continue;
        }

        match mode {
            LexMode::Str => match ch {
                b'\\' => escape_next = true,
                b'"' => mode = LexMode::Normal,
                _ => {}
            },
            LexMode::Char => match ch {
                b'\\' => escape_next = true,
                b'\'' => mode = LexMode::Normal,
                _ => {}
            },
            LexMode::LineComment => {
                if ch == b'\n' {
                    mode = LexMode::Normal;
                }
            }
            LexMode::BlockComment => {
                if ch == b'*' && next == b'/' {
                    mode = LexMode::Normal;
                    i += 1;
                }
            }
            LexMode::Normal => match ch {
                b'/' if next == b'/' => {
                    mode = LexMode::LineComment;
                    i += 1;
                }
                b'/' if next == b'*' => {
                    mode = LexMode::BlockComment;
                    i += 1;
                }
                b'"' => mode = LexMode::Str,
                b'\'' => mode = LexMode::Char,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i + 1);
                    }
                }
                _ => {}
            },
        }

        i += 1;
    }

    Err(depth)
}

/// Remove the definition of `name` from `source`, returning a new buffer.
///
/// Copy-on-write: the input is never mutated. CRLF line endings are
/// normalized before the scan. The cut is widened by exactly one adjacent
/// newline on each side so the surrounding text stays clean, which also
/// makes a second removal over the same original text byte-identical.
pub fn remove_function(source: &str, name: &str) -> RemovalResult {
    let normalized;
    let text: &str = if source.contains("\r\n") {
        normalized = source.replace("\r\n", "\n");
        &normalized
    } else {
        source
    };

    match locate_function(text, name) {
        Ok(span) => {
            let bytes = text.as_bytes();
            let mut cut_start = span.start;
            if cut_start > 0 && bytes[cut_start - 1] == b'\n' {
                cut_start -= 1;
            }
            let mut cut_end = span.end;
            if cut_end < bytes.len() && bytes[cut_end] == b'\n' {
                cut_end += 1;
            }

            let chars_removed = cut_end - cut_start;
            let mut new_text = String::with_capacity(text.len() - chars_removed);
            new_text.push_str(&text[..cut_start]);
            new_text.push_str(&text[cut_end..]);

            RemovalResult {
                found: true,
                new_text,
                chars_removed,
                reason: format!("removed '{}' ({} chars)", name, chars_removed),
            }
        }
        Err(failure) => RemovalResult {
            found: false,
            new_text: source.to_string(),
            chars_removed: 0,
            reason: failure.to_string(),
        },
    }
}

/// Extract a bounded evidence snippet of the definition of `name`.
///
/// Falls back to a raw context window around the first `name(` occurrence
/// when the locator fails; returns `None` when the name is absent.
pub fn function_snippet(source: &str, name: &str, max_chars: usize) -> Option<String> {
    match locate_function(source, name) {
        Ok(span) => {
            let text = span.text(source);
            if text.len() <= max_chars {
                Some(text.to_string())
            } else {
                let cut = floor_char_boundary(text, max_chars);
                Some(format!("{}\n/* snip */\n", &text[..cut]))
            }
        }
        Err(_) => {
            let idx = source.find(&format!("{}(", name))?;
            let start = floor_char_boundary(source, idx.saturating_sub(300));
            let end = floor_char_boundary(source, (start + max_chars).min(source.len()));
            Some(source[start..end].to_string())
        }
    }
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
