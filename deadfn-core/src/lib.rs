//! deadfn-core: NASA-grade dead function decision engine for C-like codebases
//!
//! This library decides whether a named function in a large C-like codebase
//! can be safely deleted, combining a textual call-graph parser with a
//! boundary-aware source-text scanner.
//!
//! # Features
//!
//! - **Call-graph parsing**: LLVM `print-callgraph` dumps into forward and
//!   reverse adjacency maps, skip-and-continue on malformed lines
//! - **Bidirectional reachability**: cycle-safe transitive callers and
//!   depth-bounded transitive callees
//! - **Definition location**: lexical-mode brace matching that is immune to
//!   braces inside strings, chars, and comments
//! - **Safe removal**: copy-on-write excision of a full definition span
//! - **Pointer evidence**: heuristic address-of / registration / bare-name
//!   detection for usage the graph cannot see
//! - **Conservative verdicts**: graph facts are proof, scanner output is
//!   signal; the aggregator never flips on signal alone
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use deadfn_core::prelude::*;
//!
//! let session = Deadfn::new().session(&graph_text, &source_text)?;
//! let record = session.analyze("computeJD");
//!
//! if record.verdict == Verdict::SafeToRemove {
//!     let removal = session.remove("computeJD");
//!     println!("{}", removal.new_text);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`graph`]: call-graph parsing from dump text
//! - [`solve`]: transitive caller/callee closures
//! - [`metadata`]: `#uses=` reference-count hints
//! - [`locate`]: definition spans, removal, snippets
//! - [`scan`]: heuristic pointer-usage evidence
//! - [`decide`]: verdict aggregation
//! - [`session`]: the parse -> solve -> scan -> decide pipeline
//! - [`builder`]: fluent configuration API
//! - [`error`]: typed error handling

pub mod builder;
pub mod config;
pub mod decide;
pub mod error;
pub mod graph;
pub mod locate;
pub mod logging;
pub mod metadata;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod session;
pub mod solve;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DeadfnError, DeadfnResult, IoResultExt};

// Builder API
pub use builder::Deadfn;

// Configuration
pub use config::{load_config, DeadfnConfig, OutputConfig, RegistrationRuleConfig};

// Call graph
pub use graph::{CallGraph, NULL_NODE};

// Reachability
pub use solve::{transitive_callees, transitive_callers, DEFAULT_MAX_CALLEE_DEPTH};

// Metadata
pub use metadata::{extract_function_metadata, FunctionMetadata};

// Source location and removal
pub use locate::{
    function_snippet, locate_function, remove_function, LocateFailure, RemovalResult, SourceSpan,
};

// Heuristic evidence
pub use scan::{
    builtin_registration_rules, scan_pointer_usage, PointerEvidence, RegistrationRule,
    DEFAULT_SNIPPET_CAP,
};

// Decision
pub use decide::{decide, Verdict, DEFAULT_SUSPICIOUS_THRESHOLD};

// Pipeline
pub use session::{AnalysisOptions, AnalysisSession, VerdictRecord};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{print_json, print_plain, print_removal_plain};
