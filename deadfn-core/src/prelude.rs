//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use deadfn_core::prelude::*;
//! ```

// Core analysis types
pub use crate::error::{DeadfnError, DeadfnResult};
pub use crate::graph::CallGraph;

// Reachability
pub use crate::solve::{transitive_callees, transitive_callers, DEFAULT_MAX_CALLEE_DEPTH};

// Source location and removal
pub use crate::locate::{
    function_snippet, locate_function, remove_function, LocateFailure, RemovalResult, SourceSpan,
};

// Heuristic evidence
pub use crate::scan::{scan_pointer_usage, PointerEvidence, RegistrationRule};

// Decision
pub use crate::decide::{decide, Verdict};

// Pipeline
pub use crate::session::{AnalysisOptions, AnalysisSession, VerdictRecord};

// Builder API
pub use crate::builder::Deadfn;

// Configuration
pub use crate::config::{load_config, DeadfnConfig};
