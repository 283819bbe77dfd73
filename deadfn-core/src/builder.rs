//! Builder pattern API for deadfn analysis.
//!
//! Provides a fluent interface for configuring an analysis session:
//!
//! ```rust,ignore
//! use deadfn_core::prelude::*;
//!
//! let session = Deadfn::new()
//!     .max_callee_depth(6)
//!     .registration_rule("install_hook", r"install_hook\s*\(\s*(\w+)")
//!     .session(&graph_text, &source_text)?;
//!
//! let record = session.analyze("computeJD");
//! ```

use crate::config::DeadfnConfig;
use crate::error::{DeadfnError, DeadfnResult};
use crate::scan::{builtin_registration_rules, RegistrationRule};
use crate::session::{AnalysisOptions, AnalysisSession};

/// Builder for configuring an analysis session.
#[derive(Debug, Clone)]
pub struct Deadfn {
    /// Hop bound for the callee-side traversal
    max_callee_depth: usize,

    /// Cap on captured pointer-evidence snippets
    snippet_cap: usize,

    /// Bare-name count above which a soft warning is emitted
    suspicious_threshold: usize,

    /// Whether the built-in registration shapes are consulted
    builtin_rules: bool,

    /// Extra (label, pattern) registration rules, validated at build time
    extra_rules: Vec<(String, String)>,
}

impl Deadfn {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        let defaults = AnalysisOptions::default();
        Self {
            max_callee_depth: defaults.max_callee_depth,
            snippet_cap: defaults.snippet_cap,
            suspicious_threshold: defaults.suspicious_threshold,
            builtin_rules: true,
            extra_rules: Vec::new(),
        }
    }

    /// Set the callee traversal hop bound.
    pub fn max_callee_depth(mut self, depth: usize) -> Self {
        self.max_callee_depth = depth;
        self
    }

    /// Set the pointer-evidence snippet cap.
    pub fn snippet_cap(mut self, cap: usize) -> Self {
        self.snippet_cap = cap;
        self
    }

    /// Set the bare-name soft-warning threshold.
    pub fn suspicious_threshold(mut self, threshold: usize) -> Self {
        self.suspicious_threshold = threshold;
        self
    }

    /// Enable or disable the built-in registration shapes.
    pub fn builtin_registration_rules(mut self, enabled: bool) -> Self {
        self.builtin_rules = enabled;
        self
    }

    /// Add a registration-call shape; group 1 must capture the function
    /// name. The pattern is validated when the session is built.
    pub fn registration_rule(
        mut self,
        label: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.extra_rules.push((label.into(), pattern.into()));
        self
    }

    /// Overlay settings from a loaded deadfn.toml.
    pub fn apply_config(mut self, cfg: &DeadfnConfig) -> Self {
        if let Some(depth) = cfg.max_callee_depth {
            self.max_callee_depth = depth;
        }
        if let Some(cap) = cfg.snippet_cap {
            self.snippet_cap = cap;
        }
        if let Some(threshold) = cfg.suspicious_threshold {
            self.suspicious_threshold = threshold;
        }
        if let Some(rules) = &cfg.registration {
            for rule in rules {
                self.extra_rules.push((rule.label.clone(), rule.pattern.clone()));
            }
        }
        self
    }

    /// Validate the configuration and build a session over the inputs.
    pub fn session(&self, graph_text: &str, source_text: &str) -> DeadfnResult<AnalysisSession> {
        let mut rules = if self.builtin_rules {
            builtin_registration_rules()
        } else {
            Vec::new()
        };

        for (label, pattern) in &self.extra_rules {
            let rule = RegistrationRule::new(label, pattern).map_err(|e| {
                DeadfnError::invalid_argument(format!(
                    "invalid registration pattern for '{}': {}",
                    label, e
                ))
            })?;
            rules.push(rule);
        }

        Ok(AnalysisSession::with_options(
            graph_text,
            source_text,
            AnalysisOptions {
                max_callee_depth: self.max_callee_depth,
                snippet_cap: self.snippet_cap,
                suspicious_threshold: self.suspicious_threshold,
                registration_rules: rules,
            },
        ))
    }
}

impl Default for Deadfn {
    fn default() -> Self {
        Self::new()
    }
}
