//! Configuration loading from deadfn.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Main configuration structure for deadfn.toml.
#[derive(Debug, Deserialize, Default)]
pub struct DeadfnConfig {
    /// Maximum hop count for the callee-side traversal.
    pub max_callee_depth: Option<usize>,
    /// Maximum number of context snippets captured by the pointer scanner.
    pub snippet_cap: Option<usize>,
    /// Bare-name occurrence count above which a soft warning is emitted.
    pub suspicious_threshold: Option<usize>,
    /// Extra registration-call patterns for the pointer scanner.
    pub registration: Option<Vec<RegistrationRuleConfig>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// A user-supplied registration-call pattern.
///
/// The pattern must capture the registered function name in group 1.
#[derive(Debug, Deserialize, Clone)]
pub struct RegistrationRuleConfig {
    /// Human-readable label reported in warnings (e.g. "my_register_hook").
    pub label: String,
    /// Regex matching the registration call site.
    pub pattern: String,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from deadfn.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<DeadfnConfig>> {
    let path = root.join("deadfn.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid deadfn.toml")?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg: DeadfnConfig = toml::from_str(
            r#"
max_callee_depth = 6
snippet_cap = 3

[[registration]]
label = "register_callback"
pattern = "register_callback\\s*\\(\\s*(\\w+)"

[output]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(cfg.max_callee_depth, Some(6));
        assert_eq!(cfg.snippet_cap, Some(3));
        let rules = cfg.registration.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].label, "register_callback");
        assert_eq!(cfg.output.unwrap().format.as_deref(), Some("json"));
    }

    #[test]
    fn test_parse_empty_config() {
        let cfg: DeadfnConfig = toml::from_str("").unwrap();
        assert!(cfg.max_callee_depth.is_none());
        assert!(cfg.registration.is_none());
    }
}
