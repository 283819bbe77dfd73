//! Conservative verdict aggregation over graph facts and heuristic evidence.
//!
//! Graph facts are proof; scanner output is signal. Any caller proves the
//! function is depended on. With zero callers the default is safe, but
//! indirect-usage signals (reference-count hint, address-of, registration)
//! downgrade the verdict, while bare-name occurrences only soften it with
//! a warning.
//!
//! `decide` is a pure function: identical inputs always produce an
//! identical verdict and warning set.

use crate::scan::PointerEvidence;
use serde::Serialize;
use std::fmt;

/// Bare-name occurrence count above which a soft warning is emitted.
pub const DEFAULT_SUSPICIOUS_THRESHOLD: usize = 3;

/// The static decision about a target function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    SafeToRemove,
    Dependent,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::SafeToRemove => f.write_str("SAFE_TO_REMOVE"),
            Verdict::Dependent => f.write_str("DEPENDENT"),
        }
    }
}

/// Combine graph facts and heuristic evidence into a verdict plus
/// human-readable warnings.
///
/// Rules:
/// - any caller (direct or transitive) => `Dependent`, no warnings needed
/// - no caller => `SafeToRemove` by default, downgraded to `Dependent`
///   when the dump's `#uses=` hint is positive (the graph under-counts
///   usage), the address is taken, or a registration shape matched
/// - suspicious bare-name occurrences above `suspicious_threshold` only
///   add a soft warning, never flip the verdict
pub fn decide(
    has_caller: bool,
    uses_hint: u32,
    evidence: &PointerEvidence,
    suspicious_threshold: usize,
) -> (Verdict, Vec<String>) {
    let mut warnings = Vec::new();

    if has_caller {
        return (Verdict::Dependent, warnings);
    }

    if uses_hint > 0 {
        warnings.push(format!(
            "call graph reports #uses={} but no callers were found; \
             function pointers, callbacks, or exports are likely",
            uses_hint
        ));
    }
    if evidence.address_taken {
        warnings.push(
            "function address is taken (& operator); pointer or callback usage".to_string(),
        );
    }
    if !evidence.registrations.is_empty() {
        warnings.push(format!(
            "function is registered via {}; removal would break indirect callers",
            evidence.registrations.join(", ")
        ));
    }
    if evidence.suspicious_count > suspicious_threshold {
        warnings.push(format!(
            "{} bare-name occurrences suggest indirect usage (no proof)",
            evidence.suspicious_count
        ));
    }

    let dependent = uses_hint > 0 || evidence.address_taken || !evidence.registrations.is_empty();
    if dependent {
        warnings.push("verdict downgraded to DEPENDENT on indirect-usage evidence".to_string());
        (Verdict::Dependent, warnings)
    } else {
        (Verdict::SafeToRemove, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_evidence() -> PointerEvidence {
        PointerEvidence::default()
    }

    #[test]
    fn test_no_caller_no_evidence_is_safe() {
        let (verdict, warnings) = decide(false, 0, &no_evidence(), DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(verdict, Verdict::SafeToRemove);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_caller_means_dependent_regardless_of_evidence() {
        let (verdict, _) = decide(true, 0, &no_evidence(), DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(verdict, Verdict::Dependent);

        let mut evidence = no_evidence();
        evidence.address_taken = true;
        let (verdict, _) = decide(true, 7, &evidence, DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(verdict, Verdict::Dependent);
    }

    #[test]
    fn test_address_taken_flips_verdict_with_warning() {
        let mut evidence = no_evidence();
        evidence.address_taken = true;
        let (verdict, warnings) = decide(false, 0, &evidence, DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(verdict, Verdict::Dependent);
        assert!(!warnings.is_empty());
    }

    #[test]
    fn test_registration_flips_verdict() {
        let mut evidence = no_evidence();
        evidence.registrations.push("sqlite3_create_function".to_string());
        let (verdict, warnings) = decide(false, 0, &evidence, DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(verdict, Verdict::Dependent);
        assert!(warnings.iter().any(|w| w.contains("sqlite3_create_function")));
    }

    #[test]
    fn test_uses_hint_flips_verdict() {
        let (verdict, warnings) = decide(false, 3, &no_evidence(), DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(verdict, Verdict::Dependent);
        assert!(warnings.iter().any(|w| w.contains("#uses=3")));
    }

    #[test]
    fn test_suspicious_alone_only_warns() {
        let mut evidence = no_evidence();
        evidence.suspicious_count = 10;
        let (verdict, warnings) = decide(false, 0, &evidence, DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(verdict, Verdict::SafeToRemove);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("10 bare-name"));
    }

    #[test]
    fn test_suspicious_below_threshold_is_silent() {
        let mut evidence = no_evidence();
        evidence.suspicious_count = 2;
        let (_, warnings) = decide(false, 0, &evidence, DEFAULT_SUSPICIOUS_THRESHOLD);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let mut evidence = no_evidence();
        evidence.address_taken = true;
        evidence.suspicious_count = 5;
        let a = decide(false, 2, &evidence, DEFAULT_SUSPICIOUS_THRESHOLD);
        let b = decide(false, 2, &evidence, DEFAULT_SUSPICIOUS_THRESHOLD);
        assert_eq!(a, b);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::SafeToRemove.to_string(), "SAFE_TO_REMOVE");
        assert_eq!(Verdict::Dependent.to_string(), "DEPENDENT");
    }
}
