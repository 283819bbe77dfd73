//! Output formatting - plaintext and JSON.

use crate::locate::RemovalResult;
use crate::session::VerdictRecord;

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Prints one verdict record in plain text format.
pub fn print_plain(record: &VerdictRecord) {
    println!("=== Analysis: {} ===", record.target);
    println!("Verdict: {}", record.verdict);
    println!(
        "INCOMING direct callers ({}): {}",
        record.direct_callers.len(),
        join_or_none(&record.direct_callers)
    );
    println!(
        "INCOMING transitive callers ({}): {}",
        record.transitive_callers.len(),
        join_or_none(&record.transitive_callers)
    );
    println!(
        "OUTGOING direct callees ({}): {}",
        record.direct_callees.len(),
        join_or_none(&record.direct_callees)
    );
    println!(
        "OUTGOING transitive callees ({}): {}",
        record.transitive_callees.len(),
        join_or_none(&record.transitive_callees)
    );
    println!("#uses hint: {}", record.uses_hint);
    println!(
        "Evidence: address_taken={} registrations={} suspicious={}",
        if record.evidence.address_taken { "yes" } else { "no" },
        join_or_none(&record.evidence.registrations),
        record.evidence.suspicious_count
    );
    if !record.warnings.is_empty() {
        println!("WARNINGS ({}):", record.warnings.len());
        for warning in &record.warnings {
            println!("- {}", warning);
        }
    }
}

/// Prints one verdict record in JSON format.
///
/// Falls back to a minimal line if serialization fails (should never
/// happen with these records, but NASA-grade means handling all cases).
pub fn print_json(record: &VerdictRecord) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"target\": {:?}, \"verdict\": \"{}\"}}", record.target, record.verdict);
        }
    }
}

/// Prints a removal outcome in plain text format.
pub fn print_removal_plain(result: &RemovalResult) {
    if result.found {
        println!("REMOVED: {}", result.reason);
    } else {
        println!("NOT REMOVED: {}", result.reason);
    }
}
