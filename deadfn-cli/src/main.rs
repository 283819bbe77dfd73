//! deadfn CLI - NASA-grade dead function decision engine for C-like codebases.
//!
//! Features:
//! - LLVM `print-callgraph` dump parsing
//! - Bidirectional reachability (transitive callers and callees)
//! - Heuristic pointer/registration evidence scanning
//! - Conservative SAFE_TO_REMOVE / DEPENDENT verdicts
//! - Lexical-mode definition removal with copy-on-write output
//! - Rayon-powered parallel multi-target analysis

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use deadfn_core::{
    init_structured_logging, load_config, print_json, print_plain, print_removal_plain, Deadfn,
    Verdict,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "NASA-grade dead function decision engine for C-like codebases"
)]
pub struct Cli {
    /// Path to the call-graph dump (LLVM print-callgraph text)
    callgraph: PathBuf,

    /// Path to the source file under analysis
    source: PathBuf,

    /// Function name(s) to analyze
    #[arg(long, num_args = 1..)]
    target: Vec<String>,

    /// Analyze every function named in the dump
    #[arg(long)]
    all: bool,

    /// List all functions named in the dump and exit
    #[arg(long)]
    list: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Hop bound for the callee-side traversal
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print a bounded snippet of each target's definition
    #[arg(long)]
    snippet: bool,

    /// Remove the target's definition and write the rewritten source
    #[arg(long)]
    remove: bool,

    /// Remove even when the verdict is DEPENDENT
    #[arg(long)]
    force: bool,

    /// Show what the removal would produce without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output file for --remove (defaults to <stem>_without_<target>.<ext>)
    #[arg(long, value_name = "FILE")]
    out: Option<String>,
}

/// Security: Validates output file paths to prevent path traversal attacks.
///
/// Rejects:
/// - Absolute paths (must be relative to current directory)
/// - Paths containing `..` (parent directory traversal)
/// - Paths with null bytes (injection attacks)
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);

    if p.is_absolute() {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }

    for component in p.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(anyhow!(
                "Path traversal (..) not allowed in output paths: {}",
                path
            ));
        }
    }

    Ok(p)
}

/// Default output name for a removal: `<stem>_without_<target>.<ext>`.
fn default_output_name(source: &Path, target: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "source".to_string());
    match source.extension() {
        Some(ext) => format!("{}_without_{}.{}", stem, target, ext.to_string_lossy()),
        None => format!("{}_without_{}", stem, target),
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let graph_text = fs::read_to_string(&cli.callgraph)
        .with_context(|| format!("Failed to read call graph: {}", cli.callgraph.display()))?;
    let source_text = fs::read_to_string(&cli.source)
        .with_context(|| format!("Failed to read source: {}", cli.source.display()))?;

    // Load config from deadfn.toml if present (safe - don't fail on config errors)
    let mut builder = Deadfn::new();
    let mut json = cli.json;
    match load_config(Path::new(".")) {
        Ok(Some(cfg)) => {
            if let Some(output) = &cfg.output {
                if output.format.as_deref() == Some("json") {
                    json = true;
                }
            }
            builder = builder.apply_config(&cfg);
        }
        Ok(None) => {} // No config file - that's fine
        Err(e) => {
            eprintln!("[WARN] config load failed: {}", e);
        }
    }
    if let Some(depth) = cli.max_depth {
        builder = builder.max_callee_depth(depth);
    }

    let session = builder.session(&graph_text, &source_text)?;

    // Listing mode
    if cli.list {
        let functions = session.functions();
        if json {
            println!("{}", serde_json::to_string_pretty(&functions)?);
        } else {
            println!("=== Functions in call graph ({}) ===", functions.len());
            for name in &functions {
                println!("  {}", name);
            }
        }
        return Ok(0);
    }

    let targets: Vec<String> = if cli.all {
        session.functions()
    } else {
        cli.target.clone()
    };
    if targets.is_empty() {
        bail!("No targets given; pass --target <name> or --all");
    }

    // Removal mode: one target, gated on the verdict unless forced
    if cli.remove {
        if targets.len() != 1 {
            bail!("--remove takes exactly one --target");
        }
        let target = &targets[0];
        let record = session.analyze(target);

        if record.verdict == Verdict::Dependent && !cli.force {
            eprintln!(
                "[WARN] '{}' is DEPENDENT; refusing to remove (use --force to override)",
                target
            );
            for warning in &record.warnings {
                eprintln!("[WARN] {}", warning);
            }
            return Ok(1);
        }

        let result = session.remove(target);
        print_removal_plain(&result);
        if !result.found {
            return Ok(1);
        }

        if cli.dry_run {
            println!("[DRY-RUN] no file written ({} chars would be removed)", result.chars_removed);
            return Ok(0);
        }

        let out_name = cli
            .out
            .clone()
            .unwrap_or_else(|| default_output_name(&cli.source, target));
        let safe_path = validate_output_path(&out_name)
            .with_context(|| format!("Invalid output path: {}", out_name))?;
        fs::write(&safe_path, &result.new_text)
            .with_context(|| format!("Failed to write {}", safe_path.display()))?;
        println!("Rewritten source saved to: {}", safe_path.display());
        return Ok(0);
    }

    // Analysis mode
    let records = session.analyze_all(&targets);

    if json {
        if let [record] = records.as_slice() {
            print_json(record);
        } else {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    } else {
        for record in &records {
            print_plain(record);
            if cli.snippet {
                match session.snippet(&record.target, 2000) {
                    Some(text) => println!("SNIPPET:\n{}", text),
                    None => println!("SNIPPET: (definition not found in source)"),
                }
            }
            println!();
        }
    }

    let all_safe = records.iter().all(|r| r.verdict == Verdict::SafeToRemove);
    Ok(if all_safe { 0 } else { 1 })
}

fn main() {
    // Global panic guard - NASA-grade resilience
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadfn internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            std::process::exit(2);
        }
    }
}
