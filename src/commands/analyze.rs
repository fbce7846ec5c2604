//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the dump file
//! 2. Detects the dialect and parses the stacks
//! 3. Folds the stacks and builds the tree
//! 4. Writes the requested outputs

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::output::{write_folded, write_svg, write_tree};
use crate::progress::ThrottledProgress;
use crate::{analyze_dump, AnalysisSettings, AnalyzeError, LeafValuePolicy};

/// Arguments for the analyze command
///
/// Constructed from CLI args in main.rs.
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the dump file
    pub input: PathBuf,

    /// Output path for the tree JSON
    pub output_json: PathBuf,

    /// Output path for collapsed stacks (optional)
    pub output_folded: Option<PathBuf>,

    /// Output path for an SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Flamegraph title (defaults to the input file name)
    pub title: Option<String>,

    /// Annotation toggles consumed by the parsers
    pub settings: AnalysisSettings,

    /// Leaf value policy for the tree builder
    pub leaf_policy: LeafValuePolicy,
}

/// Validate analyze arguments before doing any work
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.input.is_dir() {
        anyhow::bail!("Input path is a directory: {}", args.input.display());
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unrecognized or empty dumps (user-facing, distinct messages)
/// * File read/write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Analyzing dump: {}", args.input.display());

    // Step 1: Read the dump text
    info!("Step 1/3: Reading dump file...");
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    debug!("Read {} bytes", text.len());

    // Step 2: Run the analysis
    info!("Step 2/3: Parsing and folding stacks...");
    let mut progress = ThrottledProgress::new(|fraction| {
        debug!("analysis progress: {:.0}%", fraction * 100.0);
    });
    let analysis = analyze_dump(&text, &args.settings, args.leaf_policy, &mut progress)
        .map_err(|e| match e {
            AnalyzeError::UnrecognizedFormat => anyhow::anyhow!(
                "{} is not a recognized dump format (expected an IBM javacore, an IBM \
                 SystemOut hang report, or an OpenJDK thread dump)",
                args.input.display()
            ),
            AnalyzeError::NoUsableData => {
                anyhow::anyhow!("No usable stack data found in {}", args.input.display())
            }
            other => anyhow::anyhow!(other),
        })?;

    info!("Detected format: {:?}", analysis.format);
    info!(
        "Tree: {} nodes, {} total samples, max depth {}",
        analysis.tree.node_count(),
        analysis.tree.value,
        analysis.tree.max_depth()
    );
    if !analysis.skipped_lines.is_empty() {
        warn!(
            "{} lines were skipped as unrecognized; re-run with -v to list them",
            analysis.skipped_lines.len()
        );
        for skipped in &analysis.skipped_lines {
            debug!("  line {}: {}", skipped.line_number, skipped.content);
        }
    }

    // Step 3: Write outputs
    info!("Step 3/3: Writing output files...");

    write_tree(&analysis.tree, &args.output_json).context("Failed to write tree JSON")?;
    info!("✓ Tree written to: {}", args.output_json.display());

    if let Some(folded_path) = &args.output_folded {
        write_folded(&analysis.tree, folded_path).context("Failed to write folded stacks")?;
        info!("✓ Folded stacks written to: {}", folded_path.display());
    }

    if let Some(svg_path) = &args.output_svg {
        let title = args.title.clone().unwrap_or_else(|| {
            args.input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Thread dump".to_string())
        });
        write_svg(&analysis.tree, &title, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
