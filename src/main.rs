use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use speakerid_dtw::{Dtw, DtwOutcome, MFCC_DIM};
use speakerid_io::{ComparisonRecord, ResultWriter, RunName, SequenceReader, TemplateLoader};
use speakerid_match::{MatchConfig, SearchStrategy, Variant};

#[derive(Parser)]
#[command(name = "speakerid")]
#[command(about = "DTW speaker identification over MFCC feature sequences")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel search (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Coefficients per frame in every input CSV
    #[arg(long, default_value_t = MFCC_DIM, global = true)]
    dim: usize,
}

/// Shared DTW kernel parameters.
#[derive(Args, Debug, Clone)]
struct KernelArgs {
    /// DTW variant: "full", "banded", or "thresholded"
    #[arg(long, default_value = "banded")]
    variant: String,

    /// Sakoe-Chiba band half-width (ignored by "full")
    #[arg(long, default_value_t = 10)]
    band: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Align two feature sequences and report their DTW distance
    Compare {
        /// Path to the first sequence CSV
        #[arg(long)]
        a: PathBuf,

        /// Path to the second sequence CSV
        #[arg(long)]
        b: PathBuf,

        /// Abandonment threshold (required for "thresholded")
        #[arg(long)]
        threshold: Option<f64>,

        /// Run name; when set, also writes {run}_compare.json
        #[arg(long)]
        run: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        kernel: KernelArgs,
    },

    /// Identify the speaker of a candidate sequence against enrolled templates
    Identify {
        /// Path to the candidate sequence CSV
        #[arg(long)]
        candidate: PathBuf,

        /// Template root laid out as <root>/<speaker>/<take>.csv
        #[arg(long)]
        templates: PathBuf,

        /// Rejection threshold; templates farther than this never match
        #[arg(long)]
        threshold: Option<f64>,

        /// Bank traversal: "exhaustive", "best-so-far", or "parallel"
        #[arg(long, default_value = "exhaustive")]
        search: String,

        /// Run name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        run: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        kernel: KernelArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct CompareOutput {
    a: String,
    b: String,
    variant: String,
    distance: Option<f64>,
    rejection: Option<String>,
    value: f64,
}

#[derive(Serialize)]
struct IdentifyOutput {
    run: String,
    n_templates: usize,
    n_rejected: usize,
    speaker: Option<String>,
    template: Option<String>,
    distance: Option<f64>,
}

fn parse_variant(kernel: &KernelArgs) -> Result<Variant> {
    let band = kernel.band;
    match kernel.variant.as_str() {
        "full" => Ok(Variant::Full),
        "banded" => Ok(Variant::Banded { band }),
        "thresholded" => Ok(Variant::Thresholded { band }),
        other => anyhow::bail!("unknown variant: {other} (expected full, banded, or thresholded)"),
    }
}

fn parse_search(s: &str) -> Result<SearchStrategy> {
    match s {
        "exhaustive" => Ok(SearchStrategy::Exhaustive),
        "best-so-far" => Ok(SearchStrategy::BestSoFar),
        "parallel" => Ok(SearchStrategy::Parallel),
        other => anyhow::bail!(
            "unknown search strategy: {other} (expected exhaustive, best-so-far, or parallel)"
        ),
    }
}

fn read_sequence(path: &Path, dim: usize) -> Result<speakerid_dtw::Sequence> {
    SequenceReader::new(path)
        .with_dim(dim)
        .read()
        .with_context(|| format!("failed to read sequence {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Compare {
            a,
            b,
            threshold,
            run,
            output_dir,
            kernel,
        } => {
            let variant = parse_variant(&kernel)?;
            // Validate the run name before doing any work.
            let run_name = run.map(RunName::new).transpose()?;

            let seq_a = read_sequence(&a, cli.dim)?;
            let seq_b = read_sequence(&b, cli.dim)?;

            let (outcome, path_len): (DtwOutcome, Option<usize>) = match variant {
                Variant::Full => {
                    let lattice = Dtw::unconstrained().lattice(&seq_a, &seq_b)?;
                    (lattice.outcome(), lattice.warping_path().map(|p| p.len()))
                }
                Variant::Banded { band } => {
                    (Dtw::with_sakoe_chiba(band).distance(&seq_a, &seq_b)?, None)
                }
                Variant::Thresholded { band } => {
                    let Some(tau) = threshold else {
                        anyhow::bail!("--threshold is required for the thresholded variant");
                    };
                    let outcome = Dtw::with_sakoe_chiba(band)
                        .distance_with_threshold(&seq_a, &seq_b, tau)
                        .context("thresholded DTW failed")?;
                    (outcome, None)
                }
            };
            info!(%outcome, "comparison complete");

            let a_label = a.display().to_string();
            let b_label = b.display().to_string();

            if let Some(run_name) = run_name {
                let writer = ResultWriter::new(&output_dir, run_name)?;
                writer.write_compare(&ComparisonRecord {
                    a: &a_label,
                    b: &b_label,
                    frames: (seq_a.len(), seq_b.len()),
                    variant,
                    threshold: if matches!(variant, Variant::Thresholded { .. }) {
                        threshold
                    } else {
                        None
                    },
                    outcome,
                    path_len,
                })?;
            }

            let output = CompareOutput {
                a: a_label,
                b: b_label,
                variant: kernel.variant,
                distance: outcome.distance().map(|d| d.value()),
                rejection: outcome.rejection().map(|r| r.to_string()),
                value: outcome.value_or_sentinel(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Identify {
            candidate,
            templates,
            threshold,
            search,
            run,
            output_dir,
            kernel,
        } => {
            let variant = parse_variant(&kernel)?;
            let search = parse_search(&search)?;
            let run_name = RunName::new(run.clone())?;

            let bank = TemplateLoader::new(&templates)
                .with_dim(cli.dim)
                .load()
                .with_context(|| format!("failed to load templates from {}", templates.display()))?;
            let sequence = read_sequence(&candidate, cli.dim)?;

            let mut config = MatchConfig::new(variant).with_search(search);
            if let Some(threshold) = threshold {
                config = config.with_rejection_threshold(threshold);
            }

            let identification = config
                .identify(&sequence, &bank)
                .context("identification failed")?;

            let candidate_label = candidate.display().to_string();
            let writer = ResultWriter::new(&output_dir, run_name)?;
            writer.write_identify(
                &candidate_label,
                sequence.len(),
                &bank,
                &config,
                &identification,
            )?;

            let best = identification.best.as_ref();
            let output = IdentifyOutput {
                run,
                n_templates: bank.len(),
                n_rejected: identification.n_rejected(),
                speaker: best.map(|m| m.speaker.to_string()),
                template: best
                    .and_then(|m| bank.get(m.template))
                    .map(|t| format!("{}/{}", t.speaker(), t.name())),
                distance: best.map(|m| m.distance.value()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
