use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use script_align::corpus::{default_output_path, load_recognition, write_mapping};
use script_align::{
    AlignerConfig, BatchReport, BatchRunner, CandidateScope, ConfigOverrides, SpanStrategy,
    TranscriptAlignerBuilder,
};
use tracing_subscriber::EnvFilter;

#[path = "align_corpus/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    Windowed,
    #[value(name = "boundary-repair")]
    BoundaryRepair,
}

impl StrategyChoice {
    fn span_strategy(self) -> SpanStrategy {
        match self {
            Self::Windowed => SpanStrategy::Windowed,
            Self::BoundaryRepair => SpanStrategy::BoundaryRepair,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScopeChoice {
    #[value(name = "top-ranked")]
    TopRanked,
    Exhaustive,
}

impl ScopeChoice {
    fn candidate_scope(self) -> CandidateScope {
        match self {
            Self::TopRanked => CandidateScope::TopRanked,
            Self::Exhaustive => CandidateScope::Exhaustive,
        }
    }
}

/// Settings left unset fall back to `--config`, then to built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "align-corpus")]
#[command(about = "Align ASR transcripts of speech clips with their reference scripts")]
struct Args {
    #[arg(long, env = "SCRIPT_ALIGN_RECOGNITION_PATH")]
    recognition_path: PathBuf,
    #[arg(
        long,
        env = "SCRIPT_ALIGN_ALIGNMENT_FILENAME",
        default_value = "alignment.json"
    )]
    alignment_filename: String,
    #[arg(long, env = "SCRIPT_ALIGN_CONFIG")]
    config: Option<PathBuf>,
    /// Minimum similarity for a confident candidate and an aligned span [default: 0.4]
    #[arg(long, env = "SCRIPT_ALIGN_SCORE_THRESHOLD")]
    score_threshold: Option<f64>,
    /// [default: cp949]
    #[arg(long, env = "SCRIPT_ALIGN_RECOGNITION_ENCODING")]
    recognition_encoding: Option<String>,
    /// [default: cp949]
    #[arg(long, env = "SCRIPT_ALIGN_REFERENCE_ENCODING")]
    reference_encoding: Option<String>,
    /// [default: boundary-repair]
    #[arg(long, env = "SCRIPT_ALIGN_STRATEGY", value_enum)]
    strategy: Option<StrategyChoice>,
    /// [default: top-ranked]
    #[arg(long, env = "SCRIPT_ALIGN_CANDIDATE_SCOPE", value_enum)]
    candidate_scope: Option<ScopeChoice>,
    /// [default: 10]
    #[arg(long, env = "SCRIPT_ALIGN_LENGTH_TOLERANCE")]
    length_tolerance: Option<usize>,
    /// [default: audio]
    #[arg(long, env = "SCRIPT_ALIGN_AUDIO_DIR_NAME")]
    audio_dir_name: Option<String>,
    /// [default: assets]
    #[arg(long, env = "SCRIPT_ALIGN_ASSETS_DIR_NAME")]
    assets_dir_name: Option<String>,
    #[arg(long, env = "SCRIPT_ALIGN_THREADS")]
    threads: Option<usize>,
    /// Also write the batch report (counts, ratios, failed clips) as JSON.
    #[arg(long, env = "SCRIPT_ALIGN_REPORT_OUT")]
    report_out: Option<PathBuf>,
    /// Log every per-clip decision.
    #[arg(long, env = "SCRIPT_ALIGN_DEBUG", default_value_t = false)]
    debug: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    setup_tracing(args.debug);

    let config = resolve_config(&args)?;
    let recognition = load_recognition(&args.recognition_path, &config.recognition_encoding)
        .map_err(|err| {
            format!(
                "Failed to load recognition file '{}': {err}",
                args.recognition_path.display()
            )
        })?;
    if recognition.is_empty() {
        tracing::warn!(
            path = %args.recognition_path.display(),
            "recognition file has no clips; writing an empty alignment"
        );
    }

    let aligner = TranscriptAlignerBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build aligner: {err}"))?;

    let progress = ProgressBar::new(recognition.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message(aligner.strategy_name());

    let outcome = BatchRunner::new(&aligner)
        .with_progress(|_| progress.inc(1))
        .run(&recognition)
        .map_err(|err| format!("Alignment run failed: {err}"))?;
    progress.finish_with_message("alignment pass complete");

    let out_path = default_output_path(&args.recognition_path, &args.alignment_filename);
    let backup = write_mapping(&out_path, &outcome.mapping)
        .map_err(|err| format!("Failed to write '{}': {err}", out_path.display()))?;
    if let Some(backup) = backup {
        println!(" [*] previous output moved to {}", backup.display());
    }
    println!(" [*] wrote {}", out_path.display());

    if let Some(report_path) = args.report_out.as_deref() {
        json_report_formatter::write_report(report_path, &outcome.report)?;
    }

    print_summary(&outcome.report, recognition.len());
    Ok(())
}

fn setup_tracing(debug: bool) {
    let default_directive = if debug { "script_align=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config(args: &Args) -> Result<AlignerConfig, String> {
    let overrides = ConfigOverrides {
        score_threshold: args.score_threshold,
        recognition_encoding: args.recognition_encoding.clone(),
        reference_encoding: args.reference_encoding.clone(),
        strategy: args.strategy.map(StrategyChoice::span_strategy),
        candidate_scope: args.candidate_scope.map(ScopeChoice::candidate_scope),
        length_tolerance: args.length_tolerance,
        audio_dir_name: args.audio_dir_name.clone(),
        assets_dir_name: args.assets_dir_name.clone(),
        threads: args.threads,
    };
    AlignerConfig::resolve(args.config.as_deref(), overrides)
        .map_err(|err| format!("Invalid configuration: {err}"))
}

fn print_summary(report: &BatchReport, total: usize) {
    let found = report.found_count();
    let exact = report.counts.aligned;
    println!(
        " [*] # found: {:.5}% ({}/{})",
        percent(found as usize, total),
        found,
        total
    );
    println!(
        " [*] # exact match: {:.5}% ({}/{})",
        percent(exact as usize, total),
        exact,
        total
    );
    if report.counts.failed > 0 {
        println!(
            " [*] # missing reference: {} (see --report-out for the clip list)",
            report.counts.failed
        );
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
