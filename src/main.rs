mod config;
mod error;
mod files;
mod git;
mod reporters;
mod stats;
mod types;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use config::TallyConfig;
use error::{Result, TallyError};
use files::FileFilter;
use git::GitCli;
use types::*;


#[derive(Parser, Debug)]
#[command(
    name = "git-tally",
    about = "Rank the contributors of a git repository by lines, commits and files",
    version,
    long_about = "Blames every tracked file at a revision and reports, per author,\n\
                  the lines they currently own, the distinct commits those lines\n\
                  come from, and the number of files they appear in."
)]
struct Args {
    /// Path to the repository [default: .]
    #[arg(long, value_name = "PATH")]
    repository: Option<PathBuf>,

    /// Revision to analyze [default: HEAD]
    #[arg(long, value_name = "REV")]
    revision: Option<String>,

    /// Sort key: lines, commits, files [default: lines]
    #[arg(long, value_name = "KEY")]
    order_by: Option<String>,

    /// Credit lines to the committer instead of the author
    #[arg(long)]
    use_committer: bool,

    /// Output format: tabular, csv, json, json-lines [default: tabular]
    #[arg(long, value_name = "FMT")]
    format: Option<String>,

    /// File extensions to include, comma separated
    #[arg(long, value_delimiter = ',')]
    extensions: Vec<String>,

    /// Languages whose files to include, comma separated
    #[arg(long, value_delimiter = ',')]
    languages: Vec<String>,

    /// Glob patterns of files to exclude, comma separated
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Glob patterns to restrict the analysis to, comma separated
    #[arg(long = "restrict-to", value_delimiter = ',')]
    restrict_to: Vec<String>,

    /// Files blamed in parallel [default: one per CPU]
    #[arg(long)]
    jobs: Option<usize>,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// YAML config file. CLI flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an annotated config template (or write it to FILE) and exit
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "-")]
    generate_config: Option<String>,

    /// No progress or summary on stderr
    #[arg(long, short)]
    quiet: bool,
}

/// Fully resolved run settings: CLI over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    repository: PathBuf,
    revision: String,
    mode: AttributionMode,
    order_by: RankKey,
    format: OutputFormat,
    filter: FileFilter,
    jobs: Option<usize>,
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Some(target) = &args.generate_config {
        let path = (target != "-").then(|| Path::new(target.as_str()));
        if let Err(e) = config::print_template(path) {
            eprintln!("{} {e}", "Error:".red().bold());
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => TallyConfig::default(),
    };
    // Ranking key and format are checked here, before any git work.
    let settings = resolve_settings(args, &cfg)?;
    run_tally(&settings, args.quiet)
}

fn resolve_settings(args: &Args, cfg: &TallyConfig) -> Result<Settings> {
    let pick = |cli: &[String], file: &Option<Vec<String>>| -> Vec<String> {
        if cli.is_empty() { file.clone().unwrap_or_default() } else { cli.to_vec() }
    };

    let order_by = args.order_by.as_deref().or(cfg.order_by.as_deref()).unwrap_or("lines");
    let format = args.format.as_deref().or(cfg.format.as_deref()).unwrap_or("tabular");

    let jobs = args.jobs.or(cfg.jobs);
    if jobs == Some(0) {
        return Err(TallyError::Config("--jobs must be 1 or greater".to_string()));
    }

    let use_committer = args.use_committer || cfg.use_committer.unwrap_or(false);

    Ok(Settings {
        repository: args
            .repository
            .clone()
            .or_else(|| cfg.repository.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(".")),
        revision: args
            .revision
            .clone()
            .or_else(|| cfg.revision.clone())
            .unwrap_or_else(|| "HEAD".to_string()),
        mode: if use_committer { AttributionMode::Committer } else { AttributionMode::Author },
        order_by: order_by.parse()?,
        format: format.parse()?,
        filter: FileFilter {
            extensions: pick(&args.extensions, &cfg.extensions),
            languages: pick(&args.languages, &cfg.languages),
            exclude: pick(&args.exclude, &cfg.exclude),
            restrict: pick(&args.restrict_to, &cfg.restrict_to),
        },
        jobs,
        output: args.output.clone().or_else(|| cfg.output.as_ref().map(PathBuf::from)),
    })
}

// ── Tally pipeline ─────────────────────────────────────────────────────────────

fn run_tally(settings: &Settings, quiet: bool) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs.unwrap_or(0))
        .build()
        .map_err(|e| TallyError::Config(format!("Failed to start worker pool: {e}")))?;

    let pb = if quiet { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));

    let total_start = Instant::now();
    let mut step_start = Instant::now();

    let git = GitCli::new(&settings.repository, &settings.revision, settings.mode);

    pb.set_message(format!("[1/3] Listing files in {} at {}...", git.repo().display(), git.revision()));
    let all_files = match git.list_files() {
        Ok(f) => f,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    let selected = match files::filter_files(&all_files, &settings.filter) {
        Ok(f) => f,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    let dropped = all_files.len() - selected.len();
    let t1 = fmt_dur(step_start.elapsed()); step_start = Instant::now();
    pb.println(format!("  ✓ [1/3] Listing files ({} of {})            {t1}", selected.len(), all_files.len()));

    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ "),
    );
    pb.set_length(selected.len() as u64);
    pb.set_message("[2/3] Blaming files");

    let mut ranked = match pool.install(|| stats::tally(&git, &selected, settings.mode, &pb)) {
        Ok(s) => s,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    let t2 = fmt_dur(step_start.elapsed()); step_start = Instant::now();
    pb.println(format!("  ✓ [2/3] Blaming files                      {t2}"));

    pb.set_message("[3/3] Ranking authors...");
    stats::rank(&mut ranked, settings.order_by);
    let t3 = fmt_dur(step_start.elapsed());
    pb.println(format!("  ✓ [3/3] Ranking by {:<8}                {t3}", settings.order_by.to_string()));
    pb.finish_and_clear();

    if !quiet {
        eprintln!("{} {} files, {} authors — ⏱ {}{}",
            "✔".green(),
            selected.len(),
            ranked.len(),
            fmt_dur(total_start.elapsed()),
            if dropped == 0 { String::new() } else {
                format!(" — {} file(s) skipped by filters", dropped).bright_black().to_string()
            }
        );
    }

    reporters::write_report(settings.format, &ranked, settings.output.as_deref())?;

    if let Some(p) = &settings.output {
        if !quiet {
            eprintln!("   → {}", p.display());
        }
    }
    Ok(())
}

// ── Duration formatting ────────────────────────────────────────────────────────

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms >= 1000 { format!("{:.1}s", d.as_secs_f64()) } else { format!("{ms}ms") }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
