use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use console::style;
use human_panic::setup_panic;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::*;
use rayon::prelude::*;
use thousands::Separable;

use ritornello::analyze;
use ritornello::dedup;
use ritornello::exporters::{Exporter, JSONExporter, TextExporter};
use ritornello::structs::{RunResult, RunSettings, Song};

#[derive(Parser)]
#[command(
    name = "ritornello",
    version,
    about = "Maps supermaximal melodic repeats in note-event files"
)]
struct Args {
    /// Song files (JSON note events) or directories of artist folders
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory the result files are written to
    #[arg(short, long, default_value = "ritornello-out")]
    out: PathBuf,

    /// Minimal repeat length, in notes
    #[arg(short = 'l', long, default_value_t = 5)]
    min_length: usize,

    /// Interval n-gram size
    #[arg(long, default_value_t = 3)]
    ngram: usize,

    /// Output format
    #[arg(long, default_value = "json", value_parser = ["json", "text"])]
    format: String,

    /// Analyze near-duplicate songs instead of skipping them
    #[arg(long)]
    no_dedup: bool,

    /// Number of worker threads (defaults to all cores)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() {
    setup_panic!();
    let args = Args::parse();
    simple_logger::SimpleLogger::new()
        .with_level(args.verbose.log_level_filter())
        .init()
        .expect("Unable to initialize logger");

    if let Err(ref e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let total = Instant::now();

    let settings = RunSettings {
        min_repeat_length: args.min_length.max(1),
        ngram_size: args.ngram,
        threads_count: if args.threads > 0 { args.threads } else { num_cpus::get() },
        ..RunSettings::default()
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads_count)
        .build_global()
        .context("Unable to build the thread pool")?;

    trace!("Min. repeat length     {}", settings.min_repeat_length);
    trace!("N-gram size            {}", settings.ngram_size);
    trace!("Output directory       {}", args.out.display());
    trace!("Output format          {}", args.format);
    trace!("Fuzzy deduplication    {}", !args.no_dedup);
    trace!("Threads count          {}", settings.threads_count);

    info!("{} Collecting songs...", style("[1/3]").blue().bold());
    let mut files = collect_song_files(&args.inputs)?;
    if !args.no_dedup {
        let before = files.len();
        files = deduplicate(files, settings.similarity_threshold);
        let skipped = before - files.len();
        if skipped > 0 {
            info!("{} near-duplicate songs skipped", skipped.separate_with_commas());
        }
    }

    info!(
        "{} Analyzing {} songs...",
        style("[2/3]").blue().bold(),
        files.len().separate_with_commas()
    );
    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.blue} [{elapsed}] {wide_bar} {pos}/{len} ({eta} remaining)",
        )
        .context("Invalid progress template")?,
    );
    let results: Vec<(PathBuf, RunResult)> = files
        .par_iter()
        .filter_map(|path| {
            let analyzed = Song::from_file(&path.to_string_lossy())
                .map(|song| {
                    let mut result = analyze::analyze_song(&song, &settings);
                    if result.song.is_empty() {
                        result.song = song_title(path);
                    }
                    (path.clone(), result)
                })
                .map_err(|e| warn!("{:#}", e))
                .ok();
            progress.inc(1);
            analyzed
        })
        .collect();
    progress.finish_and_clear();

    info!("{} Writing results...", style("[3/3]").blue().bold());
    fs::create_dir_all(&args.out)
        .with_context(|| format!("Unable to create `{}`", args.out.display()))?;
    let exporter: Box<dyn Exporter> = match args.format.as_str() {
        "text" => Box::new(TextExporter),
        _ => Box::new(JSONExporter),
    };
    let mut repeat_count = 0;
    let mut track_count = 0;
    for (path, result) in &results {
        repeat_count += result.repeat_count();
        track_count += result.tracks.len();
        let out_file = args.out.join(song_title(path));
        exporter.save(result, &out_file.to_string_lossy())?;
    }

    info!(
        "{}",
        style(format!(
            "{} songs, {} tracks, {} repeats mapped in {}.",
            results.len().separate_with_commas(),
            track_count.separate_with_commas(),
            repeat_count.separate_with_commas(),
            HumanDuration(total.elapsed())
        ))
        .green()
        .bold()
    );
    Ok(())
}

fn song_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Accepts song files directly, or directories laid out as
/// `corpus/artist/song.json`; anything that is not a JSON file is ignored.
fn collect_song_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    fn is_song_file(path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
    }

    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            let entries = fs::read_dir(input)
                .with_context(|| format!("Unable to read `{}`", input.display()))?;
            for entry in entries {
                let path = entry?.path();
                if is_song_file(&path) {
                    files.push(path);
                } else if path.is_dir() {
                    let artist = fs::read_dir(&path)
                        .with_context(|| format!("Unable to read `{}`", path.display()))?;
                    for entry in artist {
                        let path = entry?.path();
                        if is_song_file(&path) {
                            files.push(path);
                        }
                    }
                }
            }
        } else {
            warn!("`{}` is neither a file nor a directory", input.display());
        }
    }
    files.sort();
    Ok(files)
}

/// Drops files whose normalized title fuzzily matches an earlier one in
/// the same directory.
fn deduplicate(files: Vec<PathBuf>, threshold: f64) -> Vec<PathBuf> {
    let mut kept = Vec::with_capacity(files.len());
    let mut seen_per_dir: HashMap<PathBuf, Vec<String>> = HashMap::new();

    for file in files {
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let title = dedup::normalize_title(&song_title(&file));
        let seen = seen_per_dir.entry(dir).or_default();

        if dedup::is_similar(&title, seen, threshold) {
            info!("Duplicate (fuzzy match) skipped: {}", file.display());
        } else {
            seen.push(title);
            kept.push(file);
        }
    }

    kept
}
