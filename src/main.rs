use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use record_search_lib::matching::{BatchClassifier, NameMatchClassifier};
use record_search_lib::models::{Query, SearchStatus};
use record_search_lib::scheduling::{BatchRun, ChunkedBatchScheduler, ReplayExecutor};
use record_search_lib::utils::batch_config::{MatchingConfig, SchedulerConfig};
use record_search_lib::utils::env::load_env;
use record_search_lib::utils::get_memory_usage;
use record_search_lib::utils::input_loader::{load_queries_from_file, parse_names_input};
use record_search_lib::utils::progress_bars::progress_callback::{
    combine_sinks, create_bar_sink, create_logging_sink, ProgressSink,
};
use record_search_lib::utils::progress_bars::progress_config::ProgressConfig;

#[derive(Parser)]
#[command(author, version, about = "Batch person-name search with exact/partial match classification", long_about = None)]
struct Args {
    /// Names to search, e.g. "John Smith,1990;Jane Doe"
    #[arg(long)]
    names: Option<String>,

    /// File with one `name[,birth_year]` per line (optional `name` header)
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON file of recorded candidates keyed by query name
    #[arg(long)]
    fixture: PathBuf,

    /// Print the full session (results + summary) as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Override CHUNK_MIN_SIZE
    #[arg(long)]
    min_chunk_size: Option<usize>,

    /// Override CHUNK_MAX_SIZE
    #[arg(long)]
    max_chunk_size: Option<usize>,

    /// Override CHUNK_PAUSE_SECONDS
    #[arg(long)]
    pause_seconds: Option<f64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
    info!("Starting record search batch");

    let mut scheduler_config = SchedulerConfig::from_env();
    if let Some(min) = args.min_chunk_size {
        scheduler_config.min_chunk_size = min;
    }
    if let Some(max) = args.max_chunk_size {
        scheduler_config.max_chunk_size = max;
    }
    if let Some(pause) = args.pause_seconds {
        scheduler_config.pause_between_chunks = pause;
    }
    scheduler_config.log_config();

    let matching_config = MatchingConfig::from_env().context("Failed to load name matching configuration")?;
    matching_config.log_config();

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );

    let queries = collect_queries(&args)?;
    if queries.is_empty() {
        bail!("No names to search; pass --names and/or --input");
    }
    info!("Searching {} name(s)", queries.len());

    let executor = ReplayExecutor::from_json_file(&args.fixture)
        .with_context(|| format!("Failed to load fixture {}", args.fixture.display()))?;
    info!("Loaded {} recorded search(es) from {}", executor.len(), args.fixture.display());

    let classifier = BatchClassifier::new(
        NameMatchClassifier::new(matching_config),
        scheduler_config.birth_year_tolerance,
    );
    let scheduler = ChunkedBatchScheduler::new(scheduler_config, classifier);

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let bar = progress_config.create_progress_bar(queries.len());
    let mut sinks: Vec<ProgressSink> = Vec::new();
    if let Some(bar) = &bar {
        sinks.push(create_bar_sink(bar.clone()));
    }
    if progress_config.should_show_detailed() {
        sinks.push(create_logging_sink("record_search"));
    }
    let progress = if sinks.is_empty() { None } else { Some(combine_sinks(sinks)) };

    let run = scheduler
        .run(&queries, &executor, progress, &cancel)
        .await
        .context("Batch search failed")?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    print_summary(&run);

    if progress_config.should_show_memory() {
        info!("Final memory usage: {} MB", get_memory_usage());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&run).context("Failed to serialize session")?;
        println!("{}", json);
    }

    Ok(())
}

fn collect_queries(args: &Args) -> Result<Vec<Query>> {
    let mut queries = Vec::new();
    if let Some(names) = &args.names {
        queries.extend(parse_names_input(names));
    }
    if let Some(path) = &args.input {
        let loaded = load_queries_from_file(path)
            .with_context(|| format!("Failed to load names from {}", path.display()))?;
        queries.extend(loaded);
    }
    Ok(queries)
}

async fn shutdown_signal(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            warn!("Ctrl-C received, stopping after the current search...");
            cancel.cancel();
        }
        Err(e) => warn!("Could not install Ctrl-C handler: {}", e),
    }
}

fn print_summary(run: &BatchRun) {
    info!("=== Search Results ===");
    for result in &run.results {
        let birth_year = result
            .birth_year
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        info!(
            "{} {}{}: {} - {} [{:.2}s]",
            result.status.emoji(),
            result.name,
            birth_year,
            result.match_category,
            result.match_reasoning,
            result.search_duration
        );
        for verdict in result.ranked_matches() {
            let range = match verdict.within_expected_range {
                Some(true) => " ✓ birth year",
                Some(false) => " ✗ birth year",
                None => "",
            };
            info!(
                "     {} {:.2} {} | {} | {}{}",
                verdict.match_type.display_category(),
                verdict.confidence,
                verdict.candidate.name,
                verdict.candidate.date_of_birth,
                verdict.candidate.location,
                range
            );
        }
        if result.status == SearchStatus::Error || result.status == SearchStatus::Timeout {
            if let Some(error) = &result.error {
                warn!("     {}", error);
            }
        }
    }

    let s = &run.summary;
    info!("=== Batch Summary ===");
    info!("Run ID: {}", run.run_id);
    if run.cancelled {
        warn!("Run was cancelled; {} result(s) kept", s.total_searches);
    }
    info!("Total searches: {}", s.total_searches);
    info!("Matches: {} ({} exact, {} partial)", s.matches, s.exact_matches, s.partial_matches);
    info!("No match: {}", s.no_matches);
    info!("Errors: {} | Timeouts: {}", s.errors, s.timeouts);
    info!("Chunks: {} planned, {} used", s.chunk_count, s.chunks_used);
    info!(
        "Total time: {:.2}s | Avg per search: {:.2}s | Throughput: {:.1}/min",
        s.total_duration_secs, s.avg_duration_secs, s.throughput_per_minute
    );
    info!("Success rate: {:.1}% | Match rate: {:.1}%", s.success_rate, s.match_rate);
}
