//! Fogwatch main entry point
//!
//! Command-line interface for the companion data client: one-shot refresh,
//! watch mode, and single-source queries.

use clap::{Parser, ValueEnum};
use fogwatch::cache::{self, SqliteCache};
use fogwatch::config::load_config_with_hash;
use fogwatch::refresh::{RefreshOutcome, Refresher, TracingNotifier};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Fogwatch: a companion data client for the Fog
///
/// Aggregates promo codes, the weekly Shrine rotation, and official news,
/// caches last-known-good snapshots, and reports what is new since the
/// previous fetch.
#[derive(Parser, Debug)]
#[command(name = "fogwatch")]
#[command(version = "1.0.0")]
#[command(about = "Promo codes, Shrine rotation, and news in one place", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore cached snapshots for this run
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with_all = ["watch", "source"])]
    dry_run: bool,

    /// Keep polling on the configured interval
    #[arg(long, conflicts_with = "dry_run")]
    watch: bool,

    /// Query a single source instead of refreshing everything
    #[arg(long, value_enum, conflicts_with_all = ["dry_run", "watch"])]
    source: Option<Source>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    Codes,
    Shrine,
    News,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let store = SqliteCache::open(Path::new(&config.cache.database_path))?;
    let mut refresher = Refresher::new(config, store)?;

    if cli.watch {
        handle_watch(&mut refresher, cli.fresh).await;
    } else if let Some(source) = cli.source {
        handle_source(&mut refresher, source, cli.fresh).await;
    } else {
        let outcome = refresher.refresh_all(cli.fresh, &TracingNotifier).await;
        print_outcome(&mut refresher, &outcome);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fogwatch=info,warn"),
            1 => EnvFilter::new("fogwatch=debug,info"),
            2 => EnvFilter::new("fogwatch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &fogwatch::config::Config) {
    println!("=== Fogwatch Dry Run ===\n");

    println!("Sources:");
    println!("  Codes:  {}", config.sources.codes_url);
    println!("  Shrine: {}", config.sources.shrine_url);
    println!("  News:   {}", config.sources.news_url);

    println!("\nClient:");
    println!(
        "  User agent: {}/{}",
        config.client.app_name, config.client.app_version
    );
    println!("  Timeout: {}s", config.client.timeout_secs);

    println!("\nCache:");
    println!("  Database: {}", config.cache.database_path);

    println!("\nNotifications:");
    println!("  Codes:  {}", config.notifications.codes);
    println!("  Shrine: {}", config.notifications.shrine);
    println!("  News:   {}", config.notifications.news);

    println!("\nRefresh interval: {} minutes", config.refresh.interval_minutes);

    println!("\n✓ Configuration is valid");
}

/// Handles watch mode: refresh on the configured interval until interrupted
async fn handle_watch(refresher: &mut Refresher<SqliteCache>, fresh: bool) {
    let minutes = refresher.config().refresh.interval_minutes;
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(minutes * 60));
    tracing::info!("Watching; refreshing every {} minutes", minutes);

    // Only the very first tick honors --fresh; later ones diff normally.
    let mut first = true;
    loop {
        interval.tick().await;
        let outcome = refresher.refresh_all(fresh && first, &TracingNotifier).await;
        first = false;
        print_outcome(refresher, &outcome);
    }
}

/// Handles --source: fetch and print a single source
async fn handle_source(refresher: &mut Refresher<SqliteCache>, source: Source, fresh: bool) {
    match source {
        Source::Codes => {
            let (snapshot, new_codes) = refresher.refresh_codes(fresh).await;
            print_codes(refresher, &snapshot);
            if !new_codes.is_empty() {
                println!("\n{} new since last fetch", new_codes.len());
            }
        }
        Source::Shrine => {
            let (snapshot, changed) = refresher.refresh_shrine(fresh).await;
            match snapshot {
                Some(shrine) => {
                    print_shrine(&shrine);
                    if changed {
                        println!("\nRotation changed since last fetch");
                    }
                }
                None => println!("Shrine unavailable and nothing cached"),
            }
        }
        Source::News => {
            let (snapshot, new_items) = refresher.refresh_news(fresh).await;
            match snapshot {
                Some(news) => {
                    print_news(&news);
                    if !new_items.is_empty() {
                        println!("\n{} new since last fetch", new_items.len());
                    }
                }
                None => println!("News unavailable and nothing cached"),
            }
        }
    }
}

/// Prints a full refresh outcome
fn print_outcome(refresher: &mut Refresher<SqliteCache>, outcome: &RefreshOutcome) {
    print_codes(refresher, &outcome.codes);
    println!();

    match &outcome.shrine {
        Some(shrine) => print_shrine(shrine),
        None => println!("Shrine unavailable and nothing cached"),
    }
    println!();

    match &outcome.news {
        Some(news) => print_news(news),
        None => println!("News unavailable and nothing cached"),
    }

    if !outcome.new_codes.is_empty() {
        println!("\nNew codes: {}", outcome.new_codes.len());
    }
    if outcome.shrine_changed {
        println!("Shrine rotation changed");
    }
    if !outcome.new_news.is_empty() {
        println!("New news items: {}", outcome.new_news.len());
    }

    // Everything printed counts as acknowledged.
    let ids = outcome.codes.codes.iter().map(|c| c.id.clone());
    cache::mark_codes_seen(refresher.store_mut(), ids);
}

/// Prints a codes snapshot, flagging unseen and expired entries
fn print_codes(refresher: &Refresher<SqliteCache>, snapshot: &fogwatch::CodesSnapshot) {
    println!("Promo Codes ({}):", snapshot.codes.len());
    if let Some(error) = &snapshot.error {
        println!("  (stale: {})", error);
    }

    let seen = cache::load_seen_codes(refresher.store());
    for code in &snapshot.codes {
        let mut flags = String::new();
        if !seen.contains(&code.id) {
            flags.push_str(" [new]");
        }
        if code.is_expired {
            flags.push_str(" [expired]");
        }
        let expires = match (&code.expires_at, code.days_left) {
            (Some(date), Some(days)) => format!(" (expires {}, {} days left)", date, days),
            (Some(date), None) => format!(" (expires {})", date),
            (None, Some(days)) => format!(" ({} days left)", days),
            (None, None) => String::new(),
        };
        println!("  {} - {}{}{}", code.code, code.title, expires, flags);
    }
}

/// Prints a shrine snapshot
fn print_shrine(shrine: &fogwatch::ShrineSnapshot) {
    match shrine.week {
        Some(week) => println!("Shrine (week {}):", week),
        None => println!("Shrine (rotation {}):", shrine.id),
    }
    println!(
        "  {} - {}",
        shrine.start.format("%Y-%m-%d"),
        shrine.end.format("%Y-%m-%d")
    );

    for perk in &shrine.perks {
        let character = perk
            .character
            .as_deref()
            .map(|c| format!(" ({})", c))
            .unwrap_or_default();
        println!(
            "  {}{} - {:?} - {} shards - {}",
            perk.name,
            character,
            perk.role,
            perk.shards,
            fogwatch::shrine::perk_wiki_url(&perk.name)
        );
    }
}

/// Prints a news snapshot
fn print_news(news: &fogwatch::NewsSnapshot) {
    println!("News ({}):", news.items.len());
    if let Some(error) = &news.error {
        println!("  (stale: {})", error);
    }
    for item in &news.items {
        println!(
            "  [{}] {} - {}",
            item.date.format("%Y-%m-%d"),
            item.title,
            item.url
        );
    }
}
