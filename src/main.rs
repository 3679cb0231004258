use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soldash::analysis::{PatternAnalyzer, DECILES};
use soldash::api::state::AppState;
use soldash::api::{build_router, cors_layer};
use soldash::collect::Collector;
use soldash::config::AppConfig;
use soldash::models::{parse_import_file, PatternAnalysis};
use soldash::storage::{GameStore, StorageConfig};

#[derive(Parser)]
#[command(name = "soldash")]
#[command(about = "Jackpot round tracker with decile pattern analysis")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Scrape the fairness table and store new games
    Collect {
        /// Number of pages to scrape
        #[arg(long, default_value = "5", conflicts_with = "last")]
        pages: u32,

        /// Scrape enough pages to cover the last N games
        #[arg(long)]
        last: Option<usize>,

        /// Fetch and parse but don't store
        #[arg(long)]
        dry_run: bool,
    },

    /// Import games from a JSON file
    Import {
        /// File holding `{"games": [...]}` or a bare array of games
        file: PathBuf,
    },

    /// Decile pattern of the most recent games
    Patterns {
        #[arg(long, default_value = "10")]
        count: usize,
    },

    /// Compare patterns across the 10, 30 and 50 game windows
    Compare,

    /// Hot/cold zones, recommendation and trend shift
    Insights {
        #[arg(long, default_value = "10")]
        count: usize,
    },

    /// Database statistics
    Stats,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn print_pattern(title: &str, pattern: &PatternAnalysis) {
    println!("\n=== {} ({} games) ===", title, pattern.game_count);
    for decile in DECILES {
        let count = pattern.decile_distribution.get(&decile).copied().unwrap_or(0);
        let pct = pattern.decile_percentages.get(&decile).copied().unwrap_or(0.0);
        println!(
            "  D{:<2} {:>4} {:>6.2}%  {}",
            decile,
            count,
            pct,
            "#".repeat(count as usize)
        );
    }
    println!(
        "  Most common: {}  Least common: {}",
        pattern.most_common_decile, pattern.least_common_decile
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(log_level, cli.json_logs);

    tracing::info!("Starting soldash v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(GameStore::new(&StorageConfig::new(config.data_dir.clone())));

    match cli.command {
        Commands::Serve { host, port } => {
            let collector = if config.collector.enabled {
                Some(Arc::new(Collector::new(&config.collector)?))
            } else {
                tracing::info!("Collector disabled; /api/v1/scrape will return 501");
                None
            };

            let state = AppState::new(store, collector, &config.live_game);
            let app = build_router(state).layer(cors_layer(&config.server.cors_origin)?);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Collect {
            pages,
            last,
            dry_run,
        } => {
            let collector = Collector::new(&config.collector)?;
            let games = match last {
                Some(n) => collector.scrape_last(n).await,
                None => collector.scrape_pages(pages).await,
            };

            println!("\n=== Collect Results ===");
            println!("Games scraped: {}", games.len());

            if dry_run {
                for game in &games {
                    println!(
                        "  #{} {:.4} SOL  ticket {}  {:.2}%  D{}  {}",
                        game.game_id,
                        game.game_value,
                        game.winning_ticket,
                        game.ticket_percentile,
                        game.decile,
                        game.winner
                    );
                }
                println!("\n(dry run - no data written to disk)");
            } else {
                let summary = store.insert_games(games)?;
                println!("Games stored:  {}", summary.inserted);
                println!("Duplicates:    {}", summary.duplicates());
            }
        }
        Commands::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let games = parse_import_file(&contents)
                .with_context(|| format!("Failed to parse games from {:?}", file))?;

            if games.is_empty() {
                anyhow::bail!("No games found in {:?}", file);
            }

            let summary = store.insert_games(games)?;
            println!("\n=== Import Results ===");
            println!("Total games:   {}", summary.total);
            println!("New:           {}", summary.inserted);
            println!("Duplicates:    {}", summary.duplicates());
        }
        Commands::Patterns { count } => {
            let analyzer = PatternAnalyzer::new(store.as_ref());
            let pattern = analyzer.summarize(count)?;
            print_pattern(&format!("Last {} games", count), &pattern);
        }
        Commands::Compare => {
            let analyzer = PatternAnalyzer::new(store.as_ref());
            let comparison = analyzer.compare()?;
            print_pattern("Last 10 games", &comparison.last_10_games);
            print_pattern("Last 30 games", &comparison.last_30_games);
            print_pattern("Last 50 games", &comparison.last_50_games);
        }
        Commands::Insights { count } => {
            let analyzer = PatternAnalyzer::new(store.as_ref());
            let insight = analyzer.strategic_insight(count)?;
            let shift = analyzer.trend_shift()?;

            println!("\n=== Insights (last {} games) ===", count);
            println!("Sample size:   {}", insight.sample_size);
            println!("Hot zones:     {:?}", insight.hot_zones);
            println!("Cold zones:    {:?}", insight.cold_zones);
            println!("Most common:   {}", insight.most_common_range);
            println!("Least common:  {}", insight.least_common_range);
            println!("\n{}", insight.recommendation);

            println!("\n=== Trend ===");
            println!(
                "Hot decile 10/30/50: {} / {} / {}",
                shift.most_common_10, shift.most_common_30, shift.most_common_50
            );
            println!("{}", shift.summary);
        }
        Commands::Stats => {
            let stats = store.stats()?;
            println!("\n=== Database ===");
            println!("Total games:   {}", stats.total_games);
            if let Some(oldest) = stats.oldest_game {
                println!("Oldest:        #{} ({})", oldest.game_id, oldest.timestamp);
            }
            if let Some(newest) = stats.newest_game {
                println!("Newest:        #{} ({})", newest.game_id, newest.timestamp);
            }
        }
    }

    Ok(())
}
