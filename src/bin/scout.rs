use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use indie_scout::logging::init_tracing;
use indie_scout::{
    Bounds, CatalogService, FilterCriteria, PublisherConfidence, QueryResult, ScoutConfig,
};
use itertools::Itertools;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "scout", version, about = "Indie game scouting over a Steam catalog export")]
struct Cli {
    /// Catalog CSV (overrides SCOUT_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Print the genre and publisher-tag options observed at load time
    Options,
    /// Filter the catalog and report the matches plus the two insight picks
    Query(QueryArgs),
    /// Print load counters and the most frequent publisher tokens
    Stats {
        /// How many publisher tokens to list
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Start from the scouting preset (unlikely, 2000-2030, $0-100, 10-10000 reviews)
    #[arg(long, default_value_t = false)]
    scout_defaults: bool,
    /// Publisher tags to keep (likely, uncertain, unlikely)
    #[arg(long = "tag", value_delimiter = ',')]
    tags: Vec<PublisherConfidence>,
    /// Genres to keep; a game matches if it has any of them
    #[arg(long = "genre", value_delimiter = ',')]
    genres: Vec<String>,
    /// Earliest release date (YYYY-MM-DD)
    #[arg(long)]
    released_from: Option<NaiveDate>,
    /// Latest release date (YYYY-MM-DD)
    #[arg(long)]
    released_to: Option<NaiveDate>,
    #[arg(long)]
    price_min: Option<f64>,
    #[arg(long)]
    price_max: Option<f64>,
    #[arg(long)]
    reviews_min: Option<u64>,
    #[arg(long)]
    reviews_max: Option<u64>,
    /// Emit the full result as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Rows to show in the summary
    #[arg(long, default_value_t = 25)]
    limit: usize,
}

impl QueryArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut c = if self.scout_defaults {
            FilterCriteria::scout_defaults()
        } else {
            FilterCriteria::any()
        };
        if !self.tags.is_empty() {
            c.publisher_tags = Some(self.tags.iter().copied().collect());
        }
        if !self.genres.is_empty() {
            c.genres = Some(self.genres.iter().map(|g| g.trim().to_string()).collect());
        }
        c.date_range = merge_bounds(
            c.date_range,
            self.released_from,
            self.released_to,
            (NaiveDate::MIN, NaiveDate::MAX),
        );
        c.price_range = merge_bounds(c.price_range, self.price_min, self.price_max, (0.0, f64::MAX));
        c.review_count_range =
            merge_bounds(c.review_count_range, self.reviews_min, self.reviews_max, (0, u64::MAX));
        c
    }
}

/// Overlay CLI bounds on a preset; a missing side keeps the preset or opens up.
fn merge_bounds<T: Copy + PartialOrd>(
    preset: Option<Bounds<T>>,
    min: Option<T>,
    max: Option<T>,
    open: (T, T),
) -> Option<Bounds<T>> {
    if min.is_none() && max.is_none() {
        return preset;
    }
    let (base_min, base_max) = preset.map(|b| (b.min, b.max)).unwrap_or(open);
    Some(Bounds::new(min.unwrap_or(base_min), max.unwrap_or(base_max)))
}

fn print_summary(result: &QueryResult, limit: usize) {
    println!("Total games found: {}", result.total);
    for game in result.rows.iter().take(limit) {
        println!(
            "{:>8}  {:<40.40}  {:>7.2}  {:>7}  {:>5.3}  {:<9}",
            game.app_id,
            game.name,
            game.price,
            game.total_reviews,
            game.review_ratio,
            game.has_publisher.as_str(),
        );
    }
    if result.total > limit {
        println!("... {} more", result.total - limit);
    }
    for card in [&result.brightest_star, &result.underdog].into_iter().flatten() {
        println!(
            "{}: {} ({} reviews, ratio {:.3}, {} reviews/day) {}",
            card.insight,
            card.name,
            card.total_reviews,
            card.review_ratio,
            card.reviews_per_day
                .map(|r| format!("{r:.2}"))
                .unwrap_or_else(|| "n/a".to_string()),
            card.link,
        );
    }
    if result.brightest_star.is_none() && result.underdog.is_none() {
        println!("No insight picks for this query.");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = ScoutConfig::from_env();
    if let Some(path) = cli.catalog.clone() {
        cfg.catalog_path = path;
    }
    init_tracing(&cfg.log_filter)?;

    let service = CatalogService::load(&cfg.catalog_path, cfg.load_options())
        .with_context(|| format!("failed to load catalog {}", cfg.catalog_path.display()))?;
    let catalog = service.snapshot();
    info!(games = catalog.len(), today = %catalog.today(), "catalog ready");

    match cli.command {
        Commands::Options => {
            println!("{}", serde_json::to_string_pretty(&service.options())?);
        }
        Commands::Query(args) => {
            let result = service.query(&args.criteria());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result, args.limit);
            }
        }
        Commands::Stats { top } => {
            println!("{}", serde_json::to_string_pretty(&catalog.stats())?);
            let frequencies = catalog.frequencies();
            println!(
                "publisher tokens: {} distinct, {} total",
                frequencies.len(),
                frequencies.total()
            );
            for (token, count) in frequencies
                .iter()
                .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
                .take(top)
            {
                let shown = if token.is_empty() { "<blank>" } else { token };
                println!("{count:>7}  {shown}");
            }
        }
    }
    Ok(())
}
