use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{CatalogIndex, UserId};
use engine::{EngineConfig, Homepage, RecommendationEngine, RecommendationEntry};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// cine-recs - hybrid movie and show recommender
#[derive(Parser)]
#[command(name = "cine-recs")]
#[command(about = "Content-based and collaborative recommendations over a title catalog", long_about = None)]
struct Cli {
    /// Directory holding titles.dat, ratings.dat and users.dat
    #[arg(short, long, default_value = "data/catalog")]
    data_dir: PathBuf,

    /// Optional JSON engine config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend titles similar to a seed title
    Recommend {
        /// Seed title (exact match)
        #[arg(long)]
        title: String,

        /// Number of recommendations (defaults to the config value)
        #[arg(long)]
        count: Option<usize>,

        /// Minimum mean rating a recommendation must have
        #[arg(long)]
        min_rating: Option<f32>,

        /// Disable the shared-genre bonus
        #[arg(long)]
        no_genre_bonus: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Build the personalized homepage for a user
    Homepage {
        #[arg(long)]
        user_id: UserId,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a user's profile and rating history
    User {
        #[arg(long)]
        user_id: UserId,
    },

    /// Search the catalog by title
    Search {
        /// Case-insensitive substring
        #[arg(long)]
        title: String,
    },

    /// Run random title and homepage requests and report latencies
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    println!("Loading catalog from {}...", cli.data_dir.display());
    let start = Instant::now();
    let catalog = Arc::new(
        CatalogIndex::load_from_files(&cli.data_dir).context("Failed to load catalog")?,
    );
    let (users, items, ratings) = catalog.counts();
    println!(
        "{} Loaded {} titles, {} users, {} ratings in {:?}",
        "✓".green(),
        items,
        users,
        ratings,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            title,
            count,
            min_rating,
            no_genre_bonus,
            json,
        } => {
            let hybrid = &config.hybrid;
            let count = count.unwrap_or(hybrid.default_count);
            let min_rating = min_rating.unwrap_or(hybrid.min_rating);
            let use_genre_bonus = hybrid.use_genre_bonus && !no_genre_bonus;
            let engine = build_engine(catalog, config).await?;
            handle_recommend(&engine, &title, count, min_rating, use_genre_bonus, json).await?
        }
        Commands::Homepage { user_id, json } => {
            let engine = build_engine(catalog, config).await?;
            handle_homepage(&engine, user_id, json).await?
        }
        Commands::User { user_id } => handle_user(&catalog, &config, user_id)?,
        Commands::Search { title } => handle_search(&catalog, &title),
        Commands::Benchmark { requests } => {
            let engine = build_engine(catalog, config).await?;
            handle_benchmark(engine, requests).await?
        }
    }

    Ok(())
}

async fn build_engine(catalog: Arc<CatalogIndex>, config: EngineConfig) -> Result<RecommendationEngine> {
    println!("Building models...");
    let start = Instant::now();
    let engine = RecommendationEngine::new(catalog, config).await?;
    println!("{} Models ready in {:?}", "✓".green(), start.elapsed());
    Ok(engine)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    engine: &RecommendationEngine,
    title: &str,
    count: usize,
    min_rating: f32,
    use_genre_bonus: bool,
    json: bool,
) -> Result<()> {
    let entries = engine
        .recommend_with(title, count, min_rating, use_genre_bonus)
        .await?;

    if json {
        let body = serde_json::json!({ "recommended": entries });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if entries.is_empty() && engine.context().similarity().row_of(title).is_none() {
        println!("{} No title named '{}' in the catalog", "✗".red(), title);
        return Ok(());
    }

    println!("{}", format!("Because you watched '{}':", title).bold().blue());
    print_entries(&entries);
    Ok(())
}

/// Handle the 'homepage' command
async fn handle_homepage(engine: &RecommendationEngine, user_id: UserId, json: bool) -> Result<()> {
    let homepage = engine.recommend_for_user(user_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&homepage)?);
    } else {
        print_homepage(&homepage);
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(catalog: &CatalogIndex, config: &EngineConfig, user_id: UserId) -> Result<()> {
    let ratings = catalog.user_ratings(user_id);
    let Some(user) = catalog.user(user_id) else {
        if ratings.is_empty() {
            bail!("User {} not found", user_id);
        }
        bail!("User {} has ratings but no profile row", user_id);
    };

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    for (key, value) in &user.attributes {
        println!("{}{}: {}", "• ".green(), key, value);
    }

    let homepage = &config.homepage;
    let profile = models::build_user_profile(
        catalog,
        user_id,
        homepage.favorite_rating_threshold,
        homepage.favorite_genre_count,
    );
    println!("{}Number of ratings: {}", "• ".cyan(), profile.rated_count);
    println!("{}Average rating: {:.2}", "• ".cyan(), profile.avg_rating);
    if profile.favorite_genres.is_empty() {
        println!("{}Favorite genres: none yet", "• ".cyan());
    } else {
        println!("{}Favorite genres: {}", "• ".cyan(), profile.favorite_genres.join(", "));
    }

    let mut top_rated: Vec<_> = ratings.iter().collect();
    top_rated.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
    println!("Top rated titles:");
    for rating in top_rated.iter().take(5) {
        println!("  - {} (rating: {})", rating.title, rating.rating);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &CatalogIndex, title: &str) {
    let needle = title.to_lowercase();

    // (exact match first, mean rating, row)
    let mut matches: Vec<(bool, Option<f32>, usize)> = catalog
        .items()
        .iter()
        .enumerate()
        .filter_map(|(row, item)| {
            let haystack = item.title.to_lowercase();
            if !haystack.contains(&needle) {
                return None;
            }
            Some((haystack == needle, catalog.mean_rating(&item.title), row))
        })
        .collect();

    matches.sort_by(|a, b| {
        b.0.cmp(&a.0).then_with(|| {
            b.1.unwrap_or(0.0)
                .partial_cmp(&a.1.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for (_, _, row) in matches.iter().take(20) {
        let Some(item) = catalog.item(*row) else {
            continue;
        };
        let stats = catalog
            .rating_stats(&item.title)
            .map(|s| format!("avg {:.2} ({} ratings)", s.mean, s.count))
            .unwrap_or_else(|| "unrated".to_string());
        println!(
            "{}: {} [{}] {} - {}",
            item.id.to_string().green(),
            item.title,
            item.kind,
            item.genres.join(", "),
            stats
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(engine: RecommendationEngine, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("benchmark needs at least one request");
    }

    let catalog = engine.context().catalog().clone();
    let user_ids: Vec<UserId> = {
        let mut ids: Vec<UserId> = catalog.ratings().iter().map(|r| r.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    if catalog.is_empty() {
        bail!("benchmark needs a non-empty catalog");
    }

    // Half title lookups, half homepages
    let mut rng = rand::rng();
    let plan: Vec<Request> = (0..requests)
        .map(|_| {
            if user_ids.is_empty() || rng.random_bool(0.5) {
                let row = rng.random_range(0..catalog.len());
                let title = catalog.item(row).map(|i| i.title.clone()).unwrap_or_default();
                Request::Title(title)
            } else {
                Request::User(user_ids[rng.random_range(0..user_ids.len())])
            }
        })
        .collect();

    info!("Running {} benchmark requests", plan.len());
    let wall = Instant::now();
    let mut handles = vec![];
    for request in plan {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            match request {
                Request::Title(title) => {
                    engine.recommend_by_title(&title, 10).await?;
                }
                Request::User(user_id) => {
                    engine.recommend_for_user(user_id).await?;
                }
            }
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

enum Request {
    Title(String),
    User(UserId),
}

fn print_entries(entries: &[RecommendationEntry]) {
    if entries.is_empty() {
        println!("  (nothing to recommend)");
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!("{}. {} (id {})", (rank + 1).to_string().green(), entry.title, entry.id);
    }
}

fn print_homepage(homepage: &Homepage) {
    println!("{}", format!("Homepage for user {}", homepage.user_id).bold().blue());
    for section in &homepage.sections {
        println!();
        println!("{}", section.label.bold());
        print_entries(&section.entries);
    }
}
