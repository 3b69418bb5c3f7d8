//! Simple test harness for the recommendation engine.
//!
//! Loads a catalog directory, builds the engine and prints one title-based
//! and one user-based result.
//!
//! Usage: engine-harness [data-dir] [seed-title] [user-id]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use data_loader::CatalogIndex;
use engine::{EngineConfig, RecommendationEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,engine=debug,pipeline=debug,models=debug")
        .init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data/catalog".to_string()));
    let seed_title = args.next().unwrap_or_else(|| "Inception".to_string());
    let user_id: u32 = match args.next() {
        Some(raw) => raw.parse().context("user id must be a number")?,
        None => 8,
    };

    info!("Loading catalog from {}", data_dir.display());
    let catalog = Arc::new(CatalogIndex::load_from_files(&data_dir)?);
    let engine = RecommendationEngine::new(catalog, EngineConfig::default()).await?;

    let similar = engine.recommend_by_title(&seed_title, 5).await?;
    info!("{} recommendations for {:?}:", similar.len(), seed_title);
    for (i, entry) in similar.iter().enumerate() {
        info!("{}. {} (id {})", i + 1, entry.title, entry.id);
    }

    let homepage = engine.recommend_for_user(user_id).await?;
    info!("Homepage for user {}:", user_id);
    info!("{}", serde_json::to_string_pretty(&homepage)?);

    Ok(())
}
