//! Example: build both models from a catalog export
//!
//! Run with: cargo run --package models --example build_models
//!
//! This example shows how to:
//! 1. Load the catalog export
//! 2. Build the content similarity model and list a title's neighbors
//! 3. Train the latent factor model and score a few titles for a user

use data_loader::CatalogIndex;
use models::{ContentSimilarityModel, LatentFactorConfig, LatentFactorModel, build_user_profile};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Model Build Example ===\n");

    let start = Instant::now();
    let catalog = CatalogIndex::load_from_files(Path::new("data/catalog"))?;
    println!("Loaded catalog in {:?}\n", start.elapsed());

    let similarity = ContentSimilarityModel::build(&catalog);
    let Some(seed) = catalog.items().first() else {
        println!("Catalog is empty");
        return Ok(());
    };

    println!("Closest titles to '{}':", seed.title);
    for (row, score) in similarity.neighbors(&seed.title).into_iter().take(5) {
        if let Some(item) = catalog.item(row) {
            println!("  {:.3}  {}", score, item.title);
        }
    }

    let model = LatentFactorModel::train(catalog.ratings(), LatentFactorConfig::default())?;
    println!("\nTraining RMSE: {:.4}", model.rmse(catalog.ratings()));

    if let Some(first) = catalog.ratings().first() {
        let profile = build_user_profile(&catalog, first.user_id, 3.5, 3);
        println!("\nUser {} favorite genres: {:?}", profile.user_id, profile.favorite_genres);
        for item in catalog.items().iter().filter(|i| !profile.has_seen(&i.title)).take(5) {
            println!(
                "  predicted {:.2} for {}",
                model.predict(profile.user_id, &item.title),
                item.title
            );
        }
    }

    Ok(())
}
