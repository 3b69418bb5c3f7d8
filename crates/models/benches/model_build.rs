//! Benchmarks for building the precomputed models
//!
//! Run with: cargo bench --package models
//!
//! Uses a synthetic catalog so it runs without the real export.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{CatalogIndex, Item, RatingEvent};
use models::{ContentSimilarityModel, LatentFactorConfig, LatentFactorModel, build_user_profile};

const WORDS: [&str; 12] = [
    "heist", "detective", "space", "family", "dragon", "kitchen", "island", "war", "school",
    "band", "haunted", "court",
];
const GENRES: [&str; 6] = ["Action", "Dramas", "Comedies", "Documentaries", "Horror Movies", "Kids' TV"];

fn synthetic_catalog(items: u32, users: u32) -> CatalogIndex {
    let catalog: Vec<Item> = (0..items)
        .map(|i| {
            let description = (0..6)
                .map(|w| WORDS[((i * 7 + w * 3) % WORDS.len() as u32) as usize])
                .collect::<Vec<_>>()
                .join(" ");
            let genres = vec![
                GENRES[(i % 6) as usize].to_string(),
                GENRES[((i / 6) % 6) as usize].to_string(),
            ];
            Item::new(i, format!("Title {}", i), "Movie", description, genres)
        })
        .collect();

    let ratings: Vec<RatingEvent> = (0..users)
        .flat_map(|u| {
            (0..20).map(move |k| {
                let item = (u * 13 + k * 31) % items;
                let rating = 0.5 + ((u + item) % 10) as f32 * 0.5;
                RatingEvent::new(u, item, format!("Title {}", item), rating)
            })
        })
        .collect();

    CatalogIndex::from_parts(catalog, ratings, vec![])
}

fn bench_similarity_build(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000, 200);

    c.bench_function("similarity_build_1000", |b| {
        b.iter(|| black_box(ContentSimilarityModel::build(black_box(&catalog))))
    });
}

fn bench_neighbors(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000, 200);
    let model = ContentSimilarityModel::build(&catalog);

    c.bench_function("neighbors", |b| {
        b.iter(|| black_box(model.neighbors(black_box("Title 500"))))
    });
}

fn bench_latent_factor_training(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000, 500);
    let config = LatentFactorConfig::default().with_factors(50).with_epochs(10);

    c.bench_function("latent_factor_train", |b| {
        b.iter(|| {
            let model = LatentFactorModel::train(black_box(catalog.ratings()), config.clone()).unwrap();
            black_box(model)
        })
    });
}

fn bench_build_user_profile(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000, 500);

    c.bench_function("build_user_profile", |b| {
        b.iter(|| black_box(build_user_profile(&catalog, black_box(7), 3.5, 3)))
    });
}

criterion_group!(
    benches,
    bench_similarity_build,
    bench_neighbors,
    bench_latent_factor_training,
    bench_build_user_profile
);
criterion_main!(benches);
