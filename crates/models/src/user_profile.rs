//! Build a UserProfile from the catalog's rating history
//!
//! Gathers everything the homepage composer needs in one pass:
//! - titles already rated (excluded from every section)
//! - average rating given
//! - favorite genres: tag frequency over ratings at or above a threshold

use crate::types::UserProfile;
use data_loader::{CatalogIndex, Item, RatingEvent, UserId};
use std::collections::HashMap;

/// Build a profile for a user.
///
/// Users without history (or unknown to the catalog) get an empty profile.
pub fn build_user_profile(
    catalog: &CatalogIndex,
    user_id: UserId,
    favorite_threshold: f32,
    favorite_count: usize,
) -> UserProfile {
    let mut profile = UserProfile::new(user_id);
    let ratings = catalog.user_ratings(user_id);

    if ratings.is_empty() {
        return profile;
    }

    let total: f32 = ratings.iter().map(|r| r.rating).sum();
    profile.rated_count = ratings.len();
    profile.avg_rating = total / ratings.len() as f32;
    profile.seen_titles = ratings.iter().map(|r| r.title.clone()).collect();
    profile.favorite_genres =
        compute_favorite_genres(catalog, ratings, favorite_threshold, favorite_count);

    profile
}

/// The rated catalog row: by id first, else the last row with the title
fn rated_item<'a>(catalog: &'a CatalogIndex, rating: &RatingEvent) -> Option<&'a Item> {
    catalog
        .item_by_id(rating.item_id)
        .filter(|item| item.title == rating.title)
        .or_else(|| {
            let row = *catalog.rows_for_title(&rating.title).last()?;
            catalog.item(row)
        })
}

/// Most frequent genre tags among ratings >= threshold.
///
/// Ties keep the order in which the tags were first encountered.
fn compute_favorite_genres(
    catalog: &CatalogIndex,
    ratings: &[RatingEvent],
    threshold: f32,
    count: usize,
) -> Vec<String> {
    // tag -> (frequency, first seen)
    let mut frequency: HashMap<&str, (usize, usize)> = HashMap::new();
    for rating in ratings.iter().filter(|r| r.rating >= threshold) {
        let Some(item) = rated_item(catalog, rating) else {
            continue;
        };
        for genre in &item.genres {
            let first_seen = frequency.len();
            frequency.entry(genre.as_str()).or_insert((0, first_seen)).0 += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = frequency
        .into_iter()
        .map(|(genre, (freq, first))| (genre, freq, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(count)
        .map(|(genre, _, _)| genre.to_string())
        .collect()
}
