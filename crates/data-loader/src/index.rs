//! CatalogIndex building and indexing logic.
//!
//! Builds the read-only catalog from cleaned tables:
//! - normalize title rows into items
//! - join ratings to the catalog (by show id when loading from files)
//! - build secondary indices (id, title, genre, per-user ratings)
//! - aggregate per-title rating statistics

use crate::catalog;
use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

impl CatalogIndex {
    /// Load the catalog export from a directory containing
    /// `titles.dat`, `ratings.dat` and `users.dat`.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading catalog export from {:?}", data_dir);

        let titles_path = data_dir.join("titles.dat");
        let ratings_path = data_dir.join("ratings.dat");
        let users_path = data_dir.join("users.dat");

        let ((titles, ratings), users) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_titles(&titles_path),
                    || parser::parse_ratings(&ratings_path),
                )
            },
            || parser::parse_users(&users_path),
        );
        let titles = titles?;
        let ratings = ratings?;
        let users = users?;

        info!(
            "Parsed {} titles, {} ratings, {} users",
            titles.records.len(),
            ratings.len(),
            users.len()
        );

        let genre_columns = titles.genre_columns;
        let items: Vec<Item> = titles
            .records
            .into_iter()
            .map(|record| catalog::normalize(record, &genre_columns))
            .collect();

        let events = join_ratings(&items, &ratings);
        let mut index = Self::from_parts(items, events, users);
        index.genre_columns = genre_columns;

        index.validate()?;

        let (users, items, ratings) = index.counts();
        info!(
            "Catalog ready: {} users, {} items, {} joined ratings",
            users, items, ratings
        );
        Ok(index)
    }

    /// Build an index from already-cleaned tables.
    ///
    /// Rating events whose title is not in the catalog are skipped.
    pub fn from_parts(items: Vec<Item>, ratings: Vec<RatingEvent>, users: Vec<User>) -> Self {
        let mut index = CatalogIndex::new();
        index.items = items;
        index.users = users.into_iter().map(|u| (u.id, u)).collect();
        index.build_secondary_indices();

        let total = ratings.len();
        index.ratings = ratings
            .into_iter()
            .filter(|event| index.title_rows.contains_key(&event.title))
            .collect();
        if index.ratings.len() < total {
            warn!(
                "Skipped {} ratings referencing titles absent from the catalog",
                total - index.ratings.len()
            );
        }

        for event in &index.ratings {
            index
                .user_ratings
                .entry(event.user_id)
                .or_default()
                .push(event.clone());
        }

        index.compute_rating_stats();
        index
    }

    /// Build the id, title and genre lookups from `items`
    pub(crate) fn build_secondary_indices(&mut self) {
        self.id_index.clear();
        self.title_rows.clear();
        self.genre_index.clear();
        self.genre_columns.clear();

        for (row, item) in self.items.iter().enumerate() {
            self.id_index.entry(item.id).or_insert(row);
            self.title_rows
                .entry(item.title.clone())
                .or_default()
                .push(row);

            for genre in &item.genres {
                let rows = self.genre_index.entry(genre.clone()).or_default();
                if rows.is_empty() {
                    self.genre_columns.push(genre.clone());
                }
                rows.push(row);
            }
        }

        let duplicated = self.title_rows.values().filter(|rows| rows.len() > 1).count();
        if duplicated > 0 {
            warn!(
                "{} titles appear on more than one catalog row; title lookups resolve to the last row",
                duplicated
            );
        }
    }

    /// Mean rating and count per title over every joined rating event
    pub(crate) fn compute_rating_stats(&mut self) {
        let mut by_title: HashMap<&str, Vec<f32>> = HashMap::new();
        for event in &self.ratings {
            by_title.entry(event.title.as_str()).or_default().push(event.rating);
        }

        self.rating_stats = by_title
            .into_par_iter()
            .map(|(title, ratings)| {
                let count = ratings.len() as u32;
                let total: f64 = ratings.iter().map(|&r| r as f64).sum();
                let mean = (total / count as f64) as f32;
                (title.to_string(), RatingStats { mean, count })
            })
            .collect();
    }

    /// Validate data integrity
    ///
    /// Every rating must lie within `RATING_SCALE`.
    pub fn validate(&self) -> Result<()> {
        let (low, high) = RATING_SCALE;
        if let Some(bad) = self
            .ratings
            .iter()
            .find(|event| !(low..=high).contains(&event.rating))
        {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: bad.rating.to_string(),
            });
        }
        if self.items.iter().any(|item| item.title.trim().is_empty()) {
            return Err(DataLoadError::ValidationError(
                "catalog contains an item with an empty title".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve raw `(user, show_id, rating)` rows to titled rating events.
///
/// Rows pointing at an unknown show id are skipped and counted in a warning.
pub fn join_ratings(items: &[Item], ratings: &[RawRating]) -> Vec<RatingEvent> {
    let mut titles: HashMap<ItemId, &str> = HashMap::new();
    for item in items {
        titles.entry(item.id).or_insert(item.title.as_str());
    }

    let events: Vec<RatingEvent> = ratings
        .par_iter()
        .filter_map(|raw| {
            let title = titles.get(&raw.item_id)?;
            Some(RatingEvent::new(raw.user_id, raw.item_id, *title, raw.rating))
        })
        .collect();

    if events.len() < ratings.len() {
        warn!(
            "Skipped {} ratings referencing show ids absent from the catalog",
            ratings.len() - events.len()
        );
    }
    events
}
