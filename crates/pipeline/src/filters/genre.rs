//! Filters on an item's genre tags.
//!
//! Used by the homepage to build one section per favorite genre and a
//! diversification section that avoids all of them.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::CatalogIndex;
use models::Candidate;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum GenreRule {
    /// Keep items whose genre tags mention this genre
    Including(String),
    /// Keep items whose genre tags mention none of these genres
    ExcludingAll(Vec<String>),
}

/// Keeps or drops candidates based on their joined genre tags.
///
/// Matching is by substring on `genre_tags`, so "Dramas" also matches an item
/// tagged "Dramas International Movies".
pub struct GenreFilter {
    catalog: Arc<CatalogIndex>,
    rule: GenreRule,
}

impl GenreFilter {
    /// Keep only candidates carrying `genre`.
    pub fn including(catalog: Arc<CatalogIndex>, genre: impl Into<String>) -> Self {
        Self {
            catalog,
            rule: GenreRule::Including(genre.into()),
        }
    }

    /// Keep only candidates carrying none of `genres`.
    ///
    /// With an empty list every candidate passes.
    pub fn excluding_all(catalog: Arc<CatalogIndex>, genres: &[String]) -> Self {
        Self {
            catalog,
            rule: GenreRule::ExcludingAll(genres.to_vec()),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        match self.rule {
            GenreRule::Including(_) => "GenreFilter(including)",
            GenreRule::ExcludingAll(_) => "GenreFilter(excluding)",
        }
    }

    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let filtered = candidates
            .into_iter()
            .filter(|candidate| {
                let Some(item) = self.catalog.item(candidate.row) else {
                    return false;
                };
                match &self.rule {
                    GenreRule::Including(genre) => item.genre_tags.contains(genre.as_str()),
                    GenreRule::ExcludingAll(genres) => {
                        !genres.iter().any(|g| item.genre_tags.contains(g.as_str()))
                    }
                }
            })
            .collect();
        Ok(filtered)
    }
}
