//! Title-based recommendations.
//!
//! Content similarity gives the base ranking; a rating gate and metadata
//! bonuses refine it:
//! 1. Resolve the seed title to its row (unknown title -> empty result)
//! 2. Rank every other row by similarity to the seed
//! 3. Drop rows whose title's mean rating is missing or below the gate
//! 4. Add country, rating label and genre bonuses
//! 5. Re-sort by final score and emit the first row of each title

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use models::{Candidate, CandidateSource};
use pipeline::filters::QualityGateFilter;
use pipeline::{BonusScorer, FilterPipeline, RecommendationEntry, sort_by_score_desc, unique_titles};

use crate::context::EngineContext;

/// Hybrid content + metadata scorer over an [`EngineContext`].
pub struct HybridScorer<'a> {
    ctx: &'a EngineContext,
}

impl<'a> HybridScorer<'a> {
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Recommend up to `n` titles similar to `seed_title`.
    ///
    /// Returns an empty list when the seed is unknown or nothing passes the
    /// rating gate. Titles never repeat in the output.
    #[instrument(skip(self))]
    pub fn recommend(
        &self,
        seed_title: &str,
        n: usize,
        min_rating: f32,
        use_genre_bonus: bool,
    ) -> Result<Vec<RecommendationEntry>> {
        let catalog = self.ctx.catalog();
        let similarity = self.ctx.similarity();

        let Some(seed) = similarity.row_of(seed_title).and_then(|row| catalog.item(row)) else {
            debug!("Unknown seed title");
            return Ok(Vec::new());
        };

        let candidates: Vec<Candidate> = similarity
            .neighbors(seed_title)
            .into_iter()
            .filter_map(|(row, score)| {
                let item = catalog.item(row)?;
                Some(Candidate::new(row, item.id, CandidateSource::Content, score))
            })
            .collect();
        debug!("Ranked {} neighbors", candidates.len());

        let survivors = FilterPipeline::new()
            .add_filter(QualityGateFilter::new(catalog.clone(), min_rating))
            .apply(candidates)
            .context("Failed to apply rating gate")?;

        let mut scored = BonusScorer::new(catalog.clone(), seed, use_genre_bonus).apply(survivors);
        sort_by_score_desc(&mut scored);

        let entries = unique_titles(&scored, catalog, n);
        debug!("Emitting {} recommendations", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use data_loader::{CatalogIndex, Item, RatingEvent};
    use models::LatentFactorConfig;
    use std::sync::Arc;

    fn tags(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_context() -> EngineContext {
        let items = vec![
            Item::new(1, "Seed", "Movie", "ocean pirates treasure", tags(&["Action"])),
            Item::new(2, "Close", "Movie", "ocean pirates treasure map", tags(&["Action"])),
            Item::new(3, "Far", "Movie", "quiet farm harvest", tags(&["Dramas"])),
            Item::new(4, "Unrated", "Movie", "ocean pirates", tags(&["Action"])),
        ];
        let ratings = vec![
            RatingEvent::new(1, 1, "Seed", 4.0),
            RatingEvent::new(1, 2, "Close", 4.0),
            RatingEvent::new(2, 3, "Far", 4.5),
        ];
        let catalog = Arc::new(CatalogIndex::from_parts(items, ratings, vec![]));
        let config = EngineConfig::default()
            .with_latent_factor(LatentFactorConfig::default().with_factors(4).with_epochs(5));
        EngineContext::build(catalog, config).unwrap()
    }

    #[test]
    fn test_recommend_orders_and_gates() {
        let ctx = create_test_context();
        let entries = HybridScorer::new(&ctx).recommend("Seed", 5, 3.5, true).unwrap();

        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        // "Unrated" has no mean rating; the seed itself is never returned
        assert_eq!(titles, vec!["Close", "Far"]);
    }

    #[test]
    fn test_unknown_seed_is_empty() {
        let ctx = create_test_context();
        let scorer = HybridScorer::new(&ctx);

        assert!(scorer.recommend("Nope", 5, 3.5, true).unwrap().is_empty());
        assert!(scorer.recommend("Seed", 0, 3.5, true).unwrap().is_empty());
    }
}
