//! Filter to drop candidates without a good enough average rating.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::CatalogIndex;
use models::Candidate;
use std::sync::Arc;

/// Keeps only candidates whose title has a mean rating of at least `min_rating`.
///
/// ## Quality Gate
/// Titles nobody rated have no mean and are dropped, not demoted. The gate
/// never changes scores or order.
pub struct QualityGateFilter {
    catalog: Arc<CatalogIndex>,
    min_rating: f32,
}

impl QualityGateFilter {
    /// Create a new QualityGateFilter.
    ///
    /// # Arguments
    /// * `catalog` - Shared catalog holding the per-title rating stats
    /// * `min_rating` - Minimum mean rating (e.g., 3.5)
    pub fn new(catalog: Arc<CatalogIndex>, min_rating: f32) -> Self {
        Self {
            catalog,
            min_rating,
        }
    }

    fn passes(&self, candidate: &Candidate) -> bool {
        self.catalog
            .item(candidate.row)
            .and_then(|item| self.catalog.mean_rating(&item.title))
            .is_some_and(|mean| mean >= self.min_rating)
    }
}

impl Filter for QualityGateFilter {
    fn name(&self) -> &str {
        "QualityGateFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        Ok(candidates.into_iter().filter(|c| self.passes(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Item, RatingEvent};
    use models::CandidateSource;

    fn create_test_index() -> Arc<CatalogIndex> {
        let items = vec![
            Item::new(1, "Loved", "Movie", "", vec![]),
            Item::new(2, "Mixed", "Movie", "", vec![]),
            Item::new(3, "Unrated", "Movie", "", vec![]),
        ];
        let ratings = vec![
            RatingEvent::new(1, 1, "Loved", 4.5),
            RatingEvent::new(2, 1, "Loved", 4.0),
            RatingEvent::new(1, 2, "Mixed", 4.0),
            RatingEvent::new(2, 2, "Mixed", 2.0),
        ];
        Arc::new(CatalogIndex::from_parts(items, ratings, vec![]))
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new(0, 1, CandidateSource::Content, 0.4),
            Candidate::new(1, 2, CandidateSource::Content, 0.3),
            Candidate::new(2, 3, CandidateSource::Content, 0.2),
        ]
    }

    #[test]
    fn test_quality_gate_filter() {
        let filter = QualityGateFilter::new(create_test_index(), 3.5);
        let filtered = filter.apply(candidates()).unwrap();

        // Only "Loved" (mean 4.25) passes; "Mixed" is 3.0, "Unrated" has no mean
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].item_id, 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let filter = QualityGateFilter::new(create_test_index(), 3.0);
        let filtered = filter.apply(candidates()).unwrap();

        let ids: Vec<_> = filtered.iter().map(|c| c.item_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
