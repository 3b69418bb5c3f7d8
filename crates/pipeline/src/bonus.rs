//! Metadata agreement bonuses for content-based candidates.
//!
//! Each surviving candidate gets small additive bonuses for sharing the
//! seed's country, rating label and genre words. The bonuses are added to
//! the similarity score before the final re-sort.

use data_loader::{CatalogIndex, Item};
use models::Candidate;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Both values present and equal
pub const EXACT_MATCH_BONUS: f32 = 0.10;
/// At least one value missing
pub const UNKNOWN_MATCH_BONUS: f32 = 0.05;
/// Seed and candidate genre tags share a word
pub const GENRE_OVERLAP_BONUS: f32 = 0.10;

/// Per-candidate bonus components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BonusBreakdown {
    pub country: f32,
    pub rating_label: f32,
    pub genre: f32,
}

impl BonusBreakdown {
    pub fn total(&self) -> f32 {
        self.country + self.rating_label + self.genre
    }
}

/// Tiered bonus for a single optional metadata field.
///
/// A missing value on either side still earns the partial bonus; two
/// present but different values earn nothing.
pub fn metadata_bonus(seed: Option<&str>, candidate: Option<&str>) -> f32 {
    match (seed, candidate) {
        (Some(a), Some(b)) if a == b => EXACT_MATCH_BONUS,
        (Some(_), Some(_)) => 0.0,
        _ => UNKNOWN_MATCH_BONUS,
    }
}

/// Computes bonuses relative to one seed item, in parallel.
#[derive(Clone)]
pub struct BonusScorer {
    catalog: Arc<CatalogIndex>,
    seed_country: Option<String>,
    seed_rating_label: Option<String>,
    /// Words of the seed's genre tags, e.g. "International" and "Movies"
    seed_genre_words: HashSet<String>,
    use_genre_bonus: bool,
}

impl BonusScorer {
    /// Create a scorer for `seed`.
    ///
    /// # Arguments
    /// * `catalog` - Shared catalog used to look up candidate rows
    /// * `seed` - The item recommendations are being made for
    /// * `use_genre_bonus` - Whether genre overlap earns a bonus at all
    pub fn new(catalog: Arc<CatalogIndex>, seed: &Item, use_genre_bonus: bool) -> Self {
        Self {
            catalog,
            seed_country: seed.country.clone(),
            seed_rating_label: seed.rating_label.clone(),
            seed_genre_words: seed.genre_tags.split_whitespace().map(str::to_string).collect(),
            use_genre_bonus,
        }
    }

    /// Bonus components for one candidate item.
    pub fn breakdown(&self, item: &Item) -> BonusBreakdown {
        let shares_word = item
            .genre_tags
            .split_whitespace()
            .any(|word| self.seed_genre_words.contains(word));
        let genre = if self.use_genre_bonus && shares_word {
            GENRE_OVERLAP_BONUS
        } else {
            0.0
        };

        BonusBreakdown {
            country: metadata_bonus(self.seed_country.as_deref(), item.country.as_deref()),
            rating_label: metadata_bonus(
                self.seed_rating_label.as_deref(),
                item.rating_label.as_deref(),
            ),
            genre,
        }
    }

    /// Compute bonuses for all candidates in parallel.
    ///
    /// # Returns
    /// One breakdown per candidate, in the same order. Rows missing from
    /// the catalog get a zero breakdown.
    pub fn compute_bonuses(&self, candidates: &[Candidate]) -> Vec<BonusBreakdown> {
        candidates
            .par_iter()
            .map(|candidate| {
                self.catalog
                    .item(candidate.row)
                    .map(|item| self.breakdown(item))
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Add each candidate's bonus total to its score, keeping order.
    pub fn apply(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        let bonuses = self.compute_bonuses(&candidates);
        for (candidate, bonus) in candidates.iter_mut().zip(bonuses) {
            candidate.score += bonus.total();
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::CandidateSource;

    fn tags(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_metadata_bonus_tiers() {
        assert_eq!(metadata_bonus(Some("US"), Some("US")), EXACT_MATCH_BONUS);
        assert_eq!(metadata_bonus(Some("US"), Some("France")), 0.0);
        assert_eq!(metadata_bonus(None, Some("US")), UNKNOWN_MATCH_BONUS);
        assert_eq!(metadata_bonus(Some("US"), None), UNKNOWN_MATCH_BONUS);
        assert_eq!(metadata_bonus(None, None), UNKNOWN_MATCH_BONUS);
    }

    #[test]
    fn test_breakdown() {
        let seed = Item::new(1, "Seed", "Movie", "", tags(&["Sci-Fi", "Thrillers"]))
            .with_country("United States")
            .with_rating_label("PG-13");
        let twin = Item::new(2, "Twin", "Movie", "", tags(&["Sci-Fi"]))
            .with_country("United States")
            .with_rating_label("PG-13");
        let stranger = Item::new(3, "Stranger", "Movie", "", tags(&["Comedies"]))
            .with_country("France")
            .with_rating_label("R");

        let catalog = Arc::new(CatalogIndex::from_parts(
            vec![seed.clone(), twin.clone(), stranger.clone()],
            vec![],
            vec![],
        ));
        let scorer = BonusScorer::new(catalog.clone(), &seed, true);

        let full = scorer.breakdown(&twin);
        assert!((full.total() - 0.30).abs() < 1e-6);
        assert_eq!(scorer.breakdown(&stranger).total(), 0.0);

        let no_genre = BonusScorer::new(catalog, &seed, false);
        assert!((no_genre.breakdown(&twin).total() - 0.20).abs() < 1e-6);
    }

    #[test]
    fn test_compound_genre_tags_share_words() {
        let seed = Item::new(1, "Seed", "Movie", "", tags(&["Comedies International Movies"]));
        let intl = Item::new(2, "Intl", "Movie", "", tags(&["Dramas International Movies"]));
        let docs = Item::new(3, "Docs", "TV Show", "", tags(&["Docuseries"]));
        let catalog = Arc::new(CatalogIndex::from_parts(
            vec![seed.clone(), intl.clone(), docs.clone()],
            vec![],
            vec![],
        ));
        let scorer = BonusScorer::new(catalog, &seed, true);

        assert_eq!(scorer.breakdown(&intl).genre, GENRE_OVERLAP_BONUS);
        assert_eq!(scorer.breakdown(&docs).genre, 0.0);
    }

    #[test]
    fn test_apply_preserves_order() {
        let seed = Item::new(1, "Seed", "Movie", "", tags(&["Dramas"]));
        let other = Item::new(2, "Other", "Movie", "", tags(&["Dramas"]));
        let catalog = Arc::new(CatalogIndex::from_parts(
            vec![seed.clone(), other],
            vec![],
            vec![],
        ));
        let scorer = BonusScorer::new(catalog, &seed, true);

        let scored = scorer.apply(vec![
            Candidate::new(1, 2, CandidateSource::Content, 0.5),
            Candidate::new(0, 1, CandidateSource::Content, 0.9),
        ]);

        assert_eq!(scored[0].item_id, 2);
        // unknown country + unknown label + shared genre
        assert!((scored[0].score - 0.70).abs() < 1e-6);
        assert!((scored[1].score - 1.10).abs() < 1e-6);
    }
}
