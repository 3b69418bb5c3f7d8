//! # Models Crate
//!
//! The precomputed models the recommender reads from. Each is built once
//! from a `CatalogIndex` and shared read-only afterwards.
//!
//! ## Components
//!
//! ### Content Similarity Model
//! TF-IDF over each item's text document, cosine similarity between every
//! pair of items, and a title -> row lookup.
//!
//! ### Latent Factor Model
//! Biased matrix factorization trained with seeded SGD over (user, title,
//! rating) triples. Predicts a finite rating for any pair, seen or not.
//!
//! ### User Profile
//! Seen titles and favorite genres derived from a user's own ratings.
//!
//! ## Example Usage
//!
//! ```ignore
//! use models::{ContentSimilarityModel, LatentFactorConfig, LatentFactorModel};
//!
//! let similarity = ContentSimilarityModel::build(&catalog);
//! let neighbors = similarity.neighbors("Inception");
//!
//! let cf = LatentFactorModel::train(catalog.ratings(), LatentFactorConfig::default())?;
//! let estimate = cf.predict(8, "Interstellar");
//! ```

pub mod latent_factor;
pub mod similarity;
pub mod stopwords;
pub mod tfidf;
pub mod types;
pub mod user_profile;

// Re-export commonly used types
pub use latent_factor::{LatentFactorConfig, LatentFactorModel};
pub use similarity::ContentSimilarityModel;
pub use tfidf::{SparseVector, TfidfVectorizer};
pub use types::{Candidate, CandidateSource, UserProfile};
pub use user_profile::build_user_profile;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_creation() {
        let candidate = Candidate::new(3, 81, CandidateSource::Content, 0.85);
        assert_eq!(candidate.row, 3);
        assert_eq!(candidate.item_id, 81);
        assert_eq!(candidate.source, CandidateSource::Content);
        assert_eq!(candidate.score, 0.85);
    }

    #[test]
    fn test_default_latent_factor_config() {
        let config = LatentFactorConfig::default();
        assert_eq!(config.n_factors, 100);
        assert_eq!(config.n_epochs, 20);
        assert_eq!(config.rating_scale, (0.5, 5.0));
    }
}
