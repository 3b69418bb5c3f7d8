//! # Data Loader Crate
//!
//! Loads the cleaned catalog export (titles, ratings, users) and builds the
//! immutable `CatalogIndex` every recommender component reads from.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, RatingEvent, User, CatalogIndex)
//! - **catalog**: Item normalization (defaults, genre tags, text documents)
//! - **parser**: Parse the `::`-delimited .dat files
//! - **index**: Build lookups and per-title rating statistics
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::CatalogIndex;
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_files(Path::new("data/catalog"))?;
//!
//! let rows = index.rows_for_title("Inception");
//! let mean = index.mean_rating("Inception");
//! let history = index.user_ratings(8);
//! ```

pub mod catalog;
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::join_ratings;
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    Item,
    RatingEvent,
    RawRating,
    User,
    RatingStats,
    CatalogIndex,
    RATING_SCALE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_index_creation() {
        let index = CatalogIndex::new();
        let (users, items, ratings) = index.counts();

        assert_eq!(users, 0);
        assert_eq!(items, 0);
        assert_eq!(ratings, 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_item_derived_fields() {
        let item = Item::new(
            1,
            "Inception",
            "Movie",
            "A thief steals secrets through dreams.",
            vec!["Action".to_string(), "Thrillers".to_string()],
        )
        .with_country("United States")
        .with_rating_label("PG-13");

        assert_eq!(item.genre_tags, "Action Thrillers");
        assert_eq!(
            item.document,
            "Movie Action Thrillers A thief steals secrets through dreams."
        );
        assert!(item.has_genre("Thrillers"));
        assert!(!item.has_genre("Thriller"));
    }

    #[test]
    fn test_empty_queries() {
        let index = CatalogIndex::new();

        assert!(index.item(0).is_none());
        assert!(index.item_by_id(999).is_none());
        assert!(index.user(999).is_none());
        assert!(index.user_ratings(999).is_empty());
        assert!(index.rows_for_title("Missing").is_empty());
        assert!(index.rows_with_genre("Action").is_empty());
        assert!(index.mean_rating("Missing").is_none());
    }
}
