//! Core domain types for the streaming catalog.
//!
//! Everything in here is built once during loading and read-only afterwards:
//! - `Item` is a normalized catalog row (genre tags and text document derived)
//! - `RatingEvent` is a rating already joined to its catalog title
//! - `CatalogIndex` owns all of it and answers lookups by row, id, title, user

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::catalog;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Catalog identifier of an item (the `show_id` column)
pub type ItemId = u32;

/// Lowest and highest value a rating can take
pub const RATING_SCALE: (f32, f32) = (0.5, 5.0);

// =============================================================================
// Catalog Types
// =============================================================================

/// A normalized catalog record (movie or show).
///
/// `genre_tags` and `document` are derived from the other fields when the item
/// is constructed and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Content type, e.g. "Movie" or "TV Show"
    pub kind: String,
    pub director: String,
    pub cast: String,
    /// `None` when the upstream table had no usable country
    pub country: Option<String>,
    pub release_year: Option<u16>,
    /// MPAA-style label; the loader defaults missing labels to "Not Rated"
    pub rating_label: Option<String>,
    pub duration: String,
    pub description: String,
    /// Genre tags in indicator-column order
    pub genres: Vec<String>,
    /// Space-joined `genres`
    pub genre_tags: String,
    /// `kind + " " + genre_tags + " " + description`, the unit of text similarity
    pub document: String,
}

impl Item {
    /// Create an item with the derived fields filled in.
    ///
    /// Optional metadata starts out unknown and can be set with the `with_*`
    /// methods, which keep the derived fields in sync.
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
        genres: Vec<String>,
    ) -> Self {
        let mut item = Self {
            id,
            title: title.into(),
            kind: kind.into(),
            director: catalog::UNKNOWN_PERSON.to_string(),
            cast: catalog::UNKNOWN_PERSON.to_string(),
            country: None,
            release_year: None,
            rating_label: None,
            duration: catalog::DEFAULT_DURATION.to_string(),
            description: description.into(),
            genres,
            genre_tags: String::new(),
            document: String::new(),
        };
        item.refresh_derived();
        item
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_rating_label(mut self, label: impl Into<String>) -> Self {
        self.rating_label = Some(label.into());
        self
    }

    pub fn with_release_year(mut self, year: u16) -> Self {
        self.release_year = Some(year);
        self
    }

    /// True when the item carries this exact genre tag
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub(crate) fn refresh_derived(&mut self) {
        self.genre_tags = catalog::join_genre_tags(&self.genres);
        self.document = catalog::build_document(&self.kind, &self.genre_tags, &self.description);
    }
}

// =============================================================================
// Rating and User Types
// =============================================================================

/// A single rating already resolved to a catalog title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub title: String,
    /// Rating value within `RATING_SCALE`
    pub rating: f32,
}

impl RatingEvent {
    pub fn new(user_id: UserId, item_id: ItemId, title: impl Into<String>, rating: f32) -> Self {
        Self {
            user_id,
            item_id,
            title: title.into(),
            rating,
        }
    }
}

/// A rating row as it appears in `ratings.dat`, before the catalog join
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f32,
}

/// A user record. Attributes other than the id are opaque to the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub attributes: BTreeMap<String, String>,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            attributes: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Aggregate of every rating event joined to one title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    pub mean: f32,
    pub count: u32,
}

// =============================================================================
// CatalogIndex
// =============================================================================

/// Immutable in-memory catalog: items in row order plus lookup indices.
///
/// Row positions are stable for the lifetime of the index and are what the
/// similarity matrix is indexed by.
#[derive(Debug)]
pub struct CatalogIndex {
    pub(crate) items: Vec<Item>,
    /// Genre indicator columns in table order
    pub(crate) genre_columns: Vec<String>,
    pub(crate) users: HashMap<UserId, User>,
    /// Every rating event that survived the catalog join
    pub(crate) ratings: Vec<RatingEvent>,

    pub(crate) id_index: HashMap<ItemId, usize>,
    /// Title to every row carrying it, in row order
    pub(crate) title_rows: HashMap<String, Vec<usize>>,
    pub(crate) user_ratings: HashMap<UserId, Vec<RatingEvent>>,
    pub(crate) genre_index: HashMap<String, Vec<usize>>,

    pub(crate) rating_stats: HashMap<String, RatingStats>,
}

impl CatalogIndex {
    /// Creates a new, empty CatalogIndex
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            genre_columns: Vec::new(),
            users: HashMap::new(),
            ratings: Vec::new(),
            id_index: HashMap::new(),
            title_rows: HashMap::new(),
            user_ratings: HashMap::new(),
            genre_index: HashMap::new(),
            rating_stats: HashMap::new(),
        }
    }

    /// All items in row order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item at a row position
    pub fn item(&self, row: usize) -> Option<&Item> {
        self.items.get(row)
    }

    /// Item by catalog id (first row with that id)
    pub fn item_by_id(&self, id: ItemId) -> Option<&Item> {
        self.id_index.get(&id).map(|&row| &self.items[row])
    }

    /// Every row carrying this exact title, in row order
    pub fn rows_for_title(&self, title: &str) -> &[usize] {
        self.title_rows
            .get(title)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Rows whose genre tags contain this exact tag
    pub fn rows_with_genre(&self, genre: &str) -> &[usize] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn genre_columns(&self) -> &[String] {
        &self.genre_columns
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// All ratings made by a user; empty for users without history
    pub fn user_ratings(&self, user_id: UserId) -> &[RatingEvent] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every joined rating event, in load order
    pub fn ratings(&self) -> &[RatingEvent] {
        &self.ratings
    }

    pub fn rating_stats(&self, title: &str) -> Option<&RatingStats> {
        self.rating_stats.get(title)
    }

    /// Mean historical rating of a title, absent when nobody rated it
    pub fn mean_rating(&self, title: &str) -> Option<f32> {
        self.rating_stats.get(title).map(|s| s.mean)
    }

    /// (users, items, ratings) for logging and validation
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.items.len(), self.ratings.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new()
    }
}
