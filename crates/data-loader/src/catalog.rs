//! Catalog normalization.
//!
//! Turns a raw `titles.dat` row into an `Item`: fills the sentinel defaults,
//! assembles the genre tags from the indicator columns and builds the text
//! document the similarity model vectorizes.

use crate::types::{Item, ItemId};

/// Stand-in for a missing director or cast list
pub const UNKNOWN_PERSON: &str = "Unknown";

/// Stand-in for a missing rating label
pub const NOT_RATED: &str = "Not Rated";

/// Stand-in for a missing duration
pub const DEFAULT_DURATION: &str = "74 min";

/// A `titles.dat` row as parsed, before cleaning
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TitleRecord {
    pub id: ItemId,
    pub title: String,
    pub kind: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub release_year: Option<u16>,
    pub rating_label: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    /// One value per genre column, aligned with the table header
    pub indicators: Vec<bool>,
}

/// Genre tags whose indicator is set, in column order
pub fn assemble_genres(genre_columns: &[String], indicators: &[bool]) -> Vec<String> {
    genre_columns
        .iter()
        .zip(indicators)
        .filter(|(_, set)| **set)
        .map(|(column, _)| column.clone())
        .collect()
}

pub fn join_genre_tags(genres: &[String]) -> String {
    genres.join(" ")
}

/// `kind genre_tags description`; missing parts contribute empty strings
pub fn build_document(kind: &str, genre_tags: &str, description: &str) -> String {
    format!("{} {} {}", kind, genre_tags, description)
}

/// Whether an indicator cell counts as set
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") {
        return true;
    }
    value
        .parse::<f64>()
        .map(|v| v.is_finite() && v != 0.0)
        .unwrap_or(false)
}

/// Apply the cleaning defaults and derive genre tags and document
pub fn normalize(record: TitleRecord, genre_columns: &[String]) -> Item {
    let genres = assemble_genres(genre_columns, &record.indicators);

    let mut item = Item::new(
        record.id,
        record.title,
        record.kind.unwrap_or_default(),
        record.description.unwrap_or_default(),
        genres,
    );
    item.director = non_empty(record.director).unwrap_or_else(|| UNKNOWN_PERSON.to_string());
    item.cast = non_empty(record.cast).unwrap_or_else(|| UNKNOWN_PERSON.to_string());
    // An explicit "Unknown" carries no more information than a blank cell
    item.country = non_empty(record.country).filter(|c| c != UNKNOWN_PERSON);
    item.release_year = record.release_year;
    item.rating_label = Some(non_empty(record.rating_label).unwrap_or_else(|| NOT_RATED.to_string()));
    item.duration = non_empty(record.duration).unwrap_or_else(|| DEFAULT_DURATION.to_string());
    item.refresh_derived();
    item
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
