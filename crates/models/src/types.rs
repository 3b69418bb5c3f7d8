//! Shared candidate and profile types.

use data_loader::{ItemId, UserId};
use std::collections::HashSet;

/// Which model produced a candidate's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Content similarity to a seed title
    Content,
    /// Predicted rating from the latent factor model
    Collaborative,
}

/// A catalog row under consideration, with its current score
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Row position in the catalog (and similarity matrix)
    pub row: usize,
    pub item_id: ItemId,
    pub source: CandidateSource,
    pub score: f32,
}

impl Candidate {
    pub fn new(row: usize, item_id: ItemId, source: CandidateSource, score: f32) -> Self {
        Self {
            row,
            item_id,
            source,
            score,
        }
    }
}

/// What the homepage needs to know about a user's own history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub user_id: UserId,
    /// Titles the user has rated
    pub seen_titles: HashSet<String>,
    pub rated_count: usize,
    pub avg_rating: f32,
    /// Most frequent genre tags among well-rated titles, most frequent first
    pub favorite_genres: Vec<String>,
}

impl UserProfile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    pub fn has_seen(&self, title: &str) -> bool {
        self.seen_titles.contains(title)
    }
}
