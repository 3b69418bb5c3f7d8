//! Filter to remove titles the user has already rated.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::CatalogIndex;
use models::{Candidate, UserProfile};
use std::collections::HashSet;
use std::sync::Arc;

/// Removes candidates whose title appears in the user's rating history.
///
/// Matching is by title, so every catalog row sharing a rated title is
/// dropped, not just the row that was rated.
pub struct UnseenFilter {
    catalog: Arc<CatalogIndex>,
    seen_titles: HashSet<String>,
}

impl UnseenFilter {
    pub fn new(catalog: Arc<CatalogIndex>, profile: &UserProfile) -> Self {
        Self {
            catalog,
            seen_titles: profile.seen_titles.clone(),
        }
    }
}

impl Filter for UnseenFilter {
    fn name(&self) -> &str {
        "UnseenFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        if self.seen_titles.is_empty() {
            return Ok(candidates);
        }

        let filtered = candidates
            .into_iter()
            .filter(|candidate| match self.catalog.item(candidate.row) {
                Some(item) => !self.seen_titles.contains(&item.title),
                None => false,
            })
            .collect();
        Ok(filtered)
    }
}
