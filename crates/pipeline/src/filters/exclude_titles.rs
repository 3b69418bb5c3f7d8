//! Filter to drop titles already used elsewhere.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::CatalogIndex;
use models::Candidate;
use std::collections::HashSet;
use std::sync::Arc;

/// Removes candidates whose title is in a fixed exclusion set.
///
/// The homepage uses this to keep the diversification section disjoint
/// from the sections composed before it.
pub struct ExcludeTitlesFilter {
    catalog: Arc<CatalogIndex>,
    excluded: HashSet<String>,
}

impl ExcludeTitlesFilter {
    pub fn new(catalog: Arc<CatalogIndex>, titles: impl IntoIterator<Item = String>) -> Self {
        Self {
            catalog,
            excluded: titles.into_iter().collect(),
        }
    }
}

impl Filter for ExcludeTitlesFilter {
    fn name(&self) -> &str {
        "ExcludeTitlesFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let filtered = candidates
            .into_iter()
            .filter(|c| {
                self.catalog
                    .item(c.row)
                    .is_some_and(|item| !self.excluded.contains(&item.title))
            })
            .collect();
        Ok(filtered)
    }
}
