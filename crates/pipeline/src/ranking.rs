//! Ordering and title-level deduplication of scored candidates.

use data_loader::{CatalogIndex, ItemId};
use models::Candidate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// One emitted recommendation: the catalog id and its display title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub id: ItemId,
    pub title: String,
}

/// Sort by score descending. Stable, so equal scores keep their input order.
pub fn sort_by_score_desc(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Walk `candidates` in order and emit the first occurrence of each title.
///
/// Stops after `limit` entries. The emitted id is the candidate row's own
/// id, so a title shared by several rows reports the one that ranked highest.
pub fn unique_titles(
    candidates: &[Candidate],
    catalog: &CatalogIndex,
    limit: usize,
) -> Vec<RecommendationEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for candidate in candidates {
        if entries.len() >= limit {
            break;
        }
        let Some(item) = catalog.item(candidate.row) else {
            continue;
        };
        if seen.insert(item.title.as_str()) {
            entries.push(RecommendationEntry {
                id: item.id,
                title: item.title.clone(),
            });
        }
    }

    entries
}
