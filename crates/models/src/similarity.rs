//! Content Similarity Model - "more like this" over catalog text
//!
//! ## Algorithm
//! 1. Vectorize every item document with TF-IDF (English stop words removed)
//! 2. Cosine similarity for every pair of rows -> dense N x N matrix
//! 3. Title -> row lookup, last catalog row wins for duplicated titles
//!
//! The matrix is exactly symmetric and each row's diagonal entry is the
//! row maximum. It is built once per catalog and never updated in place.

use data_loader::CatalogIndex;
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, instrument};

use crate::tfidf::TfidfVectorizer;

/// Dense item x item cosine similarity plus the title index
pub struct ContentSimilarityModel {
    /// Row-major N x N
    matrix: Vec<f32>,
    n: usize,
    title_index: HashMap<String, usize>,
}

impl ContentSimilarityModel {
    /// Build the similarity matrix for every item in the catalog
    #[instrument(skip(catalog), fields(items = catalog.len()))]
    pub fn build(catalog: &CatalogIndex) -> Self {
        let start = Instant::now();
        let documents: Vec<&str> = catalog.items().iter().map(|i| i.document.as_str()).collect();
        let n = documents.len();

        let mut vectorizer = TfidfVectorizer::new();
        let vectors = vectorizer.fit_transform(&documents);

        let diagonal: Vec<f32> = vectors.par_iter().map(|v| v.dot(v)).collect();

        // min() with both diagonals keeps symmetry and the diagonal as row max
        let matrix: Vec<f32> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let vectors = &vectors;
                let diagonal = &diagonal;
                (0..n).map(move |j| {
                    if i == j {
                        diagonal[i]
                    } else {
                        vectors[i].dot(&vectors[j]).min(diagonal[i]).min(diagonal[j])
                    }
                })
            })
            .collect();

        let mut title_index = HashMap::with_capacity(n);
        for (row, item) in catalog.items().iter().enumerate() {
            title_index.insert(item.title.clone(), row);
        }

        info!(
            "Built {}x{} similarity matrix over {} terms in {:.2?}",
            n,
            n,
            vectorizer.vocabulary_size(),
            start.elapsed()
        );

        Self {
            matrix,
            n,
            title_index,
        }
    }

    /// Number of rows (catalog items)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Row position a title resolves to
    pub fn row_of(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub fn similarity(&self, i: usize, j: usize) -> f32 {
        self.matrix[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.matrix[i * self.n..(i + 1) * self.n]
    }

    /// Every other row with its similarity, highest first.
    ///
    /// Ties keep row order. Unknown titles give an empty list.
    pub fn neighbors(&self, title: &str) -> Vec<(usize, f32)> {
        let Some(row) = self.row_of(title) else {
            return Vec::new();
        };

        let mut neighbors: Vec<(usize, f32)> = self
            .row(row)
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != row)
            .collect();
        neighbors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Item;

    fn genres(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn create_test_catalog() -> CatalogIndex {
        let items = vec![
            Item::new(1, "Deep Space", "Movie", "Astronauts drift through deep space.", genres(&["Sci-Fi"])),
            Item::new(2, "Star Voyage", "Movie", "Astronauts explore a distant star.", genres(&["Sci-Fi"])),
            Item::new(3, "Bake Off", "TV Show", "Amateur bakers compete.", genres(&["Reality TV"])),
            Item::new(4, "Deep Space", "Movie", "Remastered astronauts cut.", genres(&["Sci-Fi"])),
        ];
        CatalogIndex::from_parts(items, vec![], vec![])
    }

    #[test]
    fn test_matrix_is_symmetric_with_max_diagonal() {
        let model = ContentSimilarityModel::build(&create_test_catalog());
        assert_eq!(model.len(), 4);

        for i in 0..model.len() {
            let diag = model.similarity(i, i);
            for j in 0..model.len() {
                assert_eq!(model.similarity(i, j).to_bits(), model.similarity(j, i).to_bits());
                assert!(model.similarity(i, j) <= diag);
            }
        }
    }

    #[test]
    fn test_neighbors_rank_related_items_first() {
        let model = ContentSimilarityModel::build(&create_test_catalog());
        let neighbors = model.neighbors("Star Voyage");

        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|(row, _)| *row != 1));
        assert_eq!(neighbors.last().map(|(row, _)| *row), Some(2));
        for pair in neighbors.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_duplicate_title_resolves_to_last_row() {
        let model = ContentSimilarityModel::build(&create_test_catalog());
        assert_eq!(model.row_of("Deep Space"), Some(3));
    }

    #[test]
    fn test_unknown_title_has_no_neighbors() {
        let model = ContentSimilarityModel::build(&create_test_catalog());
        assert!(model.neighbors("Nope").is_empty());
        assert_eq!(model.row_of("Nope"), None);
    }

    #[test]
    fn test_empty_catalog() {
        let model = ContentSimilarityModel::build(&CatalogIndex::new());
        assert!(model.is_empty());
    }
}
