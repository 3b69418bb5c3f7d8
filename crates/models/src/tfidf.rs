//! TF-IDF vectorization of catalog documents.
//!
//! ## Weighting
//! - tokens: lowercase runs of at least two alphanumeric/underscore chars
//! - stop words removed
//! - idf = ln((1 + n_docs) / (1 + df)) + 1
//! - each row scaled to unit L2 norm, so a dot product is a cosine similarity

use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::stopwords;

/// Sparse row: (term index, weight) sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product by merging the two sorted index lists.
    ///
    /// Products are summed in term order, so `a.dot(b) == b.dot(a)` bit for bit.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (ti, wi) = self.entries[i];
            let (tj, wj) = other.entries[j];
            match ti.cmp(&tj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wi * wj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }
}

/// Learns a vocabulary and idf weights, then maps documents to unit vectors
pub struct TfidfVectorizer {
    stop_words: HashSet<String>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Vectorizer with the English stop-word list
    pub fn new() -> Self {
        Self {
            stop_words: stopwords::english().iter().map(|w| w.to_string()).collect(),
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Replace the stop-word list
    pub fn with_stop_words(mut self, words: &[&str]) -> Self {
        self.stop_words = words.iter().map(|w| w.to_lowercase()).collect();
        self
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Split text into lowercase tokens, dropping short tokens and stop words
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Learn vocabulary and idf from the documents.
    ///
    /// Term indices follow sorted term order so the output is deterministic.
    pub fn fit<S: AsRef<str> + Sync>(&mut self, documents: &[S]) {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = self.tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f32;
        self.vocabulary.clear();
        self.idf.clear();
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            self.vocabulary.insert(term, idx);
            self.idf.push(((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0);
        }
    }

    /// Map documents to L2-normalized TF-IDF vectors.
    ///
    /// Terms outside the learned vocabulary are ignored; a document with no
    /// known terms becomes the empty vector.
    pub fn transform<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents
            .par_iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
                for token in self.tokenize(doc.as_ref()) {
                    if let Some(&idx) = self.vocabulary.get(&token) {
                        *counts.entry(idx).or_insert(0.0) += 1.0;
                    }
                }

                let mut entries: Vec<(usize, f32)> = counts
                    .into_iter()
                    .map(|(idx, tf)| (idx, tf * self.idf[idx]))
                    .collect();
                let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for (_, w) in entries.iter_mut() {
                        *w /= norm;
                    }
                }
                SparseVector { entries }
            })
            .collect()
    }

    pub fn fit_transform<S: AsRef<str> + Sync>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        self.fit(documents);
        self.transform(documents)
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
