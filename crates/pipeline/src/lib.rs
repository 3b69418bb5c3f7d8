//! Candidate filtering, bonus scoring and ranking for recommendations.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - BonusScorer for metadata agreement bonuses
//! - Ranking helpers: stable score sort and title-level deduplication
//!
//! ## Architecture
//! Both recommendation paths process candidates in stages:
//! 1. Filters remove unwanted candidates (low quality, already seen, wrong genre)
//! 2. BonusScorer adds metadata bonuses (title-based path only)
//! 3. Candidates are sorted and deduplicated by title into entries
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::filters::*;
//! use pipeline::{BonusScorer, FilterPipeline, sort_by_score_desc, unique_titles};
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(QualityGateFilter::new(catalog.clone(), 3.5));
//! let survivors = pipeline.apply(candidates)?;
//!
//! let mut scored = BonusScorer::new(catalog.clone(), seed, true).apply(survivors);
//! sort_by_score_desc(&mut scored);
//! let entries = unique_titles(&scored, &catalog, 5);
//! ```

pub mod bonus;
pub mod filter_pipeline;
pub mod filters;
pub mod ranking;
pub mod traits;

// Re-export main types
pub use bonus::{BonusBreakdown, BonusScorer};
pub use filter_pipeline::FilterPipeline;
pub use ranking::{RecommendationEntry, sort_by_score_desc, unique_titles};
pub use traits::Filter;
