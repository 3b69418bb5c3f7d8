//! Engine crate for the recommendation core.
//!
//! Builds the immutable [`EngineContext`] once and answers the two
//! downstream queries against it:
//! - recommendations similar to a seed title ([`HybridScorer`])
//! - a sectioned homepage for a user ([`HomepageComposer`])
//!
//! [`RecommendationEngine`] wraps both behind an async facade.

pub mod config;
pub mod context;
pub mod homepage;
pub mod hybrid;
pub mod orchestrator;

pub use config::{EngineConfig, HomepageConfig, HybridConfig};
pub use context::EngineContext;
pub use homepage::{Homepage, HomepageComposer, HomepageSection, clean_genre_label};
pub use hybrid::HybridScorer;
pub use orchestrator::RecommendationEngine;
pub use pipeline::RecommendationEntry;
