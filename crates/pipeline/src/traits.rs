//! Core traits for the filtering pipeline.
//!
//! Filters carry whatever they need (catalog handle, thresholds, the user's
//! seen titles) from construction, so applying one only takes the candidates.

use anyhow::Result;
use models::Candidate;

/// Core trait for filtering candidates.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be used in concurrent contexts
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Filters drop candidates; they never reorder the survivors
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    fn apply(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>>;
}
