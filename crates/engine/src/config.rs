//! Engine configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides:
//!
//! ```json
//! { "hybrid": { "min_rating": 4.0 }, "latent_factor": { "n_epochs": 30 } }
//! ```

use anyhow::{Context, Result};
use models::LatentFactorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Title-based recommendation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// Candidates whose mean rating is below this are dropped
    pub min_rating: f32,
    pub use_genre_bonus: bool,
    /// Count used when the caller does not give one
    pub default_count: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            min_rating: 3.5,
            use_genre_bonus: true,
            default_count: 5,
        }
    }
}

/// Homepage composition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomepageConfig {
    /// Ratings at or above this count towards favorite genres
    pub favorite_rating_threshold: f32,
    pub favorite_genre_count: usize,
    /// How many favorite genres get their own section
    pub genre_sections: usize,
    pub section_size: usize,
    pub top_picks_label: String,
    pub genre_label_suffix: String,
    pub switch_up_label: String,
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            favorite_rating_threshold: 3.5,
            favorite_genre_count: 3,
            genre_sections: 2,
            section_size: 10,
            top_picks_label: "Top Picks".to_string(),
            genre_label_suffix: "For You".to_string(),
            switch_up_label: "Switch It Up!".to_string(),
        }
    }
}

/// Everything needed to build and query an engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hybrid: HybridConfig,
    pub homepage: HomepageConfig,
    pub latent_factor: LatentFactorConfig,
}

impl EngineConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn with_min_rating(mut self, min_rating: f32) -> Self {
        self.hybrid.min_rating = min_rating;
        self
    }

    pub fn with_genre_bonus(mut self, enabled: bool) -> Self {
        self.hybrid.use_genre_bonus = enabled;
        self
    }

    pub fn with_favorite_threshold(mut self, threshold: f32) -> Self {
        self.homepage.favorite_rating_threshold = threshold;
        self
    }

    pub fn with_section_size(mut self, size: usize) -> Self {
        self.homepage.section_size = size;
        self
    }

    pub fn with_latent_factor(mut self, config: LatentFactorConfig) -> Self {
        self.latent_factor = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "hybrid": { "min_rating": 4.0 } }"#).unwrap();

        assert_eq!(config.hybrid.min_rating, 4.0);
        assert!(config.hybrid.use_genre_bonus);
        assert_eq!(config.homepage, HomepageConfig::default());
        assert_eq!(config.latent_factor.seed, 42);
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("engine-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "homepage": { "section_size": 4 } }"#).unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.homepage.section_size, 4);
        assert!(EngineConfig::from_json_file(Path::new("/nonexistent/engine.json")).is_err());
    }
}
