//! Personalized homepage composition.
//!
//! A homepage is an ordered list of labeled sections, all ranked by the
//! latent factor model's predicted rating over titles the user has not
//! rated:
//! - Top Picks: the best predictions overall
//! - one section per favorite genre (default two)
//! - Switch It Up!: titles outside every favorite genre, disjoint from
//!   the sections above

use std::collections::HashSet;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, instrument, warn};

use data_loader::UserId;
use models::{Candidate, CandidateSource, UserProfile, build_user_profile};
use pipeline::filters::{ExcludeTitlesFilter, GenreFilter, UnseenFilter};
use pipeline::{FilterPipeline, RecommendationEntry, sort_by_score_desc, unique_titles};

use crate::context::EngineContext;

/// One labeled list on the homepage
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HomepageSection {
    pub label: String,
    pub entries: Vec<RecommendationEntry>,
}

/// Sections in display order.
///
/// Serializes as a JSON object keyed by label, keeping section order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Homepage {
    pub user_id: UserId,
    pub sections: Vec<HomepageSection>,
}

impl Homepage {
    pub fn section(&self, label: &str) -> Option<&[RecommendationEntry]> {
        self.sections
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.entries.as_slice())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for Homepage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.label, &section.entries)?;
        }
        map.end()
    }
}

/// Turn a genre tag into a section label.
///
/// Strips the generic "Movies" / "TV Shows" words, collapses whitespace and
/// appends `suffix`: `"Horror Movies"` -> `"Horror For You"`.
pub fn clean_genre_label(genre: &str, suffix: &str) -> String {
    let stripped = genre.replace("TV Shows", " ").replace("Movies", " ");
    let words: Vec<&str> = stripped.split_whitespace().collect();
    if words.is_empty() {
        suffix.to_string()
    } else {
        format!("{} {}", words.join(" "), suffix)
    }
}

/// Composes a [`Homepage`] from an [`EngineContext`].
pub struct HomepageComposer<'a> {
    ctx: &'a EngineContext,
}

impl<'a> HomepageComposer<'a> {
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Build the homepage for `user_id`.
    ///
    /// Unknown users and users without history still get a homepage: Top
    /// Picks from the model's fallback estimates, no genre sections, and an
    /// empty Switch It Up! section (it is defined relative to favorites).
    #[instrument(skip(self))]
    pub fn build_homepage(&self, user_id: UserId) -> Result<Homepage> {
        let start = Instant::now();
        let config = &self.ctx.config().homepage;
        let size = config.section_size;

        let profile = build_user_profile(
            self.ctx.catalog(),
            user_id,
            config.favorite_rating_threshold,
            config.favorite_genre_count,
        );
        debug!(
            "Profile: {} rated, favorite genres {:?}",
            profile.rated_count, profile.favorite_genres
        );

        let ranked = self.rank_unseen(&profile)?;
        let mut homepage = Homepage {
            user_id,
            sections: Vec::new(),
        };
        let mut used_titles: HashSet<String> = HashSet::new();

        let top_picks = self.top_of(&ranked, size);
        used_titles.extend(top_picks.iter().map(|e| e.title.clone()));
        homepage.sections.push(HomepageSection {
            label: config.top_picks_label.clone(),
            entries: top_picks,
        });

        let section_genres: Vec<&String> =
            profile.favorite_genres.iter().take(config.genre_sections).collect();
        if section_genres.len() < config.genre_sections {
            debug!(
                "Only {} favorite genres, omitting {} genre sections",
                section_genres.len(),
                config.genre_sections - section_genres.len()
            );
        }

        for genre in section_genres {
            let in_genre = GenreFilter::including(self.ctx.catalog().clone(), genre.as_str());
            let pool = FilterPipeline::new()
                .add_filter(in_genre)
                .apply(ranked.clone())
                .context("Failed to filter genre section")?;
            let entries = self.top_of(&pool, size);
            used_titles.extend(entries.iter().map(|e| e.title.clone()));

            let mut label = clean_genre_label(genre, &config.genre_label_suffix);
            if homepage.section(&label).is_some() {
                warn!("Genre label {:?} already used, keeping the raw genre name", label);
                label = format!("{} {}", genre, config.genre_label_suffix);
            }
            homepage.sections.push(HomepageSection { label, entries });
        }

        let diverse = if profile.favorite_genres.is_empty() {
            Vec::new()
        } else {
            FilterPipeline::new()
                .add_filter(GenreFilter::excluding_all(
                    self.ctx.catalog().clone(),
                    &profile.favorite_genres,
                ))
                .add_filter(ExcludeTitlesFilter::new(self.ctx.catalog().clone(), used_titles))
                .apply(ranked)
                .context("Failed to filter diversification section")?
        };
        homepage.sections.push(HomepageSection {
            label: config.switch_up_label.clone(),
            entries: unique_titles(&diverse, self.ctx.catalog(), size),
        });

        info!(
            "Composed {} sections for user {} in {:.2?}",
            homepage.len(),
            user_id,
            start.elapsed()
        );
        Ok(homepage)
    }

    /// Every unseen row, scored by predicted rating, best first.
    fn rank_unseen(&self, profile: &UserProfile) -> Result<Vec<Candidate>> {
        let catalog = self.ctx.catalog();
        let all: Vec<Candidate> = catalog
            .items()
            .iter()
            .enumerate()
            .map(|(row, item)| Candidate::new(row, item.id, CandidateSource::Collaborative, 0.0))
            .collect();

        let mut unseen = FilterPipeline::new()
            .add_filter(UnseenFilter::new(catalog.clone(), profile))
            .apply(all)
            .context("Failed to filter seen titles")?;

        let model = self.ctx.latent_factor();
        unseen.par_iter_mut().for_each(|candidate| {
            if let Some(item) = catalog.item(candidate.row) {
                candidate.score = model.predict(profile.user_id, &item.title);
            }
        });

        sort_by_score_desc(&mut unseen);
        Ok(unseen)
    }

    /// Top `n` rows, then title-deduplicated
    fn top_of(&self, ranked: &[Candidate], n: usize) -> Vec<RecommendationEntry> {
        let head = &ranked[..n.min(ranked.len())];
        unique_titles(head, self.ctx.catalog(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_genre_label() {
        assert_eq!(clean_genre_label("Horror Movies", "For You"), "Horror For You");
        assert_eq!(clean_genre_label("International TV Shows", "For You"), "International For You");
        assert_eq!(clean_genre_label("Dramas", "For You"), "Dramas For You");
        assert_eq!(clean_genre_label("Movies", "For You"), "For You");
        assert_eq!(
            clean_genre_label("  Independent   Movies ", "For You"),
            "Independent For You"
        );
    }

    #[test]
    fn test_homepage_serializes_in_order() {
        let homepage = Homepage {
            user_id: 1,
            sections: vec![
                HomepageSection {
                    label: "Top Picks".into(),
                    entries: vec![RecommendationEntry { id: 3, title: "C".into() }],
                },
                HomepageSection {
                    label: "Action For You".into(),
                    entries: vec![],
                },
                HomepageSection {
                    label: "Switch It Up!".into(),
                    entries: vec![],
                },
            ],
        };

        let json = serde_json::to_string(&homepage).unwrap();
        assert_eq!(
            json,
            r#"{"Top Picks":[{"id":3,"title":"C"}],"Action For You":[],"Switch It Up!":[]}"#
        );
        assert_eq!(homepage.labels(), vec!["Top Picks", "Action For You", "Switch It Up!"]);
        assert!(homepage.section("Missing").is_none());
    }
}
