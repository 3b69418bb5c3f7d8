//! Integration tests for the pipeline.
//!
//! These tests run filters, bonus scoring and ranking together the way
//! the recommendation paths use them.

use data_loader::{CatalogIndex, Item, RatingEvent};
use models::{Candidate, CandidateSource, build_user_profile};
use pipeline::filters::*;
use pipeline::{BonusScorer, FilterPipeline, sort_by_score_desc, unique_titles};
use std::sync::Arc;

fn tags(t: &[&str]) -> Vec<String> {
    t.iter().map(|s| s.to_string()).collect()
}

fn create_test_setup() -> Arc<CatalogIndex> {
    let items = vec![
        Item::new(1, "Inception", "Movie", "dream heist", tags(&["Sci-Fi", "Thrillers"]))
            .with_country("United States")
            .with_rating_label("PG-13"),
        Item::new(2, "Interstellar", "Movie", "space travel", tags(&["Sci-Fi"]))
            .with_country("United States")
            .with_rating_label("PG-13"),
        Item::new(3, "Amelie", "Movie", "paris romance", tags(&["Comedies", "Romantic Movies"]))
            .with_country("France")
            .with_rating_label("R"),
        Item::new(4, "Low Budget", "Movie", "space again", tags(&["Sci-Fi"]))
            .with_country("United States")
            .with_rating_label("PG-13"),
        Item::new(5, "Interstellar", "TV Show", "space series", tags(&["Sci-Fi"])),
    ];

    let ratings = vec![
        RatingEvent::new(1, 1, "Inception", 5.0),
        RatingEvent::new(2, 2, "Interstellar", 4.0),
        RatingEvent::new(3, 2, "Interstellar", 4.4),
        RatingEvent::new(2, 3, "Amelie", 4.0),
        RatingEvent::new(3, 4, "Low Budget", 1.5),
    ];

    Arc::new(CatalogIndex::from_parts(items, ratings, vec![]))
}

fn content_candidates(catalog: &CatalogIndex, base: &[f32]) -> Vec<Candidate> {
    catalog
        .items()
        .iter()
        .zip(base)
        .enumerate()
        .map(|(row, (item, score))| Candidate::new(row, item.id, CandidateSource::Content, *score))
        .collect()
}

#[test]
fn test_title_path_end_to_end() {
    let catalog = create_test_setup();
    let seed = catalog.item(0).unwrap().clone();

    // Seed row excluded, equal base similarity for everyone else
    let candidates: Vec<_> = content_candidates(&catalog, &[1.0, 0.3, 0.3, 0.3, 0.3])
        .into_iter()
        .skip(1)
        .collect();

    let pipeline = FilterPipeline::new().add_filter(QualityGateFilter::new(catalog.clone(), 3.5));
    let survivors = pipeline.apply(candidates).unwrap();
    // "Low Budget" has mean 1.5
    assert_eq!(survivors.len(), 3);

    let mut scored = BonusScorer::new(catalog.clone(), &seed, true).apply(survivors);
    sort_by_score_desc(&mut scored);

    let entries = unique_titles(&scored, &catalog, 5);
    let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Interstellar", "Amelie"]);
    // Movie row matches on all three bonuses, TV row only partially
    assert_eq!(entries[0].id, 2);
}

#[test]
fn test_homepage_path_end_to_end() {
    let catalog = create_test_setup();
    let profile = build_user_profile(&catalog, 2, 3.5, 3);
    assert!(profile.has_seen("Interstellar"));

    let candidates: Vec<_> = catalog
        .items()
        .iter()
        .enumerate()
        .map(|(row, item)| Candidate::new(row, item.id, CandidateSource::Collaborative, 3.0))
        .collect();

    let pipeline = FilterPipeline::new()
        .add_filter(UnseenFilter::new(catalog.clone(), &profile))
        .add_filter(GenreFilter::including(catalog.clone(), "Sci-Fi"));

    let filtered = pipeline.apply(candidates.clone()).unwrap();
    let ids: Vec<_> = filtered.iter().map(|c| c.item_id).collect();
    // Both "Interstellar" rows are seen, "Amelie" is seen
    assert_eq!(ids, vec![1, 4]);

    let diverse = FilterPipeline::new()
        .add_filter(UnseenFilter::new(catalog.clone(), &profile))
        .add_filter(GenreFilter::excluding_all(catalog.clone(), &profile.favorite_genres))
        .add_filter(ExcludeTitlesFilter::new(catalog.clone(), vec!["Inception".to_string()]))
        .apply(candidates)
        .unwrap();
    assert!(diverse.is_empty());
}
