//! Collaborative Filtering Model - biased matrix factorization
//!
//! Learns a bias and a latent vector per user and per title so that
//!
//! ```text
//! r̂(u, i) = μ + b_u + b_i + q_i · p_u
//! ```
//!
//! approximates the observed ratings. Trained once with stochastic gradient
//! descent over the full rating snapshot; queried read-only afterwards.
//!
//! ## Fallbacks
//! - unknown user: `b_u` and `p_u` are dropped
//! - unknown title: `b_i` and `q_i` are dropped
//! - both unknown: the global mean
//!
//! Estimates are always clipped to the rating scale, so `predict` never fails.
//!
//! ## Determinism
//! Factor initialization and the per-epoch training order both come from a
//! `StdRng` seeded with `LatentFactorConfig::seed`.

use anyhow::{Context, Result, ensure};
use data_loader::{RATING_SCALE, RatingEvent, UserId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Training hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatentFactorConfig {
    pub n_factors: usize,
    pub n_epochs: usize,
    pub learning_rate: f32,
    pub regularization: f32,
    pub init_mean: f32,
    pub init_std: f32,
    pub rating_scale: (f32, f32),
    pub seed: u64,
    /// Visit training ratings in a seeded random order each epoch
    pub shuffle: bool,
}

impl Default for LatentFactorConfig {
    fn default() -> Self {
        Self {
            n_factors: 100,
            n_epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
            init_mean: 0.0,
            init_std: 0.1,
            rating_scale: RATING_SCALE,
            seed: 42,
            shuffle: true,
        }
    }
}

impl LatentFactorConfig {
    pub fn with_factors(mut self, n_factors: usize) -> Self {
        self.n_factors = n_factors;
        self
    }

    pub fn with_epochs(mut self, n_epochs: usize) -> Self {
        self.n_epochs = n_epochs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Trained factorization model
#[derive(Debug, Clone)]
pub struct LatentFactorModel {
    config: LatentFactorConfig,
    global_mean: f32,
    user_index: HashMap<UserId, usize>,
    item_index: HashMap<String, usize>,
    user_bias: Vec<f32>,
    item_bias: Vec<f32>,
    /// Row-major n_users x n_factors
    user_factors: Vec<f32>,
    /// Row-major n_items x n_factors
    item_factors: Vec<f32>,
}

impl LatentFactorModel {
    /// Fit the model over every rating event
    #[instrument(skip(events, config), fields(ratings = events.len()))]
    pub fn train(events: &[RatingEvent], config: LatentFactorConfig) -> Result<Self> {
        let (low, high) = config.rating_scale;
        ensure!(low < high, "rating scale {:?} is empty", config.rating_scale);
        ensure!(
            config.learning_rate > 0.0,
            "learning rate must be positive, got {}",
            config.learning_rate
        );

        let start = Instant::now();
        let k = config.n_factors;

        // Indices in first-seen order keep training reproducible
        let mut user_index: HashMap<UserId, usize> = HashMap::new();
        let mut item_index: HashMap<String, usize> = HashMap::new();
        let mut samples: Vec<(usize, usize, f32)> = Vec::with_capacity(events.len());
        for event in events {
            let next_user = user_index.len();
            let u = *user_index.entry(event.user_id).or_insert(next_user);
            let next_item = item_index.len();
            let i = *item_index.entry(event.title.clone()).or_insert(next_item);
            samples.push((u, i, event.rating));
        }

        let global_mean = if samples.is_empty() {
            (low + high) / 2.0
        } else {
            let total: f64 = samples.iter().map(|s| s.2 as f64).sum();
            (total / samples.len() as f64) as f32
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        let normal = Normal::new(config.init_mean, config.init_std)
            .context("invalid factor initialization distribution")?;

        let n_users = user_index.len();
        let n_items = item_index.len();
        let mut user_factors: Vec<f32> = (0..n_users * k).map(|_| normal.sample(&mut rng)).collect();
        let mut item_factors: Vec<f32> = (0..n_items * k).map(|_| normal.sample(&mut rng)).collect();
        let mut user_bias = vec![0.0f32; n_users];
        let mut item_bias = vec![0.0f32; n_items];

        let lr = config.learning_rate;
        let reg = config.regularization;

        for epoch in 0..config.n_epochs {
            if config.shuffle {
                samples.shuffle(&mut rng);
            }

            let mut squared_error = 0.0f64;
            for &(u, i, rating) in &samples {
                let pu = &mut user_factors[u * k..(u + 1) * k];
                let qi = &mut item_factors[i * k..(i + 1) * k];

                let dot: f32 = pu.iter().zip(qi.iter()).map(|(p, q)| p * q).sum();
                let err = rating - (global_mean + user_bias[u] + item_bias[i] + dot);
                squared_error += (err as f64) * (err as f64);

                user_bias[u] += lr * (err - reg * user_bias[u]);
                item_bias[i] += lr * (err - reg * item_bias[i]);

                for f in 0..k {
                    let puf = pu[f];
                    let qif = qi[f];
                    pu[f] += lr * (err * qif - reg * puf);
                    qi[f] += lr * (err * puf - reg * qif);
                }
            }

            if !samples.is_empty() {
                debug!(
                    "epoch {}: training rmse {:.4}",
                    epoch + 1,
                    (squared_error / samples.len() as f64).sqrt()
                );
            }
        }

        info!(
            "Trained latent factor model: {} users, {} titles, {} factors, {} epochs in {:.2?}",
            n_users,
            n_items,
            k,
            config.n_epochs,
            start.elapsed()
        );

        Ok(Self {
            config,
            global_mean,
            user_index,
            item_index,
            user_bias,
            item_bias,
            user_factors,
            item_factors,
        })
    }

    /// Estimated rating of `title` by `user_id`, clipped to the rating scale
    pub fn predict(&self, user_id: UserId, title: &str) -> f32 {
        let k = self.config.n_factors;
        let user = self.user_index.get(&user_id).copied();
        let item = self.item_index.get(title).copied();

        let mut estimate = self.global_mean;
        if let Some(u) = user {
            estimate += self.user_bias[u];
        }
        if let Some(i) = item {
            estimate += self.item_bias[i];
        }
        if let (Some(u), Some(i)) = (user, item) {
            let pu = &self.user_factors[u * k..(u + 1) * k];
            let qi = &self.item_factors[i * k..(i + 1) * k];
            estimate += pu.iter().zip(qi).map(|(p, q)| p * q).sum::<f32>();
        }

        let (low, high) = self.config.rating_scale;
        if !estimate.is_finite() {
            return self.global_mean.clamp(low, high);
        }
        estimate.clamp(low, high)
    }

    /// Root mean squared error of the model over some events
    pub fn rmse(&self, events: &[RatingEvent]) -> f32 {
        if events.is_empty() {
            return 0.0;
        }
        let total: f64 = events
            .iter()
            .map(|e| {
                let err = (e.rating - self.predict(e.user_id, &e.title)) as f64;
                err * err
            })
            .sum();
        (total / events.len() as f64).sqrt() as f32
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    pub fn knows_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    pub fn knows_item(&self, title: &str) -> bool {
        self.item_index.contains_key(title)
    }

    pub fn config(&self) -> &LatentFactorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<RatingEvent> {
        let mut events = Vec::new();
        // users 1-3 love "Alpha" and dislike "Beta"; user 4 only rated "Alpha"
        for user in 1..=3 {
            events.push(RatingEvent::new(user, 1, "Alpha", 5.0));
            events.push(RatingEvent::new(user, 2, "Beta", 1.0));
            events.push(RatingEvent::new(user, 3, "Gamma", 3.0));
        }
        events.push(RatingEvent::new(4, 1, "Alpha", 4.5));
        events
    }

    fn small_config() -> LatentFactorConfig {
        LatentFactorConfig::default().with_factors(8).with_epochs(50)
    }

    #[test]
    fn test_learns_item_preference() {
        let model = LatentFactorModel::train(&sample_events(), small_config()).unwrap();
        assert!(model.predict(4, "Alpha") > model.predict(4, "Beta"));
        assert!(model.rmse(&sample_events()) < 1.5);
    }

    #[test]
    fn test_unknown_pairs_fall_back() {
        let model = LatentFactorModel::train(&sample_events(), small_config()).unwrap();

        let unknown_both = model.predict(999, "Never Rated");
        assert!((unknown_both - model.global_mean()).abs() < 1e-6);

        let unknown_user = model.predict(999, "Alpha");
        assert!(unknown_user.is_finite());
        assert!(unknown_user > model.predict(999, "Beta"));

        let unknown_item = model.predict(1, "Never Rated");
        assert!((0.5..=5.0).contains(&unknown_item));
    }

    #[test]
    fn test_training_is_deterministic_for_a_seed() {
        let a = LatentFactorModel::train(&sample_events(), small_config()).unwrap();
        let b = LatentFactorModel::train(&sample_events(), small_config()).unwrap();

        for user in 1..=4 {
            for title in ["Alpha", "Beta", "Gamma"] {
                assert_eq!(a.predict(user, title).to_bits(), b.predict(user, title).to_bits());
            }
        }
    }

    #[test]
    fn test_empty_training_set_predicts_midpoint() {
        let model = LatentFactorModel::train(&[], LatentFactorConfig::default()).unwrap();
        assert_eq!(model.predict(1, "Anything"), 2.75);
        assert!(!model.knows_user(1));
    }

    #[test]
    fn test_predictions_stay_in_scale() {
        let mut config = small_config();
        config.learning_rate = 0.5;
        let model = LatentFactorModel::train(&sample_events(), config).unwrap();
        for title in ["Alpha", "Beta", "Gamma"] {
            let p = model.predict(1, title);
            assert!((0.5..=5.0).contains(&p));
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = LatentFactorConfig::default();
        config.init_std = -1.0;
        assert!(LatentFactorModel::train(&sample_events(), config).is_err());
    }
}
