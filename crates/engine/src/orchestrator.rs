//! # Recommendation Engine
//!
//! Async facade over an [`EngineContext`]:
//! 1. Build the context on a blocking thread (TF-IDF + factorization)
//! 2. Answer title and user queries off the async runtime
//! 3. Rebuild into a fresh engine when the catalog changes
//!
//! Cloning the engine is cheap; clones share one context.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use data_loader::{CatalogIndex, UserId};

use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::homepage::{Homepage, HomepageComposer};
use crate::hybrid::HybridScorer;
use pipeline::RecommendationEntry;

#[derive(Clone)]
pub struct RecommendationEngine {
    context: Arc<EngineContext>,
}

impl RecommendationEngine {
    /// Build an engine for `catalog`.
    ///
    /// The build is CPU-bound, so it runs under `spawn_blocking`.
    pub async fn new(catalog: Arc<CatalogIndex>, config: EngineConfig) -> Result<Self> {
        let start = Instant::now();
        let context = tokio::task::spawn_blocking(move || EngineContext::build(catalog, config))
            .await
            .context("Engine build task panicked")??;
        info!("Recommendation engine built in {:.2?}", start.elapsed());
        Ok(Self::from_context(Arc::new(context)))
    }

    /// Wrap an already built context.
    pub fn from_context(context: Arc<EngineContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<EngineContext> {
        &self.context
    }

    /// Up to `count` titles similar to `title`, using the configured rating
    /// gate and genre bonus.
    pub async fn recommend_by_title(
        &self,
        title: &str,
        count: usize,
    ) -> Result<Vec<RecommendationEntry>> {
        let hybrid = &self.context.config().hybrid;
        self.recommend_with(title, count, hybrid.min_rating, hybrid.use_genre_bonus)
            .await
    }

    /// Like [`recommend_by_title`](Self::recommend_by_title) with explicit
    /// gate and bonus settings.
    pub async fn recommend_with(
        &self,
        title: &str,
        count: usize,
        min_rating: f32,
        use_genre_bonus: bool,
    ) -> Result<Vec<RecommendationEntry>> {
        let context = self.context.clone();
        let title = title.to_string();
        tokio::task::spawn_blocking(move || {
            HybridScorer::new(&context).recommend(&title, count, min_rating, use_genre_bonus)
        })
        .await
        .context("Title recommendation task panicked")?
    }

    /// The sectioned homepage for `user_id`.
    pub async fn recommend_for_user(&self, user_id: UserId) -> Result<Homepage> {
        let context = self.context.clone();
        tokio::task::spawn_blocking(move || HomepageComposer::new(&context).build_homepage(user_id))
            .await
            .context("Homepage task panicked")?
    }

    /// Build a new engine over `catalog` with the current config.
    ///
    /// The existing engine keeps serving its own context until dropped.
    pub async fn rebuild(&self, catalog: Arc<CatalogIndex>) -> Result<Self> {
        info!("Rebuilding engine over {} items", catalog.len());
        Self::new(catalog, self.context.config().clone()).await
    }
}
