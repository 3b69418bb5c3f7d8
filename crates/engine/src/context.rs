//! The immutable state every query reads from.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use data_loader::CatalogIndex;
use models::{ContentSimilarityModel, LatentFactorModel};

use crate::config::EngineConfig;

/// Catalog, models and config, built once and shared read-only.
///
/// Queries take `&EngineContext`, so any number of threads can read it
/// concurrently. A data update means building a new context.
pub struct EngineContext {
    catalog: Arc<CatalogIndex>,
    similarity: ContentSimilarityModel,
    latent_factor: LatentFactorModel,
    config: EngineConfig,
}

impl EngineContext {
    /// Build both models from `catalog`.
    ///
    /// The similarity matrix and the latent factor model are independent,
    /// so they are built concurrently.
    #[instrument(skip_all, fields(items = catalog.len(), ratings = catalog.ratings().len()))]
    pub fn build(catalog: Arc<CatalogIndex>, config: EngineConfig) -> Result<Self> {
        let start = Instant::now();

        let (similarity, latent_factor) = rayon::join(
            || {
                let started = Instant::now();
                let model = ContentSimilarityModel::build(&catalog);
                info!("Built content similarity model in {:.2?}", started.elapsed());
                model
            },
            || {
                let started = Instant::now();
                let model = LatentFactorModel::train(catalog.ratings(), config.latent_factor.clone());
                info!("Trained latent factor model in {:.2?}", started.elapsed());
                model
            },
        );
        let latent_factor = latent_factor.context("Failed to train latent factor model")?;

        info!("Engine context ready in {:.2?}", start.elapsed());

        Ok(Self {
            catalog,
            similarity,
            latent_factor,
            config,
        })
    }

    pub fn catalog(&self) -> &Arc<CatalogIndex> {
        &self.catalog
    }

    pub fn similarity(&self) -> &ContentSimilarityModel {
        &self.similarity
    }

    pub fn latent_factor(&self) -> &LatentFactorModel {
        &self.latent_factor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
