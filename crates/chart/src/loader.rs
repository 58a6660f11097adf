//! Fetch-then-compute driver with last-request-wins semantics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{debug, warn};

use crate::errors::ChartError;
use crate::models::ChartWindowConfig;
use crate::pipeline::{ChartPipeline, ChartView};
use crate::provider::HistoryProvider;

/// Loads chart views for one chart widget.
///
/// Each call to [`load`](Self::load) takes a new generation number. When a
/// fetch completes after a newer load has started, its result is dropped
/// with [`ChartError::Superseded`] so a slow response can never overwrite
/// the view of the window the user picked last.
pub struct ChartLoader {
    provider: Arc<dyn HistoryProvider>,
    pipeline: ChartPipeline,
    generation: AtomicU64,
}

impl ChartLoader {
    pub fn new(provider: Arc<dyn HistoryProvider>) -> Self {
        Self::with_pipeline(provider, ChartPipeline::new())
    }

    pub fn with_pipeline(provider: Arc<dyn HistoryProvider>, pipeline: ChartPipeline) -> Self {
        Self {
            provider,
            pipeline,
            generation: AtomicU64::new(0),
        }
    }

    pub fn pipeline(&self) -> &ChartPipeline {
        &self.pipeline
    }

    /// Load `config` relative to today's local date.
    pub async fn load(&self, config: &ChartWindowConfig) -> Result<ChartView, ChartError> {
        self.load_as_of(config, Local::now().date_naive()).await
    }

    pub async fn load_as_of(
        &self,
        config: &ChartWindowConfig,
        as_of: NaiveDate,
    ) -> Result<ChartView, ChartError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = self.pipeline.request_for(config);

        debug!(
            "Loading chart {} ({}d, {}) as generation {}",
            request.symbol, request.period_days, request.interval, generation
        );

        let fetched = self.provider.fetch_history(&request).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                "Discarding stale chart load for {} (generation {})",
                request.symbol, generation
            );
            return Err(ChartError::Superseded {
                symbol: config.symbol().to_string(),
                interval: config.interval(),
            });
        }

        let response = fetched.map_err(|e| {
            warn!("Failed to load chart data for {}: {}", request.symbol, e);
            match e {
                ChartError::HistoryUnavailable { .. } => e,
                other => ChartError::HistoryUnavailable {
                    symbol: request.symbol.clone(),
                    message: other.to_string(),
                },
            }
        })?;

        Ok(self.pipeline.run(config, &response, as_of))
    }

    /// Drop whatever load is in flight without starting a new one.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
