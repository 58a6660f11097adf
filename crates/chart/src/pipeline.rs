//! One recompute cycle, from raw history to a renderable view.
//!
//! ```text
//! raw records -> sanitize -> [resample] -> moving averages -> labels
//!             -> extreme flags -> { price/volume domains, stats }
//! ```
//!
//! Every step is pure. A run never mutates its inputs, so the previous
//! view stays valid until the caller swaps in the new one.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::axis::AxisDomainCalculator;
use crate::candle::CandlestickGeometryMapper;
use crate::config::ChartSettings;
use crate::errors::ChartError;
use crate::format::PriceFormatter;
use crate::indicators::MovingAverageEngine;
use crate::models::{
    AnnotatedPoint, AxisDomain, CandleShape, ChartStats, ChartWindowConfig, Interval, Market,
    PixelBox, PriceScale, SummaryMetadata, VolumeBar,
};
use crate::provider::{HistoryRequest, HistoryResponse};
use crate::resample::Resampler;
use crate::sanitizer::{SanitizeReport, SeriesSanitizer};
use crate::stats::StatsAggregator;

/// Everything the presentation layer needs to draw one chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub symbol: String,
    pub market: Market,
    pub config: ChartWindowConfig,
    pub points: Vec<AnnotatedPoint>,
    pub price_domain: AxisDomain,
    pub volume_domain: AxisDomain,
    /// `None` when no record survived sanitization.
    pub stats: Option<ChartStats>,
    pub report: SanitizeReport,
}

impl ChartView {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scale for a price pane of `height` pixels starting at `top`.
    pub fn price_scale(&self, top: f64, height: f64) -> Option<PriceScale> {
        PriceScale::from_domain(&self.price_domain, top, height)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChartPipeline {
    settings: ChartSettings,
    sanitizer: SeriesSanitizer,
    axis: AxisDomainCalculator,
    candles: CandlestickGeometryMapper,
}

impl ChartPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline tuned by `settings`, which are validated first.
    pub fn with_settings(settings: ChartSettings) -> Result<Self, ChartError> {
        settings.validate()?;
        Ok(Self {
            sanitizer: SeriesSanitizer::with_config(settings.sanitizer.clone()),
            axis: AxisDomainCalculator::with_settings(settings.axis.clone()),
            candles: CandlestickGeometryMapper::with_settings(settings.candle.clone()),
            settings,
        })
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Whether `config` is served by aggregating daily bars here.
    pub fn resamples(&self, config: &ChartWindowConfig) -> bool {
        self.settings.resample_locally && config.interval() != Interval::Daily
    }

    /// The fetch that feeds a run for `config`.
    pub fn request_for(&self, config: &ChartWindowConfig) -> HistoryRequest {
        let mut request = HistoryRequest::from(config);
        if self.resamples(config) {
            request.interval = Interval::Daily;
        }
        request
    }

    /// Build the view for `config` from one provider response.
    ///
    /// `as_of` is the local date used to drop future-dated records.
    pub fn run(
        &self,
        config: &ChartWindowConfig,
        response: &HistoryResponse,
        as_of: NaiveDate,
    ) -> ChartView {
        let sanitized = self.sanitizer.sanitize(&response.data, as_of);

        let (points, summary) = if self.resamples(config) {
            // The daily series is the full-resolution one; keep its extrema.
            let summary = response
                .summary
                .clone()
                .or_else(|| SummaryMetadata::from_points(&sanitized.points));
            (
                Resampler::resample(&sanitized.points, config.interval()),
                summary,
            )
        } else {
            (sanitized.points, response.summary.clone())
        };

        let windows = self.moving_average_windows(config);
        let annotated: Vec<AnnotatedPoint> = MovingAverageEngine::compute(&points, &windows)
            .into_iter()
            .map(|p| {
                let label = PriceFormatter::format_date_label(p.date(), config.period());
                p.with_label(label)
            })
            .collect();
        let annotated = StatsAggregator::flag_extremes(annotated);

        let price_domain = self
            .axis
            .price_domain(&annotated, config.visible_moving_averages());
        let volume_domain = self.axis.volume_domain(&annotated);
        let stats = StatsAggregator::aggregate(&annotated, summary.as_ref());

        debug!(
            "Chart {} ({}d, {}): {} points, {} excluded, price domain {:?}",
            config.symbol(),
            config.period_days(),
            config.interval(),
            annotated.len(),
            sanitized.report.excluded(),
            price_domain.bounds()
        );

        ChartView {
            symbol: config.symbol().to_string(),
            market: config.market(),
            config: config.clone(),
            points: annotated,
            price_domain,
            volume_domain,
            stats,
            report: sanitized.report,
        }
    }

    /// Candle for the point at `index`, drawn in the column starting at `x`.
    pub fn candle_for(
        &self,
        view: &ChartView,
        index: usize,
        x: f64,
        width: f64,
        scale: &PriceScale,
    ) -> Option<CandleShape> {
        let point = view.points.get(index)?;
        self.candles.map_candle_on_scale(&point.ohlc(), x, width, scale)
    }

    /// Volume bar for the point at `index`, scaled into a pane of `height`
    /// pixels starting at `top`.
    pub fn volume_bar_for(
        &self,
        view: &ChartView,
        index: usize,
        x: f64,
        width: f64,
        top: f64,
        height: f64,
    ) -> Option<VolumeBar> {
        let point = view.points.get(index)?;
        let max = view.volume_domain.max.value()?;
        if max <= 0.0 {
            return None;
        }
        let bar_height = point.point.volume as f64 / max * height;
        let pixel_box = PixelBox::new(x, top + height - bar_height, width, bar_height);
        self.candles.map_volume_bar(&point.point, &pixel_box)
    }

    fn moving_average_windows(&self, config: &ChartWindowConfig) -> Vec<usize> {
        let mut windows: BTreeSet<usize> =
            self.settings.moving_average_windows.iter().copied().collect();
        windows.extend(config.visible_moving_averages().iter().copied());
        windows.into_iter().collect()
    }
}
