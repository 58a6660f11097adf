//! Papertrade Chart Crate
//!
//! Turns raw daily/weekly/monthly OHLCV history for one stock into
//! everything a price chart needs: sanitized points annotated with moving
//! averages, padded axis domains, period statistics, candlestick geometry
//! and market-aware display strings.
//!
//! # Overview
//!
//! - Korean (KRW) and US (USD) symbols, classified from the symbol alone
//! - Periods of 1 day to 1 year at daily, weekly or monthly granularity
//! - Upstream summary metadata is authoritative for highest/lowest
//! - Bad records are excluded and reported, never fatal
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! | HistoryProvider  | --> |  SeriesSanitizer |  (drop invalid / future bars)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Resampler     |  (optional weekly/monthly)
//!                          +------------------+
//!                                  |
//!                                  v
//!                       +---------------------+
//!                       | MovingAverageEngine |  (ma5, ma20, ...)
//!                       +---------------------+
//!                                  |
//!                                  v
//!        +-------------------------+-------------------------+
//!        |                         |                         |
//!        v                         v                         v
//! +----------------+   +----------------------+   +-------------------+
//! | StatsAggregator|   | AxisDomainCalculator |   |  PriceFormatter   |
//! +----------------+   +----------------------+   +-------------------+
//!                                  |
//!                                  v
//!                    +----------------------------+
//!                    | CandlestickGeometryMapper  |
//!                    +----------------------------+
//! ```
//!
//! [`ChartPipeline`] runs the whole chain synchronously. [`ChartLoader`]
//! adds the async fetch in front of it and discards stale results.
//!
//! # Core Types
//!
//! - [`ChartWindowConfig`] - Symbol, period, interval, chart type, overlays
//! - [`PricePoint`] - Validated OHLCV record
//! - [`AnnotatedPoint`] - Point plus moving averages, label, extreme flags
//! - [`AxisDomain`] - Price or volume domain, possibly auto-scaled
//! - [`ChartStats`] - First/last price, change, highest, lowest
//! - [`CandleShape`] - Drawable wicks and body for one candle
//! - [`ChartView`] - Full output of one run

pub mod axis;
pub mod candle;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod format;
pub mod indicators;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod resample;
pub mod sanitizer;
pub mod stats;

// Re-export all public types from models
pub use models::{
    AnnotatedPoint, AxisBound, AxisDomain, CandleBody, CandleDirection, CandleFill, CandleShape,
    ChartStats, ChartType, ChartWindowConfig, Interval, Market, MovingAverage, Ohlc, Period,
    PixelBox, PricePoint, PriceScale, RawPricePoint, Segment, SummaryMetadata, VolumeBar,
    DEFAULT_MOVING_AVERAGE_WINDOWS,
};

pub use axis::{AxisDomainCalculator, AxisSettings};
pub use candle::{CandleSettings, CandlestickGeometryMapper};
pub use classifier::MarketClassifier;
pub use config::ChartSettings;
pub use errors::ChartError;
pub use format::PriceFormatter;
pub use indicators::MovingAverageEngine;
pub use loader::ChartLoader;
pub use pipeline::{ChartPipeline, ChartView};
pub use provider::{HistoryProvider, HistoryRequest, HistoryResponse, InMemoryHistoryProvider};
pub use resample::Resampler;
pub use sanitizer::{
    RejectReason, Rejection, SanitizeReport, SanitizedSeries, SanitizerConfig, SeriesSanitizer,
};
pub use stats::StatsAggregator;
