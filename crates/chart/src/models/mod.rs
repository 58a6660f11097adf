//! Chart data models
//!
//! - `price_point` - Raw and validated OHLCV records, annotated points
//! - `window` - Load parameters (ChartWindowConfig, Period, Interval, ChartType)
//! - `market` - Market/currency tag
//! - `domain` - Axis domains with auto bounds
//! - `stats` - Upstream summary metadata and computed period statistics
//! - `geometry` - Pixel boxes, price scales and drawable candle shapes

mod domain;
mod geometry;
mod market;
mod price_point;
mod stats;
mod window;

pub use domain::{AxisBound, AxisDomain};
pub use geometry::{
    CandleBody, CandleDirection, CandleFill, CandleShape, PixelBox, PriceScale, Segment, VolumeBar,
};
pub use market::Market;
pub use price_point::{AnnotatedPoint, MovingAverage, Ohlc, PricePoint, RawPricePoint};
pub use stats::{ChartStats, SummaryMetadata};
pub use window::{ChartType, ChartWindowConfig, Interval, Period, DEFAULT_MOVING_AVERAGE_WINDOWS};
