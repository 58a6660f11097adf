use serde::{Deserialize, Serialize};

use super::price_point::PricePoint;

/// Upstream aggregate over the full-resolution window.
///
/// Sent by the history provider as `chart_info`. When the rendered series
/// is down-sampled, these extrema are the true ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub price_range: Option<f64>,
}

impl SummaryMetadata {
    pub fn new(min_price: f64, max_price: f64) -> Self {
        Self {
            min_price: Some(min_price),
            max_price: Some(max_price),
            price_range: Some(max_price - min_price),
        }
    }

    /// Close-based extrema of a series, or `None` for an empty one.
    pub fn from_points(points: &[PricePoint]) -> Option<Self> {
        let first = points.first()?;
        let (min, max) = points
            .iter()
            .fold((first.close, first.close), |(lo, hi), p| {
                (lo.min(p.close), hi.max(p.close))
            });
        Some(Self::new(min, max))
    }

    /// Usable values only: finite and positive.
    pub fn highest(&self) -> Option<f64> {
        self.max_price.filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn lowest(&self) -> Option<f64> {
        self.min_price.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Summary figures for the loaded window.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStats {
    pub first_price: f64,
    pub last_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub highest: f64,
    pub lowest: f64,
}

impl ChartStats {
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}
