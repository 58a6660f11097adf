//! Axis domains for the price pane and the volume pane.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{AnnotatedPoint, AxisBound, AxisDomain};

/// Padding applied around the observed price range.
pub const DEFAULT_PRICE_PADDING_PERCENT: f64 = 0.30;

/// Multiplier on the tallest volume bar.
pub const DEFAULT_VOLUME_HEADROOM: f64 = 1.2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    /// Fraction of the price range added above and below. Large enough
    /// that candle bodies sit in the middle band of the pane.
    pub price_padding_percent: f64,
    pub volume_headroom: f64,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            price_padding_percent: DEFAULT_PRICE_PADDING_PERCENT,
            volume_headroom: DEFAULT_VOLUME_HEADROOM,
        }
    }
}

/// Computes padded axis domains. Nothing is cached: call again whenever
/// the points or the visible overlays change.
#[derive(Clone, Debug, Default)]
pub struct AxisDomainCalculator {
    settings: AxisSettings,
}

impl AxisDomainCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AxisSettings) -> Self {
        Self { settings }
    }

    /// Domain covering every positive OHLC price and every positive value
    /// of the visible moving averages, padded by `price_padding_percent` of
    /// the range on both sides. The lower bound never drops below zero.
    ///
    /// Returns an auto domain when there is no valid price at all.
    pub fn price_domain(
        &self,
        points: &[AnnotatedPoint],
        visible_mas: &BTreeSet<usize>,
    ) -> AxisDomain {
        let mut pooled = Vec::with_capacity(points.len() * (4 + visible_mas.len()));
        for p in points {
            pooled.extend([p.point.open, p.point.high, p.point.low, p.point.close]);
            pooled.extend(visible_mas.iter().filter_map(|w| p.ma(*w)));
        }

        let Some((actual_min, actual_max)) = positive_extrema(pooled.into_iter()) else {
            return AxisDomain::auto();
        };

        let range = actual_max - actual_min;
        let padding = if range > 0.0 {
            range * self.settings.price_padding_percent
        } else {
            // Flat series: pad relative to the price so the pane has height.
            actual_max * self.settings.price_padding_percent
        };

        AxisDomain::fixed((actual_min - padding).max(0.0), actual_max + padding)
    }

    /// `[0, max volume * headroom]`, or `[0, auto]` if no bar has volume.
    pub fn volume_domain(&self, points: &[AnnotatedPoint]) -> AxisDomain {
        let max_volume = points.iter().map(|p| p.point.volume).filter(|v| *v > 0).max();

        AxisDomain {
            min: AxisBound::Fixed(0.0),
            max: match max_volume {
                Some(v) => AxisBound::Fixed(v as f64 * self.settings.volume_headroom),
                None => AxisBound::Auto,
            },
        }
    }
}

fn positive_extrema(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}
