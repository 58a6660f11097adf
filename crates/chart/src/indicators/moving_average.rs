use std::collections::BTreeSet;

use log::warn;

use crate::models::{AnnotatedPoint, MovingAverage, PricePoint};

/// Simple moving averages over a date-ordered series.
///
/// Near the start of the series, where fewer than `N` closes exist, the value
/// is the mean of every close so far and is flagged `partial`. Index 0 is
/// therefore always the first close itself.
pub struct MovingAverageEngine;

impl MovingAverageEngine {
    /// Annotate every point with `ma{N}` for each requested window.
    ///
    /// Window 0 is ignored and duplicate windows collapse.
    pub fn compute(points: &[PricePoint], window_sizes: &[usize]) -> Vec<AnnotatedPoint> {
        let windows = Self::normalize_windows(window_sizes);
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();

        let mut annotated: Vec<AnnotatedPoint> =
            points.iter().cloned().map(AnnotatedPoint::new).collect();

        for &window in &windows {
            for (i, (point, value)) in annotated
                .iter_mut()
                .zip(Self::sma(&closes, window))
                .enumerate()
            {
                point.moving_averages.insert(
                    window,
                    MovingAverage {
                        value,
                        partial: i + 1 < window,
                    },
                );
            }
        }

        annotated
    }

    /// Moving average of `closes` over `window`, using the growing-window
    /// policy for the first `window - 1` entries.
    ///
    /// Returns an empty vector for window 0.
    pub fn sma(closes: &[f64], window: usize) -> Vec<f64> {
        if window == 0 {
            return Vec::new();
        }

        (0..closes.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(window);
                let slice = &closes[start..=i];
                slice.iter().sum::<f64>() / slice.len() as f64
            })
            .collect()
    }

    fn normalize_windows(window_sizes: &[usize]) -> BTreeSet<usize> {
        window_sizes
            .iter()
            .copied()
            .filter(|&w| {
                if w == 0 {
                    warn!("Ignoring moving average window of size 0");
                }
                w > 0
            })
            .collect()
    }
}
