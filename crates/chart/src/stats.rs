//! Period statistics and extreme-close flags.

use crate::models::{AnnotatedPoint, ChartStats, SummaryMetadata};

/// Computes the figures shown above the chart.
pub struct StatsAggregator;

impl StatsAggregator {
    /// Summarize a chronologically ordered window.
    ///
    /// Highest/lowest come from `summary` when it carries usable values,
    /// since a down-sampled window can miss the true daily extrema. Each
    /// missing field falls back to the max/min close of the window.
    ///
    /// Returns `None` for an empty window.
    pub fn aggregate(
        points: &[AnnotatedPoint],
        summary: Option<&SummaryMetadata>,
    ) -> Option<ChartStats> {
        let first_price = points.first()?.close();
        let last_price = points.last()?.close();

        let change = last_price - first_price;
        let change_percent = if first_price == 0.0 {
            0.0
        } else {
            change / first_price * 100.0
        };

        let (min_close, max_close) = close_extrema(points)?;
        let highest = summary.and_then(|s| s.highest()).unwrap_or(max_close);
        let lowest = summary.and_then(|s| s.lowest()).unwrap_or(min_close);

        Some(ChartStats {
            first_price,
            last_price,
            change,
            change_percent,
            highest,
            lowest,
        })
    }

    /// Flag the first point holding the highest close and the first point
    /// holding the lowest close. Any existing flags are cleared.
    pub fn flag_extremes(mut points: Vec<AnnotatedPoint>) -> Vec<AnnotatedPoint> {
        let mut highest: Option<(usize, f64)> = None;
        let mut lowest: Option<(usize, f64)> = None;

        for (i, point) in points.iter_mut().enumerate() {
            point.is_highest = false;
            point.is_lowest = false;

            let close = point.close();
            if highest.map_or(true, |(_, v)| close > v) {
                highest = Some((i, close));
            }
            if lowest.map_or(true, |(_, v)| close < v) {
                lowest = Some((i, close));
            }
        }

        if let Some((i, _)) = highest {
            points[i].is_highest = true;
        }
        if let Some((i, _)) = lowest {
            points[i].is_lowest = true;
        }

        points
    }
}

fn close_extrema(points: &[AnnotatedPoint]) -> Option<(f64, f64)> {
    let first = points.first()?.close();
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (lo.min(p.close()), hi.max(p.close()))
    }))
}
