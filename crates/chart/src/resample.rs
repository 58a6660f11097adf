//! Down-sampling of daily bars into weekly or monthly bars.

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::models::{Interval, PricePoint};

/// Aggregates a chronologically ordered daily series.
pub struct Resampler;

impl Resampler {
    /// Bucket daily bars by ISO week (Monday start) or calendar month.
    ///
    /// Each bucket takes the first open, the last close, the highest high,
    /// the lowest low and the summed volume. It is dated by its first
    /// trading day. Daily input is returned as-is.
    pub fn resample(points: &[PricePoint], interval: Interval) -> Vec<PricePoint> {
        if interval == Interval::Daily || points.is_empty() {
            return points.to_vec();
        }

        let mut sorted = points.to_vec();
        sorted.sort_by_key(|p| p.date);

        let mut buckets: Vec<PricePoint> = Vec::new();
        let mut current_key: Option<NaiveDate> = None;

        for point in sorted {
            let key = bucket_start(point.date, interval);
            match buckets.last_mut() {
                Some(bucket) if current_key == Some(key) => {
                    bucket.high = bucket.high.max(point.high);
                    bucket.low = bucket.low.min(point.low);
                    bucket.close = point.close;
                    bucket.volume = bucket.volume.saturating_add(point.volume);
                }
                _ => {
                    current_key = Some(key);
                    buckets.push(point);
                }
            }
        }

        debug!(
            "Resampled {} daily bars into {} {} bars",
            points.len(),
            buckets.len(),
            interval
        );
        buckets
    }
}

fn bucket_start(date: NaiveDate, interval: Interval) -> NaiveDate {
    match interval {
        Interval::Daily => date,
        Interval::Weekly => {
            let offset = date.weekday().num_days_from_monday() as u64;
            date - chrono::Days::new(offset)
        }
        Interval::Monthly => date.with_day(1).unwrap_or(date),
    }
}
