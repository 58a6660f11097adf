//! Raw series sanitization.
//!
//! Filters upstream OHLCV records before any computation:
//! - Future-dated bars (feed glitches) are dropped
//! - OHLC invariants (every price positive, high/low bound open and close)
//! - Volume must be a non-negative number; a missing volume counts as zero
//!
//! Nothing here fails. Bad records are excluded and listed in the
//! [`SanitizeReport`] so callers can surface diagnostics.

use std::fmt;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::{PricePoint, RawPricePoint};

/// Why a raw record was excluded.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    MissingDate,
    FutureDate { date: NaiveDate },
    /// Open, high, low or close absent or not a finite number.
    NonNumericPrice { field: &'static str },
    NonPositivePrice { field: &'static str, value: f64 },
    HighBelowLow { high: f64, low: f64 },
    /// Open or close lies outside the high/low range.
    OutsideRange { field: &'static str, value: f64 },
    InvalidVolume { value: f64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingDate => write!(f, "missing or unparsable date"),
            RejectReason::FutureDate { date } => write!(f, "dated in the future ({})", date),
            RejectReason::NonNumericPrice { field } => write!(f, "{} is not a number", field),
            RejectReason::NonPositivePrice { field, value } => {
                write!(f, "non-positive {} price: {}", field, value)
            }
            RejectReason::HighBelowLow { high, low } => {
                write!(f, "high ({}) is less than low ({})", high, low)
            }
            RejectReason::OutsideRange { field, value } => {
                write!(f, "{} ({}) is outside the high/low range", field, value)
            }
            RejectReason::InvalidVolume { value } => write!(f, "invalid volume: {}", value),
        }
    }
}

/// One excluded record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rejection {
    /// Position in the raw input.
    pub index: usize,
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub reason: RejectReason,
}

/// Diagnostics for one sanitize pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SanitizeReport {
    pub total: usize,
    pub kept: usize,
    pub rejections: Vec<Rejection>,
}

impl SanitizeReport {
    pub fn excluded(&self) -> usize {
        self.rejections.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// Valid points plus the report describing what was dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SanitizedSeries {
    pub points: Vec<PricePoint>,
    pub report: SanitizeReport,
}

/// Sanitizer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Drop bars dated after the as-of date.
    pub reject_future_dates: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            reject_future_dates: true,
        }
    }
}

/// Filters a raw OHLCV stream down to records safe to chart.
#[derive(Clone, Debug, Default)]
pub struct SeriesSanitizer {
    config: SanitizerConfig,
}

impl SeriesSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SanitizerConfig) -> Self {
        Self { config }
    }

    /// Keep every valid record, in input order.
    pub fn sanitize(&self, raw_points: &[RawPricePoint], as_of: NaiveDate) -> SanitizedSeries {
        let mut points = Vec::with_capacity(raw_points.len());
        let mut rejections = Vec::new();

        for (index, raw) in raw_points.iter().enumerate() {
            match self.check(raw, as_of) {
                Ok(point) => points.push(point),
                Err(reason) => {
                    debug!("Excluding record #{} ({:?}): {}", index, raw.date, reason);
                    rejections.push(Rejection {
                        index,
                        date: raw.date,
                        reason,
                    });
                }
            }
        }

        if !rejections.is_empty() {
            warn!(
                "Excluded {} of {} price records",
                rejections.len(),
                raw_points.len()
            );
        }

        let report = SanitizeReport {
            total: raw_points.len(),
            kept: points.len(),
            rejections,
        };

        SanitizedSeries { points, report }
    }

    /// Validate a single record, returning the first problem found.
    pub fn check(&self, raw: &RawPricePoint, as_of: NaiveDate) -> Result<PricePoint, RejectReason> {
        let date = raw.date.ok_or(RejectReason::MissingDate)?;
        if self.config.reject_future_dates && date > as_of {
            return Err(RejectReason::FutureDate { date });
        }

        let open = price(raw.open, "open")?;
        let high = price(raw.high, "high")?;
        let low = price(raw.low, "low")?;
        let close = price(raw.close, "close")?;

        if high < low {
            return Err(RejectReason::HighBelowLow { high, low });
        }
        for (field, value) in [("open", open), ("close", close)] {
            if value < low || value > high {
                return Err(RejectReason::OutsideRange { field, value });
            }
        }

        let volume = volume(raw.volume)?;

        Ok(PricePoint::new(date, open, high, low, close, volume))
    }
}

fn price(value: Option<f64>, field: &'static str) -> Result<f64, RejectReason> {
    match value {
        Some(v) if !v.is_finite() => Err(RejectReason::NonNumericPrice { field }),
        Some(v) if v <= 0.0 => Err(RejectReason::NonPositivePrice { field, value: v }),
        Some(v) => Ok(v),
        None => Err(RejectReason::NonNumericPrice { field }),
    }
}

fn volume(value: Option<f64>) -> Result<u64, RejectReason> {
    match value {
        None => Ok(0),
        Some(v) if !v.is_finite() || v < 0.0 => Err(RejectReason::InvalidVolume { value: v }),
        // Fractional volumes come from adjusted feeds; truncate.
        Some(v) => Ok(v.trunc() as u64),
    }
}
