//! Error types for the chart pipeline.
//!
//! Data-integrity problems inside a series never surface here: bad records
//! are excluded by the sanitizer and unmappable candles yield no shape.
//! [`ChartError`] covers the boundaries around the pipeline instead: window
//! configuration, settings, and the history fetch.

use thiserror::Error;

use crate::models::{ChartType, Interval};

/// Errors that can occur around a chart load.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The requested period is not one of the supported day counts.
    #[error("Unsupported period: {0} days")]
    UnsupportedPeriod(u32),

    /// The interval name is not daily, weekly or monthly.
    #[error("Unsupported interval: {0}")]
    UnsupportedInterval(String),

    /// The chart type cannot be shown for this window
    /// (candles on a 1-day USD view).
    #[error("{chart_type} chart is unavailable for {symbol} ({period_days}d)")]
    ChartTypeUnavailable {
        symbol: String,
        chart_type: ChartType,
        period_days: u32,
    },

    /// The history provider failed to return data.
    #[error("History unavailable for {symbol}: {message}")]
    HistoryUnavailable { symbol: String, message: String },

    /// A newer load started while this one was in flight; its result
    /// was discarded.
    #[error("Load for {symbol} ({interval}) superseded by a newer request")]
    Superseded { symbol: String, interval: Interval },

    /// Chart settings failed validation.
    #[error("Invalid chart settings: {0}")]
    InvalidSettings(String),

    /// Malformed JSON from the provider or in a settings document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    /// Whether the presentation layer should show this error to the user.
    ///
    /// A superseded load is expected whenever the user switches period or
    /// symbol quickly; it is silently dropped.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Superseded { .. })
    }

    /// Message for the error banner above the chart.
    pub fn user_message(&self) -> String {
        match self {
            Self::HistoryUnavailable { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            Self::HistoryUnavailable { .. } => "An unknown error occurred.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_is_not_user_visible() {
        let error = ChartError::Superseded {
            symbol: "AAPL".to_string(),
            interval: Interval::Daily,
        };
        assert!(!error.is_user_visible());
    }

    #[test]
    fn test_fetch_errors_are_user_visible() {
        let error = ChartError::HistoryUnavailable {
            symbol: "005930".to_string(),
            message: "upstream timeout".to_string(),
        };
        assert!(error.is_user_visible());
        assert_eq!(error.user_message(), "upstream timeout");
    }

    #[test]
    fn test_blank_fetch_message_falls_back() {
        let error = ChartError::HistoryUnavailable {
            symbol: "AAPL".to_string(),
            message: "  ".to_string(),
        };
        assert_eq!(error.user_message(), "An unknown error occurred.");
    }

    #[test]
    fn test_error_display() {
        let error = ChartError::UnsupportedPeriod(14);
        assert_eq!(format!("{}", error), "Unsupported period: 14 days");

        let error = ChartError::ChartTypeUnavailable {
            symbol: "AAPL".to_string(),
            chart_type: ChartType::Candle,
            period_days: 1,
        };
        assert_eq!(
            format!("{}", error),
            "candle chart is unavailable for AAPL (1d)"
        );

        let error = ChartError::Superseded {
            symbol: "MSFT".to_string(),
            interval: Interval::Weekly,
        };
        assert_eq!(
            format!("{}", error),
            "Load for MSFT (weekly) superseded by a newer request"
        );
    }
}
