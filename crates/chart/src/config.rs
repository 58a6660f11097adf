//! Chart settings.
//!
//! Every tunable constant of the pipeline lives here. All sections default
//! to the production values, so a settings document only needs to name what
//! it overrides.

use serde::{Deserialize, Serialize};

use crate::axis::AxisSettings;
use crate::candle::CandleSettings;
use crate::errors::ChartError;
use crate::models::DEFAULT_MOVING_AVERAGE_WINDOWS;
use crate::sanitizer::SanitizerConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub sanitizer: SanitizerConfig,
    /// Windows always computed, whether or not they are visible.
    pub moving_average_windows: Vec<usize>,
    pub axis: AxisSettings,
    pub candle: CandleSettings,
    /// Fetch daily bars and aggregate weekly/monthly locally instead of
    /// asking the provider for the coarser interval.
    pub resample_locally: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            sanitizer: SanitizerConfig::default(),
            moving_average_windows: DEFAULT_MOVING_AVERAGE_WINDOWS.to_vec(),
            axis: AxisSettings::default(),
            candle: CandleSettings::default(),
            resample_locally: false,
        }
    }
}

impl ChartSettings {
    /// Parse and validate a JSON settings document.
    pub fn from_json_str(json: &str) -> Result<Self, ChartError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        let padding = self.axis.price_padding_percent;
        if !padding.is_finite() || padding < 0.0 {
            return Err(ChartError::InvalidSettings(format!(
                "price_padding_percent must be a non-negative number, got {}",
                padding
            )));
        }

        let headroom = self.axis.volume_headroom;
        if !headroom.is_finite() || headroom < 1.0 {
            return Err(ChartError::InvalidSettings(format!(
                "volume_headroom must be at least 1, got {}",
                headroom
            )));
        }

        let threshold = self.candle.doji_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(ChartError::InvalidSettings(format!(
                "doji_threshold must be in [0, 1), got {}",
                threshold
            )));
        }

        for (name, value) in [
            ("min_body_height", self.candle.min_body_height),
            ("body_inset", self.candle.body_inset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidSettings(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.moving_average_windows.contains(&0) {
            return Err(ChartError::InvalidSettings(
                "moving_average_windows must not contain 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ChartSettings::default();
        assert_eq!(settings.moving_average_windows, vec![5, 20, 60, 120]);
        assert_eq!(settings.axis.price_padding_percent, 0.30);
        assert!(settings.sanitizer.reject_future_dates);
        assert!(!settings.resample_locally);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings = ChartSettings::from_json_str(
            r#"{"axis": {"price_padding_percent": 0.1}, "resample_locally": true}"#,
        )
        .unwrap();

        assert_eq!(settings.axis.price_padding_percent, 0.1);
        assert_eq!(settings.axis.volume_headroom, 1.2);
        assert_eq!(settings.candle, CandleSettings::default());
        assert!(settings.resample_locally);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let cases = [
            r#"{"axis": {"price_padding_percent": -0.5}}"#,
            r#"{"axis": {"volume_headroom": 0.9}}"#,
            r#"{"candle": {"doji_threshold": 1.0}}"#,
            r#"{"candle": {"min_body_height": -1}}"#,
            r#"{"moving_average_windows": [5, 0]}"#,
        ];

        for json in cases {
            assert!(
                matches!(
                    ChartSettings::from_json_str(json),
                    Err(ChartError::InvalidSettings(_))
                ),
                "expected rejection for {}",
                json
            );
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ChartSettings::from_json_str("{"),
            Err(ChartError::Json(_))
        ));
    }
}
