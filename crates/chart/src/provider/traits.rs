//! History provider trait definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ChartError;
use crate::models::{ChartWindowConfig, Interval, RawPricePoint, SummaryMetadata};

/// Key of one history fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub symbol: String,
    pub period_days: u32,
    pub interval: Interval,
}

impl From<&ChartWindowConfig> for HistoryRequest {
    fn from(config: &ChartWindowConfig) -> Self {
        Self {
            symbol: config.symbol().to_string(),
            period_days: config.period_days(),
            interval: config.interval(),
        }
    }
}

/// Ordered raw records plus the optional full-resolution summary.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<RawPricePoint>,
    pub summary: Option<SummaryMetadata>,
}

/// `{"data": [...], "chart_info": {...}}`. Older servers embed
/// `chart_info` in the first record instead.
#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    data: Vec<WireRecord>,
    #[serde(default)]
    chart_info: Option<SummaryMetadata>,
}

#[derive(Deserialize)]
struct WireRecord {
    #[serde(flatten)]
    point: RawPricePoint,
    #[serde(default)]
    chart_info: Option<SummaryMetadata>,
}

impl HistoryResponse {
    pub fn new(data: Vec<RawPricePoint>, summary: Option<SummaryMetadata>) -> Self {
        Self { data, summary }
    }

    /// Parse the history endpoint's JSON body.
    pub fn from_json(body: &str) -> Result<Self, ChartError> {
        let wire: WireResponse = serde_json::from_str(body)?;

        let embedded = wire.data.first().and_then(|r| r.chart_info.clone());
        let summary = wire.chart_info.or(embedded);
        let data = wire.data.into_iter().map(|r| r.point).collect();

        Ok(Self { data, summary })
    }
}

/// Source of raw price history (the backend's history endpoint).
///
/// Implementations own transport and any retry policy; the pipeline never
/// retries.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch the series for `(symbol, period_days, interval)`, ordered by
    /// date ascending.
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<HistoryResponse, ChartError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_top_level_chart_info() {
        let body = r#"{
            "data": [
                {"date": "2024-05-02", "open": 100, "high": 110, "low": 95, "close": 105, "volume": 1000},
                {"date": "2024-05-03", "open": 105, "high": 108, "low": 100, "close": 102, "volume": 800}
            ],
            "chart_info": {"min_price": 95, "max_price": 110, "price_range": 15}
        }"#;

        let response = HistoryResponse::from_json(body).unwrap();

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[1].date, NaiveDate::from_ymd_opt(2024, 5, 3));
        assert_eq!(response.summary, Some(SummaryMetadata::new(95.0, 110.0)));
    }

    #[test]
    fn test_parse_embedded_chart_info() {
        let body = r#"{"data": [
            {"date": "2024-05-02", "close": 105, "chart_info": {"min_price": 90, "max_price": 120}}
        ]}"#;

        let response = HistoryResponse::from_json(body).unwrap();

        let summary = response.summary.unwrap();
        assert_eq!(summary.min_price, Some(90.0));
        assert_eq!(summary.max_price, Some(120.0));
        assert_eq!(summary.price_range, None);
    }

    #[test]
    fn test_parse_without_summary() {
        let response = HistoryResponse::from_json(r#"{"data": []}"#).unwrap();
        assert!(response.data.is_empty());
        assert!(response.summary.is_none());
    }

    #[test]
    fn test_malformed_body_is_json_error() {
        assert!(matches!(
            HistoryResponse::from_json("not json"),
            Err(ChartError::Json(_))
        ));
    }

    #[test]
    fn test_request_from_config() {
        let config = ChartWindowConfig::from_parts("005930", 90, "weekly").unwrap();
        let request = HistoryRequest::from(&config);
        assert_eq!(request.symbol, "005930");
        assert_eq!(request.period_days, 90);
        assert_eq!(request.interval, Interval::Weekly);
    }
}
