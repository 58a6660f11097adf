use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use log::debug;

use super::traits::{HistoryProvider, HistoryRequest, HistoryResponse};
use crate::errors::ChartError;

/// Serves canned responses keyed by request.
///
/// Unknown requests answer with an empty series.
#[derive(Debug, Default)]
pub struct InMemoryHistoryProvider {
    entries: RwLock<HashMap<HistoryRequest, Result<HistoryResponse, String>>>,
}

impl InMemoryHistoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, request: HistoryRequest, response: HistoryResponse) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(request, Ok(response));
        }
    }

    /// Make `request` fail with `message`.
    pub fn insert_failure(&self, request: HistoryRequest, message: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(request, Err(message.into()));
        }
    }
}

#[async_trait]
impl HistoryProvider for InMemoryHistoryProvider {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<HistoryResponse, ChartError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ChartError::HistoryUnavailable {
                symbol: request.symbol.clone(),
                message: "history cache poisoned".to_string(),
            })?;

        match entries.get(request) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(ChartError::HistoryUnavailable {
                symbol: request.symbol.clone(),
                message: message.clone(),
            }),
            None => {
                debug!(
                    "No canned history for {} ({}d, {})",
                    request.symbol, request.period_days, request.interval
                );
                Ok(HistoryResponse::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interval, RawPricePoint};
    use chrono::NaiveDate;

    fn request(symbol: &str) -> HistoryRequest {
        HistoryRequest {
            symbol: symbol.to_string(),
            period_days: 30,
            interval: Interval::Daily,
        }
    }

    #[tokio::test]
    async fn test_serves_canned_response() {
        let provider = InMemoryHistoryProvider::new();
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        provider.insert(
            request("AAPL"),
            HistoryResponse::new(vec![RawPricePoint::new(day, 1.0, 2.0, 0.5, 1.5, 10.0)], None),
        );

        let response = provider.fetch_history(&request("AAPL")).await.unwrap();
        assert_eq!(response.data.len(), 1);

        let missing = provider.fetch_history(&request("MSFT")).await.unwrap();
        assert!(missing.data.is_empty());
    }

    #[tokio::test]
    async fn test_failure_surfaces_as_history_unavailable() {
        let provider = InMemoryHistoryProvider::new();
        provider.insert_failure(request("AAPL"), "rate limited");

        let error = provider.fetch_history(&request("AAPL")).await.unwrap_err();
        assert_eq!(error.user_message(), "rate limited");
    }
}
