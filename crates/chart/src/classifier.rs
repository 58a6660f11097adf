//! Symbol to market classification.

use crate::models::Market;

/// Suffixes used for Korea Exchange listings (KOSPI, KOSDAQ).
pub const KOREAN_EXCHANGE_SUFFIXES: &[&str] = &[".KS", ".KQ"];

/// Derives the market of a ticker symbol.
pub struct MarketClassifier;

impl MarketClassifier {
    /// Six-digit KRX codes and `.KS`/`.KQ` symbols are KRW; everything
    /// else, including malformed input, is USD.
    pub fn classify(symbol: &str) -> Market {
        let symbol = symbol.trim();

        if is_krx_code(symbol) || has_korean_suffix(symbol) {
            Market::Krw
        } else {
            Market::Usd
        }
    }
}

fn is_krx_code(symbol: &str) -> bool {
    symbol.len() == 6 && symbol.bytes().all(|b| b.is_ascii_digit())
}

fn has_korean_suffix(symbol: &str) -> bool {
    let upper = symbol.to_ascii_uppercase();
    KOREAN_EXCHANGE_SUFFIXES
        .iter()
        .any(|suffix| upper.len() > suffix.len() && upper.ends_with(suffix))
}
