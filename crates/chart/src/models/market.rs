use serde::{Deserialize, Serialize};
use std::fmt;

/// Market a symbol trades on, which also fixes its display currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    /// Korea Exchange listings, priced in won.
    Krw,
    /// Everything else, priced in US dollars.
    #[default]
    Usd,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Krw => "KRW",
            Market::Usd => "USD",
        }
    }

    pub fn is_korean(&self) -> bool {
        matches!(self, Market::Krw)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_serde_roundtrip_names() {
        assert_eq!(serde_json::to_string(&Market::Krw).unwrap(), "\"KRW\"");
        assert_eq!(
            serde_json::from_str::<Market>("\"USD\"").unwrap(),
            Market::Usd
        );
    }
}
