use chrono::{DateTime, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// One upstream OHLCV record exactly as the history provider sent it.
///
/// Every field is optional: a record with a missing or non-numeric value
/// still deserializes, and the sanitizer decides whether it survives.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RawPricePoint {
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: Option<f64>,
}

impl RawPricePoint {
    /// Create a fully populated raw record.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date: Some(date),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }
}

/// Open/high/low/close of a single bar, detached from its date and volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlc {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// All four prices are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }

    /// `high` bounds every other price from above and `low` from below.
    pub fn is_consistent(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// A validated OHLCV observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn ohlc(&self) -> Ohlc {
        Ohlc::new(self.open, self.high, self.low, self.close)
    }

    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }
}

/// Moving-average value for one window size at one point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovingAverage {
    pub value: f64,
    /// Fewer than `N` samples were available, so this is the mean of
    /// every close since the start of the series.
    pub partial: bool,
}

/// A price point decorated for rendering.
///
/// Serializes as one flat record: the OHLCV fields, `displayLabel`, one
/// `ma{N}` and `ma{N}Partial` pair per computed window, `isHighest` and
/// `isLowest`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedPoint {
    pub point: PricePoint,
    pub display_label: String,
    /// Keyed by window size.
    pub moving_averages: BTreeMap<usize, MovingAverage>,
    pub is_highest: bool,
    pub is_lowest: bool,
}

impl AnnotatedPoint {
    pub fn new(point: PricePoint) -> Self {
        let display_label = point.date.format("%Y-%m-%d").to_string();
        Self {
            point,
            display_label,
            moving_averages: BTreeMap::new(),
            is_highest: false,
            is_lowest: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.point.date
    }

    pub fn close(&self) -> f64 {
        self.point.close
    }

    pub fn ohlc(&self) -> Ohlc {
        self.point.ohlc()
    }

    /// The `ma{window}` value, if that window was computed.
    pub fn ma(&self, window: usize) -> Option<f64> {
        self.moving_averages.get(&window).map(|ma| ma.value)
    }

    pub fn with_label(mut self, display_label: impl Into<String>) -> Self {
        self.display_label = display_label.into();
        self
    }
}

impl Serialize for AnnotatedPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(9 + 2 * self.moving_averages.len()))?;
        map.serialize_entry("date", &self.point.date)?;
        map.serialize_entry("open", &self.point.open)?;
        map.serialize_entry("high", &self.point.high)?;
        map.serialize_entry("low", &self.point.low)?;
        map.serialize_entry("close", &self.point.close)?;
        map.serialize_entry("volume", &self.point.volume)?;
        map.serialize_entry("displayLabel", &self.display_label)?;
        for (window, ma) in &self.moving_averages {
            map.serialize_entry(&format!("ma{}", window), &ma.value)?;
            map.serialize_entry(&format!("ma{}Partial", window), &ma.partial)?;
        }
        map.serialize_entry("isHighest", &self.is_highest)?;
        map.serialize_entry("isLowest", &self.is_lowest)?;
        map.end()
    }
}

/// Deserializers that turn malformed upstream values into `None`
/// instead of failing the whole payload.
mod lenient {
    use super::*;
    use serde_json::Value;

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => parse_date(s.trim()),
            _ => None,
        })
    }

    /// Accepts `YYYY-MM-DD`, RFC 3339 and `YYYY-MM-DDTHH:MM:SS` without offset.
    fn parse_date(s: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
        s.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_point_tolerates_bad_values() {
        let json = r#"{"date":"2024-03-04","open":"101.5","high":null,"low":"n/a","close":100,"volume":1200}"#;
        let raw: RawPricePoint = serde_json::from_str(json).unwrap();

        assert_eq!(raw.date, NaiveDate::from_ymd_opt(2024, 3, 4));
        assert_eq!(raw.open, Some(101.5));
        assert_eq!(raw.high, None);
        assert_eq!(raw.low, None);
        assert_eq!(raw.close, Some(100.0));
        assert_eq!(raw.volume, Some(1200.0));
    }

    #[test]
    fn test_raw_point_missing_fields_and_timestamps() {
        let raw: RawPricePoint =
            serde_json::from_str(r#"{"date":"2024-03-04T09:00:00+09:00"}"#).unwrap();
        assert_eq!(raw.date, NaiveDate::from_ymd_opt(2024, 3, 4));
        assert!(raw.close.is_none());
        assert!(raw.volume.is_none());

        let raw: RawPricePoint = serde_json::from_str(r#"{"date":"2024-03-04 00:00:00"}"#).unwrap();
        assert_eq!(raw.date, NaiveDate::from_ymd_opt(2024, 3, 4));

        let raw: RawPricePoint = serde_json::from_str(r#"{"date":"yesterday"}"#).unwrap();
        assert!(raw.date.is_none());
    }

    #[test]
    fn test_ohlc_consistency() {
        assert!(Ohlc::new(100.0, 110.0, 95.0, 105.0).is_consistent());
        assert!(!Ohlc::new(100.0, 90.0, 95.0, 100.0).is_consistent());
        assert!(!Ohlc::new(120.0, 110.0, 95.0, 105.0).is_consistent());
        assert!(!Ohlc::new(100.0, 110.0, 95.0, f64::NAN).is_finite());
    }

    #[test]
    fn test_annotated_point_serializes_flat() {
        let point = PricePoint::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            100.0,
            110.0,
            95.0,
            105.0,
            1000,
        );
        let annotated = AnnotatedPoint::new(point).with_label("1월 2일");
        let json = serde_json::to_value(&annotated).unwrap();

        assert_eq!(json["close"], 105.0);
        assert_eq!(json["displayLabel"], "1월 2일");
        assert_eq!(json["isHighest"], false);
        assert_eq!(json["date"], "2024-01-02");
        assert_eq!(annotated.ma(5), None);
        assert!(json.get("ma5").is_none());
    }

    #[test]
    fn test_moving_averages_serialize_as_ma_fields() {
        let point = PricePoint::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            100.0,
            110.0,
            95.0,
            105.0,
            1000,
        );
        let mut annotated = AnnotatedPoint::new(point);
        annotated.moving_averages.insert(
            5,
            MovingAverage {
                value: 105.0,
                partial: true,
            },
        );
        annotated.moving_averages.insert(
            20,
            MovingAverage {
                value: 101.25,
                partial: false,
            },
        );

        let json = serde_json::to_value(&annotated).unwrap();

        assert_eq!(json["ma5"], 105.0);
        assert_eq!(json["ma5Partial"], true);
        assert_eq!(json["ma20"], 101.25);
        assert_eq!(json["ma20Partial"], false);
        assert!(json.get("movingAverages").is_none());
        assert_eq!(json["volume"], 1000);
    }
}
