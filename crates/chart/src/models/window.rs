//! Parameters governing one chart load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::classifier::MarketClassifier;
use crate::errors::ChartError;

use super::market::Market;

/// Moving-average windows offered by the chart.
pub const DEFAULT_MOVING_AVERAGE_WINDOWS: [usize; 4] = [5, 20, 60, 120];

/// Look-back period of a chart, in calendar days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Period {
    OneDay,
    OneWeek,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::OneDay,
        Period::OneWeek,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
    ];

    pub fn days(&self) -> u32 {
        match self {
            Period::OneDay => 1,
            Period::OneWeek => 7,
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
        }
    }

    /// Button label used by the period selector.
    pub fn label(&self) -> &'static str {
        match self {
            Period::OneDay => "1일",
            Period::OneWeek => "1주",
            Period::OneMonth => "1개월",
            Period::ThreeMonths => "3개월",
            Period::SixMonths => "6개월",
            Period::OneYear => "1년",
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(self, Period::OneDay)
    }
}

impl TryFrom<u32> for Period {
    type Error = ChartError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Period::ALL
            .into_iter()
            .find(|p| p.days() == days)
            .ok_or(ChartError::UnsupportedPeriod(days))
    }
}

impl From<Period> for u32 {
    fn from(period: Period) -> Self {
        period.days()
    }
}

/// Bar granularity of the loaded series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Interval::Daily),
            "weekly" => Ok(Interval::Weekly),
            "monthly" => Ok(Interval::Monthly),
            other => Err(ChartError::UnsupportedInterval(other.to_string())),
        }
    }
}

/// How the price pane is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Candle,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartType::Line => write!(f, "line"),
            ChartType::Candle => write!(f, "candle"),
        }
    }
}

/// Everything that identifies one load/recompute cycle.
///
/// Fields are private so the interval and chart-type invariants hold for
/// every value: a 1-day window is always daily, and a 1-day USD window is
/// always a line chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartWindowConfig {
    symbol: String,
    period: Period,
    interval: Interval,
    chart_type: ChartType,
    visible_moving_averages: BTreeSet<usize>,
}

impl ChartWindowConfig {
    /// Line chart, no visible overlays. The interval is forced to daily
    /// for a 1-day period.
    pub fn new(symbol: impl Into<String>, period: Period, interval: Interval) -> Self {
        let interval = if period.is_intraday() {
            Interval::Daily
        } else {
            interval
        };
        Self {
            symbol: symbol.into().trim().to_string(),
            period,
            interval,
            chart_type: ChartType::Line,
            visible_moving_averages: BTreeSet::new(),
        }
    }

    /// Build from the raw `(period_days, interval)` pair used on the wire.
    pub fn from_parts(
        symbol: impl Into<String>,
        period_days: u32,
        interval: &str,
    ) -> Result<Self, ChartError> {
        let period = Period::try_from(period_days)?;
        let interval = interval.parse::<Interval>()?;
        Ok(Self::new(symbol, period, interval))
    }

    pub fn with_chart_type(mut self, chart_type: ChartType) -> Result<Self, ChartError> {
        if !self.available_chart_types().contains(&chart_type) {
            return Err(ChartError::ChartTypeUnavailable {
                symbol: self.symbol,
                chart_type,
                period_days: self.period.days(),
            });
        }
        self.chart_type = chart_type;
        Ok(self)
    }

    pub fn with_visible_moving_averages(mut self, windows: impl IntoIterator<Item = usize>) -> Self {
        self.visible_moving_averages = windows.into_iter().filter(|w| *w > 0).collect();
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn period_days(&self) -> u32 {
        self.period.days()
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn visible_moving_averages(&self) -> &BTreeSet<usize> {
        &self.visible_moving_averages
    }

    pub fn market(&self) -> Market {
        MarketClassifier::classify(&self.symbol)
    }

    /// The interval selector is disabled for a 1-day window.
    pub fn interval_selectable(&self) -> bool {
        !self.period.is_intraday()
    }

    /// Chart types the selector offers for this window.
    pub fn available_chart_types(&self) -> Vec<ChartType> {
        if self.period.is_intraday() && !self.market().is_korean() {
            vec![ChartType::Line]
        } else {
            vec![ChartType::Line, ChartType::Candle]
        }
    }
}
