//! Renderer-agnostic drawing primitives.

use serde::{Deserialize, Serialize};

use super::domain::AxisDomain;

/// Pixel rectangle handed out by the host rendering surface.
///
/// For a candle, `y` is the pixel position of the bar's close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Linear price-to-pixel mapping for a pane, derived from its domain.
///
/// Pixel `y` grows downwards: `top` maps the domain max, `top + height`
/// maps the domain min.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceScale {
    pub min: f64,
    pub max: f64,
    pub top: f64,
    pub height: f64,
}

impl PriceScale {
    /// `None` if the domain has an auto bound or is empty.
    pub fn from_domain(domain: &AxisDomain, top: f64, height: f64) -> Option<Self> {
        let (min, max) = domain.bounds()?;
        if min.is_nan() || max.is_nan() || max <= min || !height.is_finite() || height <= 0.0 {
            return None;
        }
        Some(Self {
            min,
            max,
            top,
            height,
        })
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.height / (self.max - self.min)
    }

    pub fn y_for(&self, price: f64) -> f64 {
        self.top + (self.max - price) * self.pixels_per_unit()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleDirection {
    Rising,
    Falling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleFill {
    Solid,
    Hollow,
}

/// Vertical line from `y1` to `y2` at `x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
}

impl Segment {
    pub fn length(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CandleBody {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Flat tick for a doji: open and close share a level.
    Doji { x1: f64, x2: f64, y: f64 },
}

impl CandleBody {
    pub fn is_doji(&self) -> bool {
        matches!(self, CandleBody::Doji { .. })
    }
}

/// Drawable description of one candlestick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleShape {
    pub upper_wick: Option<Segment>,
    pub lower_wick: Option<Segment>,
    pub body: CandleBody,
    pub direction: CandleDirection,
    pub fill: CandleFill,
}

/// Drawable description of one volume bar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VolumeBar {
    pub rect: PixelBox,
    pub direction: CandleDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_scale_maps_ends() {
        let scale = PriceScale::from_domain(&AxisDomain::fixed(100.0, 200.0), 10.0, 400.0).unwrap();
        assert_eq!(scale.y_for(200.0), 10.0);
        assert_eq!(scale.y_for(100.0), 410.0);
        assert_eq!(scale.y_for(150.0), 210.0);
    }

    #[test]
    fn test_price_scale_rejects_auto_or_flat() {
        assert!(PriceScale::from_domain(&AxisDomain::auto(), 0.0, 100.0).is_none());
        assert!(PriceScale::from_domain(&AxisDomain::fixed(5.0, 5.0), 0.0, 100.0).is_none());
        assert!(PriceScale::from_domain(&AxisDomain::fixed(1.0, 5.0), 0.0, 0.0).is_none());
    }
}
