//! Candlestick geometry.
//!
//! The host renderer only guarantees the pixel position of the value it was
//! asked to plot, the close. Every other OHLC coordinate is reconstructed
//! relative to that anchor:
//!
//! ```text
//! y(price) = close_y - (price - close) * height / (high - low)
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{
    CandleBody, CandleDirection, CandleFill, CandleShape, Ohlc, PixelBox, PricePoint, PriceScale,
    Segment, VolumeBar,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleSettings {
    /// Smallest body height drawn, in pixels.
    pub min_body_height: f64,
    /// Body-to-range ratio under which the candle is drawn as a doji tick.
    pub doji_threshold: f64,
    /// Horizontal gap between neighbouring bodies, in pixels.
    pub body_inset: f64,
    /// Direction drawn with a hollow body; the other one is filled.
    pub hollow: CandleDirection,
}

impl Default for CandleSettings {
    fn default() -> Self {
        Self {
            min_body_height: 1.0,
            doji_threshold: 0.005,
            body_inset: 4.0,
            hollow: CandleDirection::Falling,
        }
    }
}

/// Maps OHLC records onto drawable candle shapes.
#[derive(Clone, Debug, Default)]
pub struct CandlestickGeometryMapper {
    settings: CandleSettings,
}

impl CandlestickGeometryMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CandleSettings) -> Self {
        Self { settings }
    }

    /// Shape for one candle whose close sits at `pixel_box.y`.
    ///
    /// Returns `None` (draw nothing) for non-finite input, a record that
    /// violates the OHLC invariant, or a negative pixel height.
    pub fn map_candle(&self, ohlc: &Ohlc, pixel_box: &PixelBox) -> Option<CandleShape> {
        if !ohlc.is_finite() || !pixel_box.is_finite() || !ohlc.is_consistent() {
            return None;
        }
        if pixel_box.height < 0.0 {
            return None;
        }

        let direction = if ohlc.is_rising() {
            CandleDirection::Rising
        } else {
            CandleDirection::Falling
        };
        let fill = if direction == self.settings.hollow {
            CandleFill::Hollow
        } else {
            CandleFill::Solid
        };

        let center_x = pixel_box.center_x();
        let body_width = (pixel_box.width - self.settings.body_inset).max(1.0);
        let half = body_width / 2.0;
        let close_y = pixel_box.y;

        let range = ohlc.range();
        if range == 0.0 {
            // All four prices equal.
            return Some(CandleShape {
                upper_wick: None,
                lower_wick: None,
                body: CandleBody::Doji {
                    x1: center_x - half,
                    x2: center_x + half,
                    y: close_y,
                },
                direction,
                fill,
            });
        }

        let pixels_per_unit = pixel_box.height / range;
        let y_of = |price: f64| close_y - (price - ohlc.close) * pixels_per_unit;

        let high_y = y_of(ohlc.high);
        let low_y = y_of(ohlc.low);
        let open_y = y_of(ohlc.open);

        let is_doji = (ohlc.open - ohlc.close).abs() / range < self.settings.doji_threshold;

        let (body, body_top, body_bottom) = if is_doji {
            let level = (open_y + close_y) / 2.0;
            let body = CandleBody::Doji {
                x1: center_x - half,
                x2: center_x + half,
                y: level,
            };
            (body, level, level)
        } else {
            let top = open_y.min(close_y);
            let bottom = open_y.max(close_y);
            let body = CandleBody::Rect {
                x: center_x - half,
                y: top,
                width: body_width,
                height: (bottom - top).max(self.settings.min_body_height),
            };
            (body, top, bottom)
        };

        Some(CandleShape {
            upper_wick: wick(center_x, high_y, body_top),
            lower_wick: wick(center_x, body_bottom, low_y),
            body,
            direction,
            fill,
        })
    }

    /// Shape for one candle positioned by an explicit price scale.
    ///
    /// Anchor and pixels-per-unit both come from `scale`, so the shape
    /// cannot drift from the axis it is drawn against.
    pub fn map_candle_on_scale(
        &self,
        ohlc: &Ohlc,
        x: f64,
        width: f64,
        scale: &PriceScale,
    ) -> Option<CandleShape> {
        let pixel_box = PixelBox::new(
            x,
            scale.y_for(ohlc.close),
            width,
            ohlc.range() * scale.pixels_per_unit(),
        );
        self.map_candle(ohlc, &pixel_box)
    }

    /// Volume bar filling `pixel_box`, tagged with the bar's direction.
    pub fn map_volume_bar(&self, point: &PricePoint, pixel_box: &PixelBox) -> Option<VolumeBar> {
        if !pixel_box.is_finite() {
            return None;
        }
        let direction = if point.is_rising() {
            CandleDirection::Rising
        } else {
            CandleDirection::Falling
        };
        Some(VolumeBar {
            rect: *pixel_box,
            direction,
        })
    }
}

fn wick(x: f64, from: f64, to: f64) -> Option<Segment> {
    (to > from).then_some(Segment { x, y1: from, y2: to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AxisDomain;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rising_candle_geometry() {
        let mapper = CandlestickGeometryMapper::new();
        let ohlc = Ohlc::new(100.0, 110.0, 90.0, 105.0);
        // 20 price units over 200 px: 10 px per unit, close at y=300
        let pixel_box = PixelBox::new(50.0, 300.0, 10.0, 200.0);

        let shape = mapper.map_candle(&ohlc, &pixel_box).unwrap();

        assert_eq!(shape.direction, CandleDirection::Rising);
        assert_eq!(shape.fill, CandleFill::Solid);

        let upper = shape.upper_wick.unwrap();
        assert!(approx(upper.x, 55.0));
        assert!(approx(upper.y1, 250.0));
        assert!(approx(upper.y2, 300.0));

        let lower = shape.lower_wick.unwrap();
        assert!(approx(lower.y1, 350.0));
        assert!(approx(lower.y2, 450.0));

        match shape.body {
            CandleBody::Rect {
                x,
                y,
                width,
                height,
            } => {
                assert!(approx(x, 52.0));
                assert!(approx(width, 6.0));
                assert!(approx(y, 300.0));
                assert!(approx(height, 50.0));
            }
            other => panic!("expected a body rectangle, got {:?}", other),
        }
    }

    #[test]
    fn test_falling_candle_is_hollow() {
        let mapper = CandlestickGeometryMapper::new();
        let ohlc = Ohlc::new(108.0, 110.0, 100.0, 102.0);

        let shape = mapper
            .map_candle(&ohlc, &PixelBox::new(0.0, 100.0, 8.0, 100.0))
            .unwrap();

        assert_eq!(shape.direction, CandleDirection::Falling);
        assert_eq!(shape.fill, CandleFill::Hollow);
        if let CandleBody::Rect { y, height, .. } = shape.body {
            assert!(approx(y, 40.0));
            assert!(approx(height, 60.0));
        } else {
            panic!("expected a body rectangle");
        }
    }

    #[test]
    fn test_hollow_direction_configurable() {
        let mapper = CandlestickGeometryMapper::with_settings(CandleSettings {
            hollow: CandleDirection::Rising,
            ..Default::default()
        });
        let shape = mapper
            .map_candle(&Ohlc::new(1.0, 3.0, 1.0, 2.0), &PixelBox::new(0.0, 0.0, 5.0, 10.0))
            .unwrap();
        assert_eq!(shape.fill, CandleFill::Hollow);
    }

    #[test]
    fn test_zero_range_is_flat_line() {
        let mapper = CandlestickGeometryMapper::new();
        let ohlc = Ohlc::new(100.0, 100.0, 100.0, 100.0);

        let shape = mapper
            .map_candle(&ohlc, &PixelBox::new(10.0, 75.0, 12.0, 0.0))
            .unwrap();

        assert_eq!(shape.body, CandleBody::Doji { x1: 12.0, x2: 20.0, y: 75.0 });
        assert!(shape.upper_wick.is_none());
        assert!(shape.lower_wick.is_none());
    }

    #[test]
    fn test_near_equal_open_close_is_doji() {
        let mapper = CandlestickGeometryMapper::new();
        let ohlc = Ohlc::new(100.0, 110.0, 90.0, 100.05);

        let shape = mapper
            .map_candle(&ohlc, &PixelBox::new(0.0, 200.0, 10.0, 200.0))
            .unwrap();

        assert!(shape.body.is_doji());
        assert!(shape.upper_wick.is_some());
        assert!(shape.lower_wick.is_some());
    }

    #[test]
    fn test_body_height_floor() {
        let mapper = CandlestickGeometryMapper::with_settings(CandleSettings {
            doji_threshold: 0.0,
            min_body_height: 1.5,
            ..Default::default()
        });
        let ohlc = Ohlc::new(100.0, 110.0, 90.0, 100.05);

        let shape = mapper
            .map_candle(&ohlc, &PixelBox::new(0.0, 200.0, 10.0, 20.0))
            .unwrap();

        match shape.body {
            CandleBody::Rect { height, .. } => assert!(approx(height, 1.5)),
            other => panic!("expected a body rectangle, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_records_draw_nothing() {
        let mapper = CandlestickGeometryMapper::new();
        let pixel_box = PixelBox::new(0.0, 0.0, 10.0, 100.0);

        assert!(mapper
            .map_candle(&Ohlc::new(f64::NAN, 10.0, 5.0, 7.0), &pixel_box)
            .is_none());
        assert!(mapper
            .map_candle(&Ohlc::new(7.0, 5.0, 10.0, 7.0), &pixel_box)
            .is_none());
        assert!(mapper
            .map_candle(&Ohlc::new(12.0, 10.0, 5.0, 7.0), &pixel_box)
            .is_none());
        assert!(mapper
            .map_candle(&Ohlc::new(7.0, 10.0, 5.0, 8.0), &PixelBox::new(0.0, 0.0, 10.0, -4.0))
            .is_none());
    }

    #[test]
    fn test_narrow_box_keeps_one_pixel_body() {
        let mapper = CandlestickGeometryMapper::new();
        let shape = mapper
            .map_candle(&Ohlc::new(1.0, 4.0, 1.0, 3.0), &PixelBox::new(0.0, 0.0, 2.0, 30.0))
            .unwrap();
        match shape.body {
            CandleBody::Rect { width, x, .. } => {
                assert!(approx(width, 1.0));
                assert!(approx(x, 0.5));
            }
            other => panic!("expected a body rectangle, got {:?}", other),
        }
    }

    #[test]
    fn test_scale_mapping_matches_axis() {
        let mapper = CandlestickGeometryMapper::new();
        let scale = PriceScale::from_domain(&AxisDomain::fixed(80.0, 120.0), 0.0, 400.0).unwrap();
        let ohlc = Ohlc::new(100.0, 110.0, 90.0, 105.0);

        let shape = mapper.map_candle_on_scale(&ohlc, 0.0, 10.0, &scale).unwrap();

        let upper = shape.upper_wick.unwrap();
        let lower = shape.lower_wick.unwrap();
        assert!(approx(upper.y1, scale.y_for(110.0)));
        assert!(approx(lower.y2, scale.y_for(90.0)));
        match shape.body {
            CandleBody::Rect { y, height, .. } => {
                assert!(approx(y, scale.y_for(105.0)));
                assert!(approx(y + height, scale.y_for(100.0)));
            }
            other => panic!("expected a body rectangle, got {:?}", other),
        }
    }

    #[test]
    fn test_volume_bar_direction() {
        use chrono::NaiveDate;

        let mapper = CandlestickGeometryMapper::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let falling = PricePoint::new(date, 105.0, 108.0, 100.0, 102.0, 800);
        let pixel_box = PixelBox::new(0.0, 10.0, 6.0, 40.0);

        let bar = mapper.map_volume_bar(&falling, &pixel_box).unwrap();

        assert_eq!(bar.direction, CandleDirection::Falling);
        assert_eq!(bar.rect, pixel_box);
    }
}
