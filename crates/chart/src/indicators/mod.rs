//! Technical indicators computed over a sanitized series.

mod moving_average;

pub use moving_average::MovingAverageEngine;
