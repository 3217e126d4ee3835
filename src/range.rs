use crate::error::ConfigError;

/// The value range of a gauge and the arc it is drawn on.
///
/// Degrees follow the screen convention used by the renderer: `0` points to
/// the right (3 o'clock) and angles grow clockwise. The default arc
/// `135..405` starts at the bottom left, passes over the top and ends at the
/// bottom right.
///
/// A `GaugeRange` can only be obtained through [`GaugeRange::new`], so every
/// instance satisfies:
/// - `min_value < max_value`
/// - `start_degree >= 0` and `end_degree >= 0`
/// - `start_degree < end_degree`
/// - `end_degree - start_degree <= 360`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeRange {
    min_value: f64,
    max_value: f64,
    start_degree: i32,
    end_degree: i32,
}

impl GaugeRange {
    pub fn new(
        min_value: f64,
        max_value: f64,
        start_degree: i32,
        end_degree: i32,
    ) -> Result<Self, ConfigError> {
        // Written as a negation so NaN bounds are rejected too.
        if !(min_value < max_value) {
            return Err(ConfigError::InvalidRange {
                min: min_value,
                max: max_value,
            });
        }
        if start_degree < 0 {
            return Err(ConfigError::NegativeDegree {
                name: "start_degree",
                value: start_degree,
            });
        }
        if end_degree < 0 {
            return Err(ConfigError::NegativeDegree {
                name: "end_degree",
                value: end_degree,
            });
        }
        if start_degree >= end_degree {
            return Err(ConfigError::ReversedArc {
                start: start_degree,
                end: end_degree,
            });
        }
        if end_degree - start_degree > 360 {
            return Err(ConfigError::OversizedArc {
                sweep: end_degree - start_degree,
            });
        }

        Ok(Self {
            min_value,
            max_value,
            start_degree,
            end_degree,
        })
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn start_degree(&self) -> i32 {
        self.start_degree
    }

    pub fn end_degree(&self) -> i32 {
        self.end_degree
    }

    /// Total angular extent of the arc in degrees.
    pub fn sweep(&self) -> f64 {
        (self.end_degree - self.start_degree) as f64
    }

    /// Degree that `value` points at. Values outside the range extrapolate.
    pub fn degree_at_value(&self, value: f64) -> f64 {
        (value - self.min_value) * self.sweep() / (self.max_value - self.min_value)
            + self.start_degree as f64
    }

    /// Degree at a normalized position along the arc. Not clamped.
    pub fn degree_at_percent(&self, percent: f64) -> f64 {
        self.sweep() * percent + self.start_degree as f64
    }

    /// Normalized position of `value`. May be negative or exceed `1`.
    pub fn percent_at_value(&self, value: f64) -> f64 {
        (value - self.min_value) / (self.max_value - self.min_value)
    }

    /// Value at a normalized position, clamped to `[min_value, max_value]`.
    ///
    /// Unlike the other conversions this one clamps, so any tick or pointer
    /// position turns into a value the gauge can actually display.
    pub fn value_at_percent(&self, percent: f64) -> f64 {
        if percent > 1.0 {
            self.max_value
        } else if percent < 0.0 {
            self.min_value
        } else {
            percent * (self.max_value - self.min_value) + self.min_value
        }
    }
}

impl Default for GaugeRange {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 100.0,
            start_degree: 135,
            end_degree: 405,
        }
    }
}
