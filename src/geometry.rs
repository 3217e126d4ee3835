//! Arc geometry shared by every stroked part of the dial.
//!
//! A stroke with round caps paints half a cap past each end of its path. For
//! an arc that bulge is `stroke_width / 2` long, which is
//! `stroke_width * 0.5 * 360 / (diameter * PI)` degrees of the dial circle.
//! Insetting the arc by that angle at both ends makes the *visible* arc start
//! and stop exactly where the range says it should.

use serde::Deserialize;
use std::f64::consts::PI;

use crate::range::GaugeRange;

/// How the ends of a stroked line or arc are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeCap {
    /// Flat end exactly at the path end.
    #[default]
    Butt,
    /// Half-disc past the path end.
    Round,
    /// Half-square past the path end.
    Square,
}

/// Angle in degrees taken up by one rounded cap of a `stroke_width` wide
/// stroke on a circle of `diameter`.
pub fn round_angle_correction(stroke_width: f64, diameter: f64) -> f64 {
    stroke_width * 0.5 * 360.0 / (diameter * PI)
}

/// Correction to apply for a given cap. Only round caps are corrected.
pub fn cap_correction(cap: StrokeCap, stroke_width: f64, diameter: f64) -> f64 {
    match cap {
        StrokeCap::Round => round_angle_correction(stroke_width, diameter),
        StrokeCap::Butt | StrokeCap::Square => 0.0,
    }
}

/// Radial inset for a straight mark so a round cap doesn't poke past the dial edge.
pub fn cap_inset(cap: StrokeCap, stroke_width: f64) -> f64 {
    match cap {
        StrokeCap::Round => stroke_width * 0.5,
        StrokeCap::Butt | StrokeCap::Square => 0.0,
    }
}

/// An arc to stroke, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSweep {
    pub start: f64,
    pub sweep: f64,
}

impl ArcSweep {
    pub fn new(start: f64, sweep: f64) -> Self {
        Self { start, sweep }
    }

    /// Inset the arc by `correction` degrees on both ends.
    pub fn corrected(start: f64, sweep: f64, correction: f64) -> Self {
        Self {
            start: start + correction,
            sweep: sweep - correction * 2.0,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }
}

/// Full-range arc of `range`, inset for `cap`.
pub fn track_arc(
    range: &GaugeRange,
    cap: StrokeCap,
    stroke_width: f64,
    diameter: f64,
) -> ArcSweep {
    let correction = cap_correction(cap, stroke_width, diameter);
    ArcSweep::corrected(range.start_degree() as f64, range.sweep(), correction)
}

/// Arc from the start of `range` up to `value`, inside the same inset as
/// [`track_arc`]. The sweep is proportional to the unclamped percent, so a
/// caller that wants the bar to stop at the ends clamps `value` first.
pub fn progress_arc(
    range: &GaugeRange,
    value: f64,
    cap: StrokeCap,
    stroke_width: f64,
    diameter: f64,
) -> ArcSweep {
    let correction = cap_correction(cap, stroke_width, diameter);
    let sweep = (range.sweep() - correction * 2.0) * range.percent_at_value(value);
    ArcSweep::new(range.start_degree() as f64 + correction, sweep)
}

/// Rotation (up-is-zero frame) of each of `count` evenly spaced marks strictly
/// inside the arc. Neither arc end gets a mark.
pub fn mark_rotations(range: &GaugeRange, count: usize) -> Vec<f64> {
    let every = range.sweep() / (count as f64 + 1.0);
    (1..=count)
        .map(|i| 90.0 + range.start_degree() as f64 + every * i as f64)
        .collect()
}

/// Point at `radius` from `(cx, cy)` in screen direction `degrees`.
pub fn point_at_degree(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (cx + radians.cos() * radius, cy + radians.sin() * radius)
}

/// Point at `radius` from `(cx, cy)` for a rotation in the up-is-zero frame.
pub fn point_at_rotation(cx: f64, cy: f64, radius: f64, rotation: f64) -> (f64, f64) {
    point_at_degree(cx, cy, radius, rotation - 90.0)
}
