use crate::error::ConfigError;
use crate::geometry::point_at_rotation;
use crate::range::GaugeRange;

/// Validated tick positions, each a normalized offset in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticks {
    positions: Vec<f64>,
}

impl Ticks {
    /// Accepts the whole sequence or none of it.
    pub fn new(positions: Vec<f64>) -> Result<Self, ConfigError> {
        if let Some((index, &value)) = positions
            .iter()
            .enumerate()
            .find(|(_, tick)| !(0.0..=1.0).contains(*tick))
        {
            return Err(ConfigError::TickOutOfRange { index, value });
        }
        Ok(Self { positions })
    }

    /// `count` evenly spaced ticks. See [`generate_ticks`].
    pub fn evenly_spaced(count: usize) -> Self {
        Self {
            positions: generate_ticks(count),
        }
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// `count` ticks spread evenly from `0` to `1`, both ends included.
///
/// A single tick has no "evenly" to speak of and sits in the middle of the arc.
pub fn generate_ticks(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.5],
        _ => (0..count)
            .map(|i| 1.0 / (count - 1) as f64 * i as f64)
            .collect(),
    }
}

/// Where and how to draw one tick label.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLayout<L> {
    /// Position of the tick in the sequence, stable across frames.
    pub index: usize,
    /// Screen degree of the tick on the dial.
    pub angle: f64,
    /// Rotation of the label's frame, `angle + 90`, where `0` points up.
    pub rotation: f64,
    /// Extra rotation applied to the label inside its frame. Either `0` or
    /// `-rotation`, which keeps the label upright.
    pub label_rotation: f64,
    /// Value the tick stands for, clamped to the range.
    pub value: f64,
    pub label: L,
}

impl<L> TickLayout<L> {
    /// Label anchor `radius` away from `(cx, cy)`.
    pub fn anchor(&self, cx: f64, cy: f64, radius: f64) -> (f64, f64) {
        point_at_rotation(cx, cy, radius, self.rotation)
    }

    /// Rotation of the label on screen, `0` meaning upright.
    pub fn screen_rotation(&self) -> f64 {
        self.rotation + self.label_rotation
    }
}

/// Lay out every tick of `ticks` on `range`.
///
/// `label` receives the tick index and its clamped value.
pub fn layout_ticks<L, F>(
    ticks: &Ticks,
    range: &GaugeRange,
    rotate_with_arc: bool,
    mut label: F,
) -> Vec<TickLayout<L>>
where
    F: FnMut(usize, f64) -> L,
{
    let start = range.start_degree() as f64;
    let sweep = range.sweep();
    ticks
        .positions()
        .iter()
        .enumerate()
        .map(|(index, &tick)| {
            let angle = start + sweep * tick;
            let rotation = angle + 90.0;
            let value = range.value_at_percent(tick);
            TickLayout {
                index,
                angle,
                rotation,
                label_rotation: if rotate_with_arc { 0.0 } else { -rotation },
                value,
                label: label(index, value),
            }
        })
        .collect()
}
