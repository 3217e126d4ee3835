// ============================================================================
// VALUE ANIMATION
// ============================================================================
//
// The displayed value of a gauge never jumps: every new target starts a timed
// transition from whatever is on screen right now. The animator is advanced
// explicitly, once per frame, with the wall-clock time since the last frame.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_DURATION_MS: i64 = 2000;

/// Allowed slack when deciding that the accumulated frame time reached the
/// duration, so frame deltas that sum to the duration in exact arithmetic
/// still settle under floating point.
const SETTLE_EPSILON_MS: f64 = 1e-9;

const BISECTION_STEPS: usize = 48;

/// Points sampled on an easing curve to check that it never decreases.
const MONOTONIC_SAMPLES: usize = 256;

/// Timing curve applied to the animation progress.
///
/// Every curve maps `0 → 0` and `1 → 1` and never decreases in between, so
/// the displayed value can't overshoot the target or turn back.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Quick start, long gentle stop. Bézier `(0.4, 0.0, 0.2, 1.0)`.
    #[default]
    FastOutSlowIn,
    /// Bézier `(0.0, 0.0, 0.2, 1.0)`.
    LinearOutSlowIn,
    /// Bézier `(0.4, 0.0, 1.0, 1.0)`.
    FastOutLinearIn,
    /// Symmetric ease in/out. Bézier `(0.42, 0.0, 0.58, 1.0)`.
    EaseInOut,
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Eased progress for a linear `fraction` in `[0, 1]`.
    pub fn transform(&self, fraction: f64) -> f64 {
        let fraction = fraction.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => fraction,
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowIn => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearIn => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, fraction),
            Easing::Custom(curve) => curve(fraction),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Easing::CubicBezier { x1, y1, x2, y2 } = *self {
            // Control points inside the unit square keep the curve a
            // non-decreasing function of time.
            for (name, v) in [("x1", x1), ("y1", y1), ("x2", x2), ("y2", y2)] {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::InvalidEasing(format!(
                        "control point {name} must be between [0, 1] (got {v})"
                    )));
                }
            }
        }
        let (at_start, at_end) = (self.transform(0.0), self.transform(1.0));
        if at_start != 0.0 || at_end != 1.0 {
            return Err(ConfigError::InvalidEasing(format!(
                "curve must map 0 to 0 and 1 to 1 (got {at_start} and {at_end})"
            )));
        }
        let mut previous = at_start;
        for i in 1..=MONOTONIC_SAMPLES {
            let fraction = i as f64 / MONOTONIC_SAMPLES as f64;
            let eased = self.transform(fraction);
            if eased.is_nan() || eased < previous {
                return Err(ConfigError::InvalidEasing(format!(
                    "curve must never decrease (got {eased} at {fraction} after {previous})"
                )));
            }
            previous = eased;
        }
        Ok(())
    }
}

fn bezier_component(t: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

/// CSS-style cubic Bézier timing function through `(0,0)`, `(x1,y1)`,
/// `(x2,y2)`, `(1,1)`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }
    // x(t) is monotonic for x1, x2 in [0, 1]; bisect for the t that hits fraction.
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..BISECTION_STEPS {
        let mid = (lo + hi) * 0.5;
        if bezier_component(mid, x1, x2) < fraction {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier_component((lo + hi) * 0.5, y1, y2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Settled,
    Animating,
}

/// Owns the value a gauge displays and moves it toward the latest target.
#[derive(Debug, Clone)]
pub struct ValueAnimator {
    start_value: f64,
    displayed_value: f64,
    target_value: f64,
    elapsed_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl ValueAnimator {
    /// A settled animator showing `initial_value`.
    pub fn new(initial_value: f64, duration_ms: i64, easing: Easing) -> Result<Self, ConfigError> {
        if duration_ms <= 0 {
            return Err(ConfigError::NonPositiveDuration(duration_ms));
        }
        easing.validate()?;

        Ok(Self {
            start_value: initial_value,
            displayed_value: initial_value,
            target_value: initial_value,
            elapsed_ms: duration_ms as f64,
            duration_ms: duration_ms as f64,
            easing,
        })
    }

    /// 2 second fast-out/slow-in animator.
    pub fn with_defaults(initial_value: f64) -> Self {
        Self {
            start_value: initial_value,
            displayed_value: initial_value,
            target_value: initial_value,
            elapsed_ms: DEFAULT_DURATION_MS as f64,
            duration_ms: DEFAULT_DURATION_MS as f64,
            easing: Easing::default(),
        }
    }

    pub fn displayed_value(&self) -> f64 {
        self.displayed_value
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Linear progress of the current transition in `[0, 1]`.
    pub fn elapsed_fraction(&self) -> f64 {
        (self.elapsed_ms / self.duration_ms).min(1.0)
    }

    pub fn phase(&self) -> AnimationPhase {
        if self.elapsed_ms >= self.duration_ms {
            AnimationPhase::Settled
        } else {
            AnimationPhase::Animating
        }
    }

    pub fn is_settled(&self) -> bool {
        self.phase() == AnimationPhase::Settled
    }

    /// Start moving toward `value` from the value currently displayed.
    ///
    /// Returns `false` when `value` already is the target. A new target
    /// replaces any transition in flight.
    pub fn set_target(&mut self, value: f64) -> bool {
        if value == self.target_value {
            return false;
        }
        tracing::debug!(
            from = self.displayed_value,
            to = value,
            "gauge animation retargeted"
        );
        self.start_value = self.displayed_value;
        self.target_value = value;
        self.elapsed_ms = 0.0;
        true
    }

    /// Jump to `value` without animating.
    pub fn snap_to(&mut self, value: f64) {
        self.start_value = value;
        self.displayed_value = value;
        self.target_value = value;
        self.elapsed_ms = self.duration_ms;
    }

    /// Advance by `delta_ms` of wall-clock time.
    ///
    /// Returns `true` when the displayed value changed and the gauge needs a
    /// redraw. Does nothing while settled.
    pub fn tick(&mut self, delta_ms: f64) -> bool {
        if self.is_settled() {
            return false;
        }

        let previous = self.displayed_value;
        self.elapsed_ms += delta_ms.max(0.0);
        if self.elapsed_ms + SETTLE_EPSILON_MS >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.displayed_value = self.target_value;
            tracing::trace!(value = self.target_value, "gauge animation settled");
        } else {
            let eased = self.easing.transform(self.elapsed_fraction()).clamp(0.0, 1.0);
            self.displayed_value = lerp(self.start_value, self.target_value, eased);
        }

        self.displayed_value != previous
    }
}

fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_easings() -> Vec<Easing> {
        vec![
            Easing::Linear,
            Easing::FastOutSlowIn,
            Easing::LinearOutSlowIn,
            Easing::FastOutLinearIn,
            Easing::EaseInOut,
            Easing::CubicBezier {
                x1: 0.25,
                y1: 0.1,
                x2: 0.25,
                y2: 1.0,
            },
        ]
    }

    #[test]
    fn test_easings_are_monotonic_and_anchored() {
        for easing in all_easings() {
            assert_eq!(easing.transform(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.transform(1.0), 1.0, "{easing:?}");
            let mut last = 0.0;
            for i in 1..=100 {
                let v = easing.transform(i as f64 / 100.0);
                assert!(v >= last, "{easing:?} decreased at {i}");
                last = v;
            }
        }
    }

    #[test]
    fn test_fast_out_slow_in_is_ahead_of_linear_midway() {
        let mid = Easing::FastOutSlowIn.transform(0.5);
        assert!(mid > 0.5 && mid < 1.0);
    }

    #[test]
    fn test_new_animator_is_settled() {
        let animator = ValueAnimator::new(30.0, 2000, Easing::default()).unwrap();
        assert!(animator.is_settled());
        assert_eq!(animator.elapsed_fraction(), 1.0);
        assert_eq!(animator.displayed_value(), 30.0);
        assert_eq!(animator.target_value(), 30.0);
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        assert!(matches!(
            ValueAnimator::new(0.0, 0, Easing::Linear),
            Err(ConfigError::NonPositiveDuration(0))
        ));
        assert!(matches!(
            ValueAnimator::new(0.0, -10, Easing::Linear),
            Err(ConfigError::NonPositiveDuration(-10))
        ));
    }

    #[test]
    fn test_rejects_bad_easing() {
        let overshoot = Easing::CubicBezier {
            x1: 0.3,
            y1: -0.5,
            x2: 0.7,
            y2: 1.5,
        };
        assert!(matches!(
            ValueAnimator::new(0.0, 100, overshoot),
            Err(ConfigError::InvalidEasing(_))
        ));

        fn half(_: f64) -> f64 {
            0.5
        }
        assert!(matches!(
            ValueAnimator::new(0.0, 100, Easing::Custom(half)),
            Err(ConfigError::InvalidEasing(_))
        ));
    }

    #[test]
    fn test_rejects_decreasing_custom_easing() {
        fn zigzag(t: f64) -> f64 {
            if t <= 0.0 {
                0.0
            } else if t >= 1.0 {
                1.0
            } else if t < 0.5 {
                0.9
            } else {
                0.1
            }
        }
        assert!(matches!(
            ValueAnimator::new(0.0, 1000, Easing::Custom(zigzag)),
            Err(ConfigError::InvalidEasing(_))
        ));

        fn smoothstep(t: f64) -> f64 {
            t * t * (3.0 - 2.0 * t)
        }
        let mut animator = ValueAnimator::new(0.0, 1000, Easing::Custom(smoothstep)).unwrap();
        animator.set_target(100.0);
        animator.tick(250.0);
        let first = animator.displayed_value();
        animator.tick(500.0);
        assert!(animator.displayed_value() > first);
    }

    #[test]
    fn test_same_target_is_noop() {
        let mut animator = ValueAnimator::with_defaults(10.0);
        assert!(!animator.set_target(10.0));
        assert!(animator.is_settled());
        assert!(!animator.tick(16.0));
    }

    #[test]
    fn test_reaches_target_exactly() {
        let mut animator = ValueAnimator::with_defaults(0.0);
        assert!(animator.set_target(80.0));
        assert_eq!(animator.phase(), AnimationPhase::Animating);
        for _ in 0..4 {
            animator.tick(500.0);
        }
        assert!(animator.is_settled());
        assert_eq!(animator.displayed_value(), 80.0);
    }

    #[test]
    fn test_uneven_frames_still_settle() {
        let mut animator = ValueAnimator::new(0.0, 1000, Easing::Linear).unwrap();
        animator.set_target(1.0);
        for _ in 0..3 {
            animator.tick(1000.0 / 3.0);
        }
        assert!(animator.is_settled());
        assert_eq!(animator.displayed_value(), 1.0);
    }

    #[test]
    fn test_progress_stays_between_start_and_target() {
        for easing in all_easings() {
            let mut animator = ValueAnimator::new(20.0, 2000, easing).unwrap();
            animator.set_target(80.0);
            let mut last = 20.0;
            for _ in 0..19 {
                animator.tick(100.0);
                let v = animator.displayed_value();
                assert!(v > 20.0 && v < 80.0, "{easing:?}: {v}");
                assert!(v >= last, "{easing:?} reversed");
                last = v;
            }
            assert!(!animator.is_settled());
        }
    }

    #[test]
    fn test_downward_animation_does_not_overshoot() {
        let mut animator = ValueAnimator::with_defaults(90.0);
        animator.set_target(10.0);
        animator.tick(700.0);
        let v = animator.displayed_value();
        assert!(v < 90.0 && v > 10.0);
    }

    #[test]
    fn test_retarget_starts_from_displayed_value() {
        let mut animator = ValueAnimator::new(0.0, 1000, Easing::Linear).unwrap();
        animator.set_target(100.0);
        animator.tick(500.0);
        assert_eq!(animator.displayed_value(), 50.0);

        animator.set_target(0.0);
        assert_eq!(animator.elapsed_fraction(), 0.0);
        assert_eq!(animator.displayed_value(), 50.0);
        animator.tick(500.0);
        assert_eq!(animator.displayed_value(), 25.0);
        animator.tick(500.0);
        assert_eq!(animator.displayed_value(), 0.0);
        assert!(animator.is_settled());
    }

    #[test]
    fn test_snap_skips_animation() {
        let mut animator = ValueAnimator::with_defaults(0.0);
        animator.set_target(50.0);
        animator.tick(10.0);
        animator.snap_to(70.0);
        assert!(animator.is_settled());
        assert_eq!(animator.displayed_value(), 70.0);
        assert!(!animator.tick(16.0));
    }
}
