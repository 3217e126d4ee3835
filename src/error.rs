use thiserror::Error;

/// Everything that can be wrong with a gauge configuration.
///
/// All of these are raised once, when the configuration is turned into a
/// [`crate::Gauge`] (or when one of the validated building blocks is
/// constructed directly). Nothing in the geometry layer fails at runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("min_value ({min}) must be smaller than max_value ({max})")]
    InvalidRange { min: f64, max: f64 },
    #[error("{name} can't be negative (got {value})")]
    NegativeDegree { name: &'static str, value: i32 },
    #[error("end_degree ({end}) must be bigger than start_degree ({start})")]
    ReversedArc { start: i32, end: i32 },
    #[error("end_degree - start_degree must be at most 360 (got {sweep})")]
    OversizedArc { sweep: i32 },
    #[error("section {name} must be between [0, 1] (got {value})")]
    SectionOffsetOutOfRange { name: &'static str, value: f64 },
    #[error("section end_offset ({end}) must be bigger than start_offset ({start})")]
    ReversedSection { start: f64, end: f64 },
    #[error("tick #{index} must be between [0, 1] (got {value})")]
    TickOutOfRange { index: usize, value: f64 },
    #[error("animation duration must be positive (got {0} ms)")]
    NonPositiveDuration(i64),
    #[error("invalid easing curve: {0}")]
    InvalidEasing(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("font file {0} could not be parsed")]
    Font(String),
}
