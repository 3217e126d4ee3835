use serde::Deserialize;

use crate::config::Color;
use crate::error::ConfigError;
use crate::geometry::StrokeCap;
use crate::range::GaugeRange;

pub const DEFAULT_SECTION_WIDTH: f64 = 30.0;

/// A colored band over part of the dial, in normalized `[0, 1]` offsets.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Section {
    pub start_offset: f64,
    pub end_offset: f64,
    pub color: Color,
    #[serde(default = "default_section_width")]
    pub width: f64,
    #[serde(default)]
    pub cap: StrokeCap,
}

fn default_section_width() -> f64 {
    DEFAULT_SECTION_WIDTH
}

impl Section {
    pub fn new(start_offset: f64, end_offset: f64, color: Color) -> Result<Self, ConfigError> {
        let section = Self {
            start_offset,
            end_offset,
            color,
            width: DEFAULT_SECTION_WIDTH,
            cap: StrokeCap::Butt,
        };
        section.validate()?;
        Ok(section)
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.start_offset) {
            return Err(ConfigError::SectionOffsetOutOfRange {
                name: "start_offset",
                value: self.start_offset,
            });
        }
        if !(0.0..=1.0).contains(&self.end_offset) {
            return Err(ConfigError::SectionOffsetOutOfRange {
                name: "end_offset",
                value: self.end_offset,
            });
        }
        if self.end_offset <= self.start_offset {
            return Err(ConfigError::ReversedSection {
                start: self.start_offset,
                end: self.end_offset,
            });
        }
        Ok(())
    }

    /// Whether normalized position `percent` falls in this section.
    ///
    /// Sections are half-open, except that a section reaching the end of the
    /// dial also owns the end itself.
    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.start_offset
            && (percent < self.end_offset || (self.end_offset == 1.0 && percent == 1.0))
    }
}

/// Sections in the order they were configured.
///
/// Sections may overlap or leave gaps; lookups resolve overlaps by taking the
/// first match in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    pub fn new(sections: Vec<Section>) -> Result<Self, ConfigError> {
        for section in &sections {
            section.validate()?;
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// First section containing `value`, if any.
    pub fn section_at(&self, value: f64, range: &GaugeRange) -> Option<&Section> {
        let percent = range.percent_at_value(value);
        self.sections.iter().find(|section| section.contains(percent))
    }
}

/// Green / yellow / red split at 60% and 87%.
pub fn default_sections() -> Vec<Section> {
    vec![
        Section {
            start_offset: 0.0,
            end_offset: 0.6,
            color: Color::new(0x00, 0xff, 0x00),
            width: DEFAULT_SECTION_WIDTH,
            cap: StrokeCap::Butt,
        },
        Section {
            start_offset: 0.6,
            end_offset: 0.87,
            color: Color::new(0xff, 0xff, 0x00),
            width: DEFAULT_SECTION_WIDTH,
            cap: StrokeCap::Butt,
        },
        Section {
            start_offset: 0.87,
            end_offset: 1.0,
            color: Color::new(0xff, 0x00, 0x00),
            width: DEFAULT_SECTION_WIDTH,
            cap: StrokeCap::Butt,
        },
    ]
}
