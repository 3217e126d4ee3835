// ============================================================================
// SPEEDOMETER - ANALOG GAUGE GEOMETRY, ANIMATION AND RENDERING
// ============================================================================

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod range;
pub mod render;
pub mod section;
pub mod ticks;

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use animation::{AnimationPhase, Easing, ValueAnimator};
pub use config::{load_config, Color, DialStyle, GaugeConfig};
pub use error::ConfigError;
pub use geometry::{round_angle_correction, ArcSweep, StrokeCap};
pub use range::GaugeRange;
pub use render::{render_gauge, Canvas};
pub use section::{Section, SectionTable};
pub use ticks::{generate_ticks, layout_ticks, TickLayout, Ticks};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Updates sent to a running gauge window.
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    /// Animate toward a value.
    SetValue(f64),
    /// Show a value immediately.
    SnapValue(f64),
    SetSections(Vec<Section>),
    SetTicks(Vec<f64>),
    SetRange {
        min_value: f64,
        max_value: f64,
        start_degree: i32,
        end_degree: i32,
    },
}

/// A validated gauge: its range, sections, ticks and animated value.
#[derive(Clone)]
pub struct Gauge {
    config: GaugeConfig,
    range: GaugeRange,
    sections: SectionTable,
    ticks: Ticks,
    animator: ValueAnimator,
    font: Option<Font<'static>>,
}

impl Gauge {
    /// Validate `config` and build the gauge, showing `config.value` (or the
    /// range minimum) without animation.
    pub fn new(config: GaugeConfig) -> Result<Self, ConfigError> {
        let range = GaugeRange::new(
            config.min_value,
            config.max_value,
            config.start_degree,
            config.end_degree,
        )?;
        let sections = SectionTable::new(config.sections.clone())?;
        let ticks = Ticks::new(config.ticks.clone())?;
        let initial = config.value.unwrap_or(config.min_value);
        let animator = ValueAnimator::new(initial, config.animation_duration_ms, config.easing)?;

        let font = match &config.font_path {
            Some(path) => Some(load_font(path)?),
            None => {
                tracing::warn!("No font configured, gauge text will not be drawn");
                None
            }
        };

        tracing::debug!(
            min = range.min_value(),
            max = range.max_value(),
            start = range.start_degree(),
            end = range.end_degree(),
            sections = sections.sections().len(),
            ticks = ticks.len(),
            "gauge created"
        );

        Ok(Self {
            config,
            range,
            sections,
            ticks,
            animator,
            font,
        })
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn range(&self) -> &GaugeRange {
        &self.range
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    pub fn ticks(&self) -> &Ticks {
        &self.ticks
    }

    pub fn animator(&self) -> &ValueAnimator {
        &self.animator
    }

    pub fn font(&self) -> Option<&Font<'static>> {
        self.font.as_ref()
    }

    /// Value currently on the dial, which trails the target while animating.
    pub fn displayed_value(&self) -> f64 {
        self.animator.displayed_value()
    }

    /// Animate toward `value`. Returns `false` if it already is the target.
    pub fn set_value(&mut self, value: f64) -> bool {
        self.animator.set_target(value)
    }

    pub fn snap_value(&mut self, value: f64) {
        self.animator.snap_to(value);
    }

    /// Replace the section table. On error the current table is kept.
    pub fn set_sections(&mut self, sections: Vec<Section>) -> Result<(), ConfigError> {
        self.sections = SectionTable::new(sections)?;
        Ok(())
    }

    /// Replace the tick positions. On error the current ticks are kept.
    pub fn set_ticks(&mut self, ticks: Vec<f64>) -> Result<(), ConfigError> {
        self.ticks = Ticks::new(ticks)?;
        Ok(())
    }

    /// Replace the value range and arc. On success any running animation is
    /// dropped and the dial settles where it is; on error the current range
    /// is kept.
    pub fn set_range(
        &mut self,
        min_value: f64,
        max_value: f64,
        start_degree: i32,
        end_degree: i32,
    ) -> Result<(), ConfigError> {
        self.range = GaugeRange::new(min_value, max_value, start_degree, end_degree)?;
        self.config.min_value = min_value;
        self.config.max_value = max_value;
        self.config.start_degree = start_degree;
        self.config.end_degree = end_degree;
        self.animator.snap_to(self.animator.displayed_value());
        tracing::debug!(
            min = min_value,
            max = max_value,
            start = start_degree,
            end = end_degree,
            "gauge range changed"
        );
        Ok(())
    }

    /// Advance the animation by `delta_ms`. Returns whether a redraw is needed.
    pub fn update(&mut self, delta_ms: f64) -> bool {
        self.animator.tick(delta_ms)
    }

    /// Section the displayed value falls in.
    pub fn current_section(&self) -> Option<&Section> {
        self.sections.section_at(self.displayed_value(), &self.range)
    }

    /// Tick labels with the value printed as a whole number.
    pub fn tick_layout(&self) -> Vec<TickLayout<String>> {
        layout_ticks(&self.ticks, &self.range, self.config.tick_rotate, |_, value| {
            format!("{}", value.round() as i64)
        })
    }

    /// Apply one command. Returns whether the dial needs a redraw.
    pub fn apply(&mut self, command: GaugeCommand) -> bool {
        match command {
            GaugeCommand::SetValue(value) => self.set_value(value),
            GaugeCommand::SnapValue(value) => {
                self.snap_value(value);
                true
            }
            GaugeCommand::SetSections(sections) => match self.set_sections(sections) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Rejected sections: {}", e);
                    false
                }
            },
            GaugeCommand::SetTicks(ticks) => match self.set_ticks(ticks) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Rejected ticks: {}", e);
                    false
                }
            },
            GaugeCommand::SetRange {
                min_value,
                max_value,
                start_degree,
                end_degree,
            } => match self.set_range(min_value, max_value, start_degree, end_degree) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Rejected range: {}", e);
                    false
                }
            },
        }
    }

    pub fn show(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn run_window(
        &mut self,
        receiver: Option<Receiver<GaugeCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let logical_width = self.config.window_width;
        let logical_height = self.config.window_height;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                logical_width as f64,
                logical_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let mut dirty = true;

        tracing::info!(
            "Opening gauge window \"{}\" ({}x{})",
            self.config.title,
            fb_width,
            fb_height
        );

        let gauge = self;
        event_loop.run(move |event, window_target| {
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        tracing::info!("Gauge window closed");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                            tracing::warn!("Failed to resize frame buffer: {}", e);
                        }
                        if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                            tracing::warn!("Failed to resize surface: {}", e);
                        }
                        dirty = true;
                    }
                    WindowEvent::RedrawRequested => {
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        render_gauge(&mut canvas, gauge);
                        if let Err(e) = pixels.render() {
                            tracing::error!("Failed to present frame: {}", e);
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    let now = Instant::now();
                    let elapsed = now.duration_since(last_frame);
                    if elapsed >= frame_duration {
                        last_frame = now;

                        if let Some(ref receiver) = receiver {
                            for command in receiver.try_iter() {
                                dirty |= gauge.apply(command);
                            }
                        }
                        dirty |= gauge.update(elapsed.as_secs_f64() * 1000.0);

                        if dirty {
                            window_clone.request_redraw();
                            dirty = false;
                        }
                    }
                    window_target
                        .set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

fn load_font(path: &Path) -> Result<Font<'static>, ConfigError> {
    let bytes = std::fs::read(path)?;
    Font::try_from_vec(bytes).ok_or_else(|| ConfigError::Font(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_initial_value() {
        let gauge = Gauge::new(GaugeConfig::builder().value(42.0).build()).unwrap();
        assert_eq!(gauge.displayed_value(), 42.0);
        assert!(gauge.animator().is_settled());

        let gauge = Gauge::new(GaugeConfig::builder().min_value(-40.0).build()).unwrap();
        assert_eq!(gauge.displayed_value(), -40.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let cases = [
            GaugeConfig::builder().min_value(100.0).max_value(100.0).build(),
            GaugeConfig::builder().start_degree(-10).build(),
            GaugeConfig::builder().start_degree(300).end_degree(200).build(),
            GaugeConfig::builder().start_degree(0).end_degree(400).build(),
            GaugeConfig::builder().ticks(vec![0.0, 1.5]).build(),
            GaugeConfig::builder().animation_duration_ms(0).build(),
            GaugeConfig::builder()
                .sections(vec![Section {
                    start_offset: 0.5,
                    end_offset: 0.2,
                    color: Color::BLACK,
                    width: 30.0,
                    cap: StrokeCap::Butt,
                }])
                .build(),
        ];
        for config in cases {
            assert!(Gauge::new(config).is_err());
        }
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let config = GaugeConfig::builder()
            .font_path("does/not/exist.ttf".into())
            .build();
        assert!(matches!(Gauge::new(config), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_commands() {
        let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
        assert!(gauge.apply(GaugeCommand::SetValue(80.0)));
        assert!(!gauge.apply(GaugeCommand::SetValue(80.0)));
        assert!(gauge.update(2000.0));
        assert_eq!(gauge.displayed_value(), 80.0);

        assert!(gauge.apply(GaugeCommand::SnapValue(10.0)));
        assert_eq!(gauge.displayed_value(), 10.0);

        assert!(gauge.apply(GaugeCommand::SetTicks(vec![0.0, 0.5, 1.0])));
        assert!(!gauge.apply(GaugeCommand::SetTicks(vec![2.0])));
        assert_eq!(gauge.ticks().positions(), &[0.0, 0.5, 1.0]);

        let red = Section::new(0.0, 1.0, Color::new(0xff, 0, 0)).unwrap();
        assert!(gauge.apply(GaugeCommand::SetSections(vec![red])));
        assert_eq!(gauge.current_section().map(|s| s.color), Some(red.color));
        let mut bad = red;
        bad.end_offset = 3.0;
        assert!(!gauge.apply(GaugeCommand::SetSections(vec![bad])));
        assert_eq!(gauge.sections().sections(), &[red]);
    }

    #[test]
    fn test_set_range() {
        let mut gauge = Gauge::new(GaugeConfig::builder().value(50.0).build()).unwrap();
        gauge.set_range(0.0, 200.0, 90, 360).unwrap();
        assert_eq!(*gauge.range(), GaugeRange::new(0.0, 200.0, 90, 360).unwrap());
        assert_eq!(gauge.config().max_value, 200.0);
        assert_eq!(gauge.range().degree_at_value(50.0), 157.5);
        assert_eq!(gauge.displayed_value(), 50.0);
    }

    #[test]
    fn test_rejected_range_keeps_previous() {
        let mut gauge = Gauge::new(GaugeConfig::default()).unwrap();
        assert!(matches!(
            gauge.set_range(10.0, 5.0, 135, 405),
            Err(ConfigError::InvalidRange { .. })
        ));
        assert!(!gauge.apply(GaugeCommand::SetRange {
            min_value: 0.0,
            max_value: 100.0,
            start_degree: 0,
            end_degree: 400,
        }));
        assert_eq!(*gauge.range(), GaugeRange::default());
        assert_eq!(gauge.config().max_value, 100.0);
    }

    #[test]
    fn test_range_change_cancels_animation() {
        let config = GaugeConfig::builder()
            .animation_duration_ms(1000)
            .easing(Easing::Linear)
            .build();
        let mut gauge = Gauge::new(config).unwrap();
        gauge.set_value(100.0);
        gauge.update(250.0);
        assert_eq!(gauge.displayed_value(), 25.0);

        assert!(gauge.apply(GaugeCommand::SetRange {
            min_value: 0.0,
            max_value: 50.0,
            start_degree: 135,
            end_degree: 405,
        }));
        assert!(gauge.animator().is_settled());
        assert_eq!(gauge.animator().target_value(), 25.0);
        assert!(!gauge.update(500.0));
        assert_eq!(gauge.displayed_value(), 25.0);
        assert_eq!(gauge.animator().duration_ms(), 1000.0);
        assert!(matches!(gauge.animator().easing(), Easing::Linear));
    }

    #[test]
    fn test_tick_labels_are_whole_numbers() {
        let config = GaugeConfig::builder()
            .max_value(240.0)
            .ticks(generate_ticks(5))
            .build();
        let gauge = Gauge::new(config).unwrap();
        let labels: Vec<String> = gauge.tick_layout().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["0", "60", "120", "180", "240"]);
    }
}
