// ============================================================================
// GAUGE RENDERING
// ============================================================================
//
// A frame is built in two steps: `build_scene` turns the gauge state into a
// list of draw commands, then `Scene::render` rasterizes them onto an RGBA
// frame. Angles are screen degrees: 0 points right and they grow clockwise.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::{Color, DialStyle};
use crate::geometry::{
    cap_correction, cap_inset, mark_rotations, point_at_degree, point_at_rotation, progress_arc,
    round_angle_correction, track_arc, ArcSweep, StrokeCap,
};
use crate::Gauge;

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        width: f64,
        arc: ArcSweep,
        cap: StrokeCap,
        color: Color,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f32,
        cap: StrokeCap,
        tapered: bool,
        color: Color,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f32,
        /// Degrees, `0` is upright.
        rotation: f64,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Rasterize every command in order. Text is skipped without a font.
    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font<'static>>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Arc {
                    cx,
                    cy,
                    radius,
                    width,
                    arc,
                    cap,
                    color,
                } => draw_arc(canvas, *cx, *cy, *radius, *width, *arc, *cap, *color),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    cap,
                    tapered,
                    color,
                } => {
                    if *tapered {
                        draw_thick_line_tapered_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *color);
                    } else {
                        draw_thick_line_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *cap, *color);
                    }
                }
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => draw_circle(canvas, *cx, *cy, *radius, *color),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    rotation,
                    color,
                } => {
                    let Some(font) = font else { continue };
                    let scale = Scale::uniform(*font_size);
                    if *rotation == 0.0 {
                        draw_text(canvas, *x, *y, text, font, scale, *color);
                    } else {
                        draw_text_rotated(canvas, *x, *y, text, font, scale, *rotation, *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

/// An RGBA8 frame, row major, `width * height * 4` bytes.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 3)?;
        Some(Color::new(px[0], px[1], px[2]))
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }
}

/// Placement of the dial inside the frame.
struct Dial {
    cx: f64,
    cy: f64,
    /// Outer radius; everything is measured inward from it.
    radius: f64,
}

impl Dial {
    fn new(width: usize, height: usize, margin: i32) -> Self {
        let size = (width.min(height) as f64 - 2.0 * margin as f64).max(0.0);
        Self {
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0,
            radius: size / 2.0,
        }
    }

    fn size(&self) -> f64 {
        self.radius * 2.0
    }
}

// ============================================================================
// GAUGE COMPOSITION
// ============================================================================

/// Draw `gauge` at its current displayed value.
pub fn render_gauge(canvas: &mut Canvas, gauge: &Gauge) {
    let scene = build_scene(gauge, canvas.width, canvas.height);
    scene.render(canvas, gauge.font());
}

pub fn build_scene(gauge: &Gauge, width: usize, height: usize) -> Scene {
    let config = gauge.config();
    let value = gauge.displayed_value();
    let dial = Dial::new(width, height, config.margin);

    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color));

    match config.style {
        DialStyle::SpeedView => add_sections(&mut scene, gauge, &dial),
        DialStyle::Tube => add_tube(&mut scene, gauge, &dial, value),
    }

    add_marks(&mut scene, gauge, &dial);

    let label_radius = dial.radius - config.tick_padding - config.tick_font_size as f64 / 2.0;
    for tick in gauge.tick_layout() {
        let (x, y) = tick.anchor(dial.cx, dial.cy, label_radius);
        scene.add_command(DrawCommand::Text {
            x,
            y,
            rotation: tick.screen_rotation(),
            text: tick.label,
            font_size: config.tick_font_size,
            color: config.text_color,
        });
    }

    add_speed_text(&mut scene, gauge, &dial, value);
    add_needle(&mut scene, gauge, &dial, value);

    scene
}

fn add_sections(scene: &mut Scene, gauge: &Gauge, dial: &Dial) {
    let range = gauge.range();
    for section in gauge.sections().iter() {
        let start = range.degree_at_percent(section.start_offset);
        let sweep = range.degree_at_percent(section.end_offset) - start;
        let correction = cap_correction(section.cap, section.width, dial.size() - section.width);
        scene.add_command(DrawCommand::Arc {
            cx: dial.cx,
            cy: dial.cy,
            radius: dial.radius - section.width / 2.0,
            width: section.width,
            arc: ArcSweep::corrected(start, sweep, correction),
            cap: section.cap,
            color: section.color,
        });
    }
}

fn add_tube(scene: &mut Scene, gauge: &Gauge, dial: &Dial, value: f64) {
    let config = gauge.config();
    let range = gauge.range();
    let radius = dial.radius - config.bar_width / 2.0;

    scene.add_command(DrawCommand::Arc {
        cx: dial.cx,
        cy: dial.cy,
        radius,
        width: config.bar_width,
        arc: track_arc(range, config.bar_cap, config.bar_width, dial.size()),
        cap: config.bar_cap,
        color: config.track_color,
    });

    let Some(section) = gauge.current_section() else {
        return;
    };
    // The bar stops at the track ends even while the needle value is outside the range.
    let clamped = value.clamp(range.min_value(), range.max_value());
    let bar = progress_arc(range, clamped, config.bar_cap, config.bar_width, dial.size());
    if bar.sweep > 0.0 {
        scene.add_command(DrawCommand::Arc {
            cx: dial.cx,
            cy: dial.cy,
            radius,
            width: config.bar_width,
            arc: bar,
            cap: config.bar_cap,
            color: section.color,
        });
    }
}

fn add_marks(scene: &mut Scene, gauge: &Gauge, dial: &Dial) {
    let config = gauge.config();
    let inset = cap_inset(config.marks_cap, config.marks_width);
    let outer = dial.radius - config.marks_padding - inset;
    let inner = outer - config.marks_height;
    for rotation in mark_rotations(gauge.range(), config.marks_count) {
        let (x0, y0) = point_at_rotation(dial.cx, dial.cy, outer, rotation);
        let (x1, y1) = point_at_rotation(dial.cx, dial.cy, inner, rotation);
        scene.add_command(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            thickness: config.marks_width as f32,
            cap: config.marks_cap,
            tapered: false,
            color: config.marks_color,
        });
    }
}

fn add_speed_text(scene: &mut Scene, gauge: &Gauge, dial: &Dial, value: f64) {
    let config = gauge.config();
    let speed = format!("{}", value.round() as i64);
    let y = dial.cy + dial.radius * 0.55;

    let (speed_x, unit_x) = match gauge.font() {
        Some(font) if !config.unit.trim().is_empty() => {
            let speed_scale = Scale::uniform(config.speed_font_size);
            let unit_scale = Scale::uniform(config.unit_font_size);
            let speed_w = calculate_text_width(&speed, font, speed_scale);
            let unit_w = calculate_text_width(&config.unit, font, unit_scale);
            let space = 4.0;
            let total = speed_w as f64 + space + unit_w as f64;
            (
                dial.cx - total / 2.0 + speed_w as f64 / 2.0,
                Some(dial.cx + total / 2.0 - unit_w as f64 / 2.0),
            )
        }
        _ => (dial.cx, None),
    };

    scene.add_command(DrawCommand::Text {
        x: speed_x,
        y,
        text: speed,
        font_size: config.speed_font_size,
        rotation: 0.0,
        color: config.text_color,
    });
    if let Some(unit_x) = unit_x {
        scene.add_command(DrawCommand::Text {
            x: unit_x,
            y,
            text: config.unit.clone(),
            font_size: config.unit_font_size,
            rotation: 0.0,
            color: config.text_color,
        });
    }
}

fn add_needle(scene: &mut Scene, gauge: &Gauge, dial: &Dial, value: f64) {
    let config = gauge.config();
    let degree = gauge.range().degree_at_value(value);
    let tip_length = dial.radius * config.needle_length_factor;
    let back_length = config.dot_radius as f64 * 2.0;
    let (tip_x, tip_y) = point_at_degree(dial.cx, dial.cy, tip_length, degree);
    let (back_x, back_y) = point_at_degree(dial.cx, dial.cy, back_length, degree + 180.0);

    scene.add_command(DrawCommand::Line {
        x0: dial.cx,
        y0: dial.cy,
        x1: tip_x,
        y1: tip_y,
        thickness: config.needle_width,
        cap: StrokeCap::Round,
        tapered: true,
        color: config.needle_color,
    });
    scene.add_command(DrawCommand::Line {
        x0: dial.cx,
        y0: dial.cy,
        x1: back_x,
        y1: back_y,
        thickness: config.needle_width,
        cap: StrokeCap::Round,
        tapered: false,
        color: config.needle_color,
    });
    scene.add_command(DrawCommand::Circle {
        cx: dial.cx,
        cy: dial.cy,
        radius: config.dot_radius as f64,
        color: config.needle_color,
    });
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn calculate_text_width(text: &str, font: &Font, scale: Scale) -> i32 {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let (min_x, max_x, _, _) = glyph_bounds(&glyphs);
    if min_x < max_x {
        max_x - min_x
    } else {
        0
    }
}

fn glyph_bounds(glyphs: &[PositionedGlyph]) -> (i32, i32, i32, i32) {
    glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    )
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

/// Inclusive pixel bounds of a shape, cut down to the canvas. `None` when
/// the shape lies entirely outside it.
fn clip_box(
    canvas: &Canvas,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
) -> Option<(i32, i32, i32, i32)> {
    if canvas.width == 0 || canvas.height == 0 {
        return None;
    }
    let min_x = min_x.floor().max(0.0);
    let min_y = min_y.floor().max(0.0);
    let max_x = max_x.ceil().min(canvas.width as f64 - 1.0);
    let max_y = max_y.ceil().min(canvas.height as f64 - 1.0);
    if !(min_x <= max_x && min_y <= max_y) {
        return None;
    }
    Some((min_x as i32, max_x as i32, min_y as i32, max_y as i32))
}

fn set_pixel(canvas: &mut Canvas, x: i32, y: i32, color: Color, alpha: f32) {
    if x < 0 || y < 0 || x as usize >= canvas.width || y as usize >= canvas.height {
        return;
    }
    let idx = (y as usize * canvas.width + x as usize) * 4;
    let Some(dst) = canvas.frame.get_mut(idx..idx + 4) else {
        return;
    };
    let a = alpha.clamp(0.0, 1.0);
    let src = [color.r, color.g, color.b];
    for (d, s) in dst.iter_mut().zip(src) {
        *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
    }
    dst[3] = 0xff;
}

/// Anti-aliased stroke of an arc centred on `radius`.
#[allow(clippy::too_many_arguments)]
fn draw_arc(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    radius: f64,
    width: f64,
    arc: ArcSweep,
    cap: StrokeCap,
    color: Color,
) {
    let arc = match cap {
        // A square cap extends the arc by half the stroke width on each end.
        StrokeCap::Square => {
            let extension = round_angle_correction(width, radius * 2.0);
            ArcSweep::corrected(arc.start, arc.sweep, -extension)
        }
        StrokeCap::Butt | StrokeCap::Round => arc,
    };
    if arc.sweep <= 0.0 || width <= 0.0 {
        return;
    }

    let inner = radius - width / 2.0;
    let outer = radius + width / 2.0;
    let Some((min_x, max_x, min_y, max_y)) = clip_box(
        canvas,
        cx - outer - 1.0,
        cx + outer + 1.0,
        cy - outer - 1.0,
        cy + outer + 1.0,
    ) else {
        return;
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < inner - 1.0 || dist > outer + 1.0 {
                continue;
            }
            let offset = (dy.atan2(dx).to_degrees() - arc.start).rem_euclid(360.0);
            if arc.sweep < 360.0 && offset > arc.sweep {
                continue;
            }
            let inner_aa = 1.0 - (inner - dist).clamp(0.0, 1.0);
            let outer_aa = 1.0 - (dist - outer).clamp(0.0, 1.0);
            let aa = inner_aa * outer_aa;
            if aa > 0.01 {
                set_pixel(canvas, x, y, color, aa as f32);
            }
        }
    }

    if cap == StrokeCap::Round {
        for degree in [arc.start, arc.end()] {
            let (x, y) = point_at_degree(cx, cy, radius, degree);
            draw_circle(canvas, x, y, width / 2.0, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    thickness: f32,
    cap: StrokeCap,
    color: Color,
) {
    draw_line_with(canvas, x0, y0, x1, y1, thickness, color, |t, dist| {
        let outside = match cap {
            StrokeCap::Butt => !(0.0..=1.0).contains(&t),
            StrokeCap::Round | StrokeCap::Square => false,
        };
        if outside {
            0.0
        } else {
            (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0)
        }
    });
}

/// Line that narrows from `thickness` at the start to a point at the end.
fn draw_thick_line_tapered_aa(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    thickness: f32,
    color: Color,
) {
    draw_line_with(canvas, x0, y0, x1, y1, thickness, color, |t, dist| {
        // 0.05 to avoid vanishing too soon
        let local_thickness = thickness * (1.0 - t.clamp(0.0, 1.0) * 0.95);
        (1.0 - (dist - local_thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0)
    });
}

/// Walk the bounding box of a segment and let `coverage(t, dist)` decide each
/// pixel's alpha. `t` is the unclamped projection onto the segment, `dist`
/// the distance to the nearest point of the segment.
#[allow(clippy::too_many_arguments)]
fn draw_line_with(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    thickness: f32,
    color: Color,
    coverage: impl Fn(f32, f32) -> f32,
) {
    let pad = thickness.ceil() as f64 + 1.0;
    let Some((min_x, max_x, min_y, max_y)) = clip_box(
        canvas,
        x0.min(x1) - pad,
        x0.max(x1) + pad,
        y0.min(y1) - pad,
        y0.max(y1) + pad,
    ) else {
        return;
    };
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = dx * dx + dy * dy;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = (x as f64 - x0) as f32;
            let py = (y as f64 - y0) as f32;
            let t = if len_sq > 0.0 { (px * dx + py * dy) / len_sq } else { 0.0 };
            let tc = t.clamp(0.0, 1.0);
            let dist = ((px - tc * dx).powi(2) + (py - tc * dy).powi(2)).sqrt();
            let aa = coverage(t, dist);
            if aa > 0.01 {
                set_pixel(canvas, x, y, color, aa);
            }
        }
    }
}

fn draw_circle(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    let Some((min_x, max_x, min_y, max_y)) = clip_box(
        canvas,
        cx - radius - 1.0,
        cx + radius + 1.0,
        cy - radius - 1.0,
        cy + radius + 1.0,
    ) else {
        return;
    };
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
            let aa = 1.0 - (dist - radius).clamp(0.0, 1.0);
            if aa > 0.0 {
                set_pixel(canvas, x, y, color, aa as f32);
            }
        }
    }
}

/// Text centred on `(x, y)`.
fn draw_text(
    canvas: &mut Canvas,
    x: f64,
    y: f64,
    text: &str,
    font: &Font,
    scale: Scale,
    color: Color,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyph_bounds(&glyphs);
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x.round() as i32 - width_px / 2;
    let offset_y = y.round() as i32 - height_px / 2;

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                set_pixel(canvas, px, py, color, v);
            });
        }
    }
}

/// Text centred on `(x, y)`, turned clockwise by `rotation` degrees around its centre.
#[allow(clippy::too_many_arguments)]
fn draw_text_rotated(
    canvas: &mut Canvas,
    x: f64,
    y: f64,
    text: &str,
    font: &Font,
    scale: Scale,
    rotation: f64,
    color: Color,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyph_bounds(&glyphs);
    if min_x >= max_x || min_y >= max_y {
        return;
    }
    let center_x = (min_x + max_x) as f64 / 2.0;
    let center_y = (min_y + max_y) as f64 / 2.0;
    let (sin_r, cos_r) = rotation.to_radians().sin_cos();

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                if v <= 0.001 {
                    return;
                }
                let local_x = (gx as i32 + bb.min.x) as f64 - center_x;
                let local_y = (gy as i32 + bb.min.y) as f64 - center_y;
                let final_x = x + local_x * cos_r - local_y * sin_r;
                let final_y = y + local_x * sin_r + local_y * cos_r;
                draw_antialiased_pixel(canvas, final_x, final_y, color, v);
            });
        }
    }
}

fn draw_antialiased_pixel(canvas: &mut Canvas, x: f64, y: f64, color: Color, alpha: f32) {
    let x_floor = x.floor() as i32;
    let y_floor = y.floor() as i32;
    let x_frac = x - x_floor as f64;
    let y_frac = y - y_floor as f64;

    // Spread the sample over the 4 nearest pixels.
    let samples = [
        (x_floor, y_floor, (1.0 - x_frac) * (1.0 - y_frac)),
        (x_floor + 1, y_floor, x_frac * (1.0 - y_frac)),
        (x_floor, y_floor + 1, (1.0 - x_frac) * y_frac),
        (x_floor + 1, y_floor + 1, x_frac * y_frac),
    ];
    for (px, py, weight) in samples {
        let final_alpha = alpha * weight as f32;
        if final_alpha > 0.001 {
            set_pixel(canvas, px, py, color, final_alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaugeConfig;

    const SIZE: usize = 300;

    fn render(gauge: &Gauge) -> Vec<u8> {
        let mut frame = vec![0u8; SIZE * SIZE * 4];
        let mut canvas = Canvas::new(&mut frame, SIZE, SIZE);
        render_gauge(&mut canvas, gauge);
        frame
    }

    fn pixel(frame: &mut [u8], x: usize, y: usize) -> Option<Color> {
        Canvas::new(frame, SIZE, SIZE).pixel(x, y)
    }

    fn count_arcs(scene: &Scene) -> usize {
        scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arc { .. }))
            .count()
    }

    #[test]
    fn test_speed_view_draws_one_arc_per_section() {
        let gauge = Gauge::new(GaugeConfig::default()).unwrap();
        let scene = build_scene(&gauge, SIZE, SIZE);
        assert_eq!(count_arcs(&scene), 3);
        assert_eq!(scene.commands()[0], DrawCommand::Clear(Color::WHITE));
    }

    #[test]
    fn test_tube_bar_follows_value() {
        let config = GaugeConfig::builder().style(DialStyle::Tube).build();
        let mut gauge = Gauge::new(config).unwrap();
        // At the minimum the bar has no length.
        assert_eq!(count_arcs(&build_scene(&gauge, SIZE, SIZE)), 1);

        gauge.snap_value(50.0);
        let scene = build_scene(&gauge, SIZE, SIZE);
        let bars: Vec<&DrawCommand> = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arc { .. }))
            .collect();
        assert_eq!(bars.len(), 2);
        match bars[1] {
            DrawCommand::Arc { arc, color, .. } => {
                assert_eq!(arc.start, 135.0);
                assert_eq!(arc.sweep, 135.0);
                assert_eq!(*color, Color::new(0x00, 0xff, 0x00));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_tick_labels_without_font_are_skipped() {
        let config = GaugeConfig::builder().ticks(vec![0.0, 0.5, 1.0]).build();
        let gauge = Gauge::new(config).unwrap();
        let scene = build_scene(&gauge, SIZE, SIZE);
        let labels: Vec<&str> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["0", "50", "100", "0"]);
        // Rendering still succeeds and leaves the text out.
        render(&gauge);
    }

    #[test]
    fn test_rasterized_speed_view_colors() {
        let gauge = Gauge::new(GaugeConfig::default()).unwrap();
        let mut frame = render(&gauge);
        // Straight up is the middle of the arc, inside the green section.
        assert_eq!(pixel(&mut frame, 150, 25), Some(Color::new(0x00, 0xff, 0x00)));
        assert_eq!(pixel(&mut frame, 0, 0), Some(Color::WHITE));
        // Needle hub.
        assert_eq!(pixel(&mut frame, 150, 150), Some(Color::new(0x21, 0x96, 0xf3)));
    }

    #[test]
    fn test_rasterized_tube_bar_at_max_is_red() {
        let config = GaugeConfig::builder().style(DialStyle::Tube).build();
        let mut gauge = Gauge::new(config).unwrap();
        gauge.snap_value(100.0);
        let mut frame = render(&gauge);
        assert_eq!(pixel(&mut frame, 150, 30), Some(Color::new(0xff, 0x00, 0x00)));
    }

    #[test]
    fn test_shapes_far_outside_the_canvas_are_clipped() {
        let mut frame = vec![0u8; SIZE * SIZE * 4];
        let mut canvas = Canvas::new(&mut frame, SIZE, SIZE);
        canvas.clear(Color::BLACK);
        // Only a sliver of this circle crosses the frame.
        let full = ArcSweep::new(0.0, 360.0);
        let (cx, cy, radius) = (150.0, 1.0e6 + 150.0, 1.0e6);
        draw_arc(&mut canvas, cx, cy, radius, 20.0, full, StrokeCap::Butt, Color::WHITE);
        assert_eq!(canvas.pixel(150, 150), Some(Color::WHITE));
        assert_eq!(canvas.pixel(150, 100), Some(Color::BLACK));

        draw_circle(&mut canvas, -5.0e8, -5.0e8, 10.0, Color::WHITE);
        let (x0, y0, x1, y1) = (1.0e9, 1.0e9, 2.0e9, 2.0e9);
        draw_thick_line_aa(&mut canvas, x0, y0, x1, y1, 3.0, StrokeCap::Round, Color::WHITE);
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(SIZE - 1, SIZE - 1), Some(Color::BLACK));
    }

    #[test]
    fn test_round_cap_arc_stays_inside_its_range() {
        let mut frame = vec![0u8; SIZE * SIZE * 4];
        let mut canvas = Canvas::new(&mut frame, SIZE, SIZE);
        canvas.clear(Color::BLACK);
        let correction = round_angle_correction(20.0, 200.0);
        // Quarter arc from 3 o'clock to 6 o'clock.
        let arc = ArcSweep::corrected(0.0, 90.0, correction);
        draw_arc(&mut canvas, 150.0, 150.0, 100.0, 20.0, arc, StrokeCap::Round, Color::WHITE);
        // Just before 3 o'clock (above the horizontal axis) stays empty.
        assert_eq!(canvas.pixel(250, 145), Some(Color::BLACK));
        assert_eq!(canvas.pixel(250, 155), Some(Color::WHITE));
    }
}
