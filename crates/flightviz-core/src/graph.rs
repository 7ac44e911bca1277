// File: crates/flightviz-core/src/graph.rs
// Summary: Altitude profile graph per track, rendered to PNG on a Skia CPU raster surface.

use skia_safe as skia;

use crate::color::Rgba;
use crate::config::RunConfig;
use crate::context::Scales;
use crate::error::{Result, VizError};
use crate::track::AnalysedTrack;

/// Space around the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Margins {
    /// Shrink so at least a 1px plot area remains in a `w` x `h` image.
    pub fn fit(self, w: u32, h: u32) -> Self {
        let Self { mut left, mut right, mut top, mut bottom } = self;
        if left + right >= w {
            (left, right) = (w / 8, w / 16);
        }
        if top + bottom >= h {
            (top, bottom) = (h / 16, h / 8);
        }
        Self { left, right, top, bottom }
    }
}

impl Default for Margins {
    // room for altitude labels on the left and time labels below
    fn default() -> Self {
        Self { left: 64, right: 16, top: 16, bottom: 32 }
    }
}

pub struct GraphOptions {
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
    pub background: Rgba,
    pub grid: Rgba,
    pub axis: Rgba,
    pub label: Rgba,
    pub draw_labels: bool,
}

impl GraphOptions {
    pub fn from_config(config: &RunConfig) -> Self {
        Self { width: config.graph_width, height: config.graph_height, ..Default::default() }
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            width: crate::config::GRAPH_WIDTH,
            height: crate::config::GRAPH_HEIGHT,
            margins: Margins::default(),
            background: Rgba::rgba(18, 18, 20, 255), // near-black
            grid: Rgba::rgb(40, 40, 45),
            axis: Rgba::rgb(180, 180, 190),
            label: Rgba::rgb(210, 210, 220),
            draw_labels: true,
        }
    }
}

#[inline]
fn sk(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

/// Render altitude against time. The vertical axis spans the global altitude
/// scale so graphs of different tracks are directly comparable, and each
/// segment takes the color of its altitude bucket.
pub fn render_altitude_profile(track: &AnalysedTrack, scales: &Scales, opts: &GraphOptions) -> Result<Vec<u8>> {
    let (w, h) = (opts.width as i32, opts.height as i32);
    let mut surface = skia::surfaces::raster_n32_premul((w, h))
        .ok_or_else(|| VizError::Render(format!("failed to create {w}x{h} raster surface")))?;
    let canvas = surface.canvas();
    canvas.clear(sk(opts.background));

    let m = opts.margins.fit(opts.width, opts.height);
    let l = m.left as f32;
    let r = (opts.width - m.right) as f32;
    let t = m.top as f32;
    let b = (opts.height - m.bottom) as f32;

    draw_grid(canvas, opts, l, t, r, b);

    let alt = &scales.altitude;
    let fixes = &track.track.fixes;
    let (x0, x1) = match (fixes.first(), fixes.last()) {
        (Some(first), Some(last)) => (first.timestamp(), last.timestamp()),
        _ => return Err(VizError::Render("track has no fixes".into())),
    };
    let (y0, y1) = alt.domain();
    let xspan = (x1 - x0).max(1e-9);
    let yspan = (y1 - y0).max(1e-9);
    let sx = |x: f64| -> f32 { l + ((x - x0) / xspan) as f32 * (r - l) };
    let sy = |y: f64| -> f32 { b - ((y - y0) / yspan) as f32 * (b - t) };

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(2.0);
    for pair in fixes.windows(2) {
        stroke.set_color(sk(alt.color_of(pair[1].ele)));
        canvas.draw_line(
            (sx(pair[0].timestamp()), sy(pair[0].ele)),
            (sx(pair[1].timestamp()), sy(pair[1].ele)),
            &stroke,
        );
    }

    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(sk(opts.axis));
    axis_paint.set_anti_alias(true);
    axis_paint.set_stroke_width(1.5);
    canvas.draw_line((l, b), (r, b), &axis_paint);
    canvas.draw_line((l, t), (l, b), &axis_paint);

    if opts.draw_labels {
        let mut paint_text = skia::Paint::default();
        paint_text.set_color(sk(opts.label));
        let mut font = skia::Font::default();
        font.set_size(12.0);
        let time = &scales.time;
        canvas.draw_str(alt.label(y1), (2.0, t + 12.0), &font, &paint_text);
        canvas.draw_str(alt.label(y0), (2.0, b), &font, &paint_text);
        canvas.draw_str(time.label(time.shift(x0)), (l, b + 16.0), &font, &paint_text);
        canvas.draw_str(time.label(time.shift(x1)), (r - 36.0, b + 16.0), &font, &paint_text);
    }

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| VizError::Render("encode PNG failed".into()))?;
    Ok(data.as_bytes().to_vec())
}

fn draw_grid(canvas: &skia::Canvas, opts: &GraphOptions, l: f32, t: f32, r: f32, b: f32) {
    let mut paint = skia::Paint::default();
    paint.set_color(sk(opts.grid));
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);

    for x in ticks(l, r, 7) {
        canvas.draw_line((x, t), (x, b), &paint);
    }
    for y in ticks(t, b, 5) {
        canvas.draw_line((l, y), (r, y), &paint);
    }
}

/// `n` evenly spaced positions from `a` to `b`, both ends included.
fn ticks(a: f32, b: f32, n: usize) -> impl Iterator<Item = f32> {
    let step = if n > 1 { (b - a) / (n - 1) as f32 } else { 0.0 };
    (0..n.max(1)).map(move |i| a + step * i as f32)
}
