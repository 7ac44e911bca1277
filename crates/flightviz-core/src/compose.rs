// File: crates/flightviz-core/src/compose.rs
// Summary: Per-track document builder; colors track segments by the shared scales and style pool.

use tracing::debug;

use crate::bounds::Metric;
use crate::context::{RenderContext, ScaleId};
use crate::error::Result;
use crate::graph::{render_altitude_profile, GraphOptions};
use crate::hints::Hints;
use crate::kml::{Coord, Folder, Geometry, Placemark, ScreenOverlay};
use crate::style::Style;
use crate::track::AnalysedTrack;

/// Visual elements produced for one track.
#[derive(Clone, Debug)]
pub struct TrackElements {
    pub folder: Folder,
    /// Archive path and bytes of images referenced by `folder`.
    pub images: Vec<(String, Vec<u8>)>,
}

/// Value of `id` at fix `i`, in the scale's raw input units.
pub fn scale_value(track: &AnalysedTrack, id: ScaleId, i: usize) -> f64 {
    match id.metric() {
        Some(metric) => track.value(metric, i),
        None => track.progress[i],
    }
}

/// Build the folder for track number `index`. Reads the context only.
pub fn compose_track(ctx: &RenderContext, index: usize, track: &AnalysedTrack, hints: &Hints) -> Result<TrackElements> {
    let mut root = Folder::new(hints.pilot_name(&track.track));
    root.description = Some(describe(ctx, track, hints));

    let mut lines = Folder::new("track");
    lines.radio = true;

    let solid = Style::line(format!("track{index}-solid"), hints.color_or_default(), 3.0);
    let mut solid_folder = Folder::new("solid color");
    solid_folder.visible = false;
    solid_folder.push(Placemark {
        name: None,
        description: None,
        style_url: Some(solid.url()),
        geometry: Geometry::LineString(track.track.fixes.iter().map(coord).collect()),
    });
    root.styles.push(solid);
    lines.push(solid_folder);

    for id in ScaleId::ALL {
        let mut f = Folder::new(format!("colored by {}", ctx.scales.get(id).title()));
        f.visible = id == ScaleId::Altitude;
        f.features.extend(colored_segments(ctx, track, id).into_iter().map(Into::into));
        lines.push(f);
    }
    root.push(lines);

    let fixes = &track.track.fixes;
    for (label, i) in [("takeoff", 0), ("landing", fixes.len() - 1)] {
        let style = ctx.styles.index_for_value(&ctx.scales, ScaleId::Altitude, fixes[i].ele);
        let when = ctx.scales.time.label(ctx.scales.time.shift(fixes[i].timestamp()));
        root.push(Placemark {
            name: Some(label.to_string()),
            description: Some(format!("{} at {}, {}", label, when, ctx.scales.altitude.label(fixes[i].ele))),
            style_url: ctx.styles.get(style).map(Style::url),
            geometry: Geometry::Point(coord(&fixes[i])),
        });
    }

    let opts = GraphOptions::from_config(&ctx.config);
    let png = render_altitude_profile(track, &ctx.scales, &opts)?;
    let href = format!("images/track{index}-altitude.png");
    root.push(ScreenOverlay {
        name: "altitude graph".into(),
        href: href.clone(),
        visible: false,
        width: opts.width,
        height: opts.height,
    });

    debug!(track = %track.track.source_name, index, "composed track");
    Ok(TrackElements { folder: root, images: vec![(href, png)] })
}

/// Split a track into line strings whose consecutive segments share one pool style.
pub fn colored_segments(ctx: &RenderContext, track: &AnalysedTrack, id: ScaleId) -> Vec<Placemark> {
    let fixes = &track.track.fixes;
    let mut out = Vec::new();
    let mut current: Option<(usize, Vec<Coord>)> = None;
    for i in 1..fixes.len() {
        let style = ctx.styles.index_for_value(&ctx.scales, id, scale_value(track, id, i));
        if let Some((s, coords)) = current.as_mut() {
            if *s == style {
                coords.push(coord(&fixes[i]));
                continue;
            }
        }
        if let Some(done) = current.take() {
            out.push(segment(ctx, done));
        }
        current = Some((style, vec![coord(&fixes[i - 1]), coord(&fixes[i])]));
    }
    if let Some(done) = current {
        out.push(segment(ctx, done));
    }
    out
}

fn segment(ctx: &RenderContext, (style, coords): (usize, Vec<Coord>)) -> Placemark {
    Placemark { name: None, description: None, style_url: ctx.styles.get(style).map(Style::url), geometry: Geometry::LineString(coords) }
}

fn coord(f: &crate::track::Fix) -> Coord {
    Coord { lon: f.lon, lat: f.lat, ele: f.ele }
}

fn describe(ctx: &RenderContext, track: &AnalysedTrack, hints: &Hints) -> String {
    let mut lines = vec![format!("Pilot: {}", hints.pilot_name(&track.track))];
    if let Some(glider) = hints.glider_type(&track.track) {
        lines.push(format!("Glider: {glider}"));
    }
    if let Ok((t0, t1)) = track.bounds.tuple(Metric::Time) {
        let time = &ctx.scales.time;
        let mins = ((t1 - t0) / 60.0).round() as i64;
        lines.push(format!(
            "Flight: {} - {} ({}h{:02})",
            time.label(time.shift(t0)),
            time.label(time.shift(t1)),
            mins / 60,
            mins % 60
        ));
    }
    if let Ok((_, hi)) = track.bounds.tuple(Metric::Altitude) {
        lines.push(format!("Max altitude: {}", ctx.scales.altitude.label(hi)));
    }
    if let Ok((lo, hi)) = track.bounds.tuple(Metric::Climb) {
        lines.push(format!("Climb: {:.1} to {:.1} m/s", lo, hi));
    }
    if let Ok((_, hi)) = track.bounds.tuple(Metric::Speed) {
        lines.push(format!("Max ground speed: {:.0} km/h", hi));
    }
    lines.join("<br/>")
}
