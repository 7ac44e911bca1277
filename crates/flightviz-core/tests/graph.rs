// File: crates/flightviz-core/tests/graph.rs
// Purpose: Altitude profile PNGs decode at the configured size.

use chrono::{TimeDelta, TimeZone, Utc};
use flightviz_core::context::Scales;
use flightviz_core::graph::{render_altitude_profile, GraphOptions};
use flightviz_core::{Fix, RunConfig, Track};

#[test]
fn profile_png_has_requested_size() {
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let fixes = (0..50)
        .map(|i| Fix { time: t0 + TimeDelta::seconds(i * 4), lat: 46.0, lon: 7.0 + i as f64 * 1e-4, ele: 800.0 + (i as f64 * 0.3).sin() * 200.0 })
        .collect();
    let track = Track::new("g.igc", fixes).analyse().unwrap();
    let config = RunConfig { graph_width: 320, graph_height: 160, ..RunConfig::default() };
    let scales = Scales::derive(&track.bounds, &config).unwrap();
    let opts = GraphOptions::from_config(&config);

    let png = render_altitude_profile(&track, &scales, &opts).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (320, 160));
    // top-left corner is plain background
    let bg = opts.background;
    assert_eq!(img.get_pixel(0, 0).0, [bg.r, bg.g, bg.b, bg.a]);
}
