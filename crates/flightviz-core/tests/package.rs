// File: crates/flightviz-core/tests/package.rs
// Purpose: KMZ archive layout and the all-or-nothing write.

use std::fs::File;
use std::io::Read;

use chrono::{TimeDelta, TimeZone, Utc};
use flightviz_core::kmz::{Package, ROOT_ENTRY};
use flightviz_core::{run, run_tracks, Fix, Hints, RunConfig, Track, TrackRequest};
use tempfile::tempdir;

fn track(name: &str) -> Track {
    let t0 = Utc.with_ymd_and_hms(2024, 8, 3, 9, 30, 0).unwrap();
    let fixes = (0..20)
        .map(|i| Fix {
            time: t0 + TimeDelta::seconds(i * 10),
            lat: 45.9 + i as f64 * 1e-3,
            lon: 6.8,
            ele: 1000.0 + (i * 15) as f64,
        })
        .collect();
    Track::new(name, fixes)
}

#[test]
fn archive_holds_document_and_graphs() {
    let package = run_tracks(
        vec![(track("one.igc"), Hints::default()), (track("two.igc"), Hints::default())],
        RunConfig::default(),
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("nested/out.kmz");
    package.write(&out).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&out).unwrap()).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    assert!(names.contains(&ROOT_ENTRY.to_string()));
    assert!(names.contains(&"images/track0-altitude.png".to_string()));
    assert!(names.contains(&"images/track1-altitude.png".to_string()));

    let mut kml = String::new();
    archive.by_name(ROOT_ENTRY).unwrap().read_to_string(&mut kml).unwrap();
    assert!(kml.starts_with("<?xml"));
    assert!(kml.contains("<Style id=\"altitude-0\">"));
    assert!(kml.contains("<href>images/track1-altitude.png</href>"));
    // one shared pool, not one per track
    assert_eq!(kml.matches("<Style id=\"altitude-0\">").count(), 1);
}

#[test]
fn failed_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.csv");
    std::fs::write(&good, "time,lat,lon,ele\n0,45,6,100\n10,45.001,6,110\n").unwrap();
    let bad = dir.path().join("bad.csv");
    std::fs::write(&bad, "time,lat,lon,ele\n0,45,6,100\n").unwrap();
    let out = dir.path().join("out.kmz");

    let result = run(
        vec![TrackRequest::new(&good, Hints::default()), TrackRequest::new(&bad, Hints::default())],
        RunConfig::default(),
    )
    .and_then(|p| p.write(&out));
    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn empty_package_is_still_a_valid_archive() {
    let bytes = Package::default().to_bytes().unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);
}
