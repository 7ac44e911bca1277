// File: crates/flightviz-core/src/source/csv_track.rs
// Summary: CSV track reader (time, lat, lon, ele columns; headers matched case-insensitively).

use chrono::{DateTime, Utc};

use crate::error::{Result, VizError};
use crate::track::{Fix, Track};

/// Parse CSV text into a track.
///
/// `time` accepts RFC 3339 or epoch seconds (epoch milliseconds above 1e12).
/// Rows missing any required column value, or holding a non-finite number,
/// are skipped.
pub fn parse(source_name: &str, text: &str) -> Result<Track> {
    let err = |what: String| VizError::track(source_name, what);
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| err(e.to_string()))?
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>();
    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));

    let column = |names: &[&str]| idx(names).ok_or_else(|| err(format!("missing '{}' column", names[0])));
    let i_time = column(&["time", "timestamp", "datetime"])?;
    let i_lat = column(&["lat", "latitude"])?;
    let i_lon = column(&["lon", "lng", "longitude"])?;
    let i_ele = column(&["ele", "alt", "altitude", "elevation"])?;

    let mut fixes = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| err(e.to_string()))?;
        let num = |i: usize| rec.get(i).and_then(|s| s.parse::<f64>().ok()).filter(|v| v.is_finite());
        let time = rec.get(i_time).and_then(parse_time);
        if let (Some(time), Some(lat), Some(lon), Some(ele)) = (time, num(i_lat), num(i_lon), num(i_ele)) {
            fixes.push(Fix { time, lat, lon, ele });
        }
    }
    if fixes.is_empty() {
        return Err(err("no usable rows".to_string()));
    }
    Ok(Track::new(source_name, fixes))
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms -> ms, epoch sec -> sec
        return if n > 10_i64.pow(12) { DateTime::from_timestamp_millis(n) } else { DateTime::from_timestamp(n, 0) };
    }
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_aliases_and_skips_bad_rows() {
        let text = "Timestamp,Latitude,Longitude,Altitude\n\
                    2024-05-01T10:00:00Z,46.0,7.0,1200\n\
                    2024-05-01T10:00:05Z,46.1,,1210\n\
                    1714557610,46.2,7.2,1220\n";
        let t = parse("a.csv", text).unwrap();
        assert_eq!(t.fixes.len(), 2);
        assert_eq!(t.fixes[1].time.timestamp(), 1_714_557_610);
        assert_eq!(t.fixes[1].ele, 1220.0);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = parse("b.csv", "time,lat,lon\n0,1,2\n").unwrap_err();
        assert!(err.to_string().contains("'ele'"));
    }

    #[test]
    fn skips_non_finite_values() {
        let text = "time,lat,lon,ele\n\
                    0,46.0,7.0,inf\n\
                    10,NaN,7.0,1200\n\
                    20,46.0,-inf,1200\n\
                    30,46.0,7.0,1210\n";
        let t = parse("c.csv", text).unwrap();
        assert_eq!(t.fixes.len(), 1);
        assert_eq!(t.fixes[0].ele, 1210.0);

        let err = parse("d.csv", "time,lat,lon,ele\n0,46,7,inf\n").unwrap_err();
        assert!(err.to_string().contains("no usable rows"), "{err}");
    }

    #[test]
    fn epoch_millis() {
        assert_eq!(parse_time("1714557610000").map(|t| t.timestamp()), Some(1_714_557_610));
    }
}
