// File: crates/flightviz-core/src/source/igc.rs
// Summary: IGC flight recorder reader (B fixes plus date, pilot and glider headers).

use chrono::{NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use tracing::debug;

use crate::error::{Result, VizError};
use crate::track::{Fix, Track};

/// Minimum length of a B record up to and including the GNSS altitude.
const B_RECORD_LEN: usize = 35;
/// A backwards step in fix time of more hours than this is a midnight rollover.
const ROLLOVER_HOURS: i64 = 12;

/// Parse IGC text into a track.
///
/// Fixes with zero GNSS altitude fall back to pressure altitude. Times that
/// wrap past midnight advance the date; any other backwards step drops the fix.
pub fn parse(source_name: &str, text: &str) -> Result<Track> {
    let mut track = Track::new(source_name, Vec::new());
    let mut date: Option<NaiveDate> = None;
    let mut day_offset = 0i64;
    let mut last_time: Option<NaiveTime> = None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        let bad = |what: &str| VizError::track(source_name, format!("line {}: {}", lineno + 1, what));

        if let Some(rest) = line.strip_prefix("HFDTE") {
            date = Some(parse_date(rest).ok_or_else(|| bad("bad HFDTE date header"))?);
        } else if line.starts_with("HFPLT") {
            track.pilot_name = header_value(line);
        } else if line.starts_with("HFGTY") {
            track.glider_type = header_value(line);
        } else if line.starts_with('B') {
            let day = date.ok_or_else(|| bad("B record before HFDTE date header"))?;
            let rec = parse_b_record(line).ok_or_else(|| bad("malformed B record"))?;
            if let Some(prev) = last_time {
                if prev - rec.time > TimeDelta::hours(ROLLOVER_HOURS) {
                    day_offset += 1;
                } else if rec.time < prev {
                    debug!(track = source_name, line = lineno + 1, "dropping fix that steps back in time");
                    continue;
                }
            }
            last_time = Some(rec.time);
            let naive = day.and_time(rec.time) + TimeDelta::days(day_offset);
            track.fixes.push(Fix { time: Utc.from_utc_datetime(&naive), lat: rec.lat, lon: rec.lon, ele: rec.ele });
        }
    }

    if track.fixes.is_empty() {
        return Err(VizError::track(source_name, "no B records found"));
    }
    Ok(track)
}

struct BRecord {
    time: NaiveTime,
    lat: f64,
    lon: f64,
    ele: f64,
}

fn parse_b_record(line: &str) -> Option<BRecord> {
    if line.len() < B_RECORD_LEN || !line.is_ascii() {
        return None;
    }
    let num = |r: std::ops::Range<usize>| {
        let digits = &line[r];
        digits.bytes().all(|b| b.is_ascii_digit()).then(|| digits.parse::<i64>().ok()).flatten()
    };
    let time = NaiveTime::from_hms_opt(num(1..3)? as u32, num(3..5)? as u32, num(5..7)? as u32)?;

    let minutes = |r| num(r).filter(|m| *m < 60_000);
    let mut lat = num(7..9)? as f64 + minutes(9..14)? as f64 / 60_000.0;
    match &line[14..15] {
        "N" => {}
        "S" => lat = -lat,
        _ => return None,
    }
    let mut lon = num(15..18)? as f64 + minutes(18..23)? as f64 / 60_000.0;
    match &line[23..24] {
        "E" => {}
        "W" => lon = -lon,
        _ => return None,
    }
    let pressure = num(25..30)?;
    let gnss = num(30..35)?;
    let ele = (if gnss != 0 { gnss } else { pressure }) as f64;
    Some(BRecord { time, lat, lon, ele })
}

/// Accepts `DDMMYY...` and `DATE:DDMMYY,NN`.
fn parse_date(rest: &str) -> Option<NaiveDate> {
    let digits = rest.strip_prefix("DATE:").unwrap_or(rest);
    let d = digits.get(0..6)?;
    if !d.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day: u32 = d[0..2].parse().ok()?;
    let month: u32 = d[2..4].parse().ok()?;
    let yy: i32 = d[4..6].parse().ok()?;
    let year = if yy >= 80 { 1900 + yy } else { 2000 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn header_value(line: &str) -> Option<String> {
    let (_, value) = line.split_once(':')?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
