// File: crates/flightviz-core/src/track.rs
// Summary: Track model (timestamped fixes) and per-track analysis into derived series + bounds.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::bounds::{BoundsSet, Metric};
use crate::error::{Result, VizError};

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// One recorded position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fix {
    pub time: DateTime<Utc>,
    /// Degrees, north positive.
    pub lat: f64,
    /// Degrees, east positive.
    pub lon: f64,
    /// Meters above sea level.
    pub ele: f64,
}

impl Fix {
    pub fn timestamp(&self) -> f64 {
        self.time.timestamp_millis() as f64 / 1000.0
    }
}

/// A decoded flight log.
#[derive(Clone, Debug, Default)]
pub struct Track {
    /// File name or other identifier used in messages.
    pub source_name: String,
    pub pilot_name: Option<String>,
    pub glider_type: Option<String>,
    pub fixes: Vec<Fix>,
}

impl Track {
    pub fn new(source_name: impl Into<String>, fixes: Vec<Fix>) -> Self {
        Self { source_name: source_name.into(), fixes, ..Default::default() }
    }

    /// Derive climb, ground speed and progress per fix and collect bounds.
    ///
    /// Fails when fewer than two fixes are present or timestamps go backwards.
    pub fn analyse(self) -> Result<AnalysedTrack> {
        let n = self.fixes.len();
        if n < 2 {
            return Err(VizError::track(&self.source_name, format!("need at least 2 fixes, found {n}")));
        }
        if let Some(f) = self.fixes.iter().find(|f| !(f.lat.is_finite() && f.lon.is_finite() && f.ele.is_finite())) {
            return Err(VizError::track(
                &self.source_name,
                format!("non-finite position at {}", f.time.format("%H:%M:%S")),
            ));
        }
        for w in self.fixes.windows(2) {
            if w[1].time < w[0].time {
                return Err(VizError::track(
                    &self.source_name,
                    format!("timestamps go backwards at {}", w[1].time.format("%H:%M:%S")),
                ));
            }
        }

        let mut climb = Vec::with_capacity(n);
        let mut speed = Vec::with_capacity(n);
        let (mut last_climb, mut last_speed) = (0.0, 0.0);
        for w in self.fixes.windows(2) {
            let dt = (w[1].time - w[0].time).num_milliseconds() as f64 / 1000.0;
            // duplicate timestamps repeat the previous rate
            if dt > 0.0 {
                last_climb = (w[1].ele - w[0].ele) / dt;
                last_speed = 3.6 * haversine_m(w[0].lat, w[0].lon, w[1].lat, w[1].lon) / dt;
            }
            climb.push(last_climb);
            speed.push(last_speed);
        }
        // first fix takes the rate of the first interval
        climb.insert(0, climb[0]);
        speed.insert(0, speed[0]);

        let t0 = self.fixes[0].timestamp();
        let total = self.fixes[n - 1].timestamp() - t0;
        let progress: Vec<f64> = self
            .fixes
            .iter()
            .map(|f| if total > 0.0 { (f.timestamp() - t0) / total } else { 0.0 })
            .collect();

        let mut bounds = BoundsSet::new();
        for (i, f) in self.fixes.iter().enumerate() {
            bounds.update(Metric::Altitude, f.ele);
            bounds.update(Metric::Climb, climb[i]);
            bounds.update(Metric::Speed, speed[i]);
            bounds.update(Metric::Time, f.timestamp());
        }
        debug!(track = %self.source_name, fixes = n, "analysed track");

        Ok(AnalysedTrack { track: self, climb, speed, progress, bounds })
    }
}

/// A track with its per-fix derived series. All series have one entry per fix.
#[derive(Clone, Debug)]
pub struct AnalysedTrack {
    pub track: Track,
    /// Vertical speed, m/s.
    pub climb: Vec<f64>,
    /// Ground speed, km/h.
    pub speed: Vec<f64>,
    /// Elapsed fraction of the flight, 0..=1.
    pub progress: Vec<f64>,
    pub bounds: BoundsSet,
}

impl AnalysedTrack {
    /// Value of a bounded metric at fix `i`.
    pub fn value(&self, metric: Metric, i: usize) -> f64 {
        match metric {
            Metric::Altitude => self.track.fixes[i].ele,
            Metric::Climb => self.climb[i],
            Metric::Speed => self.speed[i],
            Metric::Time => self.track.fixes[i].timestamp(),
        }
    }
}

/// Great-circle distance in meters.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}
