// File: crates/flightviz-core/src/bounds.rs
// Summary: Mergeable [min, max] intervals per metric, aggregated across tracks.

use std::collections::BTreeMap;

use crate::error::EmptyBoundsError;

/// Scalar metrics whose ranges are tracked per flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Altitude,
    Climb,
    Speed,
    Time,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Altitude, Metric::Climb, Metric::Speed, Metric::Time];

    /// Short key used in style ids and log output.
    pub const fn key(self) -> &'static str {
        match self {
            Metric::Altitude => "ele",
            Metric::Climb => "climb",
            Metric::Speed => "speed",
            Metric::Time => "time",
        }
    }
}

/// Interval over one metric. Empty until the first value arrives.
/// Contract: when non-empty, min <= max.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    range: Option<(f64, f64)>,
}

impl Bounds {
    pub const fn empty() -> Self {
        Self { range: None }
    }

    /// Bounds covering both endpoints, in whichever order they are given.
    pub fn new(a: f64, b: f64) -> Self {
        Self { range: Some((a.min(b), a.max(b))) }
    }

    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut b = Self::empty();
        for v in values {
            b.update(v);
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Extend to include `value`. NaN samples are ignored.
    pub fn update(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.range = Some(match self.range {
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
            None => (value, value),
        });
    }

    /// Union of two intervals; an empty operand is the identity.
    pub fn merge(&self, other: &Bounds) -> Bounds {
        match (self.range, other.range) {
            (None, _) => *other,
            (_, None) => *self,
            (Some((a_lo, a_hi)), Some((b_lo, b_hi))) => Bounds { range: Some((a_lo.min(b_lo), a_hi.max(b_hi))) },
        }
    }

    pub fn merge_in(&mut self, other: &Bounds) {
        *self = self.merge(other);
    }

    pub fn tuple(&self) -> Result<(f64, f64), EmptyBoundsError> {
        self.range.ok_or(EmptyBoundsError { metric: None })
    }
}

/// Named bounds for every metric a track reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundsSet {
    entries: BTreeMap<Metric, Bounds>,
}

impl BoundsSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Bounds {
        self.entries.get(&metric).copied().unwrap_or_default()
    }

    pub fn insert(&mut self, metric: Metric, bounds: Bounds) {
        self.entries.insert(metric, bounds);
    }

    /// Extend one metric by a single sample, creating the entry if needed.
    pub fn update(&mut self, metric: Metric, value: f64) {
        self.entries.entry(metric).or_default().update(value);
    }

    /// Merge a track's bounds metric-wise. Metrics the track did not report
    /// are left untouched.
    pub fn merge(&mut self, other: &BoundsSet) {
        for (metric, bounds) in &other.entries {
            self.entries.entry(*metric).or_default().merge_in(bounds);
        }
    }

    pub fn tuple(&self, metric: Metric) -> Result<(f64, f64), EmptyBoundsError> {
        self.get(metric).tuple().map_err(|_| EmptyBoundsError::for_metric(metric))
    }
}
