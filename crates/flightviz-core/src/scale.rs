// File: crates/flightviz-core/src/scale.rs
// Summary: Color scales mapping a bounded domain onto discrete gradient buckets.
// Notes:
// - Bucket count: ceil(span / step) clamped to [1, MAX_BUCKETS] when a step is
//   given, DEFAULT_BUCKETS otherwise. A flat domain collapses to one bucket.
// - Zero-centered scales use an even count so boundary n/2 is exactly zero.

use chrono::{DateTime, TimeDelta};

use crate::color::Rgba;
use crate::gradient::Gradient;

/// Buckets used when no step is configured.
pub const DEFAULT_BUCKETS: usize = 32;
/// Upper limit on buckets derived from a step.
pub const MAX_BUCKETS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    /// Domain symmetrized around zero before bucketing.
    ZeroCentered,
    /// Domain is UTC epoch seconds, shifted by `offset_secs` to local time.
    Time { offset_secs: i64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    title: String,
    unit: &'static str,
    kind: ScaleKind,
    gradient: Gradient,
    step: Option<f64>,
    raw: (f64, f64),
    // effective layout, derived from the fields above
    lo: f64,
    hi: f64,
    buckets: usize,
}

impl Scale {
    pub fn linear(domain: (f64, f64), title: impl Into<String>, gradient: Gradient) -> Self {
        Self::build(ScaleKind::Linear, domain, title.into(), gradient)
    }

    pub fn zero_centered(domain: (f64, f64), title: impl Into<String>, gradient: Gradient) -> Self {
        Self::build(ScaleKind::ZeroCentered, domain, title.into(), gradient)
    }

    /// Time-of-day scale over UTC epoch seconds, displayed at `offset` from UTC.
    pub fn time(domain: (f64, f64), offset: TimeDelta) -> Self {
        Self::build(ScaleKind::Time { offset_secs: offset.num_seconds() }, domain, "time".into(), Gradient::DEFAULT)
    }

    fn build(kind: ScaleKind, raw: (f64, f64), title: String, gradient: Gradient) -> Self {
        let mut s = Self { title, unit: "", kind, gradient, step: None, raw, lo: 0.0, hi: 0.0, buckets: 1 };
        s.relayout();
        s
    }

    /// Subdivide the domain every `step` units. Non-positive or non-finite
    /// steps are ignored.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = (step.is_finite() && step > 0.0).then_some(step);
        self.relayout();
        self
    }

    /// Unit suffix for labels, e.g. `" m"`.
    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    fn relayout(&mut self) {
        let (mut lo, mut hi) = (self.raw.0.min(self.raw.1), self.raw.0.max(self.raw.1));
        match self.kind {
            ScaleKind::Linear => {}
            ScaleKind::Time { offset_secs } => {
                lo += offset_secs as f64;
                hi += offset_secs as f64;
            }
            ScaleKind::ZeroCentered => {
                let m = lo.abs().max(hi.abs());
                if m == 0.0 {
                    let s = self.step.unwrap_or(1.0);
                    (self.lo, self.hi, self.buckets) = (-s, s, 2);
                    return;
                }
                lo = -m;
                hi = m;
            }
        }
        let span = hi - lo;
        let mut n = if !(span > 0.0) {
            1
        } else {
            match self.step {
                // small epsilon so spans that are exact multiples of step don't gain a bucket
                Some(step) => (((span / step) - 1e-9).ceil().max(1.0) as usize).min(MAX_BUCKETS),
                None => DEFAULT_BUCKETS,
            }
        };
        if self.kind == ScaleKind::ZeroCentered && n % 2 == 1 {
            n += 1;
        }
        (self.lo, self.hi, self.buckets) = (lo, hi, n);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn gradient(&self) -> Gradient {
        self.gradient
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }

    /// Effective domain after symmetrization or timezone shift.
    pub fn domain(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets
    }

    /// Map a raw input value into the scale's domain (applies the timezone shift).
    #[inline]
    pub fn shift(&self, value: f64) -> f64 {
        match self.kind {
            ScaleKind::Time { offset_secs } => value + offset_secs as f64,
            _ => value,
        }
    }

    /// Position of a raw value within the domain, clamped to [0, 1].
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.hi - self.lo;
        if !(span > 0.0) {
            return 0.0;
        }
        let t = (self.shift(value) - self.lo) / span;
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }

    /// Bucket index of a raw value; values outside the domain clamp to the ends.
    pub fn bucket_of(&self, value: f64) -> usize {
        if self.buckets == 1 {
            return 0;
        }
        let idx = (self.normalize(value) * self.buckets as f64).floor() as usize;
        idx.min(self.buckets - 1)
    }

    /// Lower edge of bucket `i` in domain units; `boundary(bucket_count())` is the top.
    pub fn boundary(&self, i: usize) -> f64 {
        let i = i.min(self.buckets);
        self.lo + (self.hi - self.lo) * (i as f64 / self.buckets as f64)
    }

    pub fn boundaries(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.buckets).map(move |i| self.boundary(i))
    }

    /// One color per bucket, sampled at evenly spaced gradient positions.
    /// Each call starts a fresh sequence.
    pub fn colors(&self) -> Colors {
        Colors { gradient: self.gradient, count: self.buckets, next: 0 }
    }

    pub fn color_at(&self, bucket: usize) -> Rgba {
        self.gradient.sample(position(bucket.min(self.buckets - 1), self.buckets))
    }

    pub fn color_of(&self, value: f64) -> Rgba {
        self.color_at(self.bucket_of(value))
    }

    /// Human-readable label for a value already in domain units.
    pub fn label(&self, domain_value: f64) -> String {
        match self.kind {
            ScaleKind::Time { .. } => DateTime::from_timestamp(domain_value.floor() as i64, 0)
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string()),
            _ => {
                let fine = match self.step {
                    Some(step) => step < 1.0,
                    None => self.hi - self.lo < 10.0,
                };
                if fine {
                    format!("{:.1}{}", domain_value, self.unit)
                } else {
                    format!("{:.0}{}", domain_value, self.unit)
                }
            }
        }
    }
}

#[inline]
fn position(i: usize, count: usize) -> f64 {
    if count <= 1 { 0.0 } else { i as f64 / (count - 1) as f64 }
}

/// Lazy color sequence over a scale's buckets.
#[derive(Clone, Debug)]
pub struct Colors {
    gradient: Gradient,
    count: usize,
    next: usize,
}

impl Iterator for Colors {
    type Item = Rgba;

    fn next(&mut self) -> Option<Rgba> {
        if self.next >= self.count {
            return None;
        }
        let c = self.gradient.sample(position(self.next, self.count));
        self.next += 1;
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Colors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_derives_bucket_count() {
        let s = Scale::linear((0.0, 10.0), "x", Gradient::DEFAULT).with_step(0.1);
        assert_eq!(s.bucket_count(), 100);
        let s = Scale::linear((0.0, 10.5), "x", Gradient::DEFAULT).with_step(1.0);
        assert_eq!(s.bucket_count(), 11);
    }

    #[test]
    fn step_is_capped() {
        let s = Scale::linear((0.0, 1e6), "x", Gradient::DEFAULT).with_step(0.001);
        assert_eq!(s.bucket_count(), MAX_BUCKETS);
    }

    #[test]
    fn invalid_step_falls_back_to_default() {
        let s = Scale::linear((0.0, 10.0), "x", Gradient::DEFAULT).with_step(-1.0);
        assert_eq!(s.bucket_count(), DEFAULT_BUCKETS);
        assert_eq!(s.step(), None);
    }

    #[test]
    fn bucket_of_clamps_to_ends() {
        let s = Scale::linear((0.0, 100.0), "x", Gradient::DEFAULT);
        assert_eq!(s.bucket_of(-50.0), 0);
        assert_eq!(s.bucket_of(0.0), 0);
        assert_eq!(s.bucket_of(100.0), DEFAULT_BUCKETS - 1);
        assert_eq!(s.bucket_of(1e9), DEFAULT_BUCKETS - 1);
        assert_eq!(s.bucket_of(f64::NAN), 0);
    }

    #[test]
    fn zero_centered_flat_zero_gets_two_buckets() {
        let s = Scale::zero_centered((0.0, 0.0), "climb", Gradient::BILINEAR).with_step(0.5);
        assert_eq!(s.domain(), (-0.5, 0.5));
        assert_eq!(s.bucket_count(), 2);
        assert_eq!(s.boundary(1), 0.0);
    }

    #[test]
    fn labels() {
        let alt = Scale::linear((0.0, 2000.0), "altitude", Gradient::DEFAULT).with_unit(" m");
        assert_eq!(alt.label(1234.4), "1234 m");
        let climb = Scale::zero_centered((-2.0, 3.0), "climb", Gradient::BILINEAR).with_step(0.1).with_unit(" m/s");
        assert_eq!(climb.label(1.26), "1.3 m/s");
        let t = Scale::time((0.0, 3600.0), TimeDelta::hours(2));
        assert_eq!(t.label(t.domain().0), "02:00");
    }
}
