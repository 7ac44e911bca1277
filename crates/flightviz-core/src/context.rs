// File: crates/flightviz-core/src/context.rs
// Summary: Run-wide scales and the read-only context handed to per-track composition.

use chrono::TimeDelta;
use tracing::info;

use crate::bounds::{BoundsSet, Metric};
use crate::config::RunConfig;
use crate::error::Result;
use crate::gradient::Gradient;
use crate::scale::Scale;
use crate::style::StylePool;

/// Which global scale a value is colored against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScaleId {
    Altitude,
    Climb,
    Speed,
    Time,
    Progress,
}

impl ScaleId {
    pub const ALL: [ScaleId; 5] = [ScaleId::Altitude, ScaleId::Climb, ScaleId::Speed, ScaleId::Time, ScaleId::Progress];

    pub const fn key(self) -> &'static str {
        match self {
            ScaleId::Altitude => "altitude",
            ScaleId::Climb => "climb",
            ScaleId::Speed => "speed",
            ScaleId::Time => "time",
            ScaleId::Progress => "progress",
        }
    }

    /// Bounded metric backing this scale; progress is always (0, 1).
    pub const fn metric(self) -> Option<Metric> {
        match self {
            ScaleId::Altitude => Some(Metric::Altitude),
            ScaleId::Climb => Some(Metric::Climb),
            ScaleId::Speed => Some(Metric::Speed),
            ScaleId::Time => Some(Metric::Time),
            ScaleId::Progress => None,
        }
    }
}

/// One scale per metric, derived once per run.
#[derive(Clone, Debug, PartialEq)]
pub struct Scales {
    pub altitude: Scale,
    pub climb: Scale,
    pub speed: Scale,
    pub time: Scale,
    pub progress: Scale,
}

impl Scales {
    /// Deterministic for identical bounds and configuration. Fails when any
    /// metric never received a value.
    pub fn derive(bounds: &BoundsSet, config: &RunConfig) -> Result<Self> {
        let mut altitude = Scale::linear(bounds.tuple(Metric::Altitude)?, "altitude", config.altitude_gradient()?)
            .with_unit(" m");
        if let Some(step) = config.altitude_step {
            altitude = altitude.with_step(step);
        }
        let climb = Scale::zero_centered(bounds.tuple(Metric::Climb)?, "climb", config.climb_gradient()?)
            .with_step(config.climb_step)
            .with_unit(" m/s");
        let mut speed = Scale::linear(bounds.tuple(Metric::Speed)?, "ground speed", config.speed_gradient()?)
            .with_unit(" km/h");
        if let Some(step) = config.speed_step {
            speed = speed.with_step(step);
        }
        let time = Scale::time(bounds.tuple(Metric::Time)?, config.timezone_offset());
        let progress = Scale::linear((0.0, 1.0), "progress", Gradient::DEFAULT);

        let scales = Self { altitude, climb, speed, time, progress };
        for id in ScaleId::ALL {
            let s = scales.get(id);
            let (lo, hi) = s.domain();
            info!(scale = id.key(), lo, hi, buckets = s.bucket_count(), "derived scale");
        }
        Ok(scales)
    }

    pub fn get(&self, id: ScaleId) -> &Scale {
        match id {
            ScaleId::Altitude => &self.altitude,
            ScaleId::Climb => &self.climb,
            ScaleId::Speed => &self.speed,
            ScaleId::Time => &self.time,
            ScaleId::Progress => &self.progress,
        }
    }
}

/// Everything composition reads; immutable once built.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub config: RunConfig,
    pub timezone_offset: TimeDelta,
    pub bounds: BoundsSet,
    pub scales: Scales,
    pub styles: StylePool,
}

impl RenderContext {
    pub fn new(config: RunConfig, bounds: BoundsSet) -> Result<Self> {
        let scales = Scales::derive(&bounds, &config)?;
        let styles = StylePool::allocate(&scales);
        Ok(Self { timezone_offset: config.timezone_offset(), config, bounds, scales, styles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::error::VizError;

    #[test]
    fn missing_metric_fails_derivation() {
        let mut b = BoundsSet::new();
        b.insert(Metric::Altitude, Bounds::new(0.0, 100.0));
        let err = Scales::derive(&b, &RunConfig::default()).unwrap_err();
        assert!(matches!(err, VizError::EmptyBounds(e) if e.metric == Some(Metric::Climb)));
    }

    #[test]
    fn climb_is_symmetric_and_time_is_shifted() {
        let mut b = BoundsSet::new();
        b.insert(Metric::Altitude, Bounds::new(0.0, 100.0));
        b.insert(Metric::Climb, Bounds::new(-1.0, 4.0));
        b.insert(Metric::Speed, Bounds::new(10.0, 40.0));
        b.insert(Metric::Time, Bounds::new(0.0, 7200.0));
        let config = RunConfig { timezone_offset: 2, ..RunConfig::default() };
        let ctx = RenderContext::new(config, b).unwrap();
        assert_eq!(ctx.scales.climb.domain(), (-4.0, 4.0));
        assert_eq!(ctx.scales.climb.bucket_count(), 80);
        assert_eq!(ctx.scales.time.domain(), (7200.0, 14400.0));
        assert_eq!(ctx.timezone_offset, TimeDelta::hours(2));
        assert_eq!(ctx.scales.progress.domain(), (0.0, 1.0));
    }
}
