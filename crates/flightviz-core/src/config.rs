// File: crates/flightviz-core/src/config.rs
// Summary: Immutable per-run configuration with defaults and optional TOML loading.

use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::gradient::{self, Gradient};

/// Default profile graph width in pixels.
pub const GRAPH_WIDTH: u32 = 600;
/// Default profile graph height in pixels.
pub const GRAPH_HEIGHT: u32 = 300;
/// Default climb scale subdivision, m/s.
pub const CLIMB_STEP: f64 = 0.1;

/// Settings shared by every track of a run.
///
/// Any field may be omitted from a TOML file; omitted fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Whole hours east of UTC used for time-of-day coloring.
    pub timezone_offset: i32,
    pub graph_width: u32,
    pub graph_height: u32,
    pub climb_step: f64,
    pub altitude_step: Option<f64>,
    pub speed_step: Option<f64>,
    pub altitude_gradient: String,
    pub climb_gradient: String,
    pub speed_gradient: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timezone_offset: 0,
            graph_width: GRAPH_WIDTH,
            graph_height: GRAPH_HEIGHT,
            climb_step: CLIMB_STEP,
            altitude_step: None,
            speed_step: None,
            altitude_gradient: Gradient::DEFAULT.name.to_string(),
            climb_gradient: Gradient::BILINEAR.name.to_string(),
            speed_gradient: Gradient::DEFAULT.name.to_string(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: RunConfig = toml::from_str(src).map_err(|e| VizError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .map_err(|e| VizError::Configuration(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-14..=14).contains(&self.timezone_offset) {
            return Err(VizError::Configuration(format!("timezone offset {}h out of range", self.timezone_offset)));
        }
        if self.graph_width == 0 || self.graph_height == 0 || self.graph_width > 4096 || self.graph_height > 4096 {
            return Err(VizError::Configuration(format!(
                "graph size {}x{} must be within 1..=4096",
                self.graph_width, self.graph_height
            )));
        }
        let steps = [Some(self.climb_step), self.altitude_step, self.speed_step];
        if steps.iter().flatten().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(VizError::Configuration("scale steps must be positive".into()));
        }
        for name in [&self.altitude_gradient, &self.climb_gradient, &self.speed_gradient] {
            lookup_gradient(name)?;
        }
        Ok(())
    }

    pub fn timezone_offset(&self) -> TimeDelta {
        TimeDelta::hours(self.timezone_offset as i64)
    }

    pub fn altitude_gradient(&self) -> Result<Gradient> {
        lookup_gradient(&self.altitude_gradient)
    }

    pub fn climb_gradient(&self) -> Result<Gradient> {
        lookup_gradient(&self.climb_gradient)
    }

    pub fn speed_gradient(&self) -> Result<Gradient> {
        lookup_gradient(&self.speed_gradient)
    }
}

fn lookup_gradient(name: &str) -> Result<Gradient> {
    gradient::find(name).ok_or_else(|| VizError::Configuration(format!("unknown gradient '{name}'")))
}
