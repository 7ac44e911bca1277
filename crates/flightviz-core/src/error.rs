// File: crates/flightviz-core/src/error.rs
// Summary: Error taxonomy for a visualization run; every variant aborts the run.

use thiserror::Error;

use crate::bounds::Metric;

/// Raised when a range is queried before any value was merged into it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no values recorded{}", .metric.map(|m| format!(" for metric '{}'", m.key())).unwrap_or_default())]
pub struct EmptyBoundsError {
    pub metric: Option<Metric>,
}

impl EmptyBoundsError {
    pub fn for_metric(metric: Metric) -> Self {
        Self { metric: Some(metric) }
    }
}

#[derive(Error, Debug)]
pub enum VizError {
    /// No tracks, unusable options or an invalid configuration file.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A track could not be read, parsed or analysed.
    #[error("track '{source_name}': {reason}")]
    TrackAnalysis { source_name: String, reason: String },

    #[error(transparent)]
    EmptyBounds(#[from] EmptyBoundsError),

    #[error("graph rendering failed: {0}")]
    Render(String),

    #[error("packaging failed: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VizError {
    pub fn track(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        VizError::TrackAnalysis { source_name: source_name.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, VizError>;
