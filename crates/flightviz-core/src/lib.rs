// File: crates/flightviz-core/src/lib.rs
// Summary: Core library entry point; multi-track bounds, color scales, shared styles and KMZ output.

pub mod bounds;
pub mod color;
pub mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod gradient;
pub mod graph;
pub mod hints;
pub mod kml;
pub mod kmz;
pub mod pipeline;
pub mod scale;
pub mod source;
pub mod style;
pub mod track;

pub use bounds::{Bounds, BoundsSet, Metric};
pub use color::Rgba;
pub use config::RunConfig;
pub use context::{RenderContext, ScaleId, Scales};
pub use error::{EmptyBoundsError, Result, VizError};
pub use gradient::Gradient;
pub use hints::Hints;
pub use kmz::Package;
pub use pipeline::{run, run_tracks, TrackRequest};
pub use scale::{Scale, ScaleKind};
pub use style::{Style, StylePool};
pub use track::{AnalysedTrack, Fix, Track};
