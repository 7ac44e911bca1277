// File: crates/flightviz-core/src/pipeline.rs
// Summary: Staged run driver: collect -> analyse -> merge bounds -> scales/styles -> compose.
// Notes:
// - Each stage consumes the previous one, so stages cannot run out of order.
// - Any failure aborts the run; nothing is written until `Package::write`.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::info;

use crate::bounds::BoundsSet;
use crate::compose::{compose_track, TrackElements};
use crate::config::RunConfig;
use crate::context::RenderContext;
use crate::error::{Result, VizError};
use crate::hints::Hints;
use crate::kml::Document;
use crate::kmz::Package;
use crate::source;
use crate::track::{AnalysedTrack, Track};

/// A track file paired with the overrides that apply to it.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRequest {
    pub path: PathBuf,
    pub hints: Hints,
}

impl TrackRequest {
    pub fn new(path: impl Into<PathBuf>, hints: Hints) -> Self {
        Self { path: path.into(), hints }
    }
}

/// Stage 1: parsed tracks with their hints. Never empty.
#[derive(Debug)]
pub struct Collected {
    entries: Vec<(Track, Hints)>,
}

impl Collected {
    pub fn new(entries: Vec<(Track, Hints)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(VizError::Configuration("no tracks supplied".into()));
        }
        Ok(Self { entries })
    }

    /// Load every requested file. The first failure aborts.
    pub fn resolve(requests: Vec<TrackRequest>) -> Result<Self> {
        if requests.is_empty() {
            return Err(VizError::Configuration("no tracks supplied".into()));
        }
        let entries = requests
            .into_par_iter()
            .map(|req| source::load(&req.path).map(|track| (track, req.hints)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Analyse all tracks independently; input order is preserved.
    pub fn analyse(self) -> Result<Analysed> {
        let entries = self
            .entries
            .into_par_iter()
            .map(|(track, hints)| track.analyse().map(|a| (a, hints)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Analysed { entries })
    }
}

/// Stage 2: analysed tracks, each carrying its own bounds.
#[derive(Debug)]
pub struct Analysed {
    entries: Vec<(AnalysedTrack, Hints)>,
}

impl Analysed {
    pub fn tracks(&self) -> impl Iterator<Item = &AnalysedTrack> {
        self.entries.iter().map(|(t, _)| t)
    }

    /// Global bounds; independent of track order.
    pub fn merge_bounds(&self) -> BoundsSet {
        self.tracks().fold(BoundsSet::new(), |mut acc, t| {
            acc.merge(&t.bounds);
            acc
        })
    }

    /// Merge bounds, derive scales and allocate the shared style pool.
    pub fn prepare(self, config: RunConfig) -> Result<Prepared> {
        config.validate()?;
        let bounds = self.merge_bounds();
        let ctx = RenderContext::new(config, bounds)?;
        info!(tracks = self.entries.len(), styles = ctx.styles.len(), "prepared shared scales and styles");
        Ok(Prepared { ctx, entries: self.entries })
    }
}

/// Stage 3: read-only context plus tracks, ready for composition.
#[derive(Debug)]
pub struct Prepared {
    ctx: RenderContext,
    entries: Vec<(AnalysedTrack, Hints)>,
}

impl Prepared {
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Per-track elements, in input order. Composition only reads the context.
    pub fn compose_tracks(&self) -> Result<Vec<TrackElements>> {
        self.entries
            .par_iter()
            .enumerate()
            .map(|(i, (track, hints))| compose_track(&self.ctx, i, track, hints))
            .collect()
    }

    /// Aggregate shared styles and every track's elements into one package.
    pub fn compose(&self) -> Result<Package> {
        let mut document = Document::new("flightviz");
        document.styles = self.ctx.styles.iter().cloned().collect();
        let mut package = Package::new(document);
        for elements in self.compose_tracks()? {
            package.document.features.push(elements.folder.into());
            package.files.extend(elements.images);
        }
        Ok(package)
    }
}

/// Run every stage over already-parsed tracks.
pub fn run_tracks(entries: Vec<(Track, Hints)>, config: RunConfig) -> Result<Package> {
    Collected::new(entries)?.analyse()?.prepare(config)?.compose()
}

/// Run every stage starting from file requests.
pub fn run(requests: Vec<TrackRequest>, config: RunConfig) -> Result<Package> {
    config.validate()?;
    Collected::resolve(requests)?.analyse()?.prepare(config)?.compose()
}
