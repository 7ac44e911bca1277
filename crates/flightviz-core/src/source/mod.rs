// File: crates/flightviz-core/src/source/mod.rs
// Summary: Track file loading, dispatched on file extension.

pub mod csv_track;
pub mod igc;

use std::path::Path;

use tracing::info;

use crate::error::{Result, VizError};
use crate::track::Track;

/// Read and parse one track file (`.igc` or `.csv`).
pub fn load(path: &Path) -> Result<Track> {
    let name = path.display().to_string();
    let ext = path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase()).unwrap_or_default();
    let parse: fn(&str, &str) -> Result<Track> = match ext.as_str() {
        "igc" => igc::parse,
        "csv" => csv_track::parse,
        _ => return Err(VizError::track(&name, format!("unsupported track format '{ext}'"))),
    };
    let bytes = std::fs::read(path).map_err(|e| VizError::track(&name, e.to_string()))?;
    // IGC files are frequently Latin-1; keep what decodes
    let text = String::from_utf8_lossy(&bytes);
    let track = parse(&name, &text)?;
    info!(track = %name, fixes = track.fixes.len(), "loaded track");
    Ok(track)
}
