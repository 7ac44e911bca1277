// File: crates/flightviz-core/src/hints.rs
// Summary: Per-track presentation overrides supplied by the caller.

use crate::color::Rgba;
use crate::error::{Result, VizError};
use crate::track::Track;

/// Color used for a track's solid line when no hint is given.
pub const DEFAULT_TRACK_COLOR: Rgba = Rgba::rgb(255, 0, 0);

/// Unset fields leave the track's own values in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hints {
    pub color: Option<Rgba>,
    pub glider_type: Option<String>,
    pub pilot_name: Option<String>,
}

impl Hints {
    /// Build hints from raw option strings; a color that does not parse is a
    /// configuration error.
    pub fn from_options(color: Option<&str>, glider_type: Option<&str>, pilot_name: Option<&str>) -> Result<Self> {
        let color = color
            .map(|c| Rgba::parse_hex(c).ok_or_else(|| VizError::Configuration(format!("invalid color '{c}'"))))
            .transpose()?;
        Ok(Self { color, glider_type: glider_type.map(str::to_string), pilot_name: pilot_name.map(str::to_string) })
    }

    pub fn is_empty(&self) -> bool {
        self == &Hints::default()
    }

    pub fn color_or_default(&self) -> Rgba {
        self.color.unwrap_or(DEFAULT_TRACK_COLOR)
    }

    /// Hinted pilot name, else the recorder header, else the source name.
    pub fn pilot_name<'a>(&'a self, track: &'a Track) -> &'a str {
        self.pilot_name.as_deref().or(track.pilot_name.as_deref()).unwrap_or(&track.source_name)
    }

    pub fn glider_type<'a>(&'a self, track: &'a Track) -> Option<&'a str> {
        self.glider_type.as_deref().or(track.glider_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_set_fields() {
        let mut track = Track::new("a.igc", Vec::new());
        track.pilot_name = Some("Recorder Pilot".into());
        track.glider_type = Some("Alpha".into());

        let none = Hints::default();
        assert_eq!(none.pilot_name(&track), "Recorder Pilot");
        assert_eq!(none.glider_type(&track), Some("Alpha"));

        let h = Hints::from_options(None, Some("Beta"), None).unwrap();
        assert_eq!(h.pilot_name(&track), "Recorder Pilot");
        assert_eq!(h.glider_type(&track), Some("Beta"));
    }

    #[test]
    fn bad_color_is_configuration_error() {
        let err = Hints::from_options(Some("purple"), None, None).unwrap_err();
        assert!(matches!(err, VizError::Configuration(_)));
    }
}
