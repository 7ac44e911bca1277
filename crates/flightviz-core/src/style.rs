// File: crates/flightviz-core/src/style.rs
// Summary: Shared style pool; one style per color bucket of every scale, referenced by index.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::color::Rgba;
use crate::context::{ScaleId, Scales};

/// Icon shared by every pooled style (palette 4, icon 24).
pub const ICON_HREF: &str = "http://maps.google.com/mapfiles/kml/pal4/icon24.png";
pub const ICON_SCALE: f64 = 0.5;
/// Info-window template shared by every pooled style.
pub const BALLOON_TEXT: &str = "$[description]";
pub const LINE_WIDTH: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct IconStyle {
    pub href: &'static str,
    pub scale: f64,
}

impl IconStyle {
    pub const fn shared() -> Self {
        Self { href: ICON_HREF, scale: ICON_SCALE }
    }
}

/// A presentation style: label and line color plus the shared icon and balloon.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub id: String,
    pub color: Rgba,
    pub line_width: f64,
    pub icon: Option<IconStyle>,
    pub balloon_text: Option<&'static str>,
}

impl Style {
    /// Line-only style, used for a track's solid hint-colored line.
    pub fn line(id: impl Into<String>, color: Rgba, line_width: f64) -> Self {
        Self { id: id.into(), color, line_width, icon: None, balloon_text: None }
    }

    pub fn url(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Styles for all scales, allocated once per run and shared by every track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StylePool {
    styles: Vec<Style>,
    ranges: BTreeMap<ScaleId, Range<usize>>,
}

impl StylePool {
    pub fn allocate(scales: &Scales) -> Self {
        let mut pool = StylePool::default();
        for id in ScaleId::ALL {
            let start = pool.styles.len();
            for (bucket, color) in scales.get(id).colors().enumerate() {
                pool.styles.push(Style {
                    id: format!("{}-{}", id.key(), bucket),
                    color,
                    line_width: LINE_WIDTH,
                    icon: Some(IconStyle::shared()),
                    balloon_text: Some(BALLOON_TEXT),
                });
            }
            pool.ranges.insert(id, start..pool.styles.len());
        }
        pool
    }

    /// Pool index for a scale bucket; out-of-range buckets clamp to the last one.
    pub fn index_of(&self, id: ScaleId, bucket: usize) -> usize {
        let r = self.range(id);
        if r.is_empty() {
            return r.start;
        }
        (r.start + bucket).min(r.end - 1)
    }

    /// Pool index for a raw value colored against scale `id`.
    pub fn index_for_value(&self, scales: &Scales, id: ScaleId, value: f64) -> usize {
        self.index_of(id, scales.get(id).bucket_of(value))
    }

    pub fn range(&self, id: ScaleId) -> Range<usize> {
        self.ranges.get(&id).cloned().unwrap_or(0..0)
    }

    pub fn get(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{Bounds, BoundsSet, Metric};
    use crate::config::RunConfig;

    fn scales() -> Scales {
        let mut b = BoundsSet::new();
        b.insert(Metric::Altitude, Bounds::new(500.0, 1500.0));
        b.insert(Metric::Climb, Bounds::new(-2.0, 3.0));
        b.insert(Metric::Speed, Bounds::new(0.0, 60.0));
        b.insert(Metric::Time, Bounds::new(0.0, 3600.0));
        Scales::derive(&b, &RunConfig::default()).unwrap()
    }

    #[test]
    fn ranges_are_contiguous_and_cover_pool() {
        let scales = scales();
        let pool = StylePool::allocate(&scales);
        let mut next = 0;
        for id in ScaleId::ALL {
            let r = pool.range(id);
            assert_eq!(r.start, next);
            assert_eq!(r.len(), scales.get(id).bucket_count());
            next = r.end;
        }
        assert_eq!(next, pool.len());
        assert_eq!(pool.get(pool.range(ScaleId::Climb).start).unwrap().id, "climb-0");
    }

    #[test]
    fn index_clamps_to_scale_range() {
        let pool = StylePool::allocate(&scales());
        let r = pool.range(ScaleId::Altitude);
        assert_eq!(pool.index_of(ScaleId::Altitude, 10_000), r.end - 1);
        let style = pool.get(pool.index_of(ScaleId::Speed, 0)).unwrap();
        assert_eq!(style.icon, Some(IconStyle::shared()));
        assert_eq!(style.balloon_text, Some(BALLOON_TEXT));
    }
}
