// File: crates/flightviz-core/src/kml.rs
// Summary: Minimal KML document model (folders, placemarks, overlays, shared styles) and XML output.

use std::borrow::Cow;

use crate::style::Style;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
    pub ele: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Placemark {
    pub name: Option<String>,
    pub description: Option<String>,
    pub style_url: Option<String>,
    pub geometry: Geometry,
}

/// Image pinned to the viewport, e.g. a profile graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenOverlay {
    pub name: String,
    pub href: String,
    pub visible: bool,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Folder {
    pub name: String,
    pub description: Option<String>,
    pub visible: bool,
    /// Only one child visible at a time.
    pub radio: bool,
    pub styles: Vec<Style>,
    pub features: Vec<Feature>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), visible: true, ..Default::default() }
    }

    pub fn push(&mut self, feature: impl Into<Feature>) {
        self.features.push(feature.into());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Feature {
    Folder(Folder),
    Placemark(Placemark),
    ScreenOverlay(ScreenOverlay),
}

impl From<Folder> for Feature {
    fn from(f: Folder) -> Self {
        Feature::Folder(f)
    }
}

impl From<Placemark> for Feature {
    fn from(p: Placemark) -> Self {
        Feature::Placemark(p)
    }
}

impl From<ScreenOverlay> for Feature {
    fn from(o: ScreenOverlay) -> Self {
        Feature::ScreenOverlay(o)
    }
}

/// Root document; `styles` is the shared style pool.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub name: String,
    pub styles: Vec<Style>,
    pub features: Vec<Feature>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn to_kml(&self) -> String {
        let mut w = XmlWriter::default();
        w.raw("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        w.open("kml xmlns=\"http://www.opengis.net/kml/2.2\"");
        w.open("Document");
        w.leaf("name", &self.name);
        for s in &self.styles {
            write_style(&mut w, s);
        }
        for f in &self.features {
            write_feature(&mut w, f);
        }
        w.close("Document");
        w.close("kml");
        w.out
    }
}

fn write_style(w: &mut XmlWriter, s: &Style) {
    w.open(&format!("Style id=\"{}\"", escape(&s.id)));
    if let Some(icon) = &s.icon {
        w.open("IconStyle");
        w.leaf("scale", &icon.scale.to_string());
        w.open("Icon");
        w.leaf("href", icon.href);
        w.close("Icon");
        w.close("IconStyle");
        w.open("LabelStyle");
        w.leaf("color", &s.color.to_kml());
        w.close("LabelStyle");
    }
    w.open("LineStyle");
    w.leaf("color", &s.color.to_kml());
    w.leaf("width", &s.line_width.to_string());
    w.close("LineStyle");
    if let Some(text) = s.balloon_text {
        w.open("BalloonStyle");
        w.leaf("text", text);
        w.close("BalloonStyle");
    }
    w.close("Style");
}

fn write_feature(w: &mut XmlWriter, f: &Feature) {
    match f {
        Feature::Folder(folder) => {
            w.open("Folder");
            w.leaf("name", &folder.name);
            if let Some(d) = &folder.description {
                w.leaf("description", d);
            }
            w.leaf("visibility", if folder.visible { "1" } else { "0" });
            if folder.radio {
                w.raw("<Style><ListStyle><listItemType>radioFolder</listItemType></ListStyle></Style>");
            }
            for s in &folder.styles {
                write_style(w, s);
            }
            for child in &folder.features {
                write_feature(w, child);
            }
            w.close("Folder");
        }
        Feature::Placemark(p) => {
            w.open("Placemark");
            if let Some(n) = &p.name {
                w.leaf("name", n);
            }
            if let Some(d) = &p.description {
                w.leaf("description", d);
            }
            if let Some(u) = &p.style_url {
                w.leaf("styleUrl", u);
            }
            match &p.geometry {
                Geometry::Point(c) => {
                    w.open("Point");
                    w.leaf("altitudeMode", "absolute");
                    w.leaf("coordinates", &coords(std::slice::from_ref(c)));
                    w.close("Point");
                }
                Geometry::LineString(cs) => {
                    w.open("LineString");
                    w.leaf("altitudeMode", "absolute");
                    w.leaf("coordinates", &coords(cs));
                    w.close("LineString");
                }
            }
            w.close("Placemark");
        }
        Feature::ScreenOverlay(o) => {
            w.open("ScreenOverlay");
            w.leaf("name", &o.name);
            w.leaf("visibility", if o.visible { "1" } else { "0" });
            w.open("Icon");
            w.leaf("href", &o.href);
            w.close("Icon");
            w.raw("<overlayXY x=\"0\" y=\"0\" xunits=\"fraction\" yunits=\"fraction\"/>");
            w.raw("<screenXY x=\"0\" y=\"16\" xunits=\"fraction\" yunits=\"pixels\"/>");
            w.raw(&format!("<size x=\"{}\" y=\"{}\" xunits=\"pixels\" yunits=\"pixels\"/>", o.width, o.height));
            w.close("ScreenOverlay");
        }
    }
}

fn coords(cs: &[Coord]) -> String {
    cs.iter()
        .map(|c| format!("{:.6},{:.6},{:.0}", c.lon, c.lat, c.ele))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape XML text and attribute content.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[derive(Default)]
struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn raw(&mut self, s: &str) {
        self.indent();
        self.out.push_str(s);
        self.out.push('\n');
    }

    /// `head` is the full start tag content, attributes included.
    fn open(&mut self, head: &str) {
        self.raw(&format!("<{head}>"));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.raw(&format!("</{tag}>"));
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.raw(&format!("<{tag}>{}</{tag}>", escape(text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a & <b>"), "a &amp; &lt;b&gt;");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn serializes_nested_features() {
        let mut doc = Document::new("Flight <1>");
        doc.styles.push(Style::line("solid", Rgba::rgb(255, 0, 0), 3.0));
        let mut folder = Folder::new("Pilot");
        folder.push(Placemark {
            name: None,
            description: None,
            style_url: Some("#solid".into()),
            geometry: Geometry::LineString(vec![
                Coord { lon: 7.0, lat: 46.0, ele: 1000.0 },
                Coord { lon: 7.1, lat: 46.1, ele: 1100.4 },
            ]),
        });
        doc.features.push(folder.into());

        let kml = doc.to_kml();
        assert!(kml.contains("<name>Flight &lt;1&gt;</name>"));
        assert!(kml.contains("<Style id=\"solid\">"));
        assert!(kml.contains("<color>ff0000ff</color>"));
        assert!(kml.contains("<coordinates>7.000000,46.000000,1000 7.100000,46.100000,1100</coordinates>"));
        assert_eq!(kml.matches("<Folder>").count(), kml.matches("</Folder>").count());
    }
}
