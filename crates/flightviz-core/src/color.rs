// File: crates/flightviz-core/src/color.rs
// Summary: 8-bit RGBA color with KML (aabbggrr) and hex conversions.

use std::fmt;

/// Straight (non-premultiplied) 8-bit RGBA.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from unit-range channels; values outside [0, 1] are clamped.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(q(r), q(g), q(b))
    }

    /// HSL with all components in [0, 1] (hue wraps).
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        if s <= 0.0 {
            return Self::from_unit(l, l, l);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h.rem_euclid(1.0);
        Self::from_unit(
            hue_channel(p, q, h + 1.0 / 3.0),
            hue_channel(p, q, h),
            hue_channel(p, q, h - 1.0 / 3.0),
        )
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rrggbbaa` or `rrggbbaa`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// KML color notation: alpha, blue, green, red.
    pub fn to_kml(&self) -> String {
        format!("{:02x}{:02x}{:02x}{:02x}", self.a, self.b, self.g, self.r)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

fn hue_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kml_channel_order() {
        assert_eq!(Rgba::rgba(0x11, 0x22, 0x33, 0x44).to_kml(), "44332211");
    }

    #[test]
    fn hex_forms() {
        assert_eq!(Rgba::parse_hex("#ff8000"), Some(Rgba::rgb(255, 128, 0)));
        assert_eq!(Rgba::parse_hex("ff8000"), Some(Rgba::rgb(255, 128, 0)));
        assert_eq!(Rgba::parse_hex("#ff800080"), Some(Rgba::rgba(255, 128, 0, 128)));
        assert_eq!(Rgba::parse_hex("#ff80"), None);
        assert_eq!(Rgba::parse_hex("zzzzzz"), None);
        assert_eq!(Rgba::parse_hex("+f+f+f"), None);
        assert_eq!(Rgba::parse_hex("#-1ff00"), None);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgba::from_hsl(0.0, 1.0, 0.5), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::from_hsl(2.0 / 3.0, 1.0, 0.5), Rgba::rgb(0, 0, 255));
        assert_eq!(Rgba::from_hsl(0.3, 0.0, 1.0), Rgba::WHITE);
    }
}
