// File: crates/flightviz-core/src/gradient.rs
// Summary: Named gradients mapping a normalized position in [0, 1] to a color.

use crate::color::Rgba;

/// A pure function from normalized position to color, with a lookup name.
#[derive(Clone, Copy, Debug)]
pub struct Gradient {
    pub name: &'static str,
    f: fn(f64) -> Rgba,
}

impl Gradient {
    /// Blue through cyan, green and yellow to red (HSL hue sweep).
    pub const DEFAULT: Gradient = Gradient { name: "default", f: default };
    /// Blue to white to red; white sits at the midpoint.
    pub const BILINEAR: Gradient = Gradient { name: "bilinear", f: bilinear };
    /// Dark to light grey.
    pub const GREYSCALE: Gradient = Gradient { name: "greyscale", f: greyscale };

    /// Sample at `t`; out-of-range (and NaN) positions are clamped.
    pub fn sample(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        (self.f)(t)
    }
}

impl PartialEq for Gradient {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

fn default(t: f64) -> Rgba {
    Rgba::from_hsl(2.0 * (1.0 - t) / 3.0, 1.0, 0.5)
}

fn bilinear(t: f64) -> Rgba {
    if t < 0.5 {
        let u = 2.0 * t;
        Rgba::from_unit(u, u, 1.0)
    } else {
        let u = 2.0 * (1.0 - t);
        Rgba::from_unit(1.0, u, u)
    }
}

fn greyscale(t: f64) -> Rgba {
    let v = 0.15 + 0.8 * t;
    Rgba::from_unit(v, v, v)
}

/// Return the built-in gradients.
pub fn presets() -> Vec<Gradient> {
    vec![Gradient::DEFAULT, Gradient::BILINEAR, Gradient::GREYSCALE]
}

/// Find a gradient by `name` (case-insensitive).
pub fn find(name: &str) -> Option<Gradient> {
    presets().into_iter().find(|g| g.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_blue_to_red() {
        assert_eq!(Gradient::DEFAULT.sample(0.0), Rgba::rgb(0, 0, 255));
        assert_eq!(Gradient::DEFAULT.sample(1.0), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn bilinear_is_white_at_midpoint() {
        assert_eq!(Gradient::BILINEAR.sample(0.0), Rgba::rgb(0, 0, 255));
        assert_eq!(Gradient::BILINEAR.sample(0.5), Rgba::WHITE);
        assert_eq!(Gradient::BILINEAR.sample(1.0), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn sample_clamps() {
        assert_eq!(Gradient::DEFAULT.sample(-3.0), Gradient::DEFAULT.sample(0.0));
        assert_eq!(Gradient::DEFAULT.sample(f64::NAN), Gradient::DEFAULT.sample(0.0));
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find("BILINEAR"), Some(Gradient::BILINEAR));
        assert!(find("plasma").is_none());
    }
}
