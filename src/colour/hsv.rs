//! HSV colour representation.
//!
//! Conversions operate directly on linear RGB components. No gamma curve is
//! applied in either direction, so a round trip through [`Hsv`] reproduces
//! the input channels up to float rounding.

use bevy::color::LinearRgba;

/// A colour in hue/saturation/value form, all components normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsv {
    /// Hue as a fraction of a full turn. `0.0` and `1.0` are both red.
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Convert from linear RGB. Alpha is discarded.
    pub fn from_rgb(rgb: LinearRgba) -> Self {
        let (r, g, b) = (rgb.red, rgb.green, rgb.blue);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let saturation = if max > 0.0 { delta / max } else { 0.0 };

        let sector = if delta <= 0.0 {
            0.0
        } else if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };

        let mut hue = sector / 6.0;
        if hue < 0.0 {
            hue += 1.0;
        }

        Self {
            hue,
            saturation,
            value: max,
        }
    }

    /// Convert to linear RGB with an opaque alpha.
    pub fn to_rgb(self) -> LinearRgba {
        let (r, g, b) = self.to_rgb_components();
        LinearRgba::new(r, g, b, 1.0)
    }

    pub(crate) fn to_rgb_components(self) -> (f32, f32, f32) {
        let v = self.value;
        if self.saturation <= 0.0 {
            return (v, v, v);
        }

        let h6 = self.hue.rem_euclid(1.0) * 6.0;
        let sector = h6.floor();
        let f = h6 - sector;
        let p = v * (1.0 - self.saturation);
        let q = v * (1.0 - self.saturation * f);
        let t = v * (1.0 - self.saturation * (1.0 - f));

        match sector as u32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    }
}

impl From<LinearRgba> for Hsv {
    fn from(rgb: LinearRgba) -> Self {
        Self::from_rgb(rgb)
    }
}

impl From<Hsv> for LinearRgba {
    fn from(hsv: Hsv) -> Self {
        hsv.to_rgb()
    }
}
