//! Editable colour definitions with cached HSV and hex views.

use bevy::color::LinearRgba;

use super::hex::{format_hex, parse_hex_lenient};
use super::hsv::Hsv;

/// A colour plus the material scalars written to a section's colour slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecolourData {
    pub colour: LinearRgba,
    pub specular: f32,
    pub metallic: f32,
    /// Detail texture strength. `1.0` is the texture's authored strength.
    pub detail: f32,
}

impl Default for RecolourData {
    fn default() -> Self {
        Self {
            colour: LinearRgba::WHITE,
            specular: 127.0 / 255.0,
            metallic: 0.0,
            detail: 1.0,
        }
    }
}

impl RecolourData {
    pub fn new(colour: LinearRgba) -> Self {
        Self {
            colour,
            ..Default::default()
        }
    }

    pub fn with_specular(mut self, specular: f32) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn with_detail(mut self, detail: f32) -> Self {
        self.detail = detail;
        self
    }
}

/// One editable colour definition.
///
/// Linear RGB is the canonical value. The HSV and hex views are derived
/// lazily and each carries its own dirty flag, so a UI that re-submits an
/// unchanged value every frame does not churn the caches.
///
/// Whichever view was written last is the source of truth: writing HSV
/// keeps that exact HSV (rather than re-deriving it from RGB), and a
/// successful hex write keeps the text as typed.
#[derive(Clone, Debug)]
pub struct ColourSlot {
    colour: LinearRgba,
    hsv: Hsv,
    hsv_dirty: bool,
    hex: String,
    hex_dirty: bool,
    hex_valid: bool,
    pub specular: f32,
    pub metallic: f32,
    pub detail: f32,
}

impl Default for ColourSlot {
    fn default() -> Self {
        Self::new(RecolourData::default())
    }
}

impl From<RecolourData> for ColourSlot {
    fn from(data: RecolourData) -> Self {
        Self::new(data)
    }
}

impl ColourSlot {
    pub fn new(data: RecolourData) -> Self {
        Self {
            colour: data.colour,
            hsv: Hsv::default(),
            hsv_dirty: true,
            hex: String::new(),
            hex_dirty: true,
            hex_valid: true,
            specular: data.specular,
            metallic: data.metallic,
            detail: data.detail,
        }
    }

    /// The canonical linear colour.
    pub fn colour(&self) -> LinearRgba {
        self.colour
    }

    pub fn set_colour(&mut self, colour: LinearRgba) {
        if self.colour == colour {
            return;
        }

        self.colour = colour;
        self.hsv_dirty = true;
        self.invalidate_hex();
    }

    pub fn hsv(&mut self) -> Hsv {
        if self.hsv_dirty {
            self.hsv = Hsv::from_rgb(self.colour);
            self.hsv_dirty = false;
        }
        self.hsv
    }

    pub fn set_hsv(&mut self, hsv: Hsv) {
        if self.hsv() == hsv {
            return;
        }

        let (r, g, b) = hsv.to_rgb_components();
        self.colour = LinearRgba::new(r, g, b, self.colour.alpha);
        self.hsv = hsv;
        self.hsv_dirty = false;
        self.invalidate_hex();
    }

    /// Drop the cached hex text, including any rejected input.
    fn invalidate_hex(&mut self) {
        self.hex_dirty = true;
        self.hex_valid = true;
    }

    /// The hex view. Returns the last text written if it failed to parse.
    pub fn hex(&mut self) -> &str {
        if self.hex_dirty {
            self.hex = format_hex(self.colour);
            self.hex_dirty = false;
            self.hex_valid = true;
        }
        &self.hex
    }

    /// Write hex text. Returns whether it parsed.
    ///
    /// Bare `RRGGBB`/`RRGGBBAA` text is accepted and stored with a leading
    /// `#`. Text that does not parse is kept for display but leaves the
    /// canonical colour untouched.
    pub fn set_hex(&mut self, text: &str) -> bool {
        if !self.hex_dirty && self.hex == text {
            return self.hex_valid;
        }

        self.hex_dirty = false;
        match parse_hex_lenient(text) {
            Ok((colour, corrected)) => {
                self.hex = corrected.unwrap_or_else(|| text.to_string());
                self.colour = colour;
                self.hsv_dirty = true;
                self.hex_valid = true;
            }
            Err(_) => {
                self.hex = text.to_string();
                self.hex_valid = false;
            }
        }
        self.hex_valid
    }

    /// Whether the hex view holds a parsable colour. Only a rejected
    /// [`set_hex`](Self::set_hex) clears this; any later colour write sets it.
    pub fn hex_valid(&self) -> bool {
        self.hex_valid
    }

    /// Export the slot as a colour+material tuple.
    pub fn data(&self) -> RecolourData {
        RecolourData {
            colour: self.colour,
            specular: self.specular,
            metallic: self.metallic,
            detail: self.detail,
        }
    }

    /// Replace colour and material scalars from a tuple.
    ///
    /// Any rejected hex text is discarded even if the colour is unchanged.
    pub fn load(&mut self, data: RecolourData) {
        self.set_colour(data.colour);
        self.invalidate_hex();
        self.specular = data.specular;
        self.metallic = data.metallic;
        self.detail = data.detail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1.0 / 255.0;

    fn close(a: LinearRgba, b: LinearRgba) -> bool {
        (a.red - b.red).abs() <= TOLERANCE
            && (a.green - b.green).abs() <= TOLERANCE
            && (a.blue - b.blue).abs() <= TOLERANCE
    }

    #[test]
    fn test_hsv_round_trip() {
        let mut slot = ColourSlot::default();
        for rgb in [
            LinearRgba::rgb(0.2, 0.4, 0.6),
            LinearRgba::rgb(1.0, 0.0, 0.5),
            LinearRgba::rgb(0.0, 0.0, 0.0),
            LinearRgba::rgb(0.9, 0.9, 0.1),
        ] {
            slot.set_colour(rgb);
            let hsv = slot.hsv();
            assert!(close(hsv.to_rgb(), rgb), "{rgb:?}");
        }
    }

    #[test]
    fn test_set_colour_invalidates_both_views() {
        let mut slot = ColourSlot::new(RecolourData::new(LinearRgba::WHITE));
        assert_eq!(slot.hex(), "#FFFFFF");
        assert_eq!(slot.hsv().saturation, 0.0);

        slot.set_colour(LinearRgba::RED);
        assert_eq!(slot.hex(), "#FF0000");
        assert_eq!(slot.hsv(), Hsv::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_set_hsv_invalidates_hex() {
        let mut slot = ColourSlot::new(RecolourData::new(LinearRgba::WHITE));
        assert_eq!(slot.hex(), "#FFFFFF");

        slot.set_hsv(Hsv::new(2.0 / 3.0, 1.0, 1.0));
        assert_eq!(slot.hex(), "#0000FF");
        assert!(close(slot.colour(), LinearRgba::BLUE));
    }

    #[test]
    fn test_set_hsv_keeps_exact_value() {
        let mut slot = ColourSlot::default();
        // Zero value collapses hue when derived from RGB; the written HSV survives.
        let hsv = Hsv::new(0.3, 0.7, 0.0);
        slot.set_hsv(hsv);
        assert_eq!(slot.hsv(), hsv);
    }

    #[test]
    fn test_set_hsv_preserves_alpha() {
        let mut slot = ColourSlot::new(RecolourData::new(LinearRgba::new(1.0, 1.0, 1.0, 0.5)));
        slot.set_hsv(Hsv::new(0.0, 1.0, 1.0));
        assert_eq!(slot.colour().alpha, 0.5);
    }

    #[test]
    fn test_hex_correction() {
        let mut marked = ColourSlot::default();
        assert!(marked.set_hex("#ff8800"));

        let mut bare = ColourSlot::default();
        assert!(bare.set_hex("ff8800"));
        assert!(bare.hex_valid());
        assert_eq!(bare.colour(), marked.colour());
        assert_eq!(bare.hex(), "#ff8800");
    }

    #[test]
    fn test_hex_rejection() {
        let mut slot = ColourSlot::new(RecolourData::new(LinearRgba::GREEN));
        assert!(!slot.set_hex("not-a-colour"));
        assert!(!slot.hex_valid());
        assert_eq!(slot.colour(), LinearRgba::GREEN);
        assert_eq!(slot.hex(), "not-a-colour");
    }

    #[test]
    fn test_hex_write_invalidates_hsv() {
        let mut slot = ColourSlot::new(RecolourData::new(LinearRgba::WHITE));
        assert_eq!(slot.hsv().saturation, 0.0);

        slot.set_hex("#ff0000");
        assert_eq!(slot.hsv(), Hsv::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_hex_recovers_after_colour_write() {
        let mut slot = ColourSlot::default();
        slot.set_hex("bogus");
        assert!(!slot.hex_valid());

        slot.set_colour(LinearRgba::BLACK);
        assert_eq!(slot.hex(), "#000000");
        assert!(slot.hex_valid());
    }

    #[test]
    fn test_new_slot_hex_is_valid() {
        let slot = ColourSlot::default();
        assert!(slot.hex_valid());
    }

    #[test]
    fn test_colour_writes_clear_rejected_hex() {
        let mut slot = ColourSlot::default();
        slot.set_hex("bogus");
        slot.set_colour(LinearRgba::BLACK);
        assert!(slot.hex_valid());

        slot.set_hex("bogus");
        slot.set_hsv(Hsv::new(0.5, 1.0, 1.0));
        assert!(slot.hex_valid());

        slot.set_hex("bogus");
        let data = slot.data();
        slot.load(data);
        assert!(slot.hex_valid());
        assert_ne!(slot.hex(), "bogus");
    }

    #[test]
    fn test_unchanged_writes_are_noops() {
        let mut slot = ColourSlot::default();
        slot.set_hex("#123456");
        let colour = slot.colour();

        slot.set_hex("#123456");
        assert_eq!(slot.hex(), "#123456");
        assert_eq!(slot.colour(), colour);

        let hsv = slot.hsv();
        slot.set_hsv(hsv);
        assert_eq!(slot.hex(), "#123456");
    }

    #[test]
    fn test_data_round_trip() {
        let data = RecolourData::new(LinearRgba::RED)
            .with_specular(0.2)
            .with_metallic(0.8)
            .with_detail(2.0);
        let mut slot = ColourSlot::default();
        slot.load(data);
        assert_eq!(slot.data(), data);
    }
}
