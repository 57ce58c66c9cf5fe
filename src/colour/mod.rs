//! Colour editing state.
//!
//! Provides the cached multi-view [`ColourSlot`], the three-slot
//! [`ColourPalette`] applied to selections, and named presets.

mod hex;
mod hsv;
mod palette;
mod presets;
mod slot;

pub use hex::{HexParseError, format_hex, parse_hex, parse_hex_lenient};
pub use hsv::Hsv;
pub use palette::{ColourPalette, PaletteError};
pub use presets::{
    CUSTOM_GROUP, ColourPreset, MemoryPresetStore, PresetError, PresetGroup, PresetLibrary,
    PresetStore,
};
pub use slot::{ColourSlot, RecolourData};

/// Number of colour slots on every recolourable section.
pub const SLOT_COUNT: usize = 3;
