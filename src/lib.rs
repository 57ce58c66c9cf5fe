//! # bevy_section_painter
//!
//! A Bevy plugin for selecting and recolouring the paintable sections of
//! scene objects.
//!
//! ## Features
//!
//! - Frame-budgeted discovery of paintable sections, resumable across frames
//! - Per-section hit-testing on objects with more than one section
//! - Click, modifier and double-click selection with highlight and glow
//! - Three colour slots with cached RGB/HSV/hex views, eyedropper and presets
//!
//! ## Quick Start
//!
//! `ToyBackend` is the minimal [`PaintBackend`](section::PaintBackend) from
//! `demos/toy_backend.rs` (`cargo run --example toy_backend`).
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_section_painter::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(SectionPainterPlugin::new())
//!         .insert_resource(PainterBackend::new(ToyBackend::default()))
//!         .add_systems(Startup, setup)
//!         .add_systems(Update, open_painter)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     // Objects the backend knows how to recolour
//!     commands.spawn((PaintableObject, Transform::default()));
//! }
//!
//! fn open_painter(keys: Res<ButtonInput<KeyCode>>, mut requests: MessageWriter<PainterRequest>) {
//!     if keys.just_pressed(KeyCode::KeyP) {
//!         requests.write(PainterRequest::Open);
//!     }
//! }
//! ```

pub mod build;
pub mod colour;
mod plugin;
pub mod section;
pub mod selection;
pub mod settings;

pub use plugin::{PaintableObject, PainterRequest, SectionPainterPlugin, SectionPainterSystems};

pub mod prelude {
    pub use crate::build::{BuildProgress, BuildReport, BuildScheduler, BuildState};
    pub use crate::colour::{
        ColourPalette, ColourPreset, ColourSlot, Hsv, PresetLibrary, PresetStore, RecolourData,
        SLOT_COUNT,
    };
    pub use crate::plugin::{
        PaintableObject, PainterRequest, SectionPainterPlugin, SectionPainterSystems,
    };
    pub use crate::section::{
        PaintBackend, PainterBackend, ProxyKey, RecolourCapability, RegionFlag, RegionId,
        RegionResolveError, Section, SectionKind, SectionRef, SectionRegistry,
    };
    pub use crate::selection::{
        HighlightChanged, Modifiers, PointerHover, SectionFlash, SelectionEngine,
    };
    pub use crate::settings::PainterSettings;
}
