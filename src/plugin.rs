//! Plugin wiring the painter into a Bevy app.
use bevy::prelude::*;

use crate::build::{BuildProgress, BuildScheduler, drive_build};
use crate::colour::{ColourPalette, PresetLibrary};
use crate::section::{PainterBackend, SectionRegistry};
use crate::selection::{
    EyedropperFlash, HighlightChanged, PointerHover, SectionFlash, SelectionEngine, tick_flash,
    update_selection,
};
use crate::settings::PainterSettings;

/// Marks a scene object as a candidate for painting.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PaintableObject;

/// Commands from the presentation layer.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PainterRequest {
    /// Start a painting session over every [`PaintableObject`].
    Open,
    /// End the session and release everything it built.
    Close,
    /// Write the palette into every selected section.
    ApplyToSelection,
    /// Enable or revert recolouring on every selected section.
    SetRecolouring(bool),
    SelectAll,
    ClearSelection,
}

/// System set for the painter's per-frame systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionPainterSystems;

/// Plugin that adds section painting to Bevy.
///
/// This plugin registers:
/// - the painter resources ([`SectionRegistry`], [`BuildScheduler`],
///   [`SelectionEngine`], [`ColourPalette`], [`PresetLibrary`], ...)
/// - the request and output messages
/// - the request, build, selection and flash systems, chained in
///   [`SectionPainterSystems`]
///
/// The app supplies a [`PainterBackend`] and writes [`PointerHover`] each frame.
///
/// # Example
/// See `demos/toy_backend.rs` for `ToyBackend`.
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_section_painter::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(SectionPainterPlugin::new())
///     .insert_resource(PainterBackend::new(ToyBackend::default()))
///     .run();
/// ```
#[derive(Default)]
pub struct SectionPainterPlugin {
    settings: PainterSettings,
}

impl SectionPainterPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: PainterSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Plugin for SectionPainterPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .insert_resource(BuildScheduler::new(self.settings.frame_slice))
            .insert_resource(SelectionEngine::new(self.settings.double_activation_window))
            .init_resource::<SectionRegistry>()
            .init_resource::<ColourPalette>()
            .init_resource::<PresetLibrary>()
            .init_resource::<PointerHover>()
            .init_resource::<EyedropperFlash>()
            .add_message::<PainterRequest>()
            .add_message::<BuildProgress>()
            .add_message::<HighlightChanged>()
            .add_message::<SectionFlash>()
            .configure_sets(Update, SectionPainterSystems)
            .add_systems(
                Update,
                (handle_requests, drive_build, update_selection, tick_flash)
                    .chain()
                    .in_set(SectionPainterSystems),
            );
    }
}

/// Act on [`PainterRequest`]s received this frame.
#[allow(clippy::too_many_arguments)]
pub fn handle_requests(
    mut requests: MessageReader<PainterRequest>,
    objects: Query<Entity, With<PaintableObject>>,
    settings: Res<PainterSettings>,
    mut scheduler: ResMut<BuildScheduler>,
    mut registry: ResMut<SectionRegistry>,
    mut engine: ResMut<SelectionEngine>,
    palette: Res<ColourPalette>,
    mut backend: Option<ResMut<PainterBackend>>,
    mut flash: ResMut<EyedropperFlash>,
    mut highlights: MessageWriter<HighlightChanged>,
    mut flashes: MessageWriter<SectionFlash>,
) {
    for request in requests.read() {
        match *request {
            PainterRequest::Open => {
                let Some(backend) = backend.as_deref_mut() else {
                    warn!("Cannot open the painter without a PainterBackend");
                    continue;
                };
                close_session(
                    &mut scheduler,
                    &mut registry,
                    &mut engine,
                    backend,
                    &mut flash,
                    &mut highlights,
                    &mut flashes,
                );

                let mut targets: Vec<Entity> = objects.iter().collect();
                targets.sort();
                info!("Building sections for {} objects", targets.len());

                scheduler.set_slice(settings.frame_slice);
                engine.set_double_window(settings.double_activation_window);
                scheduler.start(targets);
            }
            PainterRequest::Close => {
                if let Some(backend) = backend.as_deref_mut() {
                    close_session(
                        &mut scheduler,
                        &mut registry,
                        &mut engine,
                        backend,
                        &mut flash,
                        &mut highlights,
                        &mut flashes,
                    );
                }
            }
            PainterRequest::ApplyToSelection => {
                if scheduler.is_ready() {
                    engine.apply_palette(&mut registry, &palette);
                }
            }
            PainterRequest::SetRecolouring(enabled) => {
                if scheduler.is_ready() {
                    engine.set_recolouring(enabled, &mut registry, &palette);
                }
            }
            PainterRequest::SelectAll => {
                if scheduler.is_ready() {
                    engine.select_all(&registry);
                }
            }
            PainterRequest::ClearSelection => {
                engine.clear();
            }
        }
    }
}

/// Cancel any run, drop the selection and release every host.
fn close_session(
    scheduler: &mut BuildScheduler,
    registry: &mut SectionRegistry,
    engine: &mut SelectionEngine,
    backend: &mut PainterBackend,
    flash: &mut EyedropperFlash,
    highlights: &mut MessageWriter<HighlightChanged>,
    flashes: &mut MessageWriter<SectionFlash>,
) {
    scheduler.abort(registry, backend.0.as_mut());
    scheduler.reset();

    engine.clear();
    for change in engine.refresh_highlights(registry, false) {
        highlights.write(change);
    }
    if let Some(off) = flash.stop() {
        flashes.write(off);
    }

    if !registry.is_empty() {
        debug!("Releasing {} hosts", registry.host_count());
    }
    registry.clear(backend.0.as_mut());
}
