use bevy::prelude::*;

use super::engine::{HighlightChanged, SelectionEngine, SelectionOutcome};
use super::flash::{EyedropperFlash, SectionFlash};
use super::input::{Modifiers, PointerHover, SelectionInput};
use crate::build::BuildScheduler;
use crate::colour::ColourPalette;
use crate::section::SectionRegistry;
use crate::settings::PainterSettings;

/// Gather this frame's pointer and key state and feed it to the
/// [`SelectionEngine`].
///
/// Does nothing until the build run is ready.
#[allow(clippy::too_many_arguments)]
pub fn update_selection(
    settings: Res<PainterSettings>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    hover: Res<PointerHover>,
    time: Res<Time>,
    scheduler: Res<BuildScheduler>,
    mut registry: ResMut<SectionRegistry>,
    mut engine: ResMut<SelectionEngine>,
    mut palette: ResMut<ColourPalette>,
    mut flash: ResMut<EyedropperFlash>,
    mut highlights: MessageWriter<HighlightChanged>,
    mut flashes: MessageWriter<SectionFlash>,
) {
    if !scheduler.is_ready() {
        return;
    }

    engine.retain_registered(&registry);

    let now = time.elapsed();
    let modifiers = keys
        .as_deref()
        .map(|k| Modifiers::from_keys(k, &settings))
        .unwrap_or_default();
    let select_all = modifiers.primary
        && keys
            .as_deref()
            .is_some_and(|k| k.just_pressed(settings.select_all_key));
    let activated = !hover.over_ui
        && buttons
            .as_deref()
            .is_some_and(|b| b.just_released(settings.activation_button));

    let input = SelectionInput {
        hovered: hover
            .object
            .and_then(|object| registry.resolve_hover(object, hover.proxy)),
        modifiers,
        activated,
        select_all,
        now,
    };

    if let SelectionOutcome::Eyedropped(sampled) = engine.handle(&input, &registry, &mut palette) {
        for message in flash.start(sampled.host, now, settings.eyedropper_flash) {
            flashes.write(message);
        }
        let written = engine.apply_palette(&mut registry, &palette);
        debug!("Applied sampled colours to {} sections", written);
    }

    for change in engine.refresh_highlights(&mut registry, !hover.over_ui) {
        highlights.write(change);
    }
}
