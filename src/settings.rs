//! Painter configuration.

use std::time::Duration;

use bevy::prelude::*;

use crate::build::DEFAULT_FRAME_SLICE;

/// Tunables for the build scheduler and the selection input.
#[derive(Resource, Clone, Debug)]
pub struct PainterSettings {
    /// Time a build run may spend per frame before yielding.
    ///
    /// Default: 1/128 s
    pub frame_slice: Duration,

    /// Two activations on the same section within this window count as a
    /// double activation.
    ///
    /// Default: 300 ms
    pub double_activation_window: Duration,

    /// How long an eyedropped object stays flashed.
    ///
    /// Default: 500 ms
    pub eyedropper_flash: Duration,

    /// Selects every section when pressed with a primary modifier held.
    ///
    /// Default: `KeyA`
    pub select_all_key: KeyCode,

    /// Keys acting as the primary modifier. Default: Control
    pub primary_keys: Vec<KeyCode>,

    /// Keys acting as the secondary modifier. Default: Shift
    pub secondary_keys: Vec<KeyCode>,

    /// Keys acting as the tertiary modifier. Default: Alt
    pub tertiary_keys: Vec<KeyCode>,

    /// Button whose release activates the hovered section.
    ///
    /// Default: `Left`
    pub activation_button: MouseButton,
}

impl Default for PainterSettings {
    fn default() -> Self {
        Self {
            frame_slice: DEFAULT_FRAME_SLICE,
            double_activation_window: Duration::from_millis(300),
            eyedropper_flash: Duration::from_millis(500),
            select_all_key: KeyCode::KeyA,
            primary_keys: vec![KeyCode::ControlLeft, KeyCode::ControlRight],
            secondary_keys: vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
            tertiary_keys: vec![KeyCode::AltLeft, KeyCode::AltRight],
            activation_button: MouseButton::Left,
        }
    }
}

impl PainterSettings {
    pub fn with_frame_slice(mut self, slice: Duration) -> Self {
        self.frame_slice = slice;
        self
    }

    pub fn with_double_activation_window(mut self, window: Duration) -> Self {
        self.double_activation_window = window;
        self
    }

    pub fn with_eyedropper_flash(mut self, duration: Duration) -> Self {
        self.eyedropper_flash = duration;
        self
    }

    pub fn with_select_all_key(mut self, key: KeyCode) -> Self {
        self.select_all_key = key;
        self
    }

    pub fn with_primary_keys(mut self, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        self.primary_keys = keys.into_iter().collect();
        self
    }

    pub fn with_secondary_keys(mut self, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        self.secondary_keys = keys.into_iter().collect();
        self
    }

    pub fn with_tertiary_keys(mut self, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        self.tertiary_keys = keys.into_iter().collect();
        self
    }

    pub fn with_activation_button(mut self, button: MouseButton) -> Self {
        self.activation_button = button;
        self
    }
}
