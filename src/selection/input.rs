use std::time::Duration;

use bevy::prelude::*;

use crate::section::{ProxyKey, SectionRef};
use crate::settings::PainterSettings;

/// The three independent modifier states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub primary: bool,
    pub secondary: bool,
    pub tertiary: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
        tertiary: false,
    };

    pub fn primary() -> Self {
        Self {
            primary: true,
            ..Self::NONE
        }
    }

    pub fn secondary() -> Self {
        Self {
            secondary: true,
            ..Self::NONE
        }
    }

    pub fn tertiary() -> Self {
        Self {
            tertiary: true,
            ..Self::NONE
        }
    }

    pub fn with_primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn with_secondary(mut self) -> Self {
        self.secondary = true;
        self
    }

    pub fn with_tertiary(mut self) -> Self {
        self.tertiary = true;
        self
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Read the modifier keys configured in `settings`.
    pub fn from_keys(keys: &ButtonInput<KeyCode>, settings: &PainterSettings) -> Self {
        Self {
            primary: keys.any_pressed(settings.primary_keys.iter().copied()),
            secondary: keys.any_pressed(settings.secondary_keys.iter().copied()),
            tertiary: keys.any_pressed(settings.tertiary_keys.iter().copied()),
        }
    }
}

/// What the host's picking layer reports under the pointer this frame.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerHover {
    pub object: Option<Entity>,
    /// Proxy hit on a compound host.
    pub proxy: Option<ProxyKey>,
    /// The pointer is over a UI surface rather than the 3D view.
    pub over_ui: bool,
}

/// One frame of selection input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionInput {
    /// Section under the pointer, already resolved against the registry.
    pub hovered: Option<SectionRef>,
    pub modifiers: Modifiers,
    /// The activation button was released this frame.
    pub activated: bool,
    /// The select-all hot-key fired this frame.
    pub select_all: bool,
    /// Current time, for double activation.
    pub now: Duration,
}

impl SelectionInput {
    /// An activation at `now` over `hovered`.
    pub fn click(hovered: Option<SectionRef>, modifiers: Modifiers, now: Duration) -> Self {
        Self {
            hovered,
            modifiers,
            activated: true,
            select_all: false,
            now,
        }
    }

    pub fn select_all(now: Duration) -> Self {
        Self {
            select_all: true,
            modifiers: Modifiers::primary(),
            now,
            ..Default::default()
        }
    }
}
