//! The three colour slots edited by the user and applied to selections.

use bevy::color::LinearRgba;
use bevy::prelude::*;
use thiserror::Error;

use super::SLOT_COUNT;
use super::slot::{ColourSlot, RecolourData};

/// Errors from palette slot operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteError {
    #[error("The primary colour slot is always enabled")]
    PrimarySlotLocked,

    #[error("Colour slot {index} does not exist (slots: {count})")]
    SlotOutOfRange { index: usize, count: usize },
}

/// Primary, secondary and tertiary colour slots plus their enabled flags.
///
/// A disabled slot is not written on its own; applying the palette falls
/// back to an enabled slot instead (see [`ColourPalette::resolved`]).
#[derive(Resource, Clone, Debug)]
pub struct ColourPalette {
    slots: [ColourSlot; SLOT_COUNT],
    enabled: [bool; SLOT_COUNT],
    editing: usize,
}

impl Default for ColourPalette {
    fn default() -> Self {
        let grey = |v: f32| RecolourData::new(LinearRgba::rgb(v, v, v));
        Self {
            slots: [
                grey(1.0).into(),
                grey(190.0 / 255.0).into(),
                grey(130.0 / 255.0).into(),
            ],
            enabled: [true, false, false],
            editing: 0,
        }
    }
}

impl ColourPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, index: usize) -> Option<&ColourSlot> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut ColourSlot> {
        self.slots.get_mut(index)
    }

    pub fn slots(&self) -> &[ColourSlot; SLOT_COUNT] {
        &self.slots
    }

    /// Index of the slot currently being edited.
    pub fn editing(&self) -> usize {
        self.editing
    }

    pub fn editing_slot(&self) -> &ColourSlot {
        &self.slots[self.editing]
    }

    pub fn editing_slot_mut(&mut self) -> &mut ColourSlot {
        &mut self.slots[self.editing]
    }

    pub fn enabled(&self) -> [bool; SLOT_COUNT] {
        self.enabled
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled.get(index).copied().unwrap_or(false)
    }

    /// Start editing a slot, enabling it if it was disabled.
    pub fn select_slot(&mut self, index: usize) -> Result<(), PaletteError> {
        check_index(index)?;
        self.editing = index;
        self.enabled[index] = true;
        Ok(())
    }

    pub fn set_slot_enabled(&mut self, index: usize, enabled: bool) -> Result<(), PaletteError> {
        check_index(index)?;
        if index == 0 && !enabled {
            return Err(PaletteError::PrimarySlotLocked);
        }

        self.enabled[index] = enabled;
        if !enabled && self.editing == index {
            self.editing = 0;
        }
        Ok(())
    }

    /// Flip a slot's enabled flag. Returns the new state.
    pub fn toggle_slot(&mut self, index: usize) -> Result<bool, PaletteError> {
        check_index(index)?;
        let enabled = !self.enabled[index];
        self.set_slot_enabled(index, enabled)?;
        Ok(enabled)
    }

    /// The tuple written to a section's colour index `index`.
    ///
    /// An enabled slot supplies its own value. Otherwise index 2 borrows
    /// slot 1 when that is enabled, and everything else borrows slot 0.
    pub fn resolved(&self, index: usize) -> RecolourData {
        let source = if self.is_enabled(index) {
            index
        } else if index == 2 && self.enabled[1] {
            1
        } else {
            0
        };
        self.slots[source].data()
    }

    pub fn resolved_all(&self) -> [RecolourData; SLOT_COUNT] {
        std::array::from_fn(|i| self.resolved(i))
    }

    /// Copy a section's colours into the slots.
    ///
    /// Slot 1 is enabled only when it differs from slot 0. Slot 2 is enabled
    /// when it differs from slot 0 and, if slot 1 is enabled, from slot 1.
    pub fn eyedrop(&mut self, colours: &[RecolourData; SLOT_COUNT]) {
        for (slot, data) in self.slots.iter_mut().zip(colours) {
            slot.load(*data);
        }

        let second = colours[1] != colours[0];
        let third = colours[2] != colours[0] && (!second || colours[2] != colours[1]);
        self.enabled = [true, second, third];

        if !self.enabled[self.editing] {
            self.editing = 0;
        }
    }

    /// Load a tuple (typically a preset) into the slot being edited.
    pub fn load_into_editing(&mut self, data: RecolourData) {
        self.slots[self.editing].load(data);
    }
}

fn check_index(index: usize) -> Result<(), PaletteError> {
    if index < SLOT_COUNT {
        Ok(())
    } else {
        Err(PaletteError::SlotOutOfRange {
            index,
            count: SLOT_COUNT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(r: f32, g: f32, b: f32) -> RecolourData {
        RecolourData::new(LinearRgba::rgb(r, g, b))
    }

    #[test]
    fn test_defaults() {
        let palette = ColourPalette::default();
        assert_eq!(palette.enabled(), [true, false, false]);
        assert_eq!(palette.editing(), 0);
        assert_eq!(palette.slots()[0].colour(), LinearRgba::WHITE);
    }

    #[test]
    fn test_primary_slot_cannot_be_disabled() {
        let mut palette = ColourPalette::default();
        assert_eq!(
            palette.set_slot_enabled(0, false),
            Err(PaletteError::PrimarySlotLocked)
        );
        assert_eq!(palette.toggle_slot(0), Err(PaletteError::PrimarySlotLocked));
        assert!(palette.is_enabled(0));
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut palette = ColourPalette::default();
        assert_eq!(
            palette.select_slot(3),
            Err(PaletteError::SlotOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_select_enables() {
        let mut palette = ColourPalette::default();
        palette.select_slot(2).unwrap();
        assert_eq!(palette.editing(), 2);
        assert!(palette.is_enabled(2));

        assert_eq!(palette.toggle_slot(2), Ok(false));
        assert_eq!(palette.editing(), 0);
    }

    #[test]
    fn test_resolved_fallback() {
        let mut palette = ColourPalette::default();
        let [a, b, c] = palette.slots().clone().map(|s| s.data());

        assert_eq!(palette.resolved_all(), [a, a, a]);

        palette.set_slot_enabled(1, true).unwrap();
        assert_eq!(palette.resolved_all(), [a, b, b]);

        palette.set_slot_enabled(2, true).unwrap();
        assert_eq!(palette.resolved_all(), [a, b, c]);

        palette.set_slot_enabled(1, false).unwrap();
        assert_eq!(palette.resolved_all(), [a, a, c]);
    }

    #[test]
    fn test_eyedrop_flags() {
        let x = data(1.0, 0.0, 0.0);
        let y = data(0.0, 1.0, 0.0);
        let mut palette = ColourPalette::default();

        palette.eyedrop(&[x, x, y]);
        assert_eq!(palette.enabled(), [true, false, true]);
        assert_eq!(palette.slots()[2].colour(), y.colour);

        palette.eyedrop(&[x, y, y]);
        assert_eq!(palette.enabled(), [true, true, false]);

        palette.eyedrop(&[x, y, x]);
        assert_eq!(palette.enabled(), [true, true, false]);

        palette.eyedrop(&[x, x, x]);
        assert_eq!(palette.enabled(), [true, false, false]);
    }

    #[test]
    fn test_eyedrop_compares_material_scalars() {
        let x = data(0.5, 0.5, 0.5);
        let shiny = x.with_metallic(1.0);
        let mut palette = ColourPalette::default();

        palette.eyedrop(&[x, shiny, x]);
        assert_eq!(palette.enabled(), [true, true, false]);
    }

    #[test]
    fn test_eyedrop_resets_disabled_editing_slot() {
        let x = data(1.0, 1.0, 1.0);
        let mut palette = ColourPalette::default();
        palette.select_slot(1).unwrap();

        palette.eyedrop(&[x, x, x]);
        assert_eq!(palette.editing(), 0);
    }

    #[test]
    fn test_load_into_editing() {
        let mut palette = ColourPalette::default();
        palette.select_slot(1).unwrap();
        palette.load_into_editing(data(0.0, 0.0, 1.0));
        assert_eq!(palette.slots()[1].colour(), LinearRgba::BLUE);
        assert_eq!(palette.slots()[0].colour(), LinearRgba::WHITE);
    }
}
