//! Turning pointer and modifier input into a set of selected sections.

mod engine;
mod flash;
mod input;
mod systems;

pub use engine::{HighlightChanged, SelectionEngine, SelectionOutcome};
pub use flash::{EyedropperFlash, SectionFlash, tick_flash};
pub use input::{Modifiers, PointerHover, SelectionInput};
pub use systems::update_selection;
