//! The selection state machine.
//!
//! Each activation is matched against a fixed decision table, first match
//! wins:
//!
//! | input                                         | effect                                   |
//! |-----------------------------------------------|------------------------------------------|
//! | select-all                                    | select every section                     |
//! | empty space                                   | clear, unless secondary is held          |
//! | no modifiers, selection is the hovered host   | unchanged (double on `{hovered}` expands)|
//! | primary + tertiary                            | toggle all with matching look            |
//! | tertiary                                      | eyedropper                               |
//! | primary (+ secondary)                         | toggle all with matching code            |
//! | secondary                                     | toggle hovered, double toggles its host  |
//! | no modifiers                                  | select hovered only                      |

use std::collections::BTreeSet;
use std::time::Duration;

use bevy::prelude::*;

use super::input::SelectionInput;
use crate::colour::ColourPalette;
use crate::section::{Section, SectionRef, SectionRegistry};

/// Highlight state of a section changed.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightChanged {
    pub section: SectionRef,
    pub highlighted: bool,
    pub glowing: bool,
}

/// Result of handling one frame of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    Unchanged,
    Changed,
    /// The hovered section's colours were copied into the palette.
    Eyedropped(SectionRef),
}

#[derive(Resource, Debug)]
pub struct SelectionEngine {
    selected: BTreeSet<SectionRef>,
    last_activation: Option<(SectionRef, Duration)>,
    double_window: Duration,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl SelectionEngine {
    pub fn new(double_window: Duration) -> Self {
        Self {
            selected: BTreeSet::new(),
            last_activation: None,
            double_window,
        }
    }

    pub fn set_double_window(&mut self, window: Duration) {
        self.double_window = window;
    }

    pub fn selected(&self) -> impl Iterator<Item = SectionRef> + '_ {
        self.selected.iter().copied()
    }

    pub fn is_selected(&self, section: SectionRef) -> bool {
        self.selected.contains(&section)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns whether anything was deselected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        self.last_activation = None;
        changed
    }

    /// Replace the selection with every registered section.
    pub fn select_all(&mut self, registry: &SectionRegistry) -> bool {
        let all: BTreeSet<SectionRef> = registry.section_refs().into_iter().collect();
        let changed = all != self.selected;
        self.selected = all;
        changed
    }

    /// Drop selected sections that are no longer registered.
    pub fn retain_registered(&mut self, registry: &SectionRegistry) {
        self.selected.retain(|s| registry.section(*s).is_some());
    }

    /// Apply one frame of input.
    pub fn handle(
        &mut self,
        input: &SelectionInput,
        registry: &SectionRegistry,
        palette: &mut ColourPalette,
    ) -> SelectionOutcome {
        if input.select_all {
            debug!("Select all");
            return outcome(self.select_all(registry));
        }
        if !input.activated {
            return SelectionOutcome::Unchanged;
        }

        let modifiers = input.modifiers;
        // A hover the registry cannot resolve is an empty-space click.
        let hovered = input
            .hovered
            .and_then(|h| registry.section(h).map(|section| (h, section)));
        let Some((hovered, section)) = hovered else {
            self.last_activation = None;
            if modifiers.secondary {
                return SelectionOutcome::Unchanged;
            }
            debug!("Clicked empty space");
            return outcome(self.clear());
        };
        let Some(host) = registry.host(hovered.host) else {
            return SelectionOutcome::Unchanged;
        };

        let double = self.register_activation(hovered, input.now);
        let host_refs = registry.host_refs(hovered.host);
        let was_selected = self.selected.contains(&hovered);

        if modifiers.is_none() && self.is_exactly(&host_refs) {
            return SelectionOutcome::Unchanged;
        }

        if modifiers.is_none() && self.is_only(hovered) {
            if double && !host.is_simple() {
                debug!("Expanding selection to {:?}", hovered.host);
                return outcome(self.extend(host_refs));
            }
            return SelectionOutcome::Unchanged;
        }

        if modifiers.primary && modifiers.tertiary {
            let primary = section.colours()[0];
            let matching = |other: &Section| {
                other.state() == section.state() && other.colours()[0] == primary
            };
            return if was_selected {
                let doomed: Vec<SectionRef> = self
                    .selected
                    .iter()
                    .copied()
                    .filter(|s| registry.section(*s).is_some_and(matching))
                    .collect();
                outcome(self.remove(doomed))
            } else {
                let found = Self::find(registry, matching);
                outcome(self.extend(found))
            };
        }

        if modifiers.tertiary && !modifiers.primary && !modifiers.secondary {
            debug!("Eyedropper on {}", section.code());
            palette.eyedrop(&section.colours());
            return SelectionOutcome::Eyedropped(hovered);
        }

        if modifiers.primary {
            let code = section.code();
            return if was_selected {
                let doomed: Vec<SectionRef> = self
                    .selected
                    .iter()
                    .copied()
                    .filter(|s| registry.section(*s).is_some_and(|o| o.code() == code))
                    .collect();
                outcome(self.remove(doomed))
            } else {
                let cleared = !modifiers.secondary && self.clear();
                let found = Self::find(registry, |o| o.code() == code);
                let added = self.extend(found);
                outcome(cleared || added)
            };
        }

        if modifiers.secondary && !modifiers.tertiary {
            let compound_double = double && !host.is_simple();
            return if was_selected {
                if compound_double {
                    outcome(self.extend(host_refs))
                } else {
                    outcome(self.remove([hovered]))
                }
            } else if compound_double {
                let missing = host_refs
                    .iter()
                    .filter(|s| !self.selected.contains(*s))
                    .count();
                if missing == 1 {
                    outcome(self.remove(host_refs))
                } else {
                    outcome(self.extend(host_refs))
                }
            } else {
                let targets = Self::targets(hovered, host.selection_targets(hovered.index));
                outcome(self.extend(targets))
            };
        }

        if modifiers.is_none() {
            let targets = Self::targets(hovered, host.selection_targets(hovered.index));
            let before = std::mem::take(&mut self.selected);
            self.selected.extend(targets);
            return outcome(before != self.selected);
        }

        SelectionOutcome::Unchanged
    }

    /// Write the palette into every selected section. Returns the number of
    /// sections written.
    pub fn apply_palette(&self, registry: &mut SectionRegistry, palette: &ColourPalette) -> usize {
        let colours = palette.resolved_all();
        let mut written = 0;
        for at in &self.selected {
            if let Some(section) = registry.section_mut(*at) {
                section.set_colours(colours);
                written += 1;
            }
        }
        written
    }

    /// Switch every selected section to a recolourable appearance and apply
    /// the palette, or revert them all to stock.
    pub fn set_recolouring(
        &self,
        enabled: bool,
        registry: &mut SectionRegistry,
        palette: &ColourPalette,
    ) {
        for at in &self.selected {
            if let Some(section) = registry.section_mut(*at) {
                if enabled {
                    section.enable();
                } else {
                    section.revert();
                }
            }
        }
        if enabled {
            self.apply_palette(registry, palette);
        }
    }

    /// Bring every section's highlight in line with the selection.
    ///
    /// Selected sections also glow while the pointer is over the 3D view.
    /// Only sections whose state changed are reported.
    pub fn refresh_highlights(
        &self,
        registry: &mut SectionRegistry,
        pointer_in_view: bool,
    ) -> Vec<HighlightChanged> {
        let mut changes = Vec::new();
        for host in registry.hosts_mut() {
            let object = host.object();
            for (index, section) in host.sections_mut().iter_mut().enumerate() {
                let at = SectionRef::new(object, index);
                let highlighted = self.selected.contains(&at);
                let glowing = highlighted && pointer_in_view;
                let a = section.set_highlighted(highlighted);
                let b = section.set_glowing(glowing);
                if a || b {
                    changes.push(HighlightChanged {
                        section: at,
                        highlighted,
                        glowing,
                    });
                }
            }
        }
        changes
    }

    fn register_activation(&mut self, hovered: SectionRef, now: Duration) -> bool {
        let double = matches!(
            self.last_activation,
            Some((last, at)) if last == hovered && now.saturating_sub(at) <= self.double_window
        );
        self.last_activation = if double { None } else { Some((hovered, now)) };
        double
    }

    fn is_exactly(&self, refs: &[SectionRef]) -> bool {
        self.selected.len() == refs.len() && refs.iter().all(|r| self.selected.contains(r))
    }

    fn is_only(&self, section: SectionRef) -> bool {
        self.selected.len() == 1 && self.selected.contains(&section)
    }

    fn extend(&mut self, refs: impl IntoIterator<Item = SectionRef>) -> bool {
        let mut changed = false;
        for r in refs {
            changed |= self.selected.insert(r);
        }
        changed
    }

    fn remove(&mut self, refs: impl IntoIterator<Item = SectionRef>) -> bool {
        let mut changed = false;
        for r in refs {
            changed |= self.selected.remove(&r);
        }
        changed
    }

    fn find(registry: &SectionRegistry, pred: impl Fn(&Section) -> bool) -> Vec<SectionRef> {
        registry
            .section_refs()
            .into_iter()
            .filter(|s| registry.section(*s).is_some_and(&pred))
            .collect()
    }

    fn targets(hovered: SectionRef, indices: Vec<usize>) -> Vec<SectionRef> {
        indices
            .into_iter()
            .map(|index| SectionRef::new(hovered.host, index))
            .collect()
    }

}

fn outcome(changed: bool) -> SelectionOutcome {
    if changed {
        SelectionOutcome::Changed
    } else {
        SelectionOutcome::Unchanged
    }
}
