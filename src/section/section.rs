//! A single recolourable section and its appearance state machine.

use std::collections::HashSet;

use bevy::prelude::*;

use super::capability::{RecolourCapability, RegionId, SectionKind};
use crate::colour::{RecolourData, SLOT_COUNT};

/// Whether the active appearance accepts colour overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppearanceState {
    Stock,
    Recolourable,
}

/// One entry of a section's fixed appearance list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appearance {
    pub name: String,
    pub recolourable: bool,
}

/// One paintable region of a scene object.
pub struct Section {
    name: String,
    code: String,
    host: Entity,
    kind: SectionKind,
    capability: Box<dyn RecolourCapability>,
    appearances: Vec<Appearance>,
    regions: Vec<RegionId>,
    highlighted: bool,
    glowing: bool,
}

impl std::fmt::Debug for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Section")
            .field("code", &self.code)
            .field("host", &self.host)
            .field("kind", &self.kind)
            .field("appearance", &self.capability.current_appearance())
            .finish()
    }
}

impl Section {
    pub(crate) fn new(
        host: Entity,
        object_name: &str,
        capability: Box<dyn RecolourCapability>,
        appearances: Vec<Appearance>,
        regions: Vec<RegionId>,
    ) -> Self {
        let name = capability.section_name().to_string();
        Self {
            code: format!("{object_name}.{name}"),
            name,
            host,
            kind: capability.kind(),
            capability,
            appearances,
            regions,
            highlighted: false,
            glowing: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object name plus section name. Equal for the same section on
    /// identical objects.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The owning object.
    pub fn host(&self) -> Entity {
        self.host
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    pub fn appearances(&self) -> &[Appearance] {
        &self.appearances
    }

    pub fn current_appearance(&self) -> String {
        self.capability.current_appearance()
    }

    pub fn recolouring_enabled(&self) -> bool {
        self.capability
            .is_recolour_capable(&self.capability.current_appearance())
    }

    pub fn state(&self) -> AppearanceState {
        if self.recolouring_enabled() {
            AppearanceState::Recolourable
        } else {
            AppearanceState::Stock
        }
    }

    pub fn colours(&self) -> [RecolourData; SLOT_COUNT] {
        self.capability.colours()
    }

    pub fn set_colours(&mut self, colours: [RecolourData; SLOT_COUNT]) {
        self.capability.set_colours(colours);
    }

    pub fn highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn glowing(&self) -> bool {
        self.glowing
    }

    /// Returns whether the flag changed.
    pub(crate) fn set_highlighted(&mut self, highlighted: bool) -> bool {
        std::mem::replace(&mut self.highlighted, highlighted) != highlighted
    }

    /// Returns whether the flag changed.
    pub(crate) fn set_glowing(&mut self, glowing: bool) -> bool {
        std::mem::replace(&mut self.glowing, glowing) != glowing
    }

    /// Advance to the next recolourable appearance, wrapping around.
    ///
    /// Variant sections only consider appearances that show the same
    /// sub-objects as the current one. Returns whether the appearance changed.
    pub fn enable(&mut self) -> bool {
        let len = self.appearances.len();
        if len == 0 {
            return false;
        }

        let current_name = self.capability.current_appearance();
        let current = self.appearances.iter().position(|a| a.name == current_name);
        let start = current.map_or(0, |i| (i + 1) % len);

        let target = (0..len).map(|offset| (start + offset) % len).find(|&i| {
            self.appearances[i].recolourable
                && (self.kind == SectionKind::Switchable || self.same_regions(i, &current_name))
        });

        match target {
            Some(i) if Some(i) != current => self.switch_to(i),
            _ => false,
        }
    }

    /// Return to the stock appearance. No-op if already stock.
    ///
    /// Picks the first appearance that does not recolour; the first entry of
    /// the list always counts as stock. Returns whether the appearance changed.
    pub fn revert(&mut self) -> bool {
        if !self.recolouring_enabled() {
            return false;
        }

        let current_name = self.capability.current_appearance();
        let target = match self.kind {
            SectionKind::Switchable => self
                .appearances
                .iter()
                .position(|a| !a.recolourable)
                .or((!self.appearances.is_empty()).then_some(0)),
            SectionKind::Variant => (0..self.appearances.len()).find(|&i| {
                (i == 0 || !self.appearances[i].recolourable)
                    && self.same_regions(i, &current_name)
            }),
        };

        match target {
            Some(i) if self.appearances[i].name != current_name => self.switch_to(i),
            _ => false,
        }
    }

    fn switch_to(&mut self, index: usize) -> bool {
        let name = self.appearances[index].name.clone();
        debug!("{}: appearance -> {}", self.code, name);
        self.capability.set_appearance(&name);
        true
    }

    /// Whether appearance `index` shows exactly the sub-objects active in
    /// appearance `current`.
    fn same_regions(&self, index: usize, current: &str) -> bool {
        let active = |appearance: &str| -> HashSet<String> {
            self.capability
                .appearance_regions(appearance)
                .into_iter()
                .filter(|r| r.active)
                .map(|r| r.name)
                .collect()
        };
        active(&self.appearances[index].name) == active(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::testing::FakeCapability;

    fn section(capability: FakeCapability) -> Section {
        let appearances = capability
            .appearances
            .iter()
            .map(|(name, recolourable)| Appearance {
                name: name.clone(),
                recolourable: *recolourable,
            })
            .collect();
        let host = World::new().spawn_empty().id();
        Section::new(host, "tank", Box::new(capability), appearances, Vec::new())
    }

    #[test]
    fn test_code() {
        let s = section(FakeCapability::switchable("body", &[("stock", false), ("paint", true)]));
        assert_eq!(s.code(), "tank.body");
        assert_eq!(s.name(), "body");
        assert_eq!(s.state(), AppearanceState::Stock);
    }

    #[test]
    fn test_switchable_enable_cycles() {
        let mut s = section(FakeCapability::switchable(
            "body",
            &[("stock", false), ("paintA", true), ("metal", false), ("paintB", true)],
        ));

        assert!(s.enable());
        assert_eq!(s.current_appearance(), "paintA");
        assert_eq!(s.state(), AppearanceState::Recolourable);

        assert!(s.enable());
        assert_eq!(s.current_appearance(), "paintB");

        assert!(s.enable());
        assert_eq!(s.current_appearance(), "paintA");
    }

    #[test]
    fn test_enable_without_candidates_is_noop() {
        let mut s = section(FakeCapability::switchable("body", &[("stock", false), ("metal", false)]));
        assert!(!s.enable());
        assert_eq!(s.current_appearance(), "stock");
    }

    #[test]
    fn test_enable_single_candidate_stays() {
        let mut s = section(FakeCapability::switchable("body", &[("stock", false), ("paint", true)]));
        assert!(s.enable());
        assert!(!s.enable());
        assert_eq!(s.current_appearance(), "paint");
    }

    #[test]
    fn test_switchable_revert() {
        let mut s = section(FakeCapability::switchable(
            "body",
            &[("paintA", true), ("stock", false), ("paintB", true)],
        ));
        s.enable();
        assert_eq!(s.current_appearance(), "paintB");

        assert!(s.revert());
        assert_eq!(s.current_appearance(), "stock");

        assert!(!s.revert());
        assert_eq!(s.current_appearance(), "stock");
    }

    #[test]
    fn test_variant_enable_keeps_geometry() {
        let capability = FakeCapability::variant(
            "hull",
            &[("stock", false), ("paintShort", true), ("paintLong", true)],
        )
        .with_regions("stock", &[("short", true), ("long", false)])
        .with_regions("paintShort", &[("short", true), ("long", false)])
        .with_regions("paintLong", &[("short", false), ("long", true)]);
        let mut s = section(capability);

        assert!(s.enable());
        assert_eq!(s.current_appearance(), "paintShort");

        // paintLong would swap the mesh, so cycling stays put.
        assert!(!s.enable());
        assert_eq!(s.current_appearance(), "paintShort");

        assert!(s.revert());
        assert_eq!(s.current_appearance(), "stock");
    }

    #[test]
    fn test_variant_revert_finds_matching_stock() {
        let capability = FakeCapability::variant(
            "hull",
            &[("stockShort", false), ("stockLong", false), ("paintLong", true)],
        )
        .with_current("paintLong")
        .with_regions("stockShort", &[("short", true), ("long", false)])
        .with_regions("stockLong", &[("short", false), ("long", true)])
        .with_regions("paintLong", &[("short", false), ("long", true)]);
        let mut s = section(capability);

        assert!(s.revert());
        assert_eq!(s.current_appearance(), "stockLong");
    }

    #[test]
    fn test_same_regions_ignores_inactive_flags() {
        let capability = FakeCapability::variant("hull", &[("stock", false), ("paint", true)])
            .with_regions("stock", &[("a", true), ("b", false)])
            .with_regions("paint", &[("a", true), ("c", false)]);
        let s = section(capability);
        assert!(s.same_regions(1, "stock"));
    }

    #[test]
    fn test_highlight_flags_report_changes() {
        let mut s = section(FakeCapability::switchable("body", &[("stock", false), ("paint", true)]));
        assert!(s.set_highlighted(true));
        assert!(!s.set_highlighted(true));
        assert!(s.set_glowing(true));
        assert!(s.set_glowing(false));
    }
}
