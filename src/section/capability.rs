//! Seams to the host engine's material and geometry systems.

use bevy::prelude::*;
use thiserror::Error;

use crate::colour::{RecolourData, SLOT_COUNT};

/// How a section cycles between appearances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Switches between texture sets that leave geometry untouched.
    Switchable,
    /// Switches whole object variants, which may toggle sub-meshes.
    Variant,
}

/// Opaque identifier of a renderable region resolved for a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u64);

/// Identity of a hit-test proxy, as reported by the hover input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyKey(pub u64);

/// A named sub-object and whether an appearance shows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionFlag {
    pub name: String,
    pub active: bool,
}

impl RegionFlag {
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
        }
    }
}

/// Failure to resolve the regions a capability affects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionResolveError {
    #[error("No applicable regions found for section '{section}'")]
    NoRegions { section: String },

    #[error("Section '{section}' has {roots} model roots; only one is supported")]
    MultipleRoots { section: String, roots: usize },

    #[error("Region resolution failed: {0}")]
    Other(String),
}

/// Colour and appearance control for one section, provided by the host engine.
pub trait RecolourCapability: Send + Sync {
    /// Display name of the section.
    fn section_name(&self) -> &str;

    fn kind(&self) -> SectionKind;

    /// Colours for the current appearance.
    fn colours(&self) -> [RecolourData; SLOT_COUNT];

    /// Write colours for the current appearance.
    fn set_colours(&mut self, colours: [RecolourData; SLOT_COUNT]);

    fn current_appearance(&self) -> String;

    /// Every appearance in its fixed order. The first entry is the stock look.
    fn appearance_names(&self) -> Vec<String>;

    fn is_recolour_capable(&self, appearance: &str) -> bool;

    fn set_appearance(&mut self, appearance: &str);

    /// Sub-object flags toggled by an appearance.
    ///
    /// Only consulted for [`SectionKind::Variant`].
    fn appearance_regions(&self, _appearance: &str) -> Vec<RegionFlag> {
        Vec::new()
    }
}

/// Everything the painter needs from the host engine.
///
/// Installed by the app through [`PainterBackend`].
pub trait PaintBackend: Send + Sync {
    /// Name shared by every instance of the same object type.
    fn object_name(&self, object: Entity) -> String;

    /// Recolour capabilities found on `object`, in a stable order.
    fn capabilities(&mut self, object: Entity) -> Vec<Box<dyn RecolourCapability>>;

    fn resolve_regions(
        &mut self,
        object: Entity,
        capability: &dyn RecolourCapability,
    ) -> Result<Vec<RegionId>, RegionResolveError>;

    /// Toggle the object's own hit-testing. Compound hosts turn it off
    /// while their proxies are attached.
    fn set_stock_hit_testing(&mut self, object: Entity, enabled: bool);

    /// Attach a hit-test proxy over `region`. `None` if the region has
    /// nothing to hit-test against.
    fn attach_proxy(&mut self, object: Entity, region: RegionId) -> Option<ProxyKey>;

    fn release_proxy(&mut self, proxy: ProxyKey);
}

/// Resource holding the app's [`PaintBackend`].
#[derive(Resource)]
pub struct PainterBackend(pub Box<dyn PaintBackend>);

impl PainterBackend {
    pub fn new(backend: impl PaintBackend + 'static) -> Self {
        Self(Box::new(backend))
    }
}
