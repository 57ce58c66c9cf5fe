//! Sections, their hosts, and the seams to the host engine.
//!
//! A [`Host`] owns every [`Section`] of one scene object and answers which
//! section the pointer is over. The [`SectionRegistry`] resource collects the
//! hosts built during a painting session.

mod capability;
mod host;
mod registry;
#[allow(clippy::module_inception)]
mod section;

#[cfg(test)]
pub(crate) mod testing;

pub use capability::{
    PaintBackend, PainterBackend, ProxyKey, RecolourCapability, RegionFlag, RegionId,
    RegionResolveError, SectionKind,
};
pub use host::{Host, HostBuildError, HostBuilder};
pub use registry::{SectionRef, SectionRegistry};
pub use section::{Appearance, AppearanceState, Section};
