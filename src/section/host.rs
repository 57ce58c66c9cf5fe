//! Per-object owner of sections, and its staged construction.

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use super::capability::{PaintBackend, ProxyKey, RecolourCapability, RegionId, SectionKind};
use super::section::{Appearance, Section};

/// Why no host was built for an object. Neither case is fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostBuildError {
    #[error("Object has no recolourable appearance")]
    NotPaintable,

    #[error("No section of the object could be resolved to regions")]
    NoResolvableSections,
}

/// All paintable sections of one scene object.
///
/// A *simple* host has exactly one section and hit-tests as the whole
/// object. A *compound* host replaces the object's stock hit-testing with one
/// proxy per section region and maps proxy hits back to sections.
#[derive(Debug)]
pub struct Host {
    object: Entity,
    sections: Vec<Section>,
    simple: bool,
    proxies: HashMap<ProxyKey, usize>,
}

impl Host {
    /// Build a host in one go.
    ///
    /// The build scheduler runs the same stages spread across frames via
    /// [`HostBuilder`].
    pub fn try_create(object: Entity, backend: &mut dyn PaintBackend) -> Result<Host, HostBuildError> {
        let mut builder = HostBuilder::discover(object, backend)?;
        while builder.resolve_next(backend) {}
        if let Err(e) = builder.assemble() {
            builder.release(backend);
            return Err(e);
        }
        while builder.attach_next(backend) {}
        Ok(builder.finish())
    }

    pub fn object(&self) -> Entity {
        self.object
    }

    pub fn is_simple(&self) -> bool {
        self.simple
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    pub(crate) fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Which section the pointer is over.
    ///
    /// Simple hosts answer with their only section regardless of `proxy`.
    pub fn hit_test(&self, proxy: Option<ProxyKey>) -> Option<usize> {
        if self.simple {
            return Some(0);
        }
        proxy.and_then(|key| self.proxies.get(&key).copied())
    }

    /// Sections selected when `index` is picked on its own.
    ///
    /// A variant section still on its stock appearance drags its siblings
    /// along, since switching the variant affects all of them.
    pub fn selection_targets(&self, index: usize) -> Vec<usize> {
        match self.sections.get(index) {
            Some(s) if s.kind() == SectionKind::Variant && !s.recolouring_enabled() => {
                (0..self.sections.len()).collect()
            }
            Some(_) => vec![index],
            None => Vec::new(),
        }
    }

    /// Detach proxies and hand hit-testing back to the object.
    pub fn release(&mut self, backend: &mut dyn PaintBackend) {
        for (proxy, _) in self.proxies.drain() {
            backend.release_proxy(proxy);
        }
        if !self.simple {
            backend.set_stock_hit_testing(self.object, true);
        }
    }
}

struct Candidate {
    capability: Box<dyn RecolourCapability>,
    appearances: Vec<Appearance>,
    regions: Option<Vec<RegionId>>,
    failed: bool,
}

/// Incremental construction of a [`Host`].
///
/// Stages: [`discover`](Self::discover), then [`resolve_next`](Self::resolve_next)
/// until it returns `false`, [`assemble`](Self::assemble), then
/// [`attach_next`](Self::attach_next) until it returns `false`, then
/// [`finish`](Self::finish). A builder abandoned at any stage must be
/// [`release`](Self::release)d so attached proxies are returned.
pub struct HostBuilder {
    object: Entity,
    object_name: String,
    candidates: Vec<Candidate>,
    next_resolve: usize,
    sections: Vec<Section>,
    proxies: HashMap<ProxyKey, usize>,
    next_attach: usize,
    stock_disabled: bool,
    partial_failures: usize,
}

impl HostBuilder {
    /// Query the object's capabilities and keep those with at least one
    /// recolourable appearance.
    pub fn discover(object: Entity, backend: &mut dyn PaintBackend) -> Result<Self, HostBuildError> {
        let candidates: Vec<Candidate> = backend
            .capabilities(object)
            .into_iter()
            .filter_map(|capability| {
                let appearances: Vec<Appearance> = capability
                    .appearance_names()
                    .into_iter()
                    .map(|name| Appearance {
                        recolourable: capability.is_recolour_capable(&name),
                        name,
                    })
                    .collect();

                appearances
                    .iter()
                    .any(|a| a.recolourable)
                    .then_some(Candidate {
                        capability,
                        appearances,
                        regions: None,
                        failed: false,
                    })
            })
            .collect();

        if candidates.is_empty() {
            return Err(HostBuildError::NotPaintable);
        }

        Ok(Self {
            object,
            object_name: backend.object_name(object),
            candidates,
            next_resolve: 0,
            sections: Vec::new(),
            proxies: HashMap::new(),
            next_attach: 0,
            stock_disabled: false,
            partial_failures: 0,
        })
    }

    pub fn object(&self) -> Entity {
        self.object
    }

    /// Capabilities whose regions could not be resolved.
    pub fn partial_failures(&self) -> usize {
        self.partial_failures
    }

    /// Resolve regions for one candidate. Returns `false` once all are done.
    ///
    /// A lone candidate needs no regions, since it never hit-tests by proxy.
    pub fn resolve_next(&mut self, backend: &mut dyn PaintBackend) -> bool {
        if self.candidates.len() < 2 || self.next_resolve >= self.candidates.len() {
            return false;
        }

        let candidate = &mut self.candidates[self.next_resolve];
        match backend.resolve_regions(self.object, candidate.capability.as_ref()) {
            Ok(regions) => candidate.regions = Some(regions),
            Err(e) => {
                warn!(
                    "Skipping section '{}' on {}: {}",
                    candidate.capability.section_name(),
                    self.object_name,
                    e
                );
                candidate.failed = true;
                self.partial_failures += 1;
            }
        }

        self.next_resolve += 1;
        self.next_resolve < self.candidates.len()
    }

    /// Turn surviving candidates into sections.
    pub fn assemble(&mut self) -> Result<(), HostBuildError> {
        let object = self.object;
        let object_name = self.object_name.clone();
        self.sections = std::mem::take(&mut self.candidates)
            .into_iter()
            .filter(|c| !c.failed)
            .map(|c| {
                Section::new(
                    object,
                    &object_name,
                    c.capability,
                    c.appearances,
                    c.regions.unwrap_or_default(),
                )
            })
            .collect();

        if self.sections.is_empty() {
            Err(HostBuildError::NoResolvableSections)
        } else {
            Ok(())
        }
    }

    /// Attach proxies for one section. Returns `false` once all are done.
    ///
    /// Stock hit-testing is switched off before the first proxy goes on.
    pub fn attach_next(&mut self, backend: &mut dyn PaintBackend) -> bool {
        if self.sections.len() < 2 || self.next_attach >= self.sections.len() {
            return false;
        }

        if !self.stock_disabled {
            backend.set_stock_hit_testing(self.object, false);
            self.stock_disabled = true;
        }

        let index = self.next_attach;
        for &region in self.sections[index].regions() {
            if let Some(proxy) = backend.attach_proxy(self.object, region) {
                self.proxies.insert(proxy, index);
            }
        }

        self.next_attach += 1;
        self.next_attach < self.sections.len()
    }

    pub fn finish(self) -> Host {
        Host {
            object: self.object,
            simple: self.sections.len() == 1,
            sections: self.sections,
            proxies: self.proxies,
        }
    }

    /// Return everything acquired so far to the backend.
    pub fn release(mut self, backend: &mut dyn PaintBackend) {
        for (proxy, _) in self.proxies.drain() {
            backend.release_proxy(proxy);
        }
        if self.stock_disabled {
            backend.set_stock_hit_testing(self.object, true);
        }
    }
}
