use std::collections::HashMap;

use bevy::prelude::*;

use super::capability::{PaintBackend, ProxyKey};
use super::host::Host;
use super::section::Section;

/// Stable handle to a section: its host object and position within the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionRef {
    pub host: Entity,
    pub index: usize,
}

impl SectionRef {
    pub fn new(host: Entity, index: usize) -> Self {
        Self { host, index }
    }
}

/// Every host built for the current painting session.
#[derive(Resource, Default, Debug)]
pub struct SectionRegistry {
    hosts: Vec<Host>,
    index: HashMap<Entity, usize>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host, releasing any previous host for the same object.
    pub fn insert(&mut self, host: Host, backend: &mut dyn PaintBackend) {
        match self.index.get(&host.object()) {
            Some(&slot) => {
                let object = host.object();
                let compound = !host.is_simple();
                let mut old = std::mem::replace(&mut self.hosts[slot], host);
                old.release(backend);
                // Releasing the old host restored stock hit-testing.
                if compound {
                    backend.set_stock_hit_testing(object, false);
                }
            }
            None => {
                self.index.insert(host.object(), self.hosts.len());
                self.hosts.push(host);
            }
        }
    }

    pub fn contains(&self, object: Entity) -> bool {
        self.index.contains_key(&object)
    }

    pub fn host(&self, object: Entity) -> Option<&Host> {
        self.index.get(&object).map(|&i| &self.hosts[i])
    }

    pub fn host_mut(&mut self, object: Entity) -> Option<&mut Host> {
        self.index.get(&object).map(|&i| &mut self.hosts[i])
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub(crate) fn hosts_mut(&mut self) -> &mut [Host] {
        &mut self.hosts
    }

    pub fn section(&self, at: SectionRef) -> Option<&Section> {
        self.host(at.host).and_then(|h| h.section(at.index))
    }

    pub fn section_mut(&mut self, at: SectionRef) -> Option<&mut Section> {
        self.host_mut(at.host).and_then(|h| h.section_mut(at.index))
    }

    /// Map a pointer hover on `object` (and optionally one of its proxies)
    /// to a section.
    pub fn resolve_hover(&self, object: Entity, proxy: Option<ProxyKey>) -> Option<SectionRef> {
        let host = self.host(object)?;
        host.hit_test(proxy).map(|index| SectionRef::new(object, index))
    }

    /// Every section of `object`, in host order.
    pub fn host_refs(&self, object: Entity) -> Vec<SectionRef> {
        self.host(object)
            .map(|h| {
                (0..h.sections().len())
                    .map(|i| SectionRef::new(object, i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every registered section, in registration order.
    pub fn section_refs(&self) -> Vec<SectionRef> {
        self.hosts
            .iter()
            .flat_map(|h| (0..h.sections().len()).map(move |i| SectionRef::new(h.object(), i)))
            .collect()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn section_count(&self) -> usize {
        self.hosts.iter().map(|h| h.sections().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Release every host and forget them.
    pub fn clear(&mut self, backend: &mut dyn PaintBackend) {
        for mut host in self.hosts.drain(..) {
            host.release(backend);
        }
        self.index.clear();
    }
}
