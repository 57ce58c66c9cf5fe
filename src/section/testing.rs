//! Hand-written engine doubles shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bevy::color::LinearRgba;
use bevy::prelude::*;

use super::capability::{
    PaintBackend, ProxyKey, RecolourCapability, RegionFlag, RegionId, RegionResolveError,
    SectionKind,
};
use crate::colour::{RecolourData, SLOT_COUNT};

#[derive(Clone)]
pub(crate) struct FakeCapability {
    pub name: String,
    pub kind: SectionKind,
    pub appearances: Vec<(String, bool)>,
    pub regions: HashMap<String, Vec<RegionFlag>>,
    pub current: String,
    pub colours: [RecolourData; SLOT_COUNT],
    pub writes: Arc<AtomicUsize>,
}

impl FakeCapability {
    fn new(name: &str, kind: SectionKind, appearances: &[(&str, bool)]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            appearances: appearances
                .iter()
                .map(|(n, r)| (n.to_string(), *r))
                .collect(),
            regions: HashMap::new(),
            current: appearances
                .first()
                .map(|(n, _)| n.to_string())
                .unwrap_or_default(),
            colours: [RecolourData::default(); SLOT_COUNT],
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn switchable(name: &str, appearances: &[(&str, bool)]) -> Self {
        Self::new(name, SectionKind::Switchable, appearances)
    }

    pub fn variant(name: &str, appearances: &[(&str, bool)]) -> Self {
        Self::new(name, SectionKind::Variant, appearances)
    }

    /// A switchable section with a stock and a paint appearance.
    pub fn paintable(name: &str) -> Self {
        Self::switchable(name, &[("stock", false), ("paint", true)])
    }

    pub fn with_current(mut self, appearance: &str) -> Self {
        self.current = appearance.to_string();
        self
    }

    pub fn with_regions(mut self, appearance: &str, flags: &[(&str, bool)]) -> Self {
        self.regions.insert(
            appearance.to_string(),
            flags.iter().map(|(n, a)| RegionFlag::new(*n, *a)).collect(),
        );
        self
    }

    pub fn with_primary(mut self, colour: LinearRgba) -> Self {
        self.colours[0].colour = colour;
        self
    }

    pub fn with_colours(mut self, colours: [RecolourData; SLOT_COUNT]) -> Self {
        self.colours = colours;
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl RecolourCapability for FakeCapability {
    fn section_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SectionKind {
        self.kind
    }

    fn colours(&self) -> [RecolourData; SLOT_COUNT] {
        self.colours
    }

    fn set_colours(&mut self, colours: [RecolourData; SLOT_COUNT]) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.colours = colours;
    }

    fn current_appearance(&self) -> String {
        self.current.clone()
    }

    fn appearance_names(&self) -> Vec<String> {
        self.appearances.iter().map(|(n, _)| n.clone()).collect()
    }

    fn is_recolour_capable(&self, appearance: &str) -> bool {
        self.appearances
            .iter()
            .any(|(n, r)| *r && n == appearance)
    }

    fn set_appearance(&mut self, appearance: &str) {
        self.current = appearance.to_string();
    }

    fn appearance_regions(&self, appearance: &str) -> Vec<RegionFlag> {
        self.regions.get(appearance).cloned().unwrap_or_default()
    }
}

struct FakeObject {
    name: String,
    capabilities: Vec<FakeCapability>,
}

/// Engine double that hands out fresh region and proxy ids and tracks
/// which proxies are still attached.
#[derive(Default)]
pub(crate) struct FakeBackend {
    objects: HashMap<Entity, FakeObject>,
    unresolvable: HashSet<(Entity, String)>,
    next_id: u64,
    pub live_proxies: HashSet<ProxyKey>,
    pub stock_disabled: HashSet<Entity>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: Entity, name: &str, capabilities: Vec<FakeCapability>) {
        self.objects.insert(
            object,
            FakeObject {
                name: name.to_string(),
                capabilities,
            },
        );
    }

    /// Make region resolution fail for one section of an object.
    pub fn fail_regions(&mut self, object: Entity, section: &str) {
        self.unresolvable.insert((object, section.to_string()));
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl PaintBackend for FakeBackend {
    fn object_name(&self, object: Entity) -> String {
        self.objects
            .get(&object)
            .map(|o| o.name.clone())
            .unwrap_or_default()
    }

    fn capabilities(&mut self, object: Entity) -> Vec<Box<dyn RecolourCapability>> {
        self.objects
            .get(&object)
            .map(|o| {
                o.capabilities
                    .iter()
                    .cloned()
                    .map(|c| Box::new(c) as Box<dyn RecolourCapability>)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn resolve_regions(
        &mut self,
        object: Entity,
        capability: &dyn RecolourCapability,
    ) -> Result<Vec<RegionId>, RegionResolveError> {
        let section = capability.section_name().to_string();
        if self.unresolvable.contains(&(object, section.clone())) {
            return Err(RegionResolveError::NoRegions { section });
        }
        Ok(vec![RegionId(self.next()), RegionId(self.next())])
    }

    fn set_stock_hit_testing(&mut self, object: Entity, enabled: bool) {
        if enabled {
            self.stock_disabled.remove(&object);
        } else {
            self.stock_disabled.insert(object);
        }
    }

    fn attach_proxy(&mut self, _object: Entity, _region: RegionId) -> Option<ProxyKey> {
        let key = ProxyKey(self.next());
        self.live_proxies.insert(key);
        Some(key)
    }

    fn release_proxy(&mut self, proxy: ProxyKey) {
        self.live_proxies.remove(&proxy);
    }
}
