//! Named colour presets and the persistence seam behind them.

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use super::slot::RecolourData;

/// Name of the user-editable preset group.
pub const CUSTOM_GROUP: &str = "Custom";

/// Errors from preset operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("Preset title is empty")]
    EmptyTitle,

    #[error("Preset index {index} is out of range (group has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Preset store failed: {0}")]
    Store(String),
}

/// A named colour+material tuple.
#[derive(Clone, Debug, PartialEq)]
pub struct ColourPreset {
    /// Lookup key: the title with spaces removed, lower-cased.
    pub name: String,
    /// Display title as entered by the user.
    pub title: String,
    pub data: RecolourData,
}

impl ColourPreset {
    pub fn new(title: impl Into<String>, data: RecolourData) -> Self {
        let title = title.into();
        Self {
            name: preset_key(&title),
            title,
            data,
        }
    }
}

/// An ordered group of presets.
#[derive(Clone, Debug, Default)]
pub struct PresetGroup {
    pub name: String,
    pub presets: Vec<ColourPreset>,
}

impl PresetGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            presets: Vec::new(),
        }
    }

    pub fn with_preset(mut self, preset: ColourPreset) -> Self {
        self.presets.push(preset);
        self
    }
}

/// Persistence collaborator for custom presets.
///
/// The on-disk format is the implementor's business; the painter only
/// hands over titles and tuples.
pub trait PresetStore: Send + Sync {
    fn load_group(&self, group: &str) -> Result<Vec<(String, RecolourData)>, PresetError>;

    fn save_preset(&mut self, title: &str, data: RecolourData) -> Result<(), PresetError>;

    fn delete_preset(&mut self, title: &str) -> Result<(), PresetError>;
}

/// A [`PresetStore`] that keeps custom presets in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemoryPresetStore {
    entries: Vec<(String, RecolourData)>,
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PresetStore for MemoryPresetStore {
    fn load_group(&self, group: &str) -> Result<Vec<(String, RecolourData)>, PresetError> {
        if group == CUSTOM_GROUP {
            Ok(self.entries.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn save_preset(&mut self, title: &str, data: RecolourData) -> Result<(), PresetError> {
        let key = preset_key(title);
        match self.entries.iter_mut().find(|(t, _)| preset_key(t) == key) {
            Some(entry) => *entry = (title.to_string(), data),
            None => self.entries.push((title.to_string(), data)),
        }
        Ok(())
    }

    fn delete_preset(&mut self, title: &str) -> Result<(), PresetError> {
        let key = preset_key(title);
        self.entries.retain(|(t, _)| preset_key(t) != key);
        Ok(())
    }
}

/// All preset groups available to the painter, including [`CUSTOM_GROUP`].
///
/// Constructed once per painter session and owned by the app as a resource.
#[derive(Resource)]
pub struct PresetLibrary {
    groups: Vec<PresetGroup>,
    store: Box<dyn PresetStore>,
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::new(MemoryPresetStore::new())
    }
}

impl PresetLibrary {
    /// Create a library, loading the custom group from `store`.
    ///
    /// A store that fails to load leaves the custom group empty.
    pub fn new(store: impl PresetStore + 'static) -> Self {
        let mut custom = PresetGroup::new(CUSTOM_GROUP);
        match store.load_group(CUSTOM_GROUP) {
            Ok(entries) => {
                custom.presets = entries
                    .into_iter()
                    .map(|(title, data)| ColourPreset::new(title, data))
                    .collect();
            }
            Err(e) => warn!("Could not load custom colour presets: {}", e),
        }

        Self {
            groups: vec![custom],
            store: Box::new(store),
        }
    }

    /// Add a read-only group. Custom stays last so cycling ends on it.
    pub fn with_group(mut self, group: PresetGroup) -> Self {
        let at = self.groups.len().saturating_sub(1);
        self.groups.insert(at, group);
        self
    }

    pub fn groups(&self) -> &[PresetGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&PresetGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn custom(&self) -> &[ColourPreset] {
        self.group(CUSTOM_GROUP)
            .map(|g| g.presets.as_slice())
            .unwrap_or(&[])
    }

    fn custom_mut(&mut self) -> &mut PresetGroup {
        let index = match self.groups.iter().position(|g| g.name == CUSTOM_GROUP) {
            Some(index) => index,
            None => {
                self.groups.push(PresetGroup::new(CUSTOM_GROUP));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    /// Save a custom preset, replacing any with the same key.
    pub fn save_custom(&mut self, title: &str, data: RecolourData) -> Result<(), PresetError> {
        if title.trim().is_empty() {
            return Err(PresetError::EmptyTitle);
        }

        let preset = ColourPreset::new(title, data);
        let group = self.custom_mut();
        match group.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => group.presets.push(preset),
        }

        info!("Saved colour preset '{}'", title);
        self.store.save_preset(title, data)
    }

    /// Delete the custom preset at `index`, returning it.
    pub fn delete_custom(&mut self, index: usize) -> Result<ColourPreset, PresetError> {
        let group = self.custom_mut();
        let len = group.presets.len();
        if index >= len {
            return Err(PresetError::IndexOutOfRange { index, len });
        }

        let preset = group.presets.remove(index);
        info!("Deleted colour preset '{}'", preset.title);
        self.store.delete_preset(&preset.title)?;
        Ok(preset)
    }

    /// Find the single preset whose title starts with `text`, ignoring case.
    ///
    /// Returns `None` when nothing or more than one preset matches. Presets
    /// sharing a key across groups count once.
    pub fn lookup_title_prefix(&self, text: &str) -> Option<&ColourPreset> {
        if text.is_empty() {
            return None;
        }

        let needle = text.to_lowercase();
        let mut matches: HashMap<&str, &ColourPreset> = HashMap::new();
        for preset in self.groups.iter().flat_map(|g| &g.presets) {
            if preset.title.to_lowercase().starts_with(&needle) {
                matches.entry(preset.name.as_str()).or_insert(preset);
            }
        }

        if matches.len() == 1 {
            matches.into_values().next()
        } else {
            None
        }
    }

    /// Offer a preset for hex-field text that is not a valid colour.
    ///
    /// Text starting with `#` is always treated as an attempted hex code.
    pub fn suggest_for_hex(&self, text: &str, hex_valid: bool) -> Option<&ColourPreset> {
        if hex_valid || text.starts_with('#') {
            return None;
        }
        self.lookup_title_prefix(text)
    }
}

fn preset_key(title: &str) -> String {
    title.replace(' ', "").to_lowercase()
}

#[cfg(test)]
mod tests {
    use bevy::color::LinearRgba;

    use super::*;

    fn data(v: f32) -> RecolourData {
        RecolourData::new(LinearRgba::rgb(v, v, v))
    }

    fn library() -> PresetLibrary {
        PresetLibrary::default().with_group(
            PresetGroup::new("Stock")
                .with_preset(ColourPreset::new("Bright White", data(1.0)))
                .with_preset(ColourPreset::new("Black", data(0.0)))
                .with_preset(ColourPreset::new("Blue Steel", data(0.3))),
        )
    }

    #[test]
    fn test_preset_key() {
        let preset = ColourPreset::new("Racing Green", data(0.1));
        assert_eq!(preset.name, "racinggreen");
        assert_eq!(preset.title, "Racing Green");
    }

    #[test]
    fn test_custom_group_is_last() {
        let library = library();
        assert_eq!(library.groups().len(), 2);
        assert_eq!(library.groups()[1].name, CUSTOM_GROUP);
    }

    #[test]
    fn test_save_replaces_by_key() {
        let mut library = library();
        library.save_custom("My Grey", data(0.5)).unwrap();
        library.save_custom("my grey", data(0.6)).unwrap();

        assert_eq!(library.custom().len(), 1);
        assert_eq!(library.custom()[0].title, "my grey");
        assert_eq!(library.custom()[0].data, data(0.6));
    }

    #[test]
    fn test_save_rejects_empty_title() {
        let mut library = library();
        assert_eq!(library.save_custom("  ", data(0.5)), Err(PresetError::EmptyTitle));
        assert!(library.custom().is_empty());
    }

    #[test]
    fn test_delete() {
        let mut library = library();
        library.save_custom("A", data(0.1)).unwrap();
        library.save_custom("B", data(0.2)).unwrap();

        let removed = library.delete_custom(0).unwrap();
        assert_eq!(removed.title, "A");
        assert_eq!(library.custom().len(), 1);

        assert_eq!(
            library.delete_custom(5),
            Err(PresetError::IndexOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryPresetStore::new();
        store.save_preset("Deep Red", data(0.2)).unwrap();
        store.save_preset("Pale", data(0.9)).unwrap();
        store.delete_preset("pale").unwrap();
        assert_eq!(store.len(), 1);

        let library = PresetLibrary::new(store);
        assert_eq!(library.custom().len(), 1);
        assert_eq!(library.custom()[0].name, "deepred");
    }

    #[test]
    fn test_lookup_unique_prefix() {
        let library = library();
        assert_eq!(library.lookup_title_prefix("bla").map(|p| p.name.as_str()), Some("black"));
        assert_eq!(library.lookup_title_prefix("BRIGHT").map(|p| p.name.as_str()), Some("brightwhite"));
    }

    #[test]
    fn test_lookup_ambiguous_or_missing() {
        let library = library();
        assert!(library.lookup_title_prefix("b").is_none());
        assert!(library.lookup_title_prefix("purple").is_none());
        assert!(library.lookup_title_prefix("").is_none());
    }

    #[test]
    fn test_hex_suggestion() {
        let library = library();
        assert!(library.suggest_for_hex("bla", false).is_some());
        assert!(library.suggest_for_hex("bla", true).is_none());
        assert!(library.suggest_for_hex("#bla", false).is_none());
    }
}
