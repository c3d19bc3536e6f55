//! Core data models for the temple builder.
//! Placement records, the deity selection and the persisted temple configuration.

use serde::{Deserialize, Serialize};

use crate::config::PlacementDefaults;

/// Stable identifier of a deity (e.g. `"ganesh"`), unique within a temple.
pub type DeityKey = String;

/// Position and scale of one deity overlay, relative to the temple anchor point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeityPlacement {
    pub key: DeityKey,
    /// Horizontal offset from the anchor in logical pixels.
    pub x: f64,
    /// Vertical offset from the anchor in logical pixels.
    pub y: f64,
    pub scale: f64,
}

impl DeityPlacement {
    pub fn new(key: impl Into<DeityKey>, x: f64, y: f64, scale: f64) -> Self {
        Self {
            key: key.into(),
            x,
            y,
            scale,
        }
    }

    /// Placement synthesized for a deity at `index` in the selection with no prior record.
    pub fn default_at(key: impl Into<DeityKey>, index: usize, defaults: &PlacementDefaults) -> Self {
        Self {
            key: key.into(),
            x: defaults.origin_x + index as f64 * defaults.spacing,
            y: defaults.y,
            scale: defaults.scale,
        }
    }
}

/// Ordered, duplicate-free list of deity keys chosen in the temple builder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DeityKey>", into = "Vec<DeityKey>")]
pub struct SelectionSet {
    keys: Vec<DeityKey>,
}

impl SelectionSet {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<DeityKey>,
    {
        let mut set = Self::default();
        for k in keys {
            set.insert(k);
        }
        set
    }

    /// Appends `key` unless already present. Returns whether it was added.
    pub fn insert(&mut self, key: impl Into<DeityKey>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        self.keys.len() != before
    }

    /// Adds `key` when absent, removes it when present.
    pub fn toggle(&mut self, key: &str) {
        if !self.remove(key) {
            self.keys.push(key.to_string());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeityKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True when both selections hold the same keys, ignoring order.
    pub fn same_keys(&self, other: &SelectionSet) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl From<Vec<DeityKey>> for SelectionSet {
    fn from(keys: Vec<DeityKey>) -> Self {
        Self::new(keys)
    }
}

impl From<SelectionSet> for Vec<DeityKey> {
    fn from(set: SelectionSet) -> Self {
        set.keys
    }
}

/// How a deity is drawn (emoji glyph). Kept apart from placement and selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeityVisual {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
}

/// Builder choices persisted under the temple configuration key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempleConfiguration {
    pub selected_style: String,
    pub bg_gradient: Vec<String>,
    pub selected_deities: SelectionSet,
}

impl Default for TempleConfiguration {
    fn default() -> Self {
        Self {
            selected_style: "nagara".to_string(),
            bg_gradient: vec!["#ffcf71".to_string(), "#f5802c".to_string()],
            selected_deities: SelectionSet::default(),
        }
    }
}

/// Discrete adjustments offered by the long-press scale menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleStep {
    Down20,
    Down10,
    Up10,
    Up20,
}

impl ScaleStep {
    pub const ALL: [ScaleStep; 4] = [
        ScaleStep::Down20,
        ScaleStep::Down10,
        ScaleStep::Up10,
        ScaleStep::Up20,
    ];

    pub fn percent(self) -> i32 {
        match self {
            ScaleStep::Down20 => -20,
            ScaleStep::Down10 => -10,
            ScaleStep::Up10 => 10,
            ScaleStep::Up20 => 20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScaleStep::Down20 => "-20%",
            ScaleStep::Down10 => "-10%",
            ScaleStep::Up10 => "+10%",
            ScaleStep::Up20 => "+20%",
        }
    }

    /// New scale after applying this step to `current`, clamped to the allowed range.
    pub fn apply(self, current: f64, defaults: &PlacementDefaults) -> f64 {
        // Integer percent first keeps 3.0 * -20% at exactly 2.4.
        let scaled = current * f64::from(100 + self.percent()) / 100.0;
        clamp_scale(scaled, defaults)
    }
}

pub fn clamp_scale(scale: f64, defaults: &PlacementDefaults) -> f64 {
    if scale.is_nan() {
        return defaults.scale;
    }
    scale.clamp(defaults.min_scale, defaults.max_scale)
}
