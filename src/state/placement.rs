//! Placement store: the authoritative deity key → placement mapping for the temple
//! being edited, reconciled against the builder's selection and mirrored to storage.
//!
//! Only user commits ([`PlacementStore::commit`], [`PlacementStore::reset_layout`])
//! write to storage. Reconciliation never does, so transient defaults are not
//! saved over values the user placed.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::watcher::SelectionWatcher;
use crate::config::PlacementDefaults;
use crate::model::{DeityPlacement, SelectionSet, clamp_scale};
use crate::persist::{self, PersistenceAdapter};

/// Placements in selection order, at most one per key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementMap {
    entries: Vec<DeityPlacement>,
}

impl PlacementMap {
    /// Builds the initial map: persisted records for selected keys, defaults for the rest.
    /// Records for keys outside `selection` are left out and saved scales are clamped.
    pub fn load(
        persisted: &[DeityPlacement],
        selection: &SelectionSet,
        defaults: &PlacementDefaults,
    ) -> Self {
        let entries = selection
            .iter()
            .enumerate()
            .map(|(i, key)| {
                persisted
                    .iter()
                    .find(|p| &p.key == key)
                    .map(|p| DeityPlacement {
                        scale: clamp_scale(p.scale, defaults),
                        ..p.clone()
                    })
                    .unwrap_or_else(|| DeityPlacement::default_at(key.clone(), i, defaults))
            })
            .collect();
        Self { entries }
    }

    /// Keeps entries still selected verbatim, adds defaults for new keys, drops the rest.
    pub fn reconcile(&self, selection: &SelectionSet, defaults: &PlacementDefaults) -> Self {
        let entries = selection
            .iter()
            .enumerate()
            .map(|(i, key)| {
                self.get(key)
                    .cloned()
                    .unwrap_or_else(|| DeityPlacement::default_at(key.clone(), i, defaults))
            })
            .collect();
        Self { entries }
    }

    /// Replaces the entry with the same key, or appends it.
    pub fn update(&mut self, placement: DeityPlacement) {
        match self.entries.iter_mut().find(|p| p.key == placement.key) {
            Some(slot) => *slot = placement,
            None => self.entries.push(placement),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DeityPlacement> {
        self.entries.iter().find(|p| p.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeityPlacement> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[DeityPlacement] {
        &self.entries
    }
}

pub struct PlacementStore {
    map: PlacementMap,
    selection: SelectionSet,
    watcher: SelectionWatcher,
    defaults: PlacementDefaults,
    storage_key: String,
    storage: Rc<dyn PersistenceAdapter>,
}

impl PlacementStore {
    /// Store with nothing selected, before storage has been read.
    pub fn empty(
        storage: Rc<dyn PersistenceAdapter>,
        storage_key: impl Into<String>,
        defaults: PlacementDefaults,
    ) -> Self {
        let selection = SelectionSet::default();
        Self {
            map: PlacementMap::default(),
            watcher: SelectionWatcher::primed(&selection),
            selection,
            defaults,
            storage_key: storage_key.into(),
            storage,
        }
    }

    /// Restores placements saved under `storage_key`. Unreadable or malformed data
    /// is treated as "nothing saved yet".
    pub fn restore(
        storage: Rc<dyn PersistenceAdapter>,
        storage_key: impl Into<String>,
        selection: SelectionSet,
        defaults: PlacementDefaults,
    ) -> Self {
        let storage_key = storage_key.into();
        let persisted: Vec<DeityPlacement> =
            match persist::read_json(storage.as_ref(), &storage_key) {
                Ok(Some(list)) => list,
                Ok(None) => Vec::new(),
                Err(e) => {
                    warn!("placements unavailable, using defaults: {e}");
                    Vec::new()
                }
            };
        let map = PlacementMap::load(&persisted, &selection, &defaults);
        info!(
            "restored {} placements ({} saved)",
            map.len(),
            persisted.len()
        );
        Self {
            map,
            watcher: SelectionWatcher::primed(&selection),
            selection,
            defaults,
            storage_key,
            storage,
        }
    }

    pub fn map(&self) -> &PlacementMap {
        &self.map
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn defaults(&self) -> &PlacementDefaults {
        &self.defaults
    }

    pub fn get(&self, key: &str) -> Option<&DeityPlacement> {
        self.map.get(key)
    }

    /// Adopts a new selection, reconciling when keys were added or removed.
    /// Returns whether the map was reconciled. Never persists.
    pub fn set_selection(&mut self, selection: SelectionSet) -> bool {
        let map = &self.map;
        let defaults = &self.defaults;
        let next = self
            .watcher
            .observe(&selection, |sel| map.reconcile(sel, defaults));
        self.selection = selection;
        match next {
            Some(map) => {
                debug!("reconciled placements for {} deities", map.len());
                self.map = map;
                true
            }
            None => false,
        }
    }

    /// Applies a user commit and persists it. Commits for deities no longer
    /// selected are dropped so a removal cannot be undone by a late gesture end.
    pub fn commit(&mut self, placement: DeityPlacement) -> bool {
        if !self.selection.contains(&placement.key) {
            debug!("dropping commit for unselected deity {}", placement.key);
            return false;
        }
        self.map.update(placement);
        self.persist();
        true
    }

    /// Sets only the scale of `key`, keeping its committed position.
    pub fn commit_scale(&mut self, key: &str, scale: f64) -> bool {
        let Some(current) = self.map.get(key) else {
            debug!("dropping scale change for unselected deity {key}");
            return false;
        };
        let placement = DeityPlacement {
            scale: clamp_scale(scale, &self.defaults),
            ..current.clone()
        };
        self.commit(placement)
    }

    /// Puts every selected deity back at its default placement.
    pub fn reset_layout(&mut self) {
        self.map = PlacementMap::load(&[], &self.selection, &self.defaults);
        self.persist();
    }

    /// Best-effort write of the whole map; failures are logged and otherwise ignored.
    pub fn persist(&self) {
        if let Err(e) = persist::write_json(
            self.storage.as_ref(),
            &self.storage_key,
            &self.map.as_slice(),
        ) {
            warn!("failed to save placements: {e}");
        }
    }
}

impl Clone for PlacementStore {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            selection: self.selection.clone(),
            watcher: self.watcher.clone(),
            defaults: self.defaults.clone(),
            storage_key: self.storage_key.clone(),
            storage: Rc::clone(&self.storage),
        }
    }
}

impl PartialEq for PlacementStore {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
            && self.selection == other.selection
            && self.defaults == other.defaults
            && self.storage_key == other.storage_key
            && std::ptr::addr_eq(Rc::as_ptr(&self.storage), Rc::as_ptr(&other.storage))
    }
}

impl fmt::Debug for PlacementStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementStore")
            .field("map", &self.map)
            .field("selection", &self.selection)
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}
