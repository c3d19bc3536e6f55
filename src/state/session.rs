use std::rc::Rc;

use tracing::{debug, info, warn};
use yew::Reducible;

use super::placement::PlacementStore;
use crate::config::{AppConfig, StorageKeys};
use crate::model::{DeityPlacement, SelectionSet, TempleConfiguration};
use crate::persist::{self, PersistenceAdapter};

/// Everything the builder and preview screens edit, driven by [`SessionAction`] messages.
pub struct TempleSession {
    /// False until [`SessionAction::Restore`] has been applied.
    pub loaded: bool,
    pub temple: TempleConfiguration,
    pub placements: PlacementStore,
    keys: StorageKeys,
    storage: Rc<dyn PersistenceAdapter>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// Read selection, temple configuration and placements from storage.
    Restore,
    ToggleDeity(String),
    SetStyle(String),
    SetGradient(Vec<String>),
    /// Gesture end on an overlay.
    Commit(DeityPlacement),
    /// Scale chosen in the long-press menu.
    SetScale { key: String, scale: f64 },
    ResetLayout,
}

impl TempleSession {
    pub fn new(storage: Rc<dyn PersistenceAdapter>, config: &AppConfig) -> Self {
        let placements = PlacementStore::empty(
            storage.clone(),
            config.storage.deity_state.clone(),
            config.placement.clone(),
        );
        Self {
            loaded: false,
            temple: TempleConfiguration::default(),
            placements,
            keys: config.storage.clone(),
            storage,
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        self.placements.selection()
    }

    fn restore(&mut self) {
        let temple = match persist::read_json::<TempleConfiguration>(
            self.storage.as_ref(),
            &self.keys.temple_config,
        ) {
            Ok(Some(t)) => t,
            Ok(None) => TempleConfiguration::default(),
            Err(e) => {
                warn!("temple configuration unavailable: {e}");
                TempleConfiguration::default()
            }
        };
        let selection = match persist::read_json::<SelectionSet>(
            self.storage.as_ref(),
            &self.keys.selected_deities,
        ) {
            Ok(Some(s)) => s,
            Ok(None) => temple.selected_deities.clone(),
            Err(e) => {
                warn!("deity selection unavailable: {e}");
                temple.selected_deities.clone()
            }
        };
        self.placements = PlacementStore::restore(
            self.storage.clone(),
            self.keys.deity_state.clone(),
            selection.clone(),
            self.placements.defaults().clone(),
        );
        self.temple = TempleConfiguration {
            selected_deities: selection,
            ..temple
        };
        self.loaded = true;
        info!(
            "temple restored: style={} deities={}",
            self.temple.selected_style,
            self.temple.selected_deities.len()
        );
    }

    /// Saves builder choices. Placements are untouched.
    fn save_temple(&self) {
        if let Err(e) = persist::write_json(
            self.storage.as_ref(),
            &self.keys.selected_deities,
            &self.temple.selected_deities,
        ) {
            warn!("failed to save deity selection: {e}");
        }
        if let Err(e) = persist::write_json(self.storage.as_ref(), &self.keys.temple_config, &self.temple) {
            warn!("failed to save temple configuration: {e}");
        }
    }
}

impl Clone for TempleSession {
    fn clone(&self) -> Self {
        Self {
            loaded: self.loaded,
            temple: self.temple.clone(),
            placements: self.placements.clone(),
            keys: self.keys.clone(),
            storage: Rc::clone(&self.storage),
        }
    }
}

impl PartialEq for TempleSession {
    fn eq(&self, other: &Self) -> bool {
        self.loaded == other.loaded
            && self.temple == other.temple
            && self.placements == other.placements
            && self.keys == other.keys
    }
}

impl Reducible for TempleSession {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use SessionAction::*;
        let mut new = (*self).clone();
        match action {
            Restore => new.restore(),
            ToggleDeity(key) => {
                new.temple.selected_deities.toggle(&key);
                debug!("selection now {:?}", new.temple.selected_deities);
                let removed = !new.temple.selected_deities.contains(&key);
                let reconciled = new
                    .placements
                    .set_selection(new.temple.selected_deities.clone());
                // a removed deity's saved placement must not come back on restart
                if removed && reconciled {
                    new.placements.persist();
                }
                new.save_temple();
            }
            SetStyle(style) => {
                if new.temple.selected_style == style {
                    return self;
                }
                new.temple.selected_style = style;
                new.save_temple();
            }
            SetGradient(stops) => {
                new.temple.bg_gradient = stops;
                new.save_temple();
            }
            Commit(placement) => {
                if !new.placements.commit(placement) {
                    return self;
                }
            }
            SetScale { key, scale } => {
                if !new.placements.commit_scale(&key, scale) {
                    return self;
                }
            }
            ResetLayout => new.placements.reset_layout(),
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScaleStep;
    use crate::persist::MemoryStorage;

    fn session(storage: &Rc<MemoryStorage>) -> Rc<TempleSession> {
        let s = Rc::new(TempleSession::new(storage.clone(), &AppConfig::default()));
        s.reduce(SessionAction::Restore)
    }

    #[test]
    fn restore_on_empty_storage_is_loaded_and_empty() {
        let storage = Rc::new(MemoryStorage::default());
        let s = Rc::new(TempleSession::new(storage.clone(), &AppConfig::default()));
        assert!(!s.loaded);
        let s = s.reduce(SessionAction::Restore);
        assert!(s.loaded);
        assert!(s.selection().is_empty());
        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn toggling_saves_selection_but_not_placements() {
        let storage = Rc::new(MemoryStorage::default());
        let keys = StorageKeys::default();
        let s = session(&storage).reduce(SessionAction::ToggleDeity("ganesh".into()));
        assert_eq!(storage.raw(&keys.selected_deities).as_deref(), Some(r#"["ganesh"]"#));
        assert!(storage.raw(&keys.temple_config).is_some());
        assert!(storage.raw(&keys.deity_state).is_none());
        assert_eq!(
            s.placements.get("ganesh"),
            Some(&DeityPlacement::new("ganesh", -60.0, 0.0, 3.0))
        );
    }

    #[test]
    fn menu_scale_down_survives_restart() {
        let storage = Rc::new(MemoryStorage::default());
        let s = session(&storage).reduce(SessionAction::ToggleDeity("ganesh".into()));
        let current = s.placements.get("ganesh").map(|p| p.scale).unwrap();
        let scale = ScaleStep::Down20.apply(current, s.placements.defaults());
        s.reduce(SessionAction::SetScale {
            key: "ganesh".into(),
            scale,
        });

        let restarted = session(&storage);
        assert_eq!(
            restarted.placements.get("ganesh"),
            Some(&DeityPlacement::new("ganesh", -60.0, 0.0, 2.4))
        );
    }

    #[test]
    fn removed_placement_does_not_return_after_restart() {
        let storage = Rc::new(MemoryStorage::default());
        let keys = StorageKeys::default();
        let s = session(&storage)
            .reduce(SessionAction::ToggleDeity("ganesh".into()))
            .reduce(SessionAction::Commit(DeityPlacement::new("ganesh", 40.0, 15.0, 3.0)))
            .reduce(SessionAction::ToggleDeity("ganesh".into()));
        assert_eq!(storage.raw(&keys.deity_state).as_deref(), Some("[]"));

        let s = s.reduce(SessionAction::ToggleDeity("ganesh".into()));
        let default = DeityPlacement::new("ganesh", -60.0, 0.0, 3.0);
        assert_eq!(s.placements.get("ganesh"), Some(&default));

        let restarted = session(&storage);
        assert_eq!(restarted.placements.get("ganesh"), Some(&default));
    }

    #[test]
    fn late_commit_after_removal_changes_nothing() {
        let storage = Rc::new(MemoryStorage::default());
        let s = session(&storage)
            .reduce(SessionAction::ToggleDeity("ganesh".into()))
            .reduce(SessionAction::ToggleDeity("ganesh".into()));
        let writes = storage.writes();
        let after = s.clone().reduce(SessionAction::Commit(DeityPlacement::new(
            "ganesh", 40.0, 15.0, 3.0,
        )));
        assert!(Rc::ptr_eq(&s, &after));
        assert_eq!(storage.writes(), writes);
        assert!(after.placements.get("ganesh").is_none());
    }

    #[test]
    fn selection_key_wins_over_configuration_copy() {
        let storage = Rc::new(MemoryStorage::default());
        let keys = StorageKeys::default();
        storage.set(&keys.selected_deities, r#"["durga"]"#).unwrap();
        storage
            .set(
                &keys.temple_config,
                r##"{"selectedStyle":"dravida","bgGradient":["#000"],"selectedDeities":["shiva"]}"##,
            )
            .unwrap();
        let s = session(&storage);
        assert_eq!(s.temple.selected_style, "dravida");
        assert!(s.selection().contains("durga"));
        assert!(!s.selection().contains("shiva"));
    }

    #[test]
    fn same_style_is_a_no_op() {
        let storage = Rc::new(MemoryStorage::default());
        let s = session(&storage);
        let style = s.temple.selected_style.clone();
        let after = s.clone().reduce(SessionAction::SetStyle(style));
        assert!(Rc::ptr_eq(&s, &after));
    }
}
