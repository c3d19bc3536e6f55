use serde::{Deserialize, Serialize};

use crate::persist::{self, PersistError, PersistenceAdapter};

/// localStorage key holding an optional JSON override of [`AppConfig`].
pub const APP_CONFIG_KEY: &str = "tb_app_config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementDefaults {
    /// `x` of the first deity in the selection.
    pub origin_x: f64,
    /// Horizontal gap between consecutive default placements.
    pub spacing: f64,
    pub y: f64,
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            origin_x: -60.0,
            spacing: 80.0,
            y: 0.0,
            scale: 3.0,
            min_scale: 0.5,
            max_scale: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Movement (logical px) before a single-pointer drag becomes a pan.
    pub drag_threshold_px: f64,
    pub long_press_ms: f64,
    /// Interval of the timer that drives long-press detection.
    pub tick_ms: i32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 8.0,
            long_press_ms: 3000.0,
            tick_ms: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub selected_deities: String,
    pub temple_config: String,
    pub deity_state: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            selected_deities: "tb_selected_deities".to_string(),
            temple_config: "tb_temple_config".to_string(),
            deity_state: "tb_deity_state".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub placement: PlacementDefaults,
    pub gesture: GestureConfig,
    pub storage: StorageKeys,
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            placement: PlacementDefaults::default(),
            gesture: GestureConfig::default(),
            storage: StorageKeys::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the override stored under [`APP_CONFIG_KEY`], falling back to defaults.
    /// A read or parse failure is handed back so it can be logged once logging is up.
    pub fn load(storage: &dyn PersistenceAdapter) -> (Self, Option<PersistError>) {
        match persist::read_json(storage, APP_CONFIG_KEY) {
            Ok(cfg) => (cfg.unwrap_or_default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let storage = MemoryStorage::default();
        storage
            .set(APP_CONFIG_KEY, r#"{"gesture":{"long_press_ms":1500},"log_level":"debug"}"#)
            .unwrap();
        let (cfg, err) = AppConfig::load(&storage);
        assert!(err.is_none());
        assert_eq!(cfg.gesture.long_press_ms, 1500.0);
        assert_eq!(cfg.gesture.drag_threshold_px, 8.0);
        assert_eq!(cfg.placement, PlacementDefaults::default());
        assert_eq!(cfg.level(), tracing::Level::DEBUG);
    }

    #[test]
    fn malformed_override_falls_back() {
        let storage = MemoryStorage::default();
        storage.set(APP_CONFIG_KEY, "{not json").unwrap();
        let (cfg, err) = AppConfig::load(&storage);
        assert_eq!(cfg, AppConfig::default());
        assert!(matches!(err, Some(PersistError::Malformed { ref key, .. }) if key == APP_CONFIG_KEY));
    }

    #[test]
    fn missing_override_is_silent() {
        let storage = MemoryStorage::default();
        let (cfg, err) = AppConfig::load(&storage);
        assert_eq!(cfg, AppConfig::default());
        assert!(err.is_none());
    }

    #[test]
    fn unknown_level_is_info() {
        let cfg = AppConfig {
            log_level: "loud".into(),
            ..AppConfig::default()
        };
        assert_eq!(cfg.level(), tracing::Level::INFO);
    }
}
