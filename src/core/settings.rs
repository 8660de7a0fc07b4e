// Settings /////////////////////////////////////////////////////////////////////
// Registered settings for tool cycling and the cycle popup. Every setting is
// registered with a default at start-up; a JSON file given on the command line
// may override values and keybindings. Values that are missing or of the wrong
// type never take effect: the registered default stays in place.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::errors::{bail, CycleContext, CycleResult};
use crate::ui::popup::PopupSettings;

// Setting keys ///////////////////////////////////////////////////////////////

pub const CYCLE_ENABLED: &str = "cycleEnabled";
pub const RESET_ON_CHANGE: &str = "resetOnChange";
pub const SHOW_POPUP: &str = "showPopup";
pub const POPUP_MS: &str = "popupMs";
pub const SHOW_LAYER_ICON: &str = "showLayerIcon";
pub const ANIMATE_POPUP: &str = "animatePopup";

// Popup hold bounds //////////////////////////////////////////////////////////

/// Shortest hold the popup settings accept, in milliseconds
pub const POPUP_MS_MIN: i64 = 200;
/// Longest hold the popup settings accept, in milliseconds
pub const POPUP_MS_MAX: i64 = 3000;
pub const POPUP_MS_STEP: i64 = 100;
pub const POPUP_MS_DEFAULT: i64 = 900;

/// Who a setting applies to. Every tool cycling setting is shared by the
/// whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingScope {
    World,
}

impl SettingScope {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingScope::World => "world",
        }
    }
}

/// Value type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Bool,
    Int { min: i64, max: i64, step: i64 },
}

/// A registered setting and its metadata
#[derive(Debug, Clone)]
pub struct SettingSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub hint: &'static str,
    pub scope: SettingScope,
    pub kind: SettingKind,
    pub default: Value,
}

/// Shape of the JSON overrides file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub settings: Map<String, Value>,
    /// Hotkey id → binding string, e.g. `"Ctrl+Alt+BracketRight"`
    pub keybindings: HashMap<String, String>,
}

/// The settings store: registered specs plus their current values
#[derive(Resource, Debug, Default)]
pub struct SettingsStore {
    specs: Vec<SettingSpec>,
    values: HashMap<&'static str, Value>,
}

impl SettingsStore {
    /// Register a setting, seeding its value with the default
    pub fn register(&mut self, spec: SettingSpec) {
        debug!("Registering setting: {} ({})", spec.name, spec.key);
        self.values.entry(spec.key).or_insert_with(|| spec.default.clone());
        self.specs.retain(|existing| existing.key != spec.key);
        self.specs.push(spec);
    }

    pub fn spec(&self, key: &str) -> Option<&SettingSpec> {
        self.specs.iter().find(|spec| spec.key == key)
    }

    pub fn specs(&self) -> &[SettingSpec] {
        &self.specs
    }

    /// One line per setting: key, scope, current value and name
    pub fn describe(&self) -> Vec<String> {
        self.specs
            .iter()
            .map(|spec| {
                let value = self.get(spec.key).unwrap_or(&Value::Null);
                format!(
                    "{:<14} [{}] = {:<5} {}",
                    spec.key,
                    spec.scope.as_str(),
                    value.to_string(),
                    spec.name
                )
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// A boolean setting; absent or non-boolean reads as disabled
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Set a registered setting, checking its type and range
    pub fn set(&mut self, key: &str, value: Value) -> CycleResult<()> {
        let Some(spec) = self.spec(key) else {
            bail!("Unknown setting '{key}'");
        };
        let key = spec.key;

        let value = match spec.kind {
            SettingKind::Bool => {
                if !value.is_boolean() {
                    bail!("Setting '{key}' expects a boolean, got {value}");
                }
                value
            }
            SettingKind::Int { min, max, step } => {
                let Some(raw) = value.as_f64() else {
                    bail!("Setting '{key}' expects a number, got {value}");
                };
                Value::from(snap_to_step(raw.round() as i64, min, max, step))
            }
        };

        self.values.insert(key, value);
        Ok(())
    }

    /// Apply overrides; bad entries are skipped with a warning
    pub fn apply_overrides(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            if let Err(e) = self.set(key, value.clone()) {
                warn!("Ignoring settings override: {e}");
            }
        }
    }

    /// Read a settings file and apply its `settings` section
    pub fn load_overrides(&mut self, path: &Path) -> CycleResult<SettingsFile> {
        let contents = std::fs::read_to_string(path)
            .with_file_context("read settings", path)?;
        let file: SettingsFile = serde_json::from_str(&contents)
            .with_file_context("parse settings", path)?;

        self.apply_overrides(&file.settings);
        info!(
            "Loaded {} setting override(s) from {}",
            file.settings.len(),
            path.display()
        );
        Ok(file)
    }
}

/// Print the registered settings for debugging
pub fn print_settings(store: &SettingsStore) {
    info!("=== SETTINGS ===");
    for line in store.describe() {
        info!("{line}");
    }
    info!("================");
}

/// Clamp to `[min, max]` and snap onto the step grid anchored at `min`
fn snap_to_step(value: i64, min: i64, max: i64, step: i64) -> i64 {
    let clamped = value.clamp(min, max);
    if step <= 1 {
        return clamped;
    }
    let steps = ((clamped - min) as f64 / step as f64).round() as i64;
    (min + steps * step).min(max)
}

/// Register every tool cycling setting with its default
pub fn register_cycle_settings(store: &mut SettingsStore) {
    let bool_setting = |key, name, hint, default: bool| SettingSpec {
        key,
        name,
        hint,
        scope: SettingScope::World,
        kind: SettingKind::Bool,
        default: Value::Bool(default),
    };

    store.register(bool_setting(
        CYCLE_ENABLED,
        "Cycle tools with hotkeys",
        "Step through the active layer's tools with the cycle hotkeys.",
        true,
    ));
    store.register(bool_setting(
        RESET_ON_CHANGE,
        "Reset tool on layer change",
        "Switch back to the layer's first tool whenever the layer changes.",
        true,
    ));
    store.register(bool_setting(
        SHOW_POPUP,
        "Show cycle popup",
        "Show the tool icons above the cursor while cycling.",
        true,
    ));
    store.register(SettingSpec {
        key: POPUP_MS,
        name: "Popup duration (ms)",
        hint: "How long the cycle popup stays up after the last cycle.",
        scope: SettingScope::World,
        kind: SettingKind::Int {
            min: POPUP_MS_MIN,
            max: POPUP_MS_MAX,
            step: POPUP_MS_STEP,
        },
        default: Value::from(POPUP_MS_DEFAULT),
    });
    store.register(bool_setting(
        SHOW_LAYER_ICON,
        "Show layer icon in popup",
        "Lead the popup with an icon for the layer itself.",
        false,
    ));
    store.register(bool_setting(
        ANIMATE_POPUP,
        "Animate popup",
        "Fan the popup out and back in instead of showing it instantly.",
        true,
    ));
}

/// Typed snapshot of the settings the core reads
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSettings {
    pub cycle_enabled: bool,
    pub reset_on_change: bool,
    pub show_popup: bool,
    pub popup_ms: u32,
    pub show_layer_icon: bool,
    pub animate_popup: bool,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            cycle_enabled: true,
            reset_on_change: true,
            show_popup: true,
            popup_ms: POPUP_MS_DEFAULT as u32,
            show_layer_icon: false,
            animate_popup: true,
        }
    }
}

impl CycleSettings {
    pub fn from_store(store: &SettingsStore) -> Self {
        let popup_ms = store
            .get_int(POPUP_MS)
            .unwrap_or(POPUP_MS_DEFAULT)
            .clamp(POPUP_MS_MIN, POPUP_MS_MAX) as u32;

        Self {
            cycle_enabled: store.get_bool(CYCLE_ENABLED),
            reset_on_change: store.get_bool(RESET_ON_CHANGE),
            show_popup: store.get_bool(SHOW_POPUP),
            popup_ms,
            show_layer_icon: store.get_bool(SHOW_LAYER_ICON),
            animate_popup: store.get_bool(ANIMATE_POPUP),
        }
    }

    /// Everything the popup timeline needs to know
    pub fn popup(&self) -> PopupSettings {
        PopupSettings {
            enabled: self.show_popup,
            hold: Duration::from_millis(u64::from(self.popup_ms)),
            show_layer_icon: self.show_layer_icon,
            animate: self.animate_popup,
        }
    }
}

/// Keep the typed snapshot in step with the store
pub fn sync_cycle_settings(
    store: Res<SettingsStore>,
    mut settings: ResMut<CycleSettings>,
) {
    if !store.is_changed() {
        return;
    }
    let fresh = CycleSettings::from_store(&store);
    if *settings != fresh {
        debug!("Cycle settings updated: {:?}", fresh);
        *settings = fresh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registered() -> SettingsStore {
        let mut store = SettingsStore::default();
        register_cycle_settings(&mut store);
        store
    }

    #[test]
    fn registration_seeds_defaults() {
        let store = registered();
        assert_eq!(CycleSettings::from_store(&store), CycleSettings::default());
        assert_eq!(store.specs().len(), 6);
    }

    #[test]
    fn absent_settings_read_as_disabled() {
        let store = SettingsStore::default();
        let settings = CycleSettings::from_store(&store);
        assert!(!settings.cycle_enabled);
        assert!(!settings.show_popup);
        assert_eq!(settings.popup_ms, 900);
    }

    #[test]
    fn popup_ms_is_clamped_and_snapped() {
        let mut store = registered();
        store.set(POPUP_MS, json!(50)).unwrap();
        assert_eq!(store.get_int(POPUP_MS), Some(200));
        store.set(POPUP_MS, json!(99999)).unwrap();
        assert_eq!(store.get_int(POPUP_MS), Some(3000));
        store.set(POPUP_MS, json!(1249)).unwrap();
        assert_eq!(store.get_int(POPUP_MS), Some(1200));
    }

    #[test]
    fn wrong_type_overrides_keep_default() {
        let mut store = registered();
        let overrides = json!({
            "showPopup": "yes",
            "animatePopup": false,
            "noSuchSetting": true,
        });
        store.apply_overrides(overrides.as_object().unwrap());

        let settings = CycleSettings::from_store(&store);
        assert!(settings.show_popup);
        assert!(!settings.animate_popup);
        assert!(store.get("noSuchSetting").is_none());
    }

    #[test]
    fn describe_shows_scope_and_current_value() {
        let mut store = registered();
        store.set(POPUP_MS, json!(1500)).unwrap();

        let lines = store.describe();
        assert_eq!(lines.len(), 6);
        let popup_ms = lines
            .iter()
            .find(|line| line.starts_with(POPUP_MS))
            .unwrap();
        assert!(popup_ms.contains("[world]"), "{popup_ms}");
        assert!(popup_ms.contains("= 1500"), "{popup_ms}");
        assert!(popup_ms.ends_with("Popup duration (ms)"), "{popup_ms}");
    }

    #[test]
    fn popup_settings_carry_hold_duration() {
        let settings = CycleSettings {
            popup_ms: 1500,
            ..CycleSettings::default()
        };
        assert_eq!(settings.popup().hold, Duration::from_millis(1500));
    }

    #[test]
    fn settings_file_sections_default_to_empty() {
        let file: SettingsFile =
            serde_json::from_str(r#"{ "keybindings": { "cycleNext": "Ctrl+Period" } }"#)
                .unwrap();
        assert!(file.settings.is_empty());
        assert_eq!(file.keybindings["cycleNext"], "Ctrl+Period");
    }
}
