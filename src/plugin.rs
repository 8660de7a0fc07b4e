//! The tool cycling plugin
//!
//! `ToolCyclePlugin::build` is the initialization entry point: it registers
//! the settings and the hotkeys and wires every system into the frame.

use bevy::prelude::*;

use crate::core::settings::{register_cycle_settings, sync_cycle_settings};
use crate::core::{CursorPlugin, CycleSettings, SettingsStore, ToolCycleSystemSetsPlugin, ToolCycleSystems};
use crate::scene::hotkeys::register_default_hotkeys;
use crate::scene::{
    dispatch_hotkeys, CycleParams, HotkeyRegistry, SceneControls,
    SceneControlsPlugin,
};
use crate::tools::default_filter_rules;
use crate::ui::PopupPlugin;

pub struct ToolCyclePlugin;

impl Plugin for ToolCyclePlugin {
    fn build(&self, app: &mut App) {
        let mut settings = SettingsStore::default();
        register_cycle_settings(&mut settings);

        let mut hotkeys = HotkeyRegistry::default();
        register_default_hotkeys(&mut hotkeys);

        let snapshot = CycleSettings::from_store(&settings);
        info!(
            "Tool cycling initialized: {} settings, {} hotkeys",
            settings.specs().len(),
            hotkeys.len()
        );

        app.insert_resource(settings)
            .insert_resource(snapshot)
            .insert_resource(hotkeys)
            .insert_resource(default_filter_rules())
            .add_plugins((
                ToolCycleSystemSetsPlugin,
                CursorPlugin,
                SceneControlsPlugin,
                PopupPlugin,
            ))
            .add_systems(Startup, (select_initial_layer, announce_ready).chain())
            .add_systems(PreUpdate, sync_cycle_settings)
            .add_systems(Update, dispatch_hotkeys.in_set(ToolCycleSystems::Input));
    }
}

/// Start on the first layer, the way the scene editor opens
fn select_initial_layer(controls: Res<SceneControls>, mut cycle: CycleParams) {
    if controls.active_layer_id().is_some() {
        return;
    }
    let Some(first) = controls.layers().first() else {
        warn!("No scene layers defined, nothing to cycle");
        return;
    };
    if cycle.activate_layer(&first.id).is_none() {
        warn!("Layer {} has no tool to start on", first.id);
    }
}

fn announce_ready(hotkeys: Res<HotkeyRegistry>) {
    for hotkey in hotkeys.iter() {
        debug!("  {:<16} {}", hotkey.id, hotkey.binding);
    }
    info!("Tool cycling ready");
}
