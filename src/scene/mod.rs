//! # Scene Controls (`/src/scene/`)
//!
//! The host side of tool cycling: the layer registry with its active layer
//! and tool, the adapter that exposes it to the cycle engine, and the hotkeys
//! that drive it.
//!
//! - **`layers.rs`**: built-in layer table and layer file loading
//! - **`normalize.rs`**: turns loosely shaped tool lists into descriptors
//! - **`controls.rs`**: `SceneControls` and layer change detection
//! - **`host.rs`**: `SceneHost` adapter, activation queue, `CycleParams`
//! - **`hotkeys.rs`**: key bindings and dispatch

pub mod controls;
pub mod host;
pub mod hotkeys;
pub mod layers;
pub mod normalize;

pub use controls::{detect_layer_change, LayerChanged, SceneControls};
pub use host::{
    apply_activation_requests, handle_layer_changes, ActivationQueue, BevyHost, CycleParams,
};
pub use hotkeys::{dispatch_hotkeys, HotkeyAction, HotkeyRegistry, KeyBinding};
pub use layers::SceneLayer;
pub use normalize::normalize_tools;

use bevy::prelude::*;

use crate::core::ToolCycleSystems;

/// Plugin for the scene controls and the activation queue
pub struct SceneControlsPlugin;

impl Plugin for SceneControlsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneControls>()
            .init_resource::<ActivationQueue>()
            .add_event::<LayerChanged>()
            .add_systems(
                Update,
                (
                    apply_activation_requests.in_set(ToolCycleSystems::Activation),
                    // The reset a layer change asks for lands in the same frame
                    (detect_layer_change, handle_layer_changes, apply_activation_requests)
                        .chain()
                        .in_set(ToolCycleSystems::LayerChange),
                ),
            );
    }
}
