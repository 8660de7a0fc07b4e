//! System Sets for Tool Cycling
//!
//! This module defines the execution order for tool cycling systems using Bevy's SystemSet pattern.
//! Activations are queued by input and applied before the layer is checked
//! for a change, so a layer switch is handled in the frame it lands.

use bevy::prelude::*;

/// System sets that define the execution order for tool cycling
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ToolCycleSystems {
    /// Hotkeys and toolbar clicks (queue activations, show the popup)
    Input,

    /// Apply queued activations to the scene controls
    Activation,

    /// React to a new active layer (tear down the popup, reset the tool)
    LayerChange,

    /// Tick the popup timeline and move the chips
    Popup,

    /// Redraw toolbar highlights
    Toolbar,
}

/// Plugin to configure system set ordering
pub struct ToolCycleSystemSetsPlugin;

impl Plugin for ToolCycleSystemSetsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                ToolCycleSystems::Input,
                ToolCycleSystems::Activation,
                ToolCycleSystems::LayerChange,
                ToolCycleSystems::Popup,
                ToolCycleSystems::Toolbar,
            )
                .chain(),
        );

        debug!("Tool cycle system sets configured");
    }
}
