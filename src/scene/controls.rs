//! Scene Controls
//!
//! The registry of scene layers and which layer and tool are active. This is
//! the "host" side of tool cycling: the cycle engine only ever reads from it
//! and asks it to activate things.

use bevy::prelude::*;

use super::layers::{default_scene_layers, SceneLayer};
use crate::core::errors::{bail, CycleResult};
use crate::tools::{LayerId, ToolId};
use crate::{layer_not_found, tool_not_found};

/// Fired when the active layer differs from the last one seen
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LayerChanged {
    pub layer_id: LayerId,
}

/// Resource holding the scene layers and the current selection
#[derive(Resource, Debug, Clone)]
pub struct SceneControls {
    layers: Vec<SceneLayer>,
    active_layer: Option<LayerId>,
    active_tool: Option<ToolId>,
}

impl Default for SceneControls {
    fn default() -> Self {
        Self::new(default_scene_layers())
    }
}

impl SceneControls {
    /// Nothing is active until something is activated
    pub fn new(layers: Vec<SceneLayer>) -> Self {
        Self {
            layers,
            active_layer: None,
            active_tool: None,
        }
    }

    pub fn layers(&self) -> &[SceneLayer] {
        &self.layers
    }

    pub fn layer(&self, layer_id: &str) -> Option<&SceneLayer> {
        self.layers.iter().find(|layer| layer.id == layer_id)
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layer(layer_id).is_some()
    }

    pub fn active_layer_id(&self) -> Option<&LayerId> {
        self.active_layer.as_ref()
    }

    pub fn active_tool_id(&self) -> Option<&ToolId> {
        self.active_tool.as_ref()
    }

    pub fn active_layer(&self) -> Option<&SceneLayer> {
        self.active_layer.as_deref().and_then(|id| self.layer(id))
    }

    /// Comma-separated layer ids, for error messages
    pub fn available_layers(&self) -> String {
        self.layers
            .iter()
            .map(|layer| layer.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Make `tool_id` on `layer_id` the active tool
    pub fn activate(&mut self, layer_id: &str, tool_id: &str) -> CycleResult<()> {
        let Some(layer) = self.layer(layer_id) else {
            return Err(layer_not_found!(layer_id, self.available_layers()));
        };
        let Some(tool) = layer.tool(tool_id) else {
            return Err(tool_not_found!(layer_id, tool_id));
        };
        if tool.disabled {
            bail!("Tool '{tool_id}' on layer '{layer_id}' is disabled");
        }
        if !tool.visible {
            bail!("Tool '{tool_id}' on layer '{layer_id}' is hidden");
        }
        if tool.is_toggle {
            bail!("Tool '{tool_id}' on layer '{layer_id}' is a toggle, not a mode");
        }

        let (layer_id, tool_id) = (layer.id.clone(), tool.id.clone());
        if self.active_layer.as_ref() != Some(&layer_id) {
            info!("Active layer: {}", layer_id);
        }
        debug!("Active tool: {} / {}", layer_id, tool_id);
        self.active_layer = Some(layer_id);
        self.active_tool = Some(tool_id);
        Ok(())
    }
}

/// Send [`LayerChanged`] whenever the active layer differs from the last seen
pub fn detect_layer_change(
    controls: Res<SceneControls>,
    mut last_layer: Local<Option<LayerId>>,
    mut events: EventWriter<LayerChanged>,
) {
    let Some(active) = controls.active_layer_id() else {
        return;
    };
    if last_layer.as_ref() == Some(active) {
        return;
    }
    *last_layer = Some(active.clone());
    events.write(LayerChanged {
        layer_id: active.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_nothing_active() {
        let controls = SceneControls::default();
        assert!(controls.active_layer_id().is_none());
        assert!(controls.active_tool_id().is_none());
        assert_eq!(controls.layers().len(), 9);
    }

    #[test]
    fn activate_switches_layer_and_tool() {
        let mut controls = SceneControls::default();
        controls.activate("walls", "door").unwrap();
        assert_eq!(controls.active_layer_id().map(|id| id.as_str()), Some("walls"));
        assert_eq!(controls.active_tool_id().map(|id| id.as_str()), Some("door"));
        assert_eq!(controls.active_layer().map(|l| l.title.as_str()), Some("Wall Controls"));
    }

    #[test]
    fn activate_rejects_unknown_and_ineligible_tools() {
        let mut controls = SceneControls::default();
        let err = controls.activate("attic", "select").unwrap_err();
        assert!(err.to_string().contains("Layer 'attic' not found"));

        assert!(controls.activate("walls", "nope").is_err());
        assert!(controls.activate("walls", "snap").is_err());
        assert!(controls.activate("lighting", "day").is_err());

        // A failed activation changes nothing
        assert!(controls.active_layer_id().is_none());
    }

    #[test]
    fn layer_change_is_reported_once_per_switch() {
        let mut app = App::new();
        app.add_event::<LayerChanged>()
            .init_resource::<SceneControls>()
            .add_systems(Update, detect_layer_change);

        let changes = |app: &mut App| {
            app.world_mut()
                .resource_mut::<Events<LayerChanged>>()
                .drain()
                .map(|e| e.layer_id.to_string())
                .collect::<Vec<_>>()
        };

        app.update();
        assert!(changes(&mut app).is_empty());

        app.world_mut()
            .resource_mut::<SceneControls>()
            .activate("tokens", "select")
            .unwrap();
        app.update();
        assert_eq!(changes(&mut app), ["tokens"]);

        app.world_mut()
            .resource_mut::<SceneControls>()
            .activate("tokens", "ruler")
            .unwrap();
        app.update();
        assert!(changes(&mut app).is_empty());

        app.world_mut()
            .resource_mut::<SceneControls>()
            .activate("walls", "select")
            .unwrap();
        app.update();
        assert_eq!(changes(&mut app), ["walls"]);
    }
}
