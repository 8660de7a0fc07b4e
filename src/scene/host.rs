//! Bevy side of the scene host
//!
//! [`BevyHost`] adapts the ECS resources to [`SceneHost`] for the duration of
//! one engine call. Activation requests are queued and applied by
//! [`apply_activation_requests`] later in the frame; the engine never waits
//! on them.

use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::controls::{LayerChanged, SceneControls};
use crate::core::cursor::CursorInfo;
use crate::core::errors::{CycleContext, CycleResult};
use crate::core::settings::CycleSettings;
use crate::tools::{
    CycleDirection, CycleEngine, LayerFilterRules, LayerId, SceneHost, ToolDescriptor, ToolId,
};
use crate::ui::popup::PopupTimeline;

/// An activation the host still has to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    pub layer_id: LayerId,
    pub tool_id: ToolId,
}

/// Activation requests waiting for [`apply_activation_requests`]
#[derive(Resource, Debug, Default)]
pub struct ActivationQueue {
    pending: Vec<ActivationRequest>,
}

impl ActivationQueue {
    pub fn push(&mut self, layer_id: &str, tool_id: &str) {
        self.pending.push(ActivationRequest {
            layer_id: layer_id.into(),
            tool_id: tool_id.into(),
        });
    }

    pub fn pending(&self) -> &[ActivationRequest] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, ActivationRequest> {
        self.pending.drain(..)
    }
}

/// The scene controls seen through the [`SceneHost`] trait
pub struct BevyHost<'a> {
    controls: &'a SceneControls,
    queue: &'a mut ActivationQueue,
    settings: &'a CycleSettings,
    now: Duration,
    cursor: Vec2,
}

impl<'a> BevyHost<'a> {
    pub fn new(
        controls: &'a SceneControls,
        queue: &'a mut ActivationQueue,
        settings: &'a CycleSettings,
        now: Duration,
        cursor: Vec2,
    ) -> Self {
        Self {
            controls,
            queue,
            settings,
            now,
            cursor,
        }
    }
}

impl SceneHost for BevyHost<'_> {
    fn active_layer_id(&self) -> Option<LayerId> {
        self.controls.active_layer_id().cloned()
    }

    fn active_tool_id(&self) -> Option<ToolId> {
        self.controls.active_tool_id().cloned()
    }

    fn tools_for_layer(&self, layer_id: &str) -> Vec<ToolDescriptor> {
        self.controls
            .layer(layer_id)
            .map(|layer| layer.tools.clone())
            .unwrap_or_default()
    }

    fn layer_icon(&self, layer_id: &str) -> Option<String> {
        self.controls.layer(layer_id).map(|layer| layer.icon.clone())
    }

    fn request_activate(&mut self, layer_id: &str, tool_id: &str) -> CycleResult<()> {
        self.queue.push(layer_id, tool_id);
        Ok(())
    }

    fn settings(&self) -> &CycleSettings {
        self.settings
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn cursor_position(&self) -> Vec2 {
        self.cursor
    }
}

/// Everything a system needs to run the cycle engine
#[derive(SystemParam)]
pub struct CycleParams<'w> {
    controls: Res<'w, SceneControls>,
    queue: ResMut<'w, ActivationQueue>,
    rules: Res<'w, LayerFilterRules>,
    popup: ResMut<'w, PopupTimeline>,
    settings: Res<'w, CycleSettings>,
    cursor: Res<'w, CursorInfo>,
    time: Res<'w, Time>,
}

impl CycleParams<'_> {
    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.controls.has_layer(layer_id)
    }

    pub fn available_layers(&self) -> String {
        self.controls.available_layers()
    }

    pub fn cycle_tool(&mut self, direction: CycleDirection) -> Option<usize> {
        let mut host = BevyHost::new(
            &self.controls,
            &mut self.queue,
            &self.settings,
            self.time.elapsed(),
            self.cursor.position(),
        );
        CycleEngine::new(&mut host, &self.rules, &mut self.popup).cycle_tool(direction)
    }

    pub fn activate_layer(&mut self, layer_id: &str) -> Option<ToolId> {
        let mut host = BevyHost::new(
            &self.controls,
            &mut self.queue,
            &self.settings,
            self.time.elapsed(),
            self.cursor.position(),
        );
        CycleEngine::new(&mut host, &self.rules, &mut self.popup).activate_layer(layer_id)
    }

    pub fn handle_layer_changed(&mut self, layer_id: &str) -> Option<ToolId> {
        let mut host = BevyHost::new(
            &self.controls,
            &mut self.queue,
            &self.settings,
            self.time.elapsed(),
            self.cursor.position(),
        );
        CycleEngine::new(&mut host, &self.rules, &mut self.popup).handle_layer_changed(layer_id)
    }
}

/// Apply queued activations; failures are logged and dropped
pub fn apply_activation_requests(
    mut queue: ResMut<ActivationQueue>,
    mut controls: ResMut<SceneControls>,
) {
    if queue.is_empty() {
        return;
    }
    for request in queue.drain() {
        if let Err(e) = controls
            .activate(&request.layer_id, &request.tool_id)
            .with_activation_context(&request.layer_id, &request.tool_id)
        {
            warn!("{e:#}");
        }
    }
}

/// Hide the popup and reset the tool whenever the layer changes
pub fn handle_layer_changes(mut events: EventReader<LayerChanged>, mut cycle: CycleParams) {
    for event in events.read() {
        debug!("Layer changed to {}", event.layer_id);
        cycle.handle_layer_changed(&event.layer_id);
    }
}
