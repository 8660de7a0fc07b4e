//! Cycle Engine
//!
//! Moves a cursor through the filtered tools of the active layer and asks the
//! host to activate whatever it lands on. The cursor is never stored: it is
//! recovered from the host's active tool on every call.

use std::time::Duration;

use bevy::math::Vec2;
use log::{debug, warn};

use super::{LayerFilterRules, LayerId, ToolDescriptor, ToolId};
use crate::core::errors::CycleResult;
use crate::core::settings::CycleSettings;
use crate::ui::popup::{PopupRequest, PopupTimeline};

/// Everything the engine needs from the surrounding scene editor
pub trait SceneHost {
    fn active_layer_id(&self) -> Option<LayerId>;

    fn active_tool_id(&self) -> Option<ToolId>;

    /// Raw tools of a layer, normalized but unfiltered
    fn tools_for_layer(&self, layer_id: &str) -> Vec<ToolDescriptor>;

    fn layer_icon(&self, layer_id: &str) -> Option<String>;

    /// Ask the host to switch tools. The host may apply this later.
    fn request_activate(&mut self, layer_id: &str, tool_id: &str) -> CycleResult<()>;

    fn settings(&self) -> &CycleSettings;

    fn now(&self) -> Duration;

    /// Last known mouse position in window coordinates
    fn cursor_position(&self) -> Vec2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleDirection {
    Next,
    Previous,
}

impl CycleDirection {
    pub fn step(self) -> isize {
        match self {
            CycleDirection::Next => 1,
            CycleDirection::Previous => -1,
        }
    }

    /// Index after stepping from `cursor` in a list of `len`, wrapping around
    pub fn advance(self, cursor: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (cursor as isize + self.step()).rem_euclid(len as isize) as usize
    }
}

/// Where the cursor sits, as inferred from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleState {
    pub layer_id: LayerId,
    pub cursor_index: usize,
}

impl CycleState {
    /// Locate the active tool in `tools`, falling back to the first entry
    pub fn infer(layer_id: LayerId, active_tool: Option<&str>, tools: &[ToolDescriptor]) -> Self {
        let found = active_tool.and_then(|id| tools.iter().position(|tool| tool.id == id));
        if found.is_none() {
            debug!(
                "active tool {:?} is not a cycle target on '{}', starting from the first tool",
                active_tool, layer_id
            );
        }
        Self {
            layer_id,
            cursor_index: found.unwrap_or(0),
        }
    }
}

/// Cycling, layer activation and reset over a borrowed host
pub struct CycleEngine<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
    rules: &'a LayerFilterRules,
    popup: &'a mut PopupTimeline,
}

impl<'a, H: SceneHost + ?Sized> CycleEngine<'a, H> {
    pub fn new(host: &'a mut H, rules: &'a LayerFilterRules, popup: &'a mut PopupTimeline) -> Self {
        Self { host, rules, popup }
    }

    /// The ordered cycle targets of a layer, fetched fresh from the host
    pub fn cyclable_tools(&self, layer_id: &str) -> Vec<ToolDescriptor> {
        self.rules
            .filter(layer_id, self.host.tools_for_layer(layer_id))
    }

    /// Step to the next or previous tool of the active layer.
    ///
    /// Returns the index that was requested, or `None` when nothing happened.
    pub fn cycle_tool(&mut self, direction: CycleDirection) -> Option<usize> {
        let settings = *self.host.settings();
        if !settings.cycle_enabled {
            return None;
        }
        let layer_id = self.host.active_layer_id()?;
        let tools = self.cyclable_tools(&layer_id);
        if tools.is_empty() {
            return None;
        }

        let active = self.host.active_tool_id();
        let state = CycleState::infer(layer_id, active.as_deref(), &tools);
        let next = direction.advance(state.cursor_index, tools.len());
        let target = &tools[next];

        // The popup goes first so it shows the pending tool even if activation fails
        let icon = self.host.layer_icon(&state.layer_id);
        let request = PopupRequest {
            layer_id: &state.layer_id,
            layer_icon: icon.as_deref(),
            tools: &tools,
            active_index: next,
        };
        self.popup.show_or_update(
            request,
            &settings.popup(),
            self.host.cursor_position(),
            self.host.now(),
        );

        debug!(
            "cycle {:?} on '{}': {} -> {} ({})",
            direction, state.layer_id, state.cursor_index, next, target.id
        );
        self.activate(&state.layer_id, &target.id);
        Some(next)
    }

    /// Select the first cycle target of `layer_id`. Leaves the popup alone.
    pub fn activate_layer(&mut self, layer_id: &str) -> Option<ToolId> {
        let first = self.cyclable_tools(layer_id).into_iter().next()?;
        self.activate(layer_id, &first.id);
        Some(first.id)
    }

    /// Put `layer_id` back on its first tool if resetting is on and needed
    pub fn reset_tool_if_enabled(&mut self, layer_id: &str) -> Option<ToolId> {
        if !self.host.settings().reset_on_change {
            return None;
        }
        let first = self.cyclable_tools(layer_id).into_iter().next()?;
        if self.host.active_tool_id().as_ref() == Some(&first.id) {
            return None;
        }
        self.activate(layer_id, &first.id);
        Some(first.id)
    }

    /// React to the host switching layers: drop the popup, then reset
    pub fn handle_layer_changed(&mut self, layer_id: &str) -> Option<ToolId> {
        self.popup.hide_immediate();
        self.reset_tool_if_enabled(layer_id)
    }

    fn activate(&mut self, layer_id: &str, tool_id: &str) {
        if let Err(err) = self.host.request_activate(layer_id, tool_id) {
            warn!("tool activation failed (layer '{layer_id}', tool '{tool_id}'): {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_in_both_directions() {
        assert_eq!(CycleDirection::Next.advance(2, 3), 0);
        assert_eq!(CycleDirection::Previous.advance(0, 3), 2);
        assert_eq!(CycleDirection::Next.advance(0, 1), 0);
        assert_eq!(CycleDirection::Previous.advance(0, 1), 0);
    }

    #[test]
    fn advance_on_empty_list_stays_at_zero() {
        assert_eq!(CycleDirection::Next.advance(0, 0), 0);
    }

    #[test]
    fn missing_active_tool_falls_back_to_first() {
        let tools = vec![
            ToolDescriptor::new("select", "Select", "*"),
            ToolDescriptor::new("wall", "Wall", "*"),
        ];
        let state = CycleState::infer("walls".into(), Some("door"), &tools);
        assert_eq!(state.cursor_index, 0);

        let state = CycleState::infer("walls".into(), Some("wall"), &tools);
        assert_eq!(state.cursor_index, 1);

        let state = CycleState::infer("walls".into(), None, &tools);
        assert_eq!(state.cursor_index, 0);
    }
}
