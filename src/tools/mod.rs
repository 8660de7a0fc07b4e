//! # Tool Cycling Logic (`/src/tools/`)
//!
//! This module contains the **business logic** for cycling through the tools
//! of the active scene layer. Nothing in here touches the ECS directly:
//! everything the logic needs from the surrounding application comes through
//! the [`SceneHost`] trait.
//!
//! ## Architecture Overview
//!
//! ```text
//! /src/tools/          ← YOU ARE HERE - filtering and cycling
//! /src/ui/popup/       ← The floating chip row and its timeline
//! /src/scene/          ← The scene controls host, hotkeys, layer table
//! ```
//!
//! ## Separation of Concerns
//!
//! - **`filter.rs`**: which tools of a layer are cycle targets
//! - **`cycle.rs`**: where the cursor moves and what gets activated
//! - **`ToolDescriptor`**: the canonical tool shape every component works on

pub mod cycle;
pub mod filter;

pub use cycle::{CycleDirection, CycleEngine, CycleState, SceneHost};
pub use filter::{default_filter_rules, filter_tools, LayerFilterRule, LayerFilterRules};

use smol_str::SmolStr;

/// Identifier of a scene layer (e.g. "walls", "tokens")
pub type LayerId = SmolStr;

/// Identifier of a tool within a layer (e.g. "select", "door")
pub type ToolId = SmolStr;

/// Glyph shown for a tool that doesn't define an icon
pub const DEFAULT_TOOL_ICON: &str = "*";

/// Glyph shown for a layer that doesn't define an icon
pub const DEFAULT_LAYER_ICON: &str = "#";

/// Information about a tool, derived fresh from the host on every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub display_label: String,
    pub icon_glyph: String,
    pub visible: bool,
    pub disabled: bool,
    /// Toggle tools are persistent modifiers, never cycle targets
    pub is_toggle: bool,
}

impl ToolDescriptor {
    /// A visible, enabled, non-toggle tool
    pub fn new(
        id: impl Into<ToolId>,
        display_label: impl Into<String>,
        icon_glyph: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
            icon_glyph: icon_glyph.into(),
            visible: true,
            disabled: false,
            is_toggle: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn toggle(mut self) -> Self {
        self.is_toggle = true;
        self
    }

    /// Whether this tool can ever be a cycle target, allow-lists aside
    pub fn is_cyclable(&self) -> bool {
        self.visible && !self.disabled && !self.is_toggle
    }
}
