//! Scene Layer Configuration
//!
//! This file contains the built-in scene layers and their tools.
//! To modify the scene controls:
//! 1. Change the order number to reposition a layer
//! 2. Mark a tool `hidden`, `disabled` or `toggle` to keep it out of cycling
//! 3. Change icon to use a different glyph
//!
//! A JSON file passed with `--layers` replaces this table at start-up.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;
use serde_json::Value;

use super::normalize::normalize_tools;
use crate::core::errors::{CycleContext, CycleResult};
use crate::tools::{LayerId, ToolDescriptor, DEFAULT_LAYER_ICON};

/// Built-in definition of a single tool
#[derive(Debug, Clone, Copy)]
pub struct ToolConfig {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub visible: bool,
    pub disabled: bool,
    pub toggle: bool,
}

impl ToolConfig {
    const fn tool(id: &'static str, title: &'static str, icon: &'static str) -> Self {
        Self {
            id,
            title,
            icon,
            visible: true,
            disabled: false,
            toggle: false,
        }
    }

    const fn toggle(id: &'static str, title: &'static str, icon: &'static str) -> Self {
        Self {
            toggle: true,
            ..Self::tool(id, title, icon)
        }
    }

    const fn hidden(id: &'static str, title: &'static str, icon: &'static str) -> Self {
        Self {
            visible: false,
            ..Self::tool(id, title, icon)
        }
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            id: self.id.into(),
            display_label: self.title.to_string(),
            icon_glyph: self.icon.to_string(),
            visible: self.visible,
            disabled: self.disabled,
            is_toggle: self.toggle,
        }
    }
}

/// Built-in definition of a scene layer
#[derive(Debug, Clone, Copy)]
pub struct LayerConfig {
    /// Display order in the toolbar (lower = earlier)
    pub order: i32,
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub tools: &'static [ToolConfig],
}

/// ============================================================================
/// SCENE LAYERS - EDIT THIS TO CHANGE THE DEFAULT SCENE CONTROLS
/// ============================================================================
///
/// Tool order within a layer is the cycling order. The first cyclable tool of
/// each layer is the one a layer switch resets to.
pub const SCENE_LAYERS: &[LayerConfig] = &[
    LayerConfig {
        order: 10,
        id: "tokens",
        title: "Token Controls",
        icon: "T",
        tools: &[
            ToolConfig::tool("select", "Select Tokens", "S"),
            ToolConfig::tool("target", "Select Targets", "+"),
            ToolConfig::tool("ruler", "Measure Distance", "R"),
            ToolConfig::toggle("unconstrained", "Unconstrained Movement", "U"),
        ],
    },
    LayerConfig {
        order: 20,
        id: "templates",
        title: "Measurement Controls",
        icon: "M",
        tools: &[
            ToolConfig::tool("circle", "Circle Template", "O"),
            ToolConfig::tool("cone", "Cone Template", "V"),
            ToolConfig::tool("rect", "Rectangle Template", "[]"),
            ToolConfig::tool("ray", "Ray Template", "/"),
            ToolConfig::tool("clear", "Clear Templates", "X"),
        ],
    },
    LayerConfig {
        order: 30,
        id: "tiles",
        title: "Tile Controls",
        icon: "I",
        tools: &[
            ToolConfig::tool("select", "Select Tiles", "S"),
            ToolConfig::tool("tile", "Place Tile", "P"),
            ToolConfig::tool("browse", "Browse Tiles", "B"),
            ToolConfig::toggle("foreground", "Foreground", "F"),
        ],
    },
    LayerConfig {
        order: 40,
        id: "drawings",
        title: "Drawing Tools",
        icon: "D",
        tools: &[
            ToolConfig::tool("select", "Select Drawings", "S"),
            ToolConfig::tool("rect", "Draw Rectangle", "[]"),
            ToolConfig::tool("ellipse", "Draw Ellipse", "O"),
            ToolConfig::tool("polygon", "Draw Polygon", "^"),
            ToolConfig::tool("freehand", "Draw Freehand", "~"),
            ToolConfig::tool("text", "Draw Text", "A"),
            ToolConfig::tool("configure", "Drawing Defaults", "="),
        ],
    },
    LayerConfig {
        order: 50,
        id: "walls",
        title: "Wall Controls",
        icon: "W",
        tools: &[
            ToolConfig::tool("select", "Rectangular Select Walls", "S"),
            ToolConfig::tool("wall", "Basic Walls", "|"),
            ToolConfig::tool("terrain", "Terrain Walls", "m"),
            ToolConfig::tool("invisible", "Invisible Walls", ":"),
            ToolConfig::tool("ethereal", "Ethereal Walls", "e"),
            ToolConfig::tool("door", "Draw Doors", "D"),
            ToolConfig::tool("secret", "Secret Doors", "?"),
            ToolConfig::tool("window", "Window Walls", "#"),
            ToolConfig::toggle("snap", "Snap to Grid", "@"),
        ],
    },
    LayerConfig {
        order: 60,
        id: "lighting",
        title: "Lighting Controls",
        icon: "L",
        tools: &[
            ToolConfig::tool("light", "Draw Light Source", "L"),
            ToolConfig::tool("select", "Select", "S"),
            ToolConfig::hidden("day", "Transition to Daylight", "d"),
            ToolConfig::hidden("night", "Transition to Darkness", "n"),
        ],
    },
    LayerConfig {
        order: 70,
        id: "sounds",
        title: "Ambient Sound Controls",
        icon: "S",
        tools: &[
            ToolConfig::tool("select", "Select", "S"),
            ToolConfig::tool("sound", "Draw Ambient Sound", "~"),
            ToolConfig::toggle("preview", "Preview Sounds", "P"),
        ],
    },
    LayerConfig {
        order: 80,
        id: "regions",
        title: "Region Controls",
        icon: "G",
        tools: &[
            ToolConfig::tool("select", "Select Regions", "S"),
            ToolConfig::tool("rect", "Draw Rectangle", "[]"),
            ToolConfig::tool("ellipse", "Draw Ellipse", "O"),
            ToolConfig::tool("polygon", "Draw Polygon", "^"),
        ],
    },
    LayerConfig {
        order: 90,
        id: "notes",
        title: "Journal Notes",
        icon: "N",
        tools: &[
            ToolConfig::tool("select", "Select Notes", "S"),
            ToolConfig::tool("note", "Create Map Note", "N"),
            ToolConfig::toggle("toggle", "Toggle Notes Display", "V"),
        ],
    },
];

/// A scene layer as the scene controls hold it at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLayer {
    pub id: LayerId,
    pub title: String,
    pub icon: String,
    pub tools: Vec<ToolDescriptor>,
}

impl SceneLayer {
    pub fn tool(&self, tool_id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.id == tool_id)
    }
}

impl From<&LayerConfig> for SceneLayer {
    fn from(config: &LayerConfig) -> Self {
        Self {
            id: config.id.into(),
            title: config.title.to_string(),
            icon: config.icon.to_string(),
            tools: config.tools.iter().map(ToolConfig::descriptor).collect(),
        }
    }
}

/// The built-in layers, sorted by order
pub fn default_scene_layers() -> Vec<SceneLayer> {
    let mut configs: Vec<_> = SCENE_LAYERS.iter().collect();
    configs.sort_by_key(|layer| layer.order);
    configs.into_iter().map(SceneLayer::from).collect()
}

/// A layer as written in a layers file
#[derive(Debug, Deserialize)]
struct RawLayer {
    name: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    tools: Value,
}

/// Shape of a layers file: `{ "layers": [...] }` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayersFile {
    Wrapped { layers: Vec<RawLayer> },
    Bare(Vec<RawLayer>),
}

/// Parse scene layers from JSON text
pub fn parse_scene_layers(json: &str) -> CycleResult<Vec<SceneLayer>> {
    let file: LayersFile = serde_json::from_str(json)?;
    let raw = match file {
        LayersFile::Wrapped { layers } | LayersFile::Bare(layers) => layers,
    };

    Ok(raw
        .into_iter()
        .filter(|layer| !layer.name.trim().is_empty())
        .map(|layer| {
            let id = layer.name.trim().to_string();
            SceneLayer {
                title: layer
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| id.clone()),
                icon: layer
                    .icon
                    .filter(|i| !i.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LAYER_ICON.to_string()),
                tools: normalize_tools(&layer.tools),
                id: id.into(),
            }
        })
        .collect())
}

/// Load scene layers from a JSON file
pub fn load_scene_layers(path: &Path) -> CycleResult<Vec<SceneLayer>> {
    let contents = std::fs::read_to_string(path).with_file_context("read layers", path)?;
    let layers = parse_scene_layers(&contents)
        .map_err(|e| e.context(format!("Failed to parse layers file: {}", path.display())))?;
    info!("Loaded {} scene layer(s) from {}", layers.len(), path.display());
    Ok(layers)
}

/// Print the scene layer table for debugging
pub fn print_scene_layers(layers: &[SceneLayer]) {
    info!("=== SCENE LAYERS ===");
    for layer in layers {
        let tools: Vec<&str> = layer.tools.iter().map(|t| t.id.as_str()).collect();
        info!("{} {} | {}", layer.icon, layer.id, tools.join(", "));
    }
    info!("====================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_filter_rules;

    #[test]
    fn default_layers_are_sorted_and_unique() {
        let layers = default_scene_layers();
        assert_eq!(layers.len(), 9);
        assert_eq!(layers[0].id, "tokens");
        assert_eq!(layers[8].id, "notes");

        let ids: std::collections::HashSet<_> = layers.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn every_default_layer_has_a_cycle_target() {
        let rules = default_filter_rules();
        for layer in default_scene_layers() {
            let tools = rules.filter(&layer.id, layer.tools.clone());
            assert!(!tools.is_empty(), "layer {} has nothing to cycle", layer.id);
        }
    }

    #[test]
    fn parse_accepts_every_tool_shape() {
        let layers = parse_scene_layers(
            r#"{
                "layers": [
                    { "name": "walls", "icon": "W", "tools": [{ "name": "select" }] },
                    { "name": "notes", "tools": { "contents": [{ "name": "note" }] } },
                    { "name": "sounds", "tools": { "sound": { "title": "Draw Ambient Sound" } } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].tools[0].id, "select");
        assert_eq!(layers[1].icon, DEFAULT_LAYER_ICON);
        assert_eq!(layers[1].tools[0].id, "note");
        assert_eq!(layers[2].tools[0].display_label, "Draw Ambient Sound");
    }

    #[test]
    fn parse_accepts_bare_array_and_skips_nameless_layers() {
        let layers =
            parse_scene_layers(r#"[{ "name": "tokens" }, { "name": "  " }]"#).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].title, "tokens");
        assert!(layers[0].tools.is_empty());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_scene_layers("{ not json").is_err());
    }
}
