//! Tool list normalization
//!
//! Scene layer files describe their tools loosely: as an array, as an object
//! keyed by tool name, or as an object wrapping a `contents` array. This is the
//! one place that shape is understood. Everything past here works on an
//! ordered `Vec<ToolDescriptor>`.

use serde::Deserialize;
use serde_json::Value;

use crate::tools::{ToolDescriptor, DEFAULT_TOOL_ICON};

/// A tool as written in a layer file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTool {
    pub name: Option<String>,
    pub title: Option<String>,
    pub icon: Option<String>,
    #[serde(alias = "iconClass")]
    pub icon_class: Option<String>,
    pub visible: Option<bool>,
    pub disabled: Option<bool>,
    pub toggle: Option<bool>,
}

impl RawTool {
    /// Resolve into a descriptor; tools without a name are dropped
    pub fn into_descriptor(self) -> Option<ToolDescriptor> {
        let id = non_empty(self.name)?;
        let label = non_empty(self.title).unwrap_or_else(|| id.clone());
        let icon = non_empty(self.icon)
            .or_else(|| non_empty(self.icon_class))
            .unwrap_or_else(|| DEFAULT_TOOL_ICON.to_string());

        Some(ToolDescriptor {
            id: id.into(),
            display_label: label,
            icon_glyph: icon,
            visible: self.visible.unwrap_or(true),
            disabled: self.disabled.unwrap_or(false),
            is_toggle: self.toggle.unwrap_or(false),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The entries of a tool collection, in order, each with its map key if any
fn entries(value: &Value) -> Vec<(Option<&str>, &Value)> {
    match value {
        Value::Array(items) => items.iter().map(|entry| (None, entry)).collect(),
        Value::Object(map) => match map.get("contents") {
            Some(Value::Array(items)) => items.iter().map(|entry| (None, entry)).collect(),
            _ => map
                .iter()
                .map(|(key, entry)| (Some(key.as_str()), entry))
                .collect(),
        },
        _ => Vec::new(),
    }
}

/// Turn any supported tool collection into descriptors, keeping order.
///
/// Entries that aren't tool objects are skipped. For an object map the key
/// stands in for a missing `name`.
pub fn normalize_tools(value: &Value) -> Vec<ToolDescriptor> {
    entries(value)
        .into_iter()
        .filter_map(|(key, entry)| {
            let mut raw = RawTool::deserialize(entry).ok()?;
            if raw.name.is_none() {
                raw.name = key.map(str::to_string);
            }
            raw.into_descriptor()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(tools: &[ToolDescriptor]) -> Vec<&str> {
        tools.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn array_keeps_order() {
        let tools = normalize_tools(&json!([
            { "name": "select", "title": "Select" },
            { "name": "wall", "title": "Basic Walls", "icon": "W" },
        ]));
        assert_eq!(ids(&tools), ["select", "wall"]);
        assert_eq!(tools[1].icon_glyph, "W");
    }

    #[test]
    fn contents_wrapper_is_unwrapped() {
        let tools = normalize_tools(&json!({
            "contents": [{ "name": "light" }, { "name": "select" }]
        }));
        assert_eq!(ids(&tools), ["light", "select"]);
    }

    #[test]
    fn object_map_uses_keys_as_names() {
        let tools = normalize_tools(&json!({
            "select": { "title": "Select Notes" },
            "note": { "name": "note", "title": "Create Map Note" },
        }));
        assert_eq!(ids(&tools), ["select", "note"]);
        assert_eq!(tools[0].display_label, "Select Notes");
    }

    #[test]
    fn label_and_icon_fall_back() {
        let tools = normalize_tools(&json!([
            { "name": "ruler", "title": "  ", "iconClass": "R" },
            { "name": "target" },
        ]));
        assert_eq!(tools[0].display_label, "ruler");
        assert_eq!(tools[0].icon_glyph, "R");
        assert_eq!(tools[1].icon_glyph, DEFAULT_TOOL_ICON);
    }

    #[test]
    fn flags_default_to_cyclable() {
        let tools = normalize_tools(&json!([
            { "name": "a" },
            { "name": "b", "visible": false, "disabled": true, "toggle": true },
        ]));
        assert!(tools[0].is_cyclable());
        assert!(!tools[1].visible && tools[1].disabled && tools[1].is_toggle);
    }

    #[test]
    fn nameless_and_malformed_entries_are_dropped() {
        let tools = normalize_tools(&json!([
            { "title": "No Name" },
            "not a tool",
            42,
            { "name": "ok" },
        ]));
        assert_eq!(ids(&tools), ["ok"]);
        assert!(normalize_tools(&json!("nope")).is_empty());
    }
}
