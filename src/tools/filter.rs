//! Tool Filter
//!
//! Decides which tools of a layer take part in cycling. A tool is a cycle
//! target when it is visible, enabled, not a toggle, and (for layers with an
//! allow-list) matched by id or by its trimmed, case-insensitive label.
//!
//! The filter is a pure function of its inputs. Tool availability changes
//! with permissions and scene state, so results are never cached.

use std::collections::{HashMap, HashSet};

use bevy::prelude::Resource;

use super::{LayerId, ToolDescriptor};

/// Allow-list for a single layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerFilterRule {
    pub layer_id: LayerId,
    /// Normalized (trimmed, lowercase) tool ids
    pub allowed_tool_ids: HashSet<String>,
    /// Normalized (trimmed, lowercase) display labels
    pub allowed_labels: HashSet<String>,
}

impl LayerFilterRule {
    pub fn new<'a>(
        layer_id: impl Into<LayerId>,
        tool_ids: impl IntoIterator<Item = &'a str>,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            layer_id: layer_id.into(),
            allowed_tool_ids: tool_ids.into_iter().map(normalize).collect(),
            allowed_labels: labels.into_iter().map(normalize).collect(),
        }
    }

    /// Whether a tool is on this layer's allow-list
    pub fn allows(&self, tool: &ToolDescriptor) -> bool {
        let id = normalize(&tool.id);
        if !id.is_empty() && self.allowed_tool_ids.contains(&id) {
            return true;
        }
        let label = normalize(&tool.display_label);
        !label.is_empty() && self.allowed_labels.contains(&label)
    }
}

/// Trimmed, lowercase form used for every allow-list comparison
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// The allow-list table, one rule per known layer
#[derive(Resource, Debug, Clone, Default)]
pub struct LayerFilterRules {
    rules: HashMap<LayerId, LayerFilterRule>,
}

impl LayerFilterRules {
    pub fn insert(&mut self, rule: LayerFilterRule) {
        self.rules.insert(rule.layer_id.clone(), rule);
    }

    pub fn get(&self, layer_id: &str) -> Option<&LayerFilterRule> {
        self.rules.get(layer_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Filter a layer's raw tool list against this table
    pub fn filter(
        &self,
        layer_id: &str,
        raw_tools: Vec<ToolDescriptor>,
    ) -> Vec<ToolDescriptor> {
        filter_tools(self.get(layer_id), raw_tools)
    }
}

impl FromIterator<LayerFilterRule> for LayerFilterRules {
    fn from_iter<I: IntoIterator<Item = LayerFilterRule>>(iter: I) -> Self {
        let mut rules = Self::default();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}

/// Return the ordered, deduplicated cycle targets of a layer.
///
/// Hidden, disabled and toggle tools are always dropped, allow-list or not.
/// Survivors keep the host's order; the first occurrence of an id wins.
pub fn filter_tools(
    rule: Option<&LayerFilterRule>,
    raw_tools: Vec<ToolDescriptor>,
) -> Vec<ToolDescriptor> {
    let mut seen = HashSet::new();
    raw_tools
        .into_iter()
        .filter(ToolDescriptor::is_cyclable)
        .filter(|tool| rule.map_or(true, |rule| rule.allows(tool)))
        .filter(|tool| seen.insert(tool.id.clone()))
        .collect()
}

/// Allow-lists for the standard scene layers
pub fn default_filter_rules() -> LayerFilterRules {
    [
        LayerFilterRule::new(
            "tokens",
            ["select", "target", "ruler"],
            ["Select Tokens", "Select Targets", "Measure Distance"],
        ),
        LayerFilterRule::new(
            "templates",
            ["select", "circle", "cone", "rect", "ray", "rectangle"],
            [
                "Select",
                "Circle Template",
                "Cone Template",
                "Rectangle Template",
                "Ray Template",
            ],
        ),
        LayerFilterRule::new(
            "tiles",
            ["select", "tile"],
            ["Select Tiles", "Place Tile"],
        ),
        LayerFilterRule::new(
            "drawings",
            ["select", "rect", "ellipse", "polygon", "freehand", "text"],
            [
                "Select Drawings",
                "Draw Rectangle",
                "Draw Ellipse",
                "Draw Polygon",
                "Draw Freehand",
                "Draw Text",
            ],
        ),
        LayerFilterRule::new(
            "walls",
            [
                "select", "wall", "terrain", "invisible", "ethereal", "door",
                "secret", "window",
            ],
            [
                "Rectangular Select Walls",
                "Basic Walls",
                "Terrain Walls",
                "Invisible Walls",
                "Ethereal Walls",
                "Draw Doors",
                "Secret Doors",
                "Window Walls",
            ],
        ),
        LayerFilterRule::new(
            "lighting",
            ["light", "select"],
            ["Draw Light Source", "Select"],
        ),
        LayerFilterRule::new(
            "sounds",
            ["select", "sound"],
            ["Select", "Draw Ambient Sound"],
        ),
        LayerFilterRule::new(
            "regions",
            ["select", "rect", "ellipse", "polygon"],
            [
                "Select Regions",
                "Draw Rectangle",
                "Draw Ellipse",
                "Draw Polygon",
            ],
        ),
        LayerFilterRule::new(
            "notes",
            ["select", "note"],
            ["Select Notes", "Create Map Note"],
        ),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(id: &str, label: &str) -> ToolDescriptor {
        ToolDescriptor::new(id, label, "*")
    }

    fn ids(tools: &[ToolDescriptor]) -> Vec<&str> {
        tools.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn walls_drop_disabled_and_unlisted_tools() {
        let rules = default_filter_rules();
        let raw = vec![
            tool("select", "Rectangular Select Walls"),
            tool("wall", "Basic Walls"),
            tool("terrain", "Terrain Walls").disabled(),
            tool("invisible", "Invisible Walls"),
            tool("foobar", "Foo Bar"),
        ];

        let filtered = rules.filter("walls", raw);
        assert_eq!(ids(&filtered), ["select", "wall", "invisible"]);
    }

    #[test]
    fn ineligible_tools_are_dropped_even_when_allow_listed() {
        let rules = default_filter_rules();
        let raw = vec![
            tool("select", "Select Tokens").toggle(),
            tool("target", "Select Targets").hidden(),
            tool("ruler", "Measure Distance").disabled(),
        ];

        assert!(rules.filter("tokens", raw).is_empty());
    }

    #[test]
    fn label_match_is_trimmed_and_case_insensitive() {
        let rule = LayerFilterRule::new("sounds", ["select"], ["Draw Ambient Sound"]);
        let raw = vec![
            tool("ambient", "  draw AMBIENT sound "),
            tool("music", "Play Music"),
        ];

        let filtered = filter_tools(Some(&rule), raw);
        assert_eq!(ids(&filtered), ["ambient"]);
    }

    #[test]
    fn survivors_keep_host_order_not_allow_list_order() {
        let rules = default_filter_rules();
        let raw = vec![tool("select", "Select"), tool("light", "Draw Light Source")];

        let filtered = rules.filter("lighting", raw);
        assert_eq!(ids(&filtered), ["select", "light"]);
    }

    #[test]
    fn unknown_layer_keeps_every_eligible_tool() {
        let rules = default_filter_rules();
        let raw = vec![
            tool("a", "A"),
            tool("b", "B").toggle(),
            tool("c", "C"),
        ];

        let filtered = rules.filter("custom-layer", raw);
        assert_eq!(ids(&filtered), ["a", "c"]);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let raw = vec![tool("a", "First"), tool("b", "B"), tool("a", "Second")];

        let filtered = filter_tools(None, raw);
        assert_eq!(ids(&filtered), ["a", "b"]);
        assert_eq!(filtered[0].display_label, "First");
    }
}
