//! Hotkeys
//!
//! Named keybindings for layer selection and tool cycling. Every hotkey is
//! registered with a default binding at start-up and may be rebound from the
//! settings file. Bindings match only when exactly their modifiers are held.

use std::fmt;

use bevy::prelude::*;

use super::host::CycleParams;
use crate::core::errors::{anyhow, CycleResult};
use crate::layer_not_found;
use crate::tools::{CycleDirection, LayerId};

/// Modifier keys a binding requires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const CTRL_ALT: Self = Self {
        ctrl: true,
        alt: true,
        shift: false,
        meta: false,
    };

    /// The modifiers currently held on the keyboard
    pub fn held(keyboard: &ButtonInput<KeyCode>) -> Self {
        Self {
            ctrl: keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
            alt: keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]),
            shift: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            meta: keyboard.any_pressed([KeyCode::SuperLeft, KeyCode::SuperRight]),
        }
    }
}

/// A key plus the modifiers that must accompany it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyBinding {
    pub const fn ctrl_alt(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::CTRL_ALT,
        }
    }

    /// Parse a binding string like `"Ctrl+Alt+BracketRight"` or `"Ctrl+Alt+]"`
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = Modifiers::default();
        let mut key = None;

        for part in s.split('+') {
            let upper = part.trim().to_ascii_uppercase();
            match upper.as_str() {
                "CTRL" | "CONTROL" => modifiers.ctrl = true,
                "ALT" | "OPTION" => modifiers.alt = true,
                "SHIFT" => modifiers.shift = true,
                "META" | "SUPER" | "CMD" | "COMMAND" => modifiers.meta = true,
                "" => {}
                _ => {
                    if key.is_some() {
                        return None;
                    }
                    key = Some(parse_key(&upper)?);
                }
            }
        }

        key.map(|key| Self { key, modifiers })
    }

    /// Whether this binding fired this frame
    pub fn just_pressed(&self, keyboard: &ButtonInput<KeyCode>) -> bool {
        keyboard.just_pressed(self.key) && Modifiers::held(keyboard) == self.modifiers
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.meta, "Meta"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        let name = format!("{:?}", self.key);
        let short = name
            .strip_prefix("Key")
            .or_else(|| name.strip_prefix("Digit"))
            .filter(|rest| rest.len() == 1)
            .unwrap_or(&name);
        f.write_str(short)
    }
}

fn parse_key(upper: &str) -> Option<KeyCode> {
    let key = match upper {
        "]" | "BRACKETRIGHT" => KeyCode::BracketRight,
        "[" | "BRACKETLEFT" => KeyCode::BracketLeft,
        "." | "PERIOD" => KeyCode::Period,
        "," | "COMMA" => KeyCode::Comma,
        ";" | "SEMICOLON" => KeyCode::Semicolon,
        "'" | "QUOTE" => KeyCode::Quote,
        "/" | "SLASH" => KeyCode::Slash,
        "\\" | "BACKSLASH" => KeyCode::Backslash,
        "-" | "MINUS" => KeyCode::Minus,
        "=" | "EQUAL" => KeyCode::Equal,
        "`" | "BACKQUOTE" => KeyCode::Backquote,
        "SPACE" => KeyCode::Space,
        "TAB" => KeyCode::Tab,
        "ENTER" | "RETURN" => KeyCode::Enter,
        "ESC" | "ESCAPE" => KeyCode::Escape,
        "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
        "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
        "UP" | "ARROWUP" => KeyCode::ArrowUp,
        "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
        "PAGEUP" => KeyCode::PageUp,
        "PAGEDOWN" => KeyCode::PageDown,
        _ => {
            // "KeyT" and "Digit1" are accepted as well as "T" and "1"
            let bare = upper
                .strip_prefix("KEY")
                .or_else(|| upper.strip_prefix("DIGIT"))
                .filter(|rest| rest.len() == 1)
                .unwrap_or(upper);
            let mut chars = bare.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            return char_key(c);
        }
    };
    Some(key)
}

fn char_key(c: char) -> Option<KeyCode> {
    Some(match c {
        'A' => KeyCode::KeyA,
        'B' => KeyCode::KeyB,
        'C' => KeyCode::KeyC,
        'D' => KeyCode::KeyD,
        'E' => KeyCode::KeyE,
        'F' => KeyCode::KeyF,
        'G' => KeyCode::KeyG,
        'H' => KeyCode::KeyH,
        'I' => KeyCode::KeyI,
        'J' => KeyCode::KeyJ,
        'K' => KeyCode::KeyK,
        'L' => KeyCode::KeyL,
        'M' => KeyCode::KeyM,
        'N' => KeyCode::KeyN,
        'O' => KeyCode::KeyO,
        'P' => KeyCode::KeyP,
        'Q' => KeyCode::KeyQ,
        'R' => KeyCode::KeyR,
        'S' => KeyCode::KeyS,
        'T' => KeyCode::KeyT,
        'U' => KeyCode::KeyU,
        'V' => KeyCode::KeyV,
        'W' => KeyCode::KeyW,
        'X' => KeyCode::KeyX,
        'Y' => KeyCode::KeyY,
        'Z' => KeyCode::KeyZ,
        '0' => KeyCode::Digit0,
        '1' => KeyCode::Digit1,
        '2' => KeyCode::Digit2,
        '3' => KeyCode::Digit3,
        '4' => KeyCode::Digit4,
        '5' => KeyCode::Digit5,
        '6' => KeyCode::Digit6,
        '7' => KeyCode::Digit7,
        '8' => KeyCode::Digit8,
        '9' => KeyCode::Digit9,
        _ => return None,
    })
}

/// What a hotkey does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyAction {
    ActivateLayer(LayerId),
    CycleTool(CycleDirection),
}

#[derive(Debug, Clone)]
pub struct Hotkey {
    pub id: String,
    pub binding: KeyBinding,
    pub default_binding: KeyBinding,
    pub action: HotkeyAction,
}

/// Every registered hotkey, in registration order
#[derive(Resource, Debug, Default)]
pub struct HotkeyRegistry {
    hotkeys: Vec<Hotkey>,
}

impl HotkeyRegistry {
    /// Register a hotkey, replacing any earlier one with the same id
    pub fn register(&mut self, id: impl Into<String>, default_binding: KeyBinding, action: HotkeyAction) {
        let id = id.into();
        debug!("Registering hotkey {id}: {default_binding}");
        self.hotkeys.retain(|hotkey| hotkey.id != id);
        self.hotkeys.push(Hotkey {
            id,
            binding: default_binding,
            default_binding,
            action,
        });
    }

    pub fn get(&self, id: &str) -> Option<&Hotkey> {
        self.hotkeys.iter().find(|hotkey| hotkey.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotkey> {
        self.hotkeys.iter()
    }

    pub fn len(&self) -> usize {
        self.hotkeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotkeys.is_empty()
    }

    /// Change the binding of a registered hotkey
    pub fn rebind(&mut self, id: &str, binding: &str) -> CycleResult<()> {
        let parsed = KeyBinding::parse(binding)
            .ok_or_else(|| anyhow!("Invalid key binding '{binding}' (example: Ctrl+Alt+BracketRight)"))?;
        let hotkey = self
            .hotkeys
            .iter_mut()
            .find(|hotkey| hotkey.id == id)
            .ok_or_else(|| anyhow!("Unknown hotkey '{id}'"))?;
        hotkey.binding = parsed;
        info!("Hotkey {id} bound to {parsed}");
        Ok(())
    }

    /// Apply binding overrides; bad entries are skipped with a warning
    pub fn apply_overrides<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (id, binding) in overrides {
            if let Err(e) = self.rebind(id, binding) {
                warn!("Ignoring keybinding override: {e}");
            }
        }
    }

    /// Actions whose binding fired this frame
    pub fn triggered<'a>(
        &'a self,
        keyboard: &'a ButtonInput<KeyCode>,
    ) -> impl Iterator<Item = &'a Hotkey> + 'a {
        self.hotkeys
            .iter()
            .filter(move |hotkey| hotkey.binding.just_pressed(keyboard))
    }
}

/// Default layer hotkeys: Ctrl+Alt plus the layer's letter
pub const LAYER_HOTKEYS: &[(&str, &str, KeyCode)] = &[
    ("layerTokens", "tokens", KeyCode::KeyT),
    ("layerTemplates", "templates", KeyCode::KeyM),
    ("layerTiles", "tiles", KeyCode::KeyI),
    ("layerDrawings", "drawings", KeyCode::KeyD),
    ("layerWalls", "walls", KeyCode::KeyW),
    ("layerLighting", "lighting", KeyCode::KeyL),
    ("layerSounds", "sounds", KeyCode::KeyS),
    ("layerRegions", "regions", KeyCode::KeyG),
    ("layerNotes", "notes", KeyCode::KeyN),
];

pub const CYCLE_NEXT: &str = "cycleNext";
pub const CYCLE_PREV: &str = "cyclePrev";

/// Register the nine layer hotkeys and the two cycle hotkeys
pub fn register_default_hotkeys(registry: &mut HotkeyRegistry) {
    for &(id, layer, key) in LAYER_HOTKEYS {
        registry.register(
            id,
            KeyBinding::ctrl_alt(key),
            HotkeyAction::ActivateLayer(layer.into()),
        );
    }
    registry.register(
        CYCLE_NEXT,
        KeyBinding::ctrl_alt(KeyCode::BracketRight),
        HotkeyAction::CycleTool(CycleDirection::Next),
    );
    registry.register(
        CYCLE_PREV,
        KeyBinding::ctrl_alt(KeyCode::BracketLeft),
        HotkeyAction::CycleTool(CycleDirection::Previous),
    );
}

fn run_action(action: &HotkeyAction, cycle: &mut CycleParams) -> CycleResult<()> {
    match action {
        HotkeyAction::ActivateLayer(layer_id) => {
            if !cycle.has_layer(layer_id) {
                return Err(layer_not_found!(layer_id, cycle.available_layers()));
            }
            cycle.activate_layer(layer_id);
        }
        HotkeyAction::CycleTool(direction) => {
            cycle.cycle_tool(*direction);
        }
    }
    Ok(())
}

/// Run the action of every hotkey pressed this frame
pub fn dispatch_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    registry: Res<HotkeyRegistry>,
    mut cycle: CycleParams,
) {
    for hotkey in registry.triggered(&keyboard) {
        debug!("Hotkey {} ({})", hotkey.id, hotkey.binding);
        if let Err(e) = run_action(&hotkey.action, &mut cycle) {
            warn!("Hotkey {} failed: {e:#}", hotkey.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_symbolic_keys() {
        let next = KeyBinding::parse("Ctrl+Alt+BracketRight").unwrap();
        assert_eq!(next, KeyBinding::ctrl_alt(KeyCode::BracketRight));
        assert_eq!(KeyBinding::parse("ctrl + alt + ]"), Some(next));

        let walls = KeyBinding::parse("Control+Alt+KeyW").unwrap();
        assert_eq!(walls, KeyBinding::ctrl_alt(KeyCode::KeyW));
        assert_eq!(KeyBinding::parse("Ctrl+Alt+w"), Some(walls));
    }

    #[test]
    fn rejects_bad_bindings() {
        assert_eq!(KeyBinding::parse("Ctrl+Alt"), None);
        assert_eq!(KeyBinding::parse("Ctrl+Hyperspace"), None);
        assert_eq!(KeyBinding::parse("A+B"), None);
    }

    #[test]
    fn display_is_parseable() {
        for binding in [
            KeyBinding::ctrl_alt(KeyCode::KeyT),
            KeyBinding::ctrl_alt(KeyCode::BracketLeft),
            KeyBinding {
                key: KeyCode::Digit3,
                modifiers: Modifiers {
                    shift: true,
                    ..Modifiers::default()
                },
            },
        ] {
            let text = binding.to_string();
            assert_eq!(KeyBinding::parse(&text), Some(binding), "{text}");
        }
        assert_eq!(KeyBinding::ctrl_alt(KeyCode::KeyT).to_string(), "Ctrl+Alt+T");
    }

    #[test]
    fn default_hotkeys_cover_every_layer_and_direction() {
        let mut registry = HotkeyRegistry::default();
        register_default_hotkeys(&mut registry);
        assert_eq!(registry.len(), 11);
        assert_eq!(
            registry.get("layerWalls").map(|h| &h.action),
            Some(&HotkeyAction::ActivateLayer("walls".into()))
        );
        assert_eq!(
            registry.get(CYCLE_PREV).map(|h| h.binding),
            Some(KeyBinding::ctrl_alt(KeyCode::BracketLeft))
        );
    }

    #[test]
    fn overrides_rebind_and_skip_bad_entries() {
        let mut registry = HotkeyRegistry::default();
        register_default_hotkeys(&mut registry);

        let overrides: std::collections::HashMap<String, String> = [
            (CYCLE_NEXT.to_string(), "Ctrl+Period".to_string()),
            ("noSuchHotkey".to_string(), "Ctrl+K".to_string()),
            (CYCLE_PREV.to_string(), "Ctrl+???".to_string()),
        ]
        .into_iter()
        .collect();
        registry.apply_overrides(&overrides);

        let next = registry.get(CYCLE_NEXT).unwrap();
        assert_eq!(next.binding.key, KeyCode::Period);
        assert!(next.binding.modifiers.ctrl && !next.binding.modifiers.alt);
        assert_eq!(
            registry.get(CYCLE_PREV).map(|h| h.binding),
            Some(KeyBinding::ctrl_alt(KeyCode::BracketLeft))
        );
    }

    #[test]
    fn binding_requires_exact_modifiers() {
        let binding = KeyBinding::ctrl_alt(KeyCode::BracketRight);

        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ControlLeft);
        keyboard.press(KeyCode::AltRight);
        keyboard.press(KeyCode::BracketRight);
        assert!(binding.just_pressed(&keyboard));

        keyboard.press(KeyCode::ShiftLeft);
        assert!(!binding.just_pressed(&keyboard));
    }
}
