use bevy::prelude::Color;

// Font Sizes
pub const TOOLBAR_ICON_FONT_SIZE: f32 = 20.0;
pub const TOOLBAR_LABEL_FONT_SIZE: f32 = 14.0;

// Toolbar Visual Style Constants
pub const TOOLBAR_BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 1.0);
pub const TOOLBAR_ICON_COLOR: Color = Color::srgb(0.75, 0.75, 0.75);
pub const TOOLBAR_BORDER_RADIUS: f32 = 0.0;
pub const TOOLBAR_BORDER_WIDTH: f32 = 2.0;
pub const TOOLBAR_BUTTON_SIZE: f32 = 40.0;
pub const TOOLBAR_PADDING: f32 = 8.0;
pub const TOOLBAR_MARGIN: f32 = 16.0;
pub const TOOLBAR_ROW_GAP: f32 = 4.0;
pub const TOOLBAR_ITEM_SPACING: f32 = 4.0;

// Window Configuration
pub const WINDOW_TITLE: &str = "Toolcycle";
pub const WINDOW_WIDTH: f32 = 1024.0;
pub const WINDOW_HEIGHT: f32 = 768.0;

// Button Colors
pub const NORMAL_BUTTON: Color = Color::srgb(0.1, 0.1, 0.1);
pub const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
pub const PRESSED_BUTTON: Color = Color::srgb(1.0, 0.4, 0.0);

// Button Outline Colors
pub const NORMAL_BUTTON_OUTLINE_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
pub const HOVERED_BUTTON_OUTLINE_COLOR: Color = Color::srgb(0.75, 0.75, 0.75);
pub const PRESSED_BUTTON_OUTLINE_COLOR: Color = Color::srgb(1.0, 0.8, 0.3);
pub const PRESSED_BUTTON_ICON_COLOR: Color = Color::srgb(1.0, 0.9, 0.8);

// Toolbar buttons for tools that can't be cycled to
pub const INACTIVE_TOOL_ICON_COLOR: Color = Color::srgb(0.4, 0.4, 0.4);

// Cycle Popup
// The chips are icons on a mostly transparent tile so the scene shows through.
pub const POPUP_Z_INDEX: i32 = 1000;
pub const POPUP_CHIP_BACKGROUND_COLOR: Color = Color::srgba(0.08, 0.08, 0.08, 0.22);
pub const POPUP_CHIP_BORDER_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.12);
pub const POPUP_CHIP_BORDER_WIDTH: f32 = 1.0;
pub const POPUP_CHIP_BORDER_RADIUS: f32 = 7.0;
pub const POPUP_ACTIVE_CHIP_BACKGROUND_COLOR: Color = Color::srgba(0.11, 0.11, 0.11, 0.28);
pub const POPUP_ACTIVE_CHIP_BORDER_COLOR: Color = Color::srgb(1.0, 0.4, 0.0); // Same orange as pressed buttons
pub const POPUP_ACTIVE_CHIP_BORDER_WIDTH: f32 = 2.0;
pub const POPUP_ICON_COLOR: Color = Color::srgb(0.96, 0.96, 0.96);

// Background Color
pub const BACKGROUND_COLOR: Color = Color::srgb(0.05, 0.05, 0.05);

// UI Panel Colors
pub const SECONDARY_TEXT_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
