//! Scene Toolbar UI
//!
//! The scene controls as buttons: a column of layer buttons down the left
//! edge, and a row with the active layer's tools next to it. The tool row is
//! rebuilt whenever the active layer changes. Buttons for tools that can't be
//! cycled to are drawn dimmed.
//!
//! Clicking a layer selects that layer's first cycle target. Clicking a tool
//! asks for that tool directly; the scene controls reject hidden, disabled
//! and toggle tools like any other request.

use bevy::prelude::*;

use crate::core::ToolCycleSystems;
use crate::scene::{ActivationQueue, CycleParams, SceneControls};
use crate::tools::{LayerId, ToolDescriptor, ToolId};
use crate::ui::theme::*;

#[derive(Component)]
pub struct SceneToolbar;

#[derive(Component)]
pub struct LayerButton {
    pub layer_id: LayerId,
}

#[derive(Component)]
pub struct ToolButton {
    pub layer_id: LayerId,
    pub tool_id: ToolId,
    pub cyclable: bool,
}

/// Container the tool buttons are spawned into
#[derive(Component)]
pub struct ToolRow;

/// The tool buttons of one layer; replaced as a whole
#[derive(Component)]
pub struct ToolRowItems;

/// "Layer / Tool" caption under the tool row
#[derive(Component)]
pub struct ToolbarCaption;

pub struct SceneToolbarPlugin;

impl Plugin for SceneToolbarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_scene_toolbar)
            .add_systems(
                Update,
                (handle_layer_button_clicks, handle_tool_button_clicks)
                    .in_set(ToolCycleSystems::Input),
            )
            .add_systems(
                Update,
                (
                    rebuild_tool_row,
                    update_layer_button_colors,
                    update_tool_button_colors,
                    update_toolbar_caption,
                )
                    .chain()
                    .in_set(ToolCycleSystems::Toolbar),
            );
    }
}

/// Spawn the layer column and an empty tool row
pub fn spawn_scene_toolbar(mut commands: Commands, controls: Res<SceneControls>) {
    info!(
        "Spawning scene toolbar with {} layers",
        controls.layers().len()
    );

    commands
        .spawn((
            SceneToolbar,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(TOOLBAR_MARGIN),
                left: Val::Px(TOOLBAR_MARGIN),
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::FlexStart,
                ..default()
            },
        ))
        .with_children(|toolbar| {
            toolbar
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(TOOLBAR_PADDING)),
                        row_gap: Val::Px(TOOLBAR_ROW_GAP),
                        ..default()
                    },
                    BackgroundColor(TOOLBAR_BACKGROUND_COLOR),
                ))
                .with_children(|column| {
                    for layer in controls.layers() {
                        let button = (
                            LayerButton {
                                layer_id: layer.id.clone(),
                            },
                            Button,
                        );
                        spawn_toolbar_button(column, button, &layer.icon, TOOLBAR_ICON_COLOR);
                    }
                });

            toolbar
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    margin: UiRect::left(Val::Px(TOOLBAR_ITEM_SPACING)),
                    ..default()
                })
                .with_children(|right| {
                    right.spawn((
                        ToolRow,
                        Node {
                            flex_direction: FlexDirection::Row,
                            padding: UiRect::all(Val::Px(TOOLBAR_PADDING)),
                            column_gap: Val::Px(TOOLBAR_ITEM_SPACING),
                            ..default()
                        },
                        BackgroundColor(TOOLBAR_BACKGROUND_COLOR),
                    ));
                    right.spawn((
                        ToolbarCaption,
                        Text::new(""),
                        TextFont {
                            font_size: TOOLBAR_LABEL_FONT_SIZE,
                            ..default()
                        },
                        TextColor(SECONDARY_TEXT_COLOR),
                        Node {
                            margin: UiRect::all(Val::Px(TOOLBAR_PADDING)),
                            ..default()
                        },
                    ));
                });
        });
}

/// Helper function to spawn a single square toolbar button with an icon
fn spawn_toolbar_button(
    parent: &mut ChildSpawnerCommands,
    marker: impl Bundle,
    icon: &str,
    icon_color: Color,
) {
    parent
        .spawn((
            marker,
            Node {
                width: Val::Px(TOOLBAR_BUTTON_SIZE),
                height: Val::Px(TOOLBAR_BUTTON_SIZE),
                border: UiRect::all(Val::Px(TOOLBAR_BORDER_WIDTH)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BorderColor(NORMAL_BUTTON_OUTLINE_COLOR),
            BorderRadius::all(Val::Px(TOOLBAR_BORDER_RADIUS)),
            BackgroundColor(NORMAL_BUTTON),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(icon.to_string()),
                TextFont {
                    font_size: TOOLBAR_ICON_FONT_SIZE,
                    ..default()
                },
                TextColor(icon_color),
            ));
        });
}

fn spawn_tool_buttons(row: &mut ChildSpawnerCommands, layer_id: &LayerId, tools: &[ToolDescriptor]) {
    for tool in tools {
        let cyclable = tool.is_cyclable();
        let button = (
            ToolButton {
                layer_id: layer_id.clone(),
                tool_id: tool.id.clone(),
                cyclable,
            },
            Button,
        );
        let icon_color = if cyclable {
            TOOLBAR_ICON_COLOR
        } else {
            INACTIVE_TOOL_ICON_COLOR
        };
        spawn_toolbar_button(row, button, &tool.icon_glyph, icon_color);
    }
}

/// Clicking a layer selects its first cycle target
pub fn handle_layer_button_clicks(
    buttons: Query<(&Interaction, &LayerButton), Changed<Interaction>>,
    mut cycle: CycleParams,
) {
    for (interaction, button) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if cycle.activate_layer(&button.layer_id).is_none() {
            debug!("Layer {} has no tool to select", button.layer_id);
        }
    }
}

/// Clicking a tool asks for exactly that tool
pub fn handle_tool_button_clicks(
    buttons: Query<(&Interaction, &ToolButton), Changed<Interaction>>,
    mut queue: ResMut<ActivationQueue>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            queue.push(&button.layer_id, &button.tool_id);
        }
    }
}

/// Swap the tool row's buttons when the active layer changes
pub fn rebuild_tool_row(
    mut commands: Commands,
    controls: Res<SceneControls>,
    mut shown_layer: Local<Option<LayerId>>,
    rows: Query<Entity, With<ToolRow>>,
    items: Query<Entity, With<ToolRowItems>>,
) {
    if !controls.is_changed() {
        return;
    }
    let active = controls.active_layer_id().cloned();
    if *shown_layer == active {
        return;
    }

    for entity in &items {
        commands.entity(entity).despawn();
    }

    if let (Some(layer), Ok(row)) = (controls.active_layer(), rows.single()) {
        commands.entity(row).with_children(|row| {
            row.spawn((
                ToolRowItems,
                Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(TOOLBAR_ITEM_SPACING),
                    ..default()
                },
            ))
            .with_children(|items| spawn_tool_buttons(items, &layer.id, &layer.tools));
        });
    }

    *shown_layer = active;
}

/// Normal, hovered and active colors shared by every toolbar button
fn button_colors(interaction: Interaction, active: bool) -> (Color, Color) {
    match (interaction, active) {
        (Interaction::Pressed, _) | (_, true) => (PRESSED_BUTTON, PRESSED_BUTTON_OUTLINE_COLOR),
        (Interaction::Hovered, false) => (HOVERED_BUTTON, HOVERED_BUTTON_OUTLINE_COLOR),
        (Interaction::None, false) => (NORMAL_BUTTON, NORMAL_BUTTON_OUTLINE_COLOR),
    }
}

/// Highlight the active layer's button
pub fn update_layer_button_colors(
    controls: Res<SceneControls>,
    mut buttons: Query<(
        &Interaction,
        &LayerButton,
        &Children,
        &mut BackgroundColor,
        &mut BorderColor,
    )>,
    mut icons: Query<&mut TextColor>,
) {
    let active_layer = controls.active_layer_id();
    for (interaction, button, children, mut background, mut border) in &mut buttons {
        let active = active_layer == Some(&button.layer_id);
        let (fill, outline) = button_colors(*interaction, active);
        background.0 = fill;
        border.0 = outline;

        for &child in &**children {
            if let Ok(mut color) = icons.get_mut(child) {
                color.0 = if active {
                    PRESSED_BUTTON_ICON_COLOR
                } else {
                    TOOLBAR_ICON_COLOR
                };
            }
        }
    }
}

/// Highlight the active tool's button
pub fn update_tool_button_colors(
    controls: Res<SceneControls>,
    mut buttons: Query<(
        &Interaction,
        &ToolButton,
        &Children,
        &mut BackgroundColor,
        &mut BorderColor,
    )>,
    mut icons: Query<&mut TextColor>,
) {
    let active_tool = controls.active_tool_id();
    for (interaction, button, children, mut background, mut border) in &mut buttons {
        let active = active_tool == Some(&button.tool_id);
        let (fill, outline) = button_colors(*interaction, active);
        background.0 = fill;
        border.0 = outline;

        for &child in &**children {
            if let Ok(mut color) = icons.get_mut(child) {
                color.0 = match (active, button.cyclable) {
                    (true, _) => PRESSED_BUTTON_ICON_COLOR,
                    (false, true) => TOOLBAR_ICON_COLOR,
                    (false, false) => INACTIVE_TOOL_ICON_COLOR,
                };
            }
        }
    }
}

/// Show "Layer / Tool" for the current selection
pub fn update_toolbar_caption(
    controls: Res<SceneControls>,
    mut captions: Query<&mut Text, With<ToolbarCaption>>,
) {
    if !controls.is_changed() {
        return;
    }
    let caption = match controls.active_layer() {
        Some(layer) => {
            let tool = controls
                .active_tool_id()
                .and_then(|id| layer.tool(id))
                .map_or("", |tool| tool.display_label.as_str());
            format!("{} / {}", layer.title, tool)
        }
        None => String::new(),
    };
    for mut text in &mut captions {
        text.0.clone_from(&caption);
    }
}
