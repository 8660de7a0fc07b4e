//! Application initialization and configuration

use std::path::Path;

use bevy::prelude::*;
use bevy::winit::WinitSettings;

use crate::core::cli::CliArgs;
use crate::core::settings::{print_settings, SettingsStore};
use crate::plugin::ToolCyclePlugin;
use crate::scene::hotkeys::HotkeyRegistry;
use crate::scene::layers::{load_scene_layers, print_scene_layers};
use crate::scene::SceneControls;
use crate::ui::theme::{BACKGROUND_COLOR, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::ui::toolbar::SceneToolbarPlugin;

/// Creates a fully configured Bevy GUI application ready to run
pub fn create_app(cli_args: CliArgs) -> Result<App, String> {
    cli_args.validate()?;

    let mut app = App::new();
    configure_app_settings(&mut app);
    add_all_plugins(&mut app);
    load_config_files(&mut app, &cli_args);
    app.insert_resource(cli_args);
    Ok(app)
}

/// Sets up application resources and configuration
fn configure_app_settings(app: &mut App) {
    // The popup animates on its own, so keep frames coming without input
    app.insert_resource(WinitSettings::game())
        .insert_resource(ClearColor(BACKGROUND_COLOR));
}

/// Configure the default Bevy plugins with custom settings
pub fn configure_default_plugins() -> bevy::app::PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.into(),
                resolution: (WINDOW_WIDTH, WINDOW_HEIGHT).into(),
                ..default()
            }),
            ..default()
        })
        // Disable Bevy's default LogPlugin since we're using our own custom logger
        .build()
        .disable::<bevy::log::LogPlugin>()
}

/// Adds all plugins to the application in logical groups
fn add_all_plugins(app: &mut App) {
    app.add_plugins(configure_default_plugins())
        .add_plugins((ToolCyclePlugin, SceneToolbarPlugin))
        .add_systems(Startup, setup_camera)
        .add_systems(Update, exit_on_esc);
}

/// Apply the settings and layers files named on the command line.
///
/// A file that fails to load is reported and skipped; the app keeps running
/// on the built-in defaults.
fn load_config_files(app: &mut App, cli_args: &CliArgs) {
    let world = app.world_mut();

    if let Some(path) = &cli_args.settings_path {
        let loaded = world.resource_mut::<SettingsStore>().load_overrides(path);
        match loaded {
            Ok(file) => world
                .resource_mut::<HotkeyRegistry>()
                .apply_overrides(&file.keybindings),
            Err(e) => warn!("{e:#}"),
        }
    }

    if let Some(path) = &cli_args.layers_path {
        load_layers_file(world, path);
    }

    if cli_args.debug {
        print_settings(world.resource::<SettingsStore>());
        print_scene_layers(world.resource::<SceneControls>().layers());
    }
}

fn load_layers_file(world: &mut World, path: &Path) {
    match load_scene_layers(path) {
        Ok(layers) if layers.is_empty() => {
            warn!("No layers in {}, keeping the built-in layers", path.display());
        }
        Ok(layers) => world.insert_resource(SceneControls::new(layers)),
        Err(e) => warn!("{e:#}"),
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// System to exit the application when the Escape key is pressed
fn exit_on_esc(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut app_exit_events: EventWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        app_exit_events.write(AppExit::Success);
    }
}
