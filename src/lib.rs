//! Tool cycling for a scene toolbar, made with the Bevy game engine.

pub mod core;
pub mod plugin;
pub mod scene;
pub mod tools;
pub mod ui;
pub mod utils;


pub use plugin::ToolCyclePlugin;
