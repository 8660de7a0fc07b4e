//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - Application initialization and configuration
//! - Settings and CLI handling
//! - Cursor tracking
//! - Error handling and system ordering

pub mod app;
pub mod cli;
pub mod cursor;
pub mod errors;
pub mod settings;
pub mod system_sets;

// Re-export commonly used items
pub use app::create_app;
pub use cli::CliArgs;
pub use cursor::{CursorInfo, CursorPlugin};
pub use settings::{CycleSettings, SettingsStore};
pub use system_sets::{ToolCycleSystemSetsPlugin, ToolCycleSystems};
