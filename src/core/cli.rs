//! Command line arguments for the application

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

use crate::core::errors::validate_config_path;

/// command line arguments for settings and scene layer loading
#[derive(Parser, Debug, Resource, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// path to a JSON file with setting and keybinding overrides
    #[arg(long = "settings")]
    pub settings_path: Option<PathBuf>,

    /// path to a JSON file that replaces the built-in scene layers
    #[arg(long = "layers")]
    pub layers_path: Option<PathBuf>,

    /// display debug information
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl CliArgs {
    /// Check that every path given on the command line is a readable JSON file
    pub fn validate(&self) -> Result<(), String> {
        for path in [&self.settings_path, &self.layers_path].into_iter().flatten() {
            validate_config_path(path).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}
