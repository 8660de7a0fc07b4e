// Step through the tools of a scene layer with hotkeys, made with the Bevy game engine.

use clap::Parser;

use toolcycle::core::{create_app, CliArgs};
use toolcycle::utils::logger::init_custom_logger;

fn main() {
    init_custom_logger();

    let cli_args = CliArgs::parse();
    match create_app(cli_args) {
        Ok(mut app) => {
            app.run();
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
