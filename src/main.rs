//! Binary entry point: resolve configuration, start logging, load the saved
//! inventory and drive the Ratatui event loop until the user exits.
use anyhow::Result;
use clap::Parser;
use log::info;

use cd_inventory::config::{Cli, Config};
use cd_inventory::logging::init_logging;
use cd_inventory::{run_app, App, Session};

/// Fatal problems, such as a terminal that cannot enter raw mode, bubble up
/// and end the process with a non-zero status.
fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse());

    if let Err(err) = init_logging(&config.log_file) {
        eprintln!("warning: logging disabled: {err:#}");
    }
    info!("using snapshot {}", config.data_file.display());

    let (session, startup) = if config.load_on_start {
        let (session, status) = Session::open(&config.data_file);
        (session, Some(status))
    } else {
        (Session::new(&config.data_file), None)
    };

    let mut app = App::new(session, startup);
    run_app(&mut app)
}
