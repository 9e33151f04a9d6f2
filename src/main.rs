#![forbid(unsafe_code)]

mod app;
mod commands;
mod config;
mod error;
mod exec;
mod focus;
mod fs_ops;
mod keymap;
mod logging;
mod model;
mod pane;
mod render;
mod scroll;
mod terminal;
mod text;
mod ui;

use std::io;

use tracing::warn;

use crate::app::App;
use crate::config::Config;

fn main() -> io::Result<()> {
    let (config, rejected) = Config::from_env();
    if let Err(err) = logging::init(&config) {
        eprintln!("twinpane: logging disabled: {err}");
    }
    for err in &rejected {
        warn!(%err, "ignoring configuration value");
    }
    App::run(&config)
}
