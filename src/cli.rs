use std::path::PathBuf;

use clap::Parser;

use crate::{layout::LayoutPreset, utils::version};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Tick rate, i.e. number of ticks per second",
        default_value_t = 1.0
    )]
    pub tick_rate: f64,

    #[arg(
        short,
        long,
        value_name = "FLOAT",
        help = "Frame rate, i.e. number of frames per second",
        default_value_t = 30.0
    )]
    pub frame_rate: f64,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Layout file to load at start",
        conflicts_with = "preset"
    )]
    pub layout: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "NAME",
        help = "Preset to load at start: stack, row, column or combined"
    )]
    pub preset: Option<String>,
}

impl Cli {
    /// The preset named on the command line, if it is a known one.
    pub fn preset(&self) -> Option<LayoutPreset> {
        let name = self.preset.as_deref()?;
        match name.parse() {
            Ok(preset) => Some(preset),
            Err(_) => {
                tracing::error!("No preset named \"{name}\".");
                None
            }
        }
    }
}
