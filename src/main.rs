use clap::Parser;
use color_eyre::eyre::Result;

use dockboard::{
    app::App,
    cli::Cli,
    layout::LayoutSource,
    utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = Cli::parse();
    let startup = match (&args.layout, args.preset()) {
        (Some(path), _) => Some(LayoutSource::File(path.clone())),
        (None, Some(preset)) => Some(LayoutSource::Preset(preset)),
        (None, None) => None,
    };

    let mut app = App::new(args.tick_rate, args.frame_rate)?.startup(startup);
    app.run().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
