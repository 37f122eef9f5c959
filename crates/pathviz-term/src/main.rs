//! pathviz: step through grid searches in the terminal.

use clap::Parser;
use pathviz_core::Grid;
use pathviz_term::{App, AppConfig, Args, CrosstermDriver, MessageLog, Visualizer};

/// Lines kept by the message log.
const LOG_CAPACITY: usize = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let log = MessageLog::install(LOG_CAPACITY, args.log_level)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("scatter seed {seed}");
    let grid = Grid::new(args.width, args.height)?;
    let (width, height) = crossterm::terminal::size()?;
    let (width, height) = (i32::from(width), i32::from(height));

    let model =
        Visualizer::new(grid, args.sim_config(), seed, log).with_screen_size(width, height);
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new(),
        width,
        height,
    });
    app.run()?;
    Ok(())
}
