use std::io::{self, Write};

use anyhow::{anyhow, ensure, Context};
use log::info;

use crate::app::MazeApp;

mod app;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let columns = read_dimension("columns")?;
    let rows = read_dimension("rows")?;
    info!("building a {columns}x{rows} maze");

    let maze = maze::full_grid(columns, rows)?;
    let app = MazeApp::new(maze)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 1000.0]),
        ..Default::default()
    };

    eframe::run_native("Maze", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| anyhow!("failed to run the maze window: {err}"))
}

/// Prompt for one grid dimension on stdin. Anything that is not a positive
/// integer aborts startup with a validation message.
fn read_dimension(name: &str) -> Result<usize, anyhow::Error> {
    print!("Enter the number of {name}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;

    let value: usize = line
        .trim()
        .parse()
        .with_context(|| format!("the number of {name} must be a positive integer, got {:?}", line.trim()))?;
    ensure!(value > 0, "the number of {name} must be at least 1");

    Ok(value)
}
