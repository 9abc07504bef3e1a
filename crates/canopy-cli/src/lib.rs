//! Canopy CLI library
//!
//! This module contains the core CLI logic: load a scenario, replay it
//! through an [`Explorer`] and write the resulting outline.

pub mod error_adapter;
pub mod scenario;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::{fs, io::Write};

use log::info;

use canopy::{CanopyError, Explorer};

use scenario::Scenario;

/// Run the Canopy CLI application
///
/// Replays the scenario named by `args.input` and writes the final outline
/// to `args.output`, or to stdout when no output path is given.
///
/// # Errors
///
/// Returns `CanopyError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid scenario files
/// - Scenario steps the graph rejects
pub fn run(args: &Args) -> Result<(), CanopyError> {
    info!(input_path = args.input, output_path:? = args.output; "Replaying scenario");

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let scenario = Scenario::parse(&source)?;

    let mut canvas = scenario.canvas()?;
    let mut explorer = Explorer::new(app_config.explorer().clone());
    scenario.replay(&mut canvas, &mut explorer)?;

    let outline = explorer.view().to_string();
    match &args.output {
        Some(path) => {
            fs::write(path, &outline)?;
            info!(output_file = path; "Outline written");
        }
        None => std::io::stdout().write_all(outline.as_bytes())?,
    }

    Ok(())
}
