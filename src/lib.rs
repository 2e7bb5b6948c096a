// Library root
// -----------
// The binary (`main.rs`) parses the command line and hands off to these
// modules.
//
// Module responsibilities:
// - `cli`: the clap command tree.
// - `config`: server URL and API key resolution.
// - `api`: the `Gateway` seam and its HTTP implementation.
// - `commands`: workflow, template, folder and file handlers.
// - `models`: typed views of server resources.
// - `ui`: tables, JSON output, prompts and progress bars.
// - `error` / `logging`: error taxonomy and tracing setup.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use error::{CliError, Result};
