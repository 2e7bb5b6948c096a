// UI layer: everything that decides how data looks in the terminal.
// Tables and JSON go to the writer the command hands in (normally
// stdout); progress bars and prompts go to stderr so piped output stays
// clean. Nothing here inspects or validates the data it prints.

use crate::error::{CliError, Result};
use crossterm::style::{style, Stylize};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt::Display;
use std::io::{IsTerminal, Write};
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render `rows` as a table under an optional title. Column order is the
/// field order of `T`; rows keep the order they were given in.
pub fn write_table<W, T>(out: &mut W, title: Option<&str>, rows: Vec<T>, color: bool) -> Result<()>
where
    W: Write,
    T: Tabled,
{
    if let Some(title) = title {
        if color {
            writeln!(out, "{}", style(title).bold().cyan())?;
        } else {
            writeln!(out, "{title}")?;
        }
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    writeln!(out, "{table}")?;
    Ok(())
}

/// Write any serializable value as JSON, pretty or compact.
pub fn write_json<W, T>(out: &mut W, value: &T, pretty: bool) -> Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| CliError::Decode(e.to_string()))?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Text for a table cell; absent values render empty.
pub fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Ask a yes/no question on the terminal, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(CliError::io)
}

/// Byte-based progress bar for chunked uploads, drawn on stderr.
pub fn upload_progress(total: u64, file_name: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::with_template("{msg} [{bar:30}] {bytes}/{total_bytes} ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(format!("Uploading {file_name}"));
    bar
}

/// Spinner (or bar, when the size is known) for downloads, drawn on stderr.
pub fn download_spinner(len: Option<u64>) -> ProgressBar {
    let bar = match len {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::new_spinner(),
    };
    if let Ok(style) = ProgressStyle::with_template("{spinner} Downloading {bytes}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Whether stdout is an interactive terminal, used to decide on color.
pub fn stdout_is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Whether there is an operator at stdin who can answer prompts.
pub fn stdin_is_terminal() -> bool {
    std::io::stdin().is_terminal()
}
