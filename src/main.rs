// Entrypoint for the CLI application.
// - Parses arguments first so usage errors never touch the network.
// - Refuses to run without an API key.
// - Maps each error kind to its own exit code.

use clap::Parser;
use openrelik_cli::api::ApiClient;
use openrelik_cli::cli::Cli;
use openrelik_cli::commands::{self, Context};
use openrelik_cli::config::Config;
use openrelik_cli::{logging, ui, CliError};
use std::process::ExitCode;

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::resolve(cli.api_url, cli.api_key, cli.api_version)?;
    let api = ApiClient::new(&config)?;
    tracing::debug!(base_url = api.base_url(), "client ready");

    let ctx = Context::new(&api, ui::stdout_is_terminal()).with_prompts(ui::stdin_is_terminal());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&ctx, &mut out, cli.command)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("Warning: {err:#}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let code = err
                .downcast_ref::<CliError>()
                .map(CliError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}
