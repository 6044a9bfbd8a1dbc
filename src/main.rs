use std::process::ExitCode;

use chatwork_notifier::cli::{self, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // A notification problem must never fail the build that triggered it
        Err(e) if cli.command.is_best_effort() => {
            let error = format!("{:#}", e);
            tracing::error!(error = %error, "ChatWork notification skipped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = match cli::load_and_merge_config(cli) {
        Ok(settings) => settings,
        Err(e) => {
            cli::init_fallback_logger(cli)?;
            return Err(e.into());
        }
    };

    if let Err(e) = cli::init_logger_from_settings(&settings) {
        cli::init_fallback_logger(cli)?;
        return Err(e.context("Failed to initialize logger"));
    }

    tracing::debug!(
        app = %settings.application.name,
        app_version = %settings.application.version,
        build_version = chatwork_notifier::pkg_version(),
        room_id = %settings.notifier.room_id,
        api_base_url = %settings.notifier.api_base_url,
        "Configuration loaded"
    );

    cli::execute_command(cli, settings).await?;
    Ok(())
}
