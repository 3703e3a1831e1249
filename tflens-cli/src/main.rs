use clap::Parser;
use colored::Colorize;

use tflens_cli::cli::{Cli, Commands};
use tflens_cli::commands;
use tflens_cli::error::CliError;
use tflens_cli::logging::init_for_command;
use tflens_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Parse(args) => {
            let (mut config, source) = commands::load_config(config_path).await?;
            init_for_command(&mut config, cli.log_level)?;
            tracing::info!(config = %source, "tflens starting");

            commands::parse::execute(args, &config, &writer).await
        }
        Commands::Config(args) => {
            // The command itself reports a broken config file.
            let mut config = commands::load_config(config_path)
                .await
                .map(|(config, _)| config)
                .unwrap_or_default();
            init_for_command(&mut config, cli.log_level)?;

            commands::config::execute(args, config_path, &writer).await
        }
    }
}
