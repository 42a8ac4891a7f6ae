use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use folio::{
    commands::{check_config::check_config, email::EmailCommand, serve::serve},
    telemetry,
};
use folio_utils::folio_version;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Completion { shell } => {
            let mut cli = Cli::command();
            let name = env!("CARGO_BIN_NAME");
            clap_complete::generate(shell, &mut cli, name, &mut std::io::stdout());
            Ok(())
        }
        command => run(command).await,
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = folio_config::load().context("Failed to load config")?;
    let _sentry_guard = config.sentry.as_ref().map(telemetry::init_sentry);

    match command {
        Command::Serve => serve(config).await,
        Command::Email { command } => command.invoke(config).await,
        Command::CheckConfig { verbose } => check_config(&config, verbose),
        Command::Completion { .. } => unreachable!("handled before loading the config"),
    }
}

/// Backend for the contact form of a portfolio website
#[derive(Debug, Parser)]
#[command(version = folio_version())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Accept contact form submissions over HTTP
    #[command(aliases(["run", "start", "r", "s"]))]
    Serve,
    /// Send emails through the configured mail relay
    #[command(aliases(["e"]))]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Load the configuration and check that the mail relay settings are usable
    CheckConfig {
        /// Also print the loaded configuration
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print a completion script for the given shell
    Completion {
        #[clap(value_enum)]
        shell: Shell,
    },
}
