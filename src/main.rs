use clap::Parser;

use paprika_bot::adapter::inbound::cli::{check, run, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let result = match cli.subcommand() {
        Commands::Run => run::execute(&cli.config).await,
        Commands::Check => check::execute(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
