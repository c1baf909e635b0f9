use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use call_ledger::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // The deployment keeps store credentials in a .env file next to the
    // worker; absence is fine.
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    init_tracing();

    match args.command {
        cli::Commands::Recent { limit, format } => {
            commands::recent::execute(limit, &format).await?;
        }
        cli::Commands::Bookings => {
            commands::bookings::execute().await?;
        }
        cli::Commands::Stats => {
            commands::stats::execute().await?;
        }
        cli::Commands::Save { file } => {
            commands::save::execute(&file).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show()?,
            cli::ConfigCommands::Validate => commands::config::validate()?,
        },
    }

    Ok(())
}
