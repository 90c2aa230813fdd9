pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "dealership-api")]
#[command(about = "REST API for dealerships and their cars")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Keep data in process memory instead of PostgreSQL")]
        in_memory: bool,
    },

    #[command(about = "Create the dealership and car tables if they are missing")]
    Migrate,

    #[command(about = "Insert the demo dealerships, five cars each")]
    Seed,

    #[command(about = "Print a bearer token for the demo identity")]
    Token,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { in_memory: false }) {
        Commands::Serve { in_memory } => commands::serve::handle(&config, in_memory).await,
        Commands::Migrate => commands::migrate::handle(&config).await,
        Commands::Seed => commands::seed::handle(&config).await,
        Commands::Token => commands::token::handle(&config),
    }
}
