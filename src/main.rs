use clap::Parser;
use dealership_api::cli::Cli;
use dealership_api::config::AppConfig;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DB_* and JWT_SECRET
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    dealership_api::logging::init(&config.logging)?;
    dealership_api::cli::run(cli, config).await
}
