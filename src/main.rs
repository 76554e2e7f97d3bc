use anyhow::Result;
use clap::Parser;
use listing_engine::Session;
use listing_engine::config::Config;
use log::{error, info};

mod cli;
mod ui;

use cli::Cli;
use cli::app::Commands;
use cli::commands::{categories, delete, feed, options, submit, token, validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("listing-engine.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting listing-engine");

    let result = match cli.command {
        Commands::Categories(args) => categories::categories_command(args).await,
        Commands::Validate(args) => validate::validate_command(args).await,
        command => {
            let session = Session::from_config(Config::load()?)?;
            match command {
                Commands::Options(args) => options::options_command(args, &session).await,
                Commands::Submit(args) => submit::submit_command(args, &session).await,
                Commands::Feed(args) => feed::feed_command(args, &session).await,
                Commands::Delete(args) => delete::delete_command(args, &session).await,
                Commands::Token(args) => token::token_command(args, &session).await,
                Commands::Categories(_) | Commands::Validate(_) => Ok(()),
            }
        }
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}
