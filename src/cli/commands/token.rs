use crate::ui::prompts::prompt_access_token;
use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Args, Subcommand};
use colored::*;
use listing_engine::Session;
use listing_engine::api::TokenPair;

#[derive(Args)]
pub struct TokenCommands {
    #[command(subcommand)]
    pub command: TokenSubcommands,
}

#[derive(Subcommand)]
pub enum TokenSubcommands {
    /// Show the stored token
    Status,
    /// Store an access token
    Set {
        /// Access token, prompted for when omitted
        access_token: Option<String>,
        /// Refresh token
        #[arg(long)]
        refresh_token: Option<String>,
        /// Seconds until the access token expires
        #[arg(long)]
        expires_in: Option<i64>,
    },
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Remove stored tokens and cached data
    Clear,
}

pub async fn token_command(args: TokenCommands, session: &Session) -> Result<()> {
    match args.command {
        TokenSubcommands::Status => status(session),
        TokenSubcommands::Set {
            access_token,
            refresh_token,
            expires_in,
        } => {
            let mut tokens = TokenPair::new(prompt_access_token(access_token)?);
            if let Some(refresh_token) = refresh_token {
                tokens = tokens.with_refresh_token(refresh_token);
            }
            if let Some(seconds) = expires_in {
                tokens = tokens.with_expiry(Utc::now() + Duration::seconds(seconds));
            }
            session.auth().set_tokens(tokens)?;
            println!("{} Token stored", "✓".bright_green().bold());
            Ok(())
        }
        TokenSubcommands::Refresh => {
            let tokens = session.client().refresh_session().await?;
            println!("{} Token refreshed", "✓".bright_green().bold());
            print_expiry(&tokens);
            Ok(())
        }
        TokenSubcommands::Clear => {
            session.clear();
            println!("{} Stored credentials cleared", "✓".bright_green().bold());
            Ok(())
        }
    }
}

fn status(session: &Session) -> Result<()> {
    match session.auth().tokens() {
        Some(tokens) => {
            println!("  {}", "Signed in".bright_green().bold());
            println!(
                "  refresh token: {}",
                if tokens.refresh_token.is_some() { "stored" } else { "none" }
            );
            print_expiry(&tokens);
        }
        None => println!("  {}", "⚠️  No token stored".bright_yellow().bold()),
    }
    Ok(())
}

fn print_expiry(tokens: &TokenPair) {
    match tokens.expires_at {
        Some(at) if tokens.is_expired(Utc::now()) => {
            println!("  expired at {}", at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_red())
        }
        Some(at) => println!("  expires at {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  no expiry recorded"),
    }
}
