use super::commands::categories::CategoriesArgs;
use super::commands::delete::DeleteArgs;
use super::commands::feed::FeedArgs;
use super::commands::options::OptionsCommands;
use super::commands::submit::SubmitArgs;
use super::commands::token::TokenCommands;
use super::commands::validate::ValidateArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "listing-engine")]
#[command(about = "Create, edit and browse marketplace listings from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the category table
    Categories(CategoriesArgs),
    /// Validate listing values offline
    Validate(ValidateArgs),
    /// Look up dropdown options
    Options(OptionsCommands),
    /// Create or update a listing
    Submit(SubmitArgs),
    /// Browse the listing feed
    Feed(FeedArgs),
    /// Delete a listing
    Delete(DeleteArgs),
    /// Manage stored access tokens
    Token(TokenCommands),
}
